//! Built-in widgets.
//!
//! Markup is deliberately minimal: each widget emits one element carrying its
//! id and a `weft-<Name>` class, leaving styling to the application.

mod button;
mod label;
mod listbox;
mod panel;

pub use button::Button;
pub use label::Label;
pub use listbox::ListBox;
pub use panel::Panel;
