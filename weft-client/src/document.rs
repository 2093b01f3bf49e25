//! The page the runtime manipulates.

use weft_api::ComponentId;

use crate::status::SessionStatus;

/// DOM operations the runtime needs. Elements are addressed by component id,
/// which is also their `id` attribute.
pub trait Document {
    /// Whether an element for `id` is currently in the page.
    fn contains(&self, id: ComponentId) -> bool;

    /// Component id of the element holding keyboard focus, if any.
    fn active_element(&self) -> Option<ComponentId>;

    /// Replace the element's outer markup.
    fn replace_outer_html(&mut self, id: ComponentId, markup: &str);

    /// Bodies of the `<script>` elements inside the element for `id`.
    fn scripts(&self, id: ComponentId) -> Vec<String>;

    /// Give keyboard focus to the element. Returns whether it exists.
    fn focus(&mut self, id: ComponentId) -> bool;

    /// Update a session monitor's label and expired class.
    fn show_session_status(&mut self, id: ComponentId, status: SessionStatus);

    /// Navigate to an absolute path.
    fn navigate(&mut self, path: &str);

    /// Force a full reload of the current page.
    fn reload(&mut self);

    /// Show a blocking message to the user.
    fn alert(&mut self, message: &str);
}
