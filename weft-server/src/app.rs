//! Application hook.

use weft_kernel::Session;

/// Builds the component tree of every new session.
///
/// `build` must insert the components, register their handlers and set the
/// root.
pub trait App: Send + Sync + 'static {
    /// Page title.
    fn title(&self) -> &str {
        "Weft"
    }

    fn build(&self, session: &mut Session) -> anyhow::Result<()>;
}
