//! Full page rendering.

use weft_api::protocol::AppPaths;
use weft_client::browser::page_globals;
use weft_kernel::Session;
use weft_kernel::render::escape;

/// Render the application page for `session`: the endpoint globals and
/// initial focus, the runtime script, then the whole component tree.
pub fn render_page(session: &mut Session, paths: &AppPaths, title: &str) -> String {
    let body = session.render_root().unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"UTF-8\"><title>{}</title>\
         <script>{}</script><script src=\"{}\"></script></head>\
         <body>{}</body></html>",
        escape(title),
        page_globals(paths, session.focused()),
        paths.runtime_js,
        body
    )
}
