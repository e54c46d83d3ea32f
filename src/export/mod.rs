pub mod html;

pub use html::{export_to_dir, HtmlTemplate};
