mod analyzer;
mod documents;
mod renderer;
mod scanner;

pub use analyzer::{analyze_comment_lines, analyze_file, analyze_source};
pub use documents::{DocumentId, DocumentStore};
pub use renderer::{render_file, render_file_ansi, Renderer};
pub use scanner::{RegionScanner, ScanError};
