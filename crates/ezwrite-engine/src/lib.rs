pub mod editing;
pub mod export;
pub mod io;
pub mod pages;
pub mod timer;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{
    Cmd, Document, Editor, EditorKey, EditorSettings, LineType, LogicalCursor, Motion, Patch,
    SyncPath,
};
pub use export::{ExportFormat, export_file_name};
pub use io::{IoError, LocalStore};
pub use pages::{PAGE_COUNT, PageStore};
