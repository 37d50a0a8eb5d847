use crate::editing::cursor::LogicalCursor;

/// How an edit reached the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPath {
    /// Nothing in the document changed
    Unchanged,
    /// Content changed but every line kept its type; the surface already
    /// shows the edit and was left alone
    Direct,
    /// The surface was regenerated from the line array
    Structural,
}

/// Result of applying an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    pub path: SyncPath,
    pub cursor: LogicalCursor,
    pub version: u64,
}

impl Patch {
    pub fn is_structural(&self) -> bool {
        self.path == SyncPath::Structural
    }

    pub fn changed(&self) -> bool {
        self.path != SyncPath::Unchanged
    }
}
