/// Cursor position reported with every history movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPosition {
    /// index of the current snapshot
    pub cursor: usize,
    /// number of stored snapshots
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEvent {
    Committed(HistoryPosition),
    Reset(HistoryPosition),
    Undo(HistoryPosition),
    Redo(HistoryPosition),
    Saved,
}

impl HistoryEvent {
    pub fn str(&self) -> &str {
        match self {
            HistoryEvent::Committed(_) => "Committed",
            HistoryEvent::Reset(_) => "Reset",
            HistoryEvent::Undo(_) => "Undo",
            HistoryEvent::Redo(_) => "Redo",
            HistoryEvent::Saved => "Saved",
        }
    }
}
