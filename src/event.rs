// Notifications emitted by the store after a mutation commits

use std::fmt;

/// Store change notification
///
/// Sent to every subscriber once the mutation is visible through the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Seeded { count: usize },
    Added { id: u64, title: String },
    Updated { id: u64 },
    Deleted { id: u64 },
}

impl StoreEvent {
    /// Short action verb
    pub fn action(&self) -> &'static str {
        match self {
            StoreEvent::Seeded { .. } => "seeded",
            StoreEvent::Added { .. } => "added",
            StoreEvent::Updated { .. } => "updated",
            StoreEvent::Deleted { .. } => "deleted",
        }
    }
}

impl fmt::Display for StoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreEvent::Seeded { count } => write!(f, "Loaded {} tasks", count),
            StoreEvent::Added { .. } => write!(f, "Task added successfully!"),
            StoreEvent::Updated { .. } => write!(f, "Task updated successfully!"),
            StoreEvent::Deleted { .. } => write!(f, "Task deleted successfully!"),
        }
    }
}
