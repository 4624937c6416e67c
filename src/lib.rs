// TaskList - In-memory task collection with search, status counters and seed import

pub mod config;
pub mod event;
pub mod jsonl;
pub mod models;
pub mod query;
pub mod seed;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use event::StoreEvent;
pub use models::{NewTask, RawRecord, Task, TaskPatch, TaskStatus};
pub use query::{StatusCounts, count_by_status, filter, filter_by_status};
pub use seed::{HttpSeedSource, JsonlSeedSource, SeedLoader, SeedSource};
pub use store::{SharedStore, StoreOptions, TaskStore};
