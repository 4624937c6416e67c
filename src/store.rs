// In-memory task store with change notifications

use crate::event::StoreEvent;
use crate::models::{NewTask, RawRecord, Task, TaskPatch};
use eyre::{Result, eyre};
use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Maximum number of records taken from a seed batch
pub const DEFAULT_SEED_LIMIT: usize = 20;

/// Description used when a task is added without one
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Store handle for hosts that touch the store from more than one thread
pub type SharedStore = Arc<Mutex<TaskStore>>;

/// Tunables applied by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub seed_limit: usize,
    pub default_description: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            seed_limit: DEFAULT_SEED_LIMIT,
            default_description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

/// Single source of truth for the task collection
///
/// Tasks are kept in insertion order. Ids come from a monotonic counter and
/// are never handed out twice, even after the task holding one is removed.
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
    options: StoreOptions,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Create an empty store with default options
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            options,
            subscribers: Vec::new(),
        }
    }

    /// Wrap the store for use across threads
    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Register an observer; events arrive after each committed mutation
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Replace the collection with tasks built from `records`
    ///
    /// Only the first `seed_limit` distinct records are used. A record whose
    /// external id was already seen in this batch is skipped.
    pub fn seed(&mut self, records: Vec<RawRecord>) -> usize {
        let mut seen = HashSet::new();
        let mut tasks = Vec::with_capacity(records.len().min(self.options.seed_limit));

        for record in records {
            if tasks.len() >= self.options.seed_limit {
                break;
            }
            if record.external_id == u64::MAX {
                warn!(external_id = record.external_id, "Skipping seed record with id at the counter limit");
                continue;
            }
            if !seen.insert(record.external_id) {
                warn!(external_id = record.external_id, "Skipping duplicate seed record");
                continue;
            }
            tasks.push(record.into_task());
        }

        // Ids of u64::MAX were skipped above, so this cannot overflow
        self.next_id = tasks.iter().map(|t| t.id).max().map_or(1, |max| max + 1);
        self.tasks = tasks;

        let count = self.tasks.len();
        info!(count, next_id = self.next_id, "Seeded task store");
        self.notify(StoreEvent::Seeded { count });
        count
    }

    /// Append a new task and return it
    ///
    /// Fails without touching the collection when the title is blank or the
    /// id counter is exhausted. An empty description takes the default.
    pub fn add(&mut self, input: NewTask) -> Result<Task> {
        Self::validate_title(&input.title)?;
        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| eyre!("Task id counter exhausted at {}", self.next_id))?;

        let task = Task {
            id: self.next_id,
            title: input.title,
            description: input
                .description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| self.options.default_description.clone()),
            status: input.status.unwrap_or_default(),
        };
        self.next_id = next_id;
        self.tasks.push(task.clone());

        debug!(id = task.id, title = %task.title, "add: task appended");
        self.notify(StoreEvent::Added {
            id: task.id,
            title: task.title.clone(),
        });
        Ok(task)
    }

    /// Merge `patch` into the task with `id`
    ///
    /// Returns `Ok(false)` when no such task exists, whatever the patch holds.
    /// A patch that would blank the title of an existing task is rejected and
    /// nothing is applied.
    pub fn update(&mut self, id: u64, patch: TaskPatch) -> Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(id, "update: no such task");
            return Ok(false);
        };
        if let Some(title) = &patch.title {
            Self::validate_title(title)?;
        }
        patch.apply(task);

        debug!(id, "update: task patched");
        self.notify(StoreEvent::Updated { id });
        Ok(true)
    }

    /// Remove the task with `id`, returning whether one was removed
    pub fn remove(&mut self, id: u64) -> bool {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            debug!(id, "remove: no such task");
            return false;
        };
        self.tasks.remove(index);

        debug!(id, "remove: task deleted");
        self.notify(StoreEvent::Deleted { id });
        true
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// All tasks in insertion order
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn notify(&mut self, event: StoreEvent) {
        debug!(action = event.action(), subscribers = self.subscribers.len(), "notify");
        // Drop observers whose receiving end has gone away
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn validate_title(title: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Err(eyre!("Task title cannot be empty or whitespace-only"));
        }
        Ok(())
    }
}

/// Lock a shared store
pub fn lock(store: &SharedStore) -> Result<MutexGuard<'_, TaskStore>> {
    store.lock().map_err(|_| eyre!("Task store lock poisoned"))
}
