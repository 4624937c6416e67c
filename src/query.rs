// Read-only projections over the task collection

use crate::models::{Task, TaskStatus};

/// Tasks whose title or description contains `term`, ignoring case
///
/// An empty term matches every task. Order is preserved.
pub fn filter<'a>(tasks: &'a [Task], term: &str) -> Vec<&'a Task> {
    let needle = term.to_lowercase();
    tasks
        .iter()
        .filter(|task| matches_term(task, &needle))
        .collect()
}

/// Tasks with the given status, in collection order
pub fn filter_by_status(tasks: &[Task], status: TaskStatus) -> Vec<&Task> {
    tasks.iter().filter(|task| task.status == status).collect()
}

fn matches_term(task: &Task, needle: &str) -> bool {
    needle.is_empty() || task.title.to_lowercase().contains(needle) || task.description.to_lowercase().contains(needle)
}

/// Number of tasks per status; every status is always present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub to_do: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl StatusCounts {
    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::ToDo => self.to_do,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }

    pub fn total(&self) -> usize {
        self.to_do + self.in_progress + self.done
    }

    /// `(status, count)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, usize)> + '_ {
        TaskStatus::ALL.into_iter().map(move |status| (status, self.get(status)))
    }

    fn increment(mut self, status: TaskStatus) -> Self {
        match status {
            TaskStatus::ToDo => self.to_do += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Done => self.done += 1,
        }
        self
    }
}

pub fn count_by_status<'a, I>(tasks: I) -> StatusCounts
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .fold(StatusCounts::default(), |counts, task| counts.increment(task.status))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: u64, title: &str, description: &str, status: TaskStatus) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: description.to_string(),
            status,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, "Buy milk", "From the corner shop", TaskStatus::ToDo),
            task(2, "Write report", "Quarterly numbers", TaskStatus::InProgress),
            task(3, "Call Bob", "About the MILK order", TaskStatus::Done),
            task(4, "Plan trip", "No description", TaskStatus::ToDo),
        ]
    }

    fn ids(tasks: &[&Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_filter_empty_term_returns_everything() {
        let tasks = sample();

        let result = filter(&tasks, "");

        assert_eq!(result.len(), tasks.len());
        assert!(result.iter().zip(&tasks).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_filter_matches_title_or_description_ignoring_case() {
        let tasks = sample();

        assert_eq!(ids(&filter(&tasks, "milk")), vec![1, 3]);
        assert_eq!(ids(&filter(&tasks, "REPORT")), vec![2]);
        assert_eq!(ids(&filter(&tasks, "quarterly")), vec![2]);
    }

    #[test]
    fn test_filter_no_match() {
        let tasks = sample();
        assert!(filter(&tasks, "zebra").is_empty());
    }

    #[test]
    fn test_filter_on_empty_collection() {
        assert!(filter(&[], "anything").is_empty());
        assert!(filter(&[], "").is_empty());
    }

    #[test]
    fn test_filter_is_repeatable() {
        let tasks = sample();
        assert_eq!(filter(&tasks, "o"), filter(&tasks, "o"));
    }

    #[test]
    fn test_filter_by_status() {
        let tasks = sample();

        assert_eq!(ids(&filter_by_status(&tasks, TaskStatus::ToDo)), vec![1, 4]);
        assert_eq!(ids(&filter_by_status(&tasks, TaskStatus::Done)), vec![3]);
    }

    #[test]
    fn test_count_by_status() {
        let tasks = sample();

        let counts = count_by_status(&tasks);

        assert_eq!(counts.get(TaskStatus::ToDo), 2);
        assert_eq!(counts.get(TaskStatus::InProgress), 1);
        assert_eq!(counts.get(TaskStatus::Done), 1);
        assert_eq!(counts.total(), tasks.len());
    }

    #[test]
    fn test_count_by_status_empty_has_all_keys() {
        let counts = count_by_status(&[]);

        let pairs: Vec<(TaskStatus, usize)> = counts.iter().collect();
        assert_eq!(
            pairs,
            vec![(TaskStatus::ToDo, 0), (TaskStatus::InProgress, 0), (TaskStatus::Done, 0)]
        );
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_count_by_status_ignores_order() {
        let tasks = sample();
        let reversed: Vec<Task> = tasks.iter().rev().cloned().collect();

        assert_eq!(count_by_status(&tasks), count_by_status(&reversed));
    }

    #[test]
    fn test_count_over_filtered_view() {
        let tasks = sample();

        let counts = count_by_status(filter(&tasks, "milk"));

        assert_eq!(counts.to_do, 1);
        assert_eq!(counts.done, 1);
        assert_eq!(counts.total(), 2);
    }
}
