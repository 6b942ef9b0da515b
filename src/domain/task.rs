//! Task checklist
//!
//! The ordered list of work items for the current session. Order is
//! user-controlled and significant: tasks render, reorder, and resolve by
//! position, not by id.

use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// A single work item on the day's checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub done: bool,
}

/// Ordered, reorderable list of work items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskChecklist {
    tasks: Vec<Task>,
}

impl TaskChecklist {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Append a task. Titles are trimmed; blank titles are rejected.
    pub fn add(&mut self, title: &str) -> Result<(), EngineError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EngineError::BlankTitle);
        }
        self.tasks.push(Task {
            title: title.to_string(),
            done: false,
        });
        Ok(())
    }

    /// Replace the title of an existing task, keeping its done flag.
    pub fn edit(&mut self, index: usize, title: &str) -> Result<(), EngineError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EngineError::BlankTitle);
        }
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(EngineError::TaskIndex(index))?;
        task.title = title.to_string();
        Ok(())
    }

    /// Remove and return the task at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Task, EngineError> {
        if index >= self.tasks.len() {
            return Err(EngineError::TaskIndex(index));
        }
        Ok(self.tasks.remove(index))
    }

    /// Swap with the previous task; already at the top is a no-op.
    pub fn move_up(&mut self, index: usize) -> Result<(), EngineError> {
        if index >= self.tasks.len() {
            return Err(EngineError::TaskIndex(index));
        }
        if index > 0 {
            self.tasks.swap(index, index - 1);
        }
        Ok(())
    }

    /// Swap with the next task; already at the bottom is a no-op.
    pub fn move_down(&mut self, index: usize) -> Result<(), EngineError> {
        if index >= self.tasks.len() {
            return Err(EngineError::TaskIndex(index));
        }
        if index + 1 < self.tasks.len() {
            self.tasks.swap(index, index + 1);
        }
        Ok(())
    }

    /// Flip a task between open and done, returning the new flag.
    pub fn toggle_done(&mut self, index: usize) -> Result<bool, EngineError> {
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(EngineError::TaskIndex(index))?;
        task.done = !task.done;
        Ok(task.done)
    }

    /// True when the list is non-empty and every task is done.
    ///
    /// This is the gate for stopping a session.
    pub fn all_complete(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|t| t.done)
    }

    /// Number of tasks not yet checked off
    pub fn open_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.done).count()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checklist(titles: &[&str]) -> TaskChecklist {
        let mut list = TaskChecklist::new();
        for title in titles {
            list.add(title).unwrap();
        }
        list
    }

    #[test]
    fn test_add_trims_and_rejects_blank() {
        let mut list = TaskChecklist::new();
        list.add("  write report  ").unwrap();
        assert_eq!(list.tasks()[0].title, "write report");
        assert_eq!(list.add("   "), Err(EngineError::BlankTitle));
        assert_eq!(list.add(""), Err(EngineError::BlankTitle));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_edit_keeps_done_flag() {
        let mut list = checklist(&["a"]);
        list.toggle_done(0).unwrap();
        list.edit(0, "b").unwrap();
        assert_eq!(list.tasks()[0].title, "b");
        assert!(list.tasks()[0].done);
        assert_eq!(list.edit(5, "x"), Err(EngineError::TaskIndex(5)));
    }

    #[test]
    fn test_reorder_edges_are_noops() {
        let mut list = checklist(&["a", "b", "c"]);
        list.move_up(0).unwrap(); // Top stays put
        assert_eq!(list.tasks()[0].title, "a");
        list.move_down(2).unwrap(); // Bottom stays put
        assert_eq!(list.tasks()[2].title, "c");

        list.move_up(2).unwrap();
        let titles: Vec<&str> = list.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["a", "c", "b"]);

        assert_eq!(list.move_down(3), Err(EngineError::TaskIndex(3)));
    }

    #[test]
    fn test_remove_shifts_positions() {
        let mut list = checklist(&["a", "b", "c"]);
        let removed = list.remove(1).unwrap();
        assert_eq!(removed.title, "b");
        assert_eq!(list.tasks()[1].title, "c");
        assert_eq!(list.remove(2), Err(EngineError::TaskIndex(2)));
    }

    #[test]
    fn test_all_complete_requires_nonempty() {
        let mut list = TaskChecklist::new();
        assert!(!list.all_complete()); // Empty list never counts as complete
        list.add("a").unwrap();
        list.add("b").unwrap();
        assert!(!list.all_complete());
        list.toggle_done(0).unwrap();
        assert_eq!(list.open_count(), 1);
        list.toggle_done(1).unwrap();
        assert!(list.all_complete());
        list.toggle_done(1).unwrap(); // Untick drops completion again
        assert!(!list.all_complete());
    }
}
