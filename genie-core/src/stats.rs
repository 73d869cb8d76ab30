//! Dashboard statistics over the current task list.

use chrono::NaiveDate;
use serde::Serialize;

use crate::task::{Category, Priority, Task, TaskStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub completed: usize,
    /// Everything not completed, including in-progress tasks.
    pub pending: usize,
    pub in_progress: usize,
    pub overdue: usize,
    pub by_priority: Vec<(Priority, usize)>,
    pub by_category: Vec<(Category, usize)>,
}

impl DashboardStats {
    pub fn from_tasks(tasks: &[Task], today: NaiveDate) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.is_completed()).count();
        let in_progress = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::InProgress)
            .count();
        let overdue = tasks.iter().filter(|t| t.is_overdue(today)).count();

        let by_priority = Priority::ALL
            .into_iter()
            .map(|p| (p, tasks.iter().filter(|t| t.priority == p).count()))
            .collect();
        let by_category = Category::ALL
            .into_iter()
            .map(|c| (c, tasks.iter().filter(|t| t.category == c).count()))
            .collect();

        Self {
            total,
            completed,
            pending: total - completed,
            in_progress,
            overdue,
            by_priority,
            by_category,
        }
    }

    /// Completed share in percent, 0 for an empty list.
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}
