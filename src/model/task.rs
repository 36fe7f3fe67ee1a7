use crate::dates::DateConstraint;

/// Open/closed flag, stored as 1/0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Closed,
    Open,
}

impl TaskStatus {
    pub fn as_int(self) -> i64 {
        match self {
            TaskStatus::Closed => 0,
            TaskStatus::Open => 1,
        }
    }

    pub fn from_int(value: i64) -> Option<TaskStatus> {
        match value {
            0 => Some(TaskStatus::Closed),
            1 => Some(TaskStatus::Open),
            _ => None,
        }
    }

    pub fn is_open(self) -> bool {
        self == TaskStatus::Open
    }
}

/// A task as read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: i64,
    pub name: String,
    /// Higher = more urgent. Time-bound tasks carry a fixed boost.
    pub priority: i64,
    /// User-assigned effort/value unit.
    pub weight: f64,
    pub status: TaskStatus,
    /// `YYYY-MM-DD`; `None` means no due date, which is a distinct state
    /// from "due today".
    pub due_date: Option<String>,
    /// Local wall-clock `HH:MM`, converted from the stored UTC form on read.
    pub due_time: Option<String>,
    /// Recurrence spec, stored as `+N days|months|years`.
    pub repeat_period: Option<String>,
    pub project: i64,
    /// Closing the task cascades to this quest, if set.
    pub quest: Option<i64>,
    /// Ordering key when listing within a project; independent of the
    /// global priority.
    pub priority_in_project: i64,
}

/// Fields for a newly created task. A `None` due date falls back to today;
/// `Some(DateConstraint::Unset)` creates the task without one.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub name: String,
    pub priority: i64,
    pub weight: f64,
    /// Local wall-clock `HH:MM`.
    pub due_time: Option<String>,
    pub due: Option<DateConstraint>,
    /// Period without the stored `+` prefix, e.g. `2 days`.
    pub repeat: Option<String>,
    /// Defaults to the implicit project.
    pub project: Option<i64>,
}

/// Sparse update: `None` leaves a field unchanged. There are no sentinel
/// values; an update with every field `None` is a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub priority: Option<i64>,
    pub weight: Option<f64>,
    pub status: Option<TaskStatus>,
    /// `DateConstraint::Unset` clears the due date.
    pub due: Option<DateConstraint>,
    /// Local wall-clock `HH:MM`.
    pub due_time: Option<String>,
    pub repeat: Option<String>,
    pub project: Option<i64>,
    pub priority_in_project: Option<i64>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        *self == TaskUpdate::default()
    }

    pub fn priority(value: i64) -> Self {
        TaskUpdate {
            priority: Some(value),
            ..TaskUpdate::default()
        }
    }

    pub fn due(constraint: DateConstraint) -> Self {
        TaskUpdate {
            due: Some(constraint),
            ..TaskUpdate::default()
        }
    }
}
