//! The navigation machine: screens as explicit stack frames.
//!
//! Every screen is a `Screen` variant carrying its own argument bundle, so
//! a child never reaches into its parent's state. The driver owns the
//! `Vec<Screen>`; screens only return a `Nav` transition.

use std::collections::BTreeSet;

/// One frame on the navigation stack. The bundle holds everything the
/// screen needs to resume exactly where it left off when a child returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Home,
    Tasks(TasksArgs),
    Modify(ModifyArgs),
    Quests(Selection),
    Awards(Selection),
    Projects(Selection),
    ProjectTasks(ProjectTasksArgs),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TasksArgs {
    pub include_overdue: bool,
    pub include_closed: bool,
    pub selection: Selection,
}

/// The id list is computed by the pushing screen; the modify screen never
/// re-derives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyArgs {
    pub ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTasksArgs {
    pub project: i64,
    pub project_name: String,
    pub selection: Selection,
}

/// What a screen hands back to the driver when its loop ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nav {
    Push(Screen),
    Pop,
    Quit,
}

/// Apply a transition to the stack. `Quit` unwinds everything; the machine
/// terminates when the stack is empty.
pub fn apply(stack: &mut Vec<Screen>, nav: Nav) {
    match nav {
        Nav::Push(screen) => stack.push(screen),
        Nav::Pop => {
            stack.pop();
        }
        Nav::Quit => stack.clear(),
    }
}

/// Cursor position plus an independent multi-select set of entity ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub cursor: usize,
    pub marked: BTreeSet<i64>,
}

impl Selection {
    /// Move the cursor down, wrapping past the end.
    pub fn down(&mut self, len: usize) {
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    /// Move the cursor up, wrapping past the start.
    pub fn up(&mut self, len: usize) {
        if len > 0 {
            self.cursor = (self.cursor + len - 1) % len;
        }
    }

    /// Keep the cursor inside a list that may have shrunk since the last
    /// reload.
    pub fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn toggle(&mut self, id: i64) {
        if !self.marked.remove(&id) {
            self.marked.insert(id);
        }
    }

    pub fn clear_marks(&mut self) {
        self.marked.clear();
    }

    /// Bulk-operation targets: the marked set when non-empty, otherwise
    /// the item under the cursor.
    pub fn targets(&self, under_cursor: Option<i64>) -> Vec<i64> {
        if self.marked.is_empty() {
            under_cursor.into_iter().collect()
        } else {
            self.marked.iter().copied().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn push_then_pop_restores_the_parent_frame() {
        let home = Screen::Home;
        let tasks = Screen::Tasks(TasksArgs {
            include_overdue: true,
            ..TasksArgs::default()
        });
        let mut stack = vec![home.clone()];

        apply(&mut stack, Nav::Push(tasks.clone()));
        assert_eq!(stack, [home.clone(), tasks]);

        apply(&mut stack, Nav::Pop);
        assert_eq!(stack, [home]);

        apply(&mut stack, Nav::Pop);
        assert!(stack.is_empty());
    }

    #[test]
    fn quit_unwinds_from_any_depth() {
        let mut stack = vec![
            Screen::Home,
            Screen::Projects(Selection::default()),
            Screen::ProjectTasks(ProjectTasksArgs {
                project: 3,
                project_name: "thesis".into(),
                selection: Selection::default(),
            }),
            Screen::Modify(ModifyArgs { ids: vec![1, 2] }),
        ];
        apply(&mut stack, Nav::Quit);
        assert!(stack.is_empty());
    }

    #[test]
    fn cursor_wraps_both_directions() {
        let mut selection = Selection::default();
        selection.up(3);
        assert_eq!(selection.cursor, 2);
        selection.down(3);
        assert_eq!(selection.cursor, 0);
        selection.down(3);
        selection.down(3);
        selection.down(3);
        assert_eq!(selection.cursor, 0);
    }

    #[test]
    fn cursor_is_inert_on_an_empty_list() {
        let mut selection = Selection::default();
        selection.down(0);
        selection.up(0);
        selection.clamp(0);
        assert_eq!(selection.cursor, 0);
    }

    #[test]
    fn clamp_pulls_the_cursor_back_after_shrink() {
        let mut selection = Selection {
            cursor: 4,
            ..Selection::default()
        };
        selection.clamp(2);
        assert_eq!(selection.cursor, 1);
    }

    #[test]
    fn targets_prefer_the_marked_set() {
        let mut selection = Selection::default();
        assert_eq!(selection.targets(Some(7)), [7]);
        assert_eq!(selection.targets(None), [] as [i64; 0]);

        selection.toggle(12);
        selection.toggle(3);
        assert_eq!(selection.targets(Some(7)), [3, 12]);

        selection.toggle(3);
        selection.toggle(12);
        assert_eq!(selection.targets(Some(7)), [7]);
    }
}
