//! Task listing and mutation semantics.

use chrono::{Local, NaiveDate};
use rusqlite::types::Value;
use rusqlite::{OptionalExtension, params, params_from_iter};

use crate::config::DEFAULT_LIST_LIMIT;
use crate::dates::{self, DATE_FORMAT, DateConstraint};
use crate::error::{Error, Result};
use crate::model::rpg::QuestOutcome;
use crate::model::task::{NewTask, Task, TaskStatus, TaskUpdate};

use super::{DEFAULT_PROJECT, Store};

/// Fixed priority boost for time-bound tasks.
pub const TIME_BOUND_BOOST: i64 = 100;

/// Filter and ordering parameters for `list_tasks`.
#[derive(Debug, Clone)]
pub struct TaskQuery {
    /// Return at most the single highest-priority task that is open, due
    /// today or earlier, and whose due time (if any) has already passed.
    pub top_only: bool,
    pub include_closed: bool,
    /// Due-date filter; `None` defaults to today (or strictly overdue when
    /// `include_overdue` is set).
    pub due: Option<DateConstraint>,
    /// Scope to a project; switches ordering to `priority_in_project`.
    pub project: Option<i64>,
    /// Widen an exact-date match to "on or before".
    pub include_overdue: bool,
    /// Result cap; bounds what a screen has to render.
    pub limit: usize,
}

impl Default for TaskQuery {
    fn default() -> Self {
        TaskQuery {
            top_only: false,
            include_closed: false,
            due: None,
            project: None,
            include_overdue: false,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl TaskQuery {
    pub fn top() -> Self {
        TaskQuery {
            top_only: true,
            ..TaskQuery::default()
        }
    }
}

/// Which of today's tasks `total_weight` sums over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightScope {
    All,
    Closed,
}

const TASK_COLUMNS: &str =
    "id, name, priority, weight, status, due_date, due_time, repeat_period, \
     project, quest, priority_in_project";

fn today_stored() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

impl Store {
    pub fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        let today = today_stored();
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks");
        let mut args: Vec<Value> = Vec::new();

        if query.top_only {
            sql.push_str(
                " WHERE status = 1 AND due_date IS NOT NULL AND due_date <= ? \
                 AND (due_time IS NULL OR due_time < ?) \
                 ORDER BY priority DESC, id ASC LIMIT 1",
            );
            args.push(Value::Text(today));
            args.push(Value::Text(dates::now_utc_hhmm()));
        } else {
            let mut clauses: Vec<&str> = Vec::new();

            if !query.include_closed {
                clauses.push("status = 1");
            }
            if let Some(project) = query.project {
                clauses.push("project = ?");
                args.push(Value::Integer(project));
            }
            match query.due {
                Some(DateConstraint::Unset) => clauses.push("due_date IS NULL"),
                Some(DateConstraint::On(date)) => {
                    clauses.push(if query.include_overdue {
                        "due_date <= ?"
                    } else {
                        "due_date = ?"
                    });
                    args.push(Value::Text(date.format(DATE_FORMAT).to_string()));
                }
                None => {
                    // No explicit filter: today's tasks, or the strictly
                    // overdue ones when widening.
                    clauses.push(if query.include_overdue {
                        "due_date < ?"
                    } else {
                        "due_date = ?"
                    });
                    args.push(Value::Text(today));
                }
            }

            if !clauses.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&clauses.join(" AND "));
            }
            sql.push_str(if query.project.is_some() {
                " ORDER BY priority_in_project DESC, id ASC"
            } else {
                " ORDER BY priority DESC, id ASC"
            });
            sql.push_str(" LIMIT ?");
            args.push(Value::Integer(query.limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(args), read_task_row)?
            .collect::<rusqlite::Result<Vec<RawTask>>>()?;
        rows.into_iter().map(RawTask::into_task).collect()
    }

    pub fn get_task(&self, id: i64) -> Result<Task> {
        let raw = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"),
                [id],
                read_task_row,
            )
            .optional()?
            .ok_or(Error::NotFound {
                entity: "task",
                id,
            })?;
        raw.into_task()
    }

    /// Returns the new task's id. A missing due date defaults to today;
    /// supplying a due time adds the time-bound priority boost.
    pub fn add_task(&self, task: &NewTask) -> Result<i64> {
        let mut priority = task.priority;
        let due_time = match &task.due_time {
            Some(time) => {
                priority += TIME_BOUND_BOOST;
                Some(dates::local_time_to_utc(time)?)
            }
            None => None,
        };
        let due_date = match task.due {
            Some(constraint) => constraint.to_stored(),
            None => Some(today_stored()),
        };
        let repeat = task.repeat.as_ref().map(|r| format!("+{r}"));
        let project = task.project.unwrap_or(DEFAULT_PROJECT);
        self.ensure_project(project)?;

        self.conn.execute(
            "INSERT INTO tasks(name, priority, weight, due_date, due_time, repeat_period, project) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![task.name, priority, task.weight, due_date, due_time, repeat, project],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Sparse update: only the supplied fields change.
    pub fn modify_task(&self, id: i64, update: &TaskUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let mut setters: Vec<&'static str> = Vec::new();
        let mut args: Vec<Value> = Vec::new();

        if let Some(name) = &update.name {
            setters.push("name = ?");
            args.push(Value::Text(name.clone()));
        }
        if let Some(priority) = update.priority {
            setters.push("priority = ?");
            args.push(Value::Integer(priority));
        }
        if let Some(weight) = update.weight {
            setters.push("weight = ?");
            args.push(Value::Real(weight));
        }
        if let Some(status) = update.status {
            setters.push("status = ?");
            args.push(Value::Integer(status.as_int()));
        }
        if let Some(due) = update.due {
            match due.to_stored() {
                Some(date) => {
                    setters.push("due_date = ?");
                    args.push(Value::Text(date));
                }
                None => setters.push("due_date = NULL"),
            }
        }
        if let Some(time) = &update.due_time {
            setters.push("due_time = ?");
            args.push(Value::Text(dates::local_time_to_utc(time)?));
        }
        if let Some(repeat) = &update.repeat {
            setters.push("repeat_period = ?");
            args.push(Value::Text(format!("+{repeat}")));
        }
        if let Some(project) = update.project {
            self.ensure_project(project)?;
            setters.push("project = ?");
            args.push(Value::Integer(project));
        }
        if let Some(rank) = update.priority_in_project {
            setters.push("priority_in_project = ?");
            args.push(Value::Integer(rank));
        }

        args.push(Value::Integer(id));
        let sql = format!("UPDATE tasks SET {} WHERE id = ?", setters.join(", "));
        let changed = self.conn.execute(&sql, params_from_iter(args))?;
        if changed == 0 {
            return Err(Error::NotFound {
                entity: "task",
                id,
            });
        }
        Ok(())
    }

    /// Close a task. Idempotent in effect on status; cascades to a linked
    /// open quest at most once per call. Returns the task name and the
    /// quest outcome, when one applied.
    pub fn close_task(&self, id: i64) -> Result<(String, Option<QuestOutcome>)> {
        let (name, quest): (String, Option<i64>) = self
            .conn
            .query_row("SELECT name, quest FROM tasks WHERE id = ?", [id], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()?
            .ok_or(Error::NotFound {
                entity: "task",
                id,
            })?;

        self.conn
            .execute("UPDATE tasks SET status = 0 WHERE id = ?", [id])?;

        let outcome = match quest {
            Some(quest_id) => match self.close_quest(quest_id) {
                Ok(outcome) => Some(outcome),
                // Already consumed (or gone): closing again must not
                // re-apply rewards.
                Err(Error::NotFound { .. }) => None,
                Err(e) => return Err(e),
            },
            None => None,
        };
        Ok((name, outcome))
    }

    /// Hard delete, irreversible.
    pub fn delete_task(&self, id: i64) -> Result<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?", [id])?;
        if changed == 0 {
            return Err(Error::NotFound {
                entity: "task",
                id,
            });
        }
        Ok(())
    }

    /// Sum of weights of tasks due on `date`.
    pub fn total_weight(&self, scope: WeightScope, date: NaiveDate) -> Result<f64> {
        let sql = match scope {
            WeightScope::All => {
                "SELECT COALESCE(SUM(weight), 0) FROM tasks WHERE due_date = ?"
            }
            WeightScope::Closed => {
                "SELECT COALESCE(SUM(weight), 0) FROM tasks WHERE due_date = ? AND status = 0"
            }
        };
        let total = self
            .conn
            .query_row(sql, [date.format(DATE_FORMAT).to_string()], |row| {
                row.get(0)
            })?;
        Ok(total)
    }
}

/// Row image before the stored UTC due time is converted back to local.
struct RawTask {
    task: Task,
    due_time_utc: Option<String>,
}

fn read_task_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTask> {
    let status: i64 = row.get(4)?;
    Ok(RawTask {
        task: Task {
            id: row.get(0)?,
            name: row.get(1)?,
            priority: row.get(2)?,
            weight: row.get(3)?,
            status: TaskStatus::from_int(status).unwrap_or(TaskStatus::Open),
            due_date: row.get(5)?,
            due_time: None,
            repeat_period: row.get(7)?,
            project: row.get(8)?,
            quest: row.get(9)?,
            priority_in_project: row.get(10)?,
        },
        due_time_utc: row.get(6)?,
    })
}

impl RawTask {
    fn into_task(self) -> Result<Task> {
        let mut task = self.task;
        task.due_time = match self.due_time_utc {
            Some(utc) => Some(dates::utc_time_to_local(&utc)?),
            None => None,
        };
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Days, Duration, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    fn store() -> Store {
        Store::open_in_memory().unwrap()
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn add(store: &Store, name: &str, priority: i64, due: DateConstraint) -> i64 {
        store
            .add_task(&NewTask {
                name: name.into(),
                priority,
                due: Some(due),
                ..NewTask::default()
            })
            .unwrap()
    }

    fn names(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn add_defaults_due_date_to_today() {
        let store = store();
        let id = store
            .add_task(&NewTask {
                name: "write report".into(),
                ..NewTask::default()
            })
            .unwrap();
        let task = store.get_task(id).unwrap();
        assert_eq!(
            task.due_date.as_deref(),
            Some(today().format(DATE_FORMAT).to_string().as_str())
        );
        assert_eq!(task.project, DEFAULT_PROJECT);
        assert!(task.status.is_open());
    }

    #[test]
    fn time_bound_tasks_get_the_priority_boost() {
        let store = store();
        let id = store
            .add_task(&NewTask {
                name: "standup".into(),
                priority: 3,
                due_time: Some("09:15".into()),
                ..NewTask::default()
            })
            .unwrap();
        let task = store.get_task(id).unwrap();
        assert_eq!(task.priority, 3 + TIME_BOUND_BOOST);
        // Stored in UTC, read back as the local wall-clock time.
        assert_eq!(task.due_time.as_deref(), Some("09:15"));
    }

    #[test]
    fn repeat_period_is_stored_with_prefix() {
        let store = store();
        let id = store
            .add_task(&NewTask {
                name: "water plants".into(),
                repeat: Some("2 days".into()),
                ..NewTask::default()
            })
            .unwrap();
        let task = store.get_task(id).unwrap();
        assert_eq!(task.repeat_period.as_deref(), Some("+2 days"));
    }

    #[test]
    fn top_only_returns_at_most_one_qualifying_task() {
        let store = store();
        assert!(store.list_tasks(&TaskQuery::top()).unwrap().is_empty());

        let yesterday = today().checked_sub_days(Days::new(1)).unwrap();
        add(&store, "low", 1, DateConstraint::On(today()));
        add(&store, "high", 9, DateConstraint::On(yesterday));
        add(&store, "undated", 50, DateConstraint::Unset);

        let top = store.list_tasks(&TaskQuery::top()).unwrap();
        assert_eq!(names(&top), ["high"]);
        let task = &top[0];
        assert!(task.status.is_open());
        assert!(task.due_date.is_some());
    }

    #[test]
    fn top_only_skips_tasks_whose_due_time_has_not_passed() {
        let store = store();
        let soon = (Utc::now() + Duration::hours(2)).format("%H:%M").to_string();
        let passed = (Utc::now() - Duration::hours(2)).format("%H:%M").to_string();
        store
            .add_task(&NewTask {
                name: "later".into(),
                priority: 9,
                due_time: Some(dates::utc_time_to_local(&soon).unwrap()),
                due: Some(DateConstraint::On(today())),
                ..NewTask::default()
            })
            .unwrap();
        store
            .add_task(&NewTask {
                name: "now".into(),
                priority: 1,
                due_time: Some(dates::utc_time_to_local(&passed).unwrap()),
                due: Some(DateConstraint::On(today())),
                ..NewTask::default()
            })
            .unwrap();

        let top = store.list_tasks(&TaskQuery::top()).unwrap();
        assert_eq!(names(&top), ["now"]);
    }

    #[test]
    fn default_listing_is_exactly_today() {
        let store = store();
        let yesterday = today().checked_sub_days(Days::new(1)).unwrap();
        add(&store, "today", 0, DateConstraint::On(today()));
        add(&store, "overdue", 0, DateConstraint::On(yesterday));
        add(&store, "undated", 0, DateConstraint::Unset);

        let tasks = store.list_tasks(&TaskQuery::default()).unwrap();
        assert_eq!(names(&tasks), ["today"]);

        let overdue = store
            .list_tasks(&TaskQuery {
                include_overdue: true,
                ..TaskQuery::default()
            })
            .unwrap();
        assert_eq!(names(&overdue), ["overdue"]);
    }

    #[test]
    fn explicit_date_filters_exact_or_on_or_before() {
        let store = store();
        let date = today().checked_add_days(Days::new(3)).unwrap();
        add(&store, "before", 0, DateConstraint::On(today()));
        add(&store, "on", 0, DateConstraint::On(date));

        let exact = store
            .list_tasks(&TaskQuery {
                due: Some(DateConstraint::On(date)),
                ..TaskQuery::default()
            })
            .unwrap();
        assert_eq!(names(&exact), ["on"]);

        let widened = store
            .list_tasks(&TaskQuery {
                due: Some(DateConstraint::On(date)),
                include_overdue: true,
                ..TaskQuery::default()
            })
            .unwrap();
        assert_eq!(names(&widened), ["before", "on"]);
    }

    #[test]
    fn unset_filter_lists_undated_tasks() {
        let store = store();
        add(&store, "dated", 0, DateConstraint::On(today()));
        add(&store, "undated", 0, DateConstraint::Unset);

        let tasks = store
            .list_tasks(&TaskQuery {
                due: Some(DateConstraint::Unset),
                ..TaskQuery::default()
            })
            .unwrap();
        assert_eq!(names(&tasks), ["undated"]);
    }

    #[test]
    fn closed_tasks_appear_only_on_request() {
        let store = store();
        let id = add(&store, "done", 0, DateConstraint::On(today()));
        add(&store, "open", 0, DateConstraint::On(today()));
        store.close_task(id).unwrap();

        let open_only = store.list_tasks(&TaskQuery::default()).unwrap();
        assert_eq!(names(&open_only), ["open"]);

        let all = store
            .list_tasks(&TaskQuery {
                include_closed: true,
                ..TaskQuery::default()
            })
            .unwrap();
        assert_eq!(names(&all), ["done", "open"]);
    }

    #[test]
    fn ordering_is_priority_desc_with_insertion_tie_break() {
        let store = store();
        add(&store, "b", 5, DateConstraint::On(today()));
        add(&store, "a", 9, DateConstraint::On(today()));
        add(&store, "c", 5, DateConstraint::On(today()));

        let tasks = store.list_tasks(&TaskQuery::default()).unwrap();
        assert_eq!(names(&tasks), ["a", "b", "c"]);
    }

    #[test]
    fn project_scope_orders_by_priority_in_project() {
        let store = store();
        let project = store.add_project("thesis", 5).unwrap();
        let first = add(&store, "first", 0, DateConstraint::On(today()));
        let second = add(&store, "second", 99, DateConstraint::On(today()));
        for (id, rank) in [(first, 7), (second, 2)] {
            store
                .modify_task(
                    id,
                    &TaskUpdate {
                        project: Some(project),
                        priority_in_project: Some(rank),
                        ..TaskUpdate::default()
                    },
                )
                .unwrap();
        }

        let tasks = store
            .list_tasks(&TaskQuery {
                project: Some(project),
                ..TaskQuery::default()
            })
            .unwrap();
        assert_eq!(names(&tasks), ["first", "second"]);
    }

    #[test]
    fn listing_respects_the_cap() {
        let store = store();
        for i in 0..10 {
            add(&store, &format!("t{i}"), 0, DateConstraint::On(today()));
        }
        let tasks = store
            .list_tasks(&TaskQuery {
                limit: 4,
                ..TaskQuery::default()
            })
            .unwrap();
        assert_eq!(tasks.len(), 4);
    }

    #[test]
    fn modify_changes_exactly_the_supplied_fields() {
        let store = store();
        let id = store
            .add_task(&NewTask {
                name: "draft".into(),
                priority: 2,
                weight: 1.5,
                ..NewTask::default()
            })
            .unwrap();
        let before = store.get_task(id).unwrap();

        store
            .modify_task(
                id,
                &TaskUpdate {
                    name: Some("final".into()),
                    ..TaskUpdate::default()
                },
            )
            .unwrap();

        let after = store.get_task(id).unwrap();
        assert_eq!(after.name, "final");
        assert_eq!(after.priority, before.priority);
        assert_eq!(after.weight, before.weight);
        assert_eq!(after.due_date, before.due_date);
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let store = store();
        let id = add(&store, "t", 1, DateConstraint::On(today()));
        let before = store.get_task(id).unwrap();
        store.modify_task(id, &TaskUpdate::default()).unwrap();
        assert_eq!(store.get_task(id).unwrap(), before);
    }

    #[test]
    fn modify_can_clear_the_due_date() {
        let store = store();
        let id = add(&store, "t", 0, DateConstraint::On(today()));
        store
            .modify_task(id, &TaskUpdate::due(DateConstraint::Unset))
            .unwrap();
        assert_eq!(store.get_task(id).unwrap().due_date, None);
    }

    #[test]
    fn modify_unknown_task_is_not_found() {
        let store = store();
        assert!(matches!(
            store.modify_task(999, &TaskUpdate::priority(1)),
            Err(Error::NotFound { entity: "task", .. })
        ));
    }

    #[test]
    fn referencing_a_missing_project_is_not_found() {
        let store = store();
        let id = add(&store, "t", 0, DateConstraint::On(today()));

        let err = store
            .modify_task(
                id,
                &TaskUpdate {
                    project: Some(999),
                    ..TaskUpdate::default()
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                entity: "project",
                id: 999
            }
        ));
        // Recoverable: the dashboard shows it inline instead of unwinding.
        assert!(err.is_recoverable());
        assert_eq!(store.get_task(id).unwrap().project, DEFAULT_PROJECT);

        let err = store
            .add_task(&NewTask {
                name: "orphan".into(),
                project: Some(999),
                ..NewTask::default()
            })
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "project", .. }));
    }

    #[test]
    fn closing_twice_cascades_to_the_quest_only_once() {
        let store = store();
        let skill = store.add_skill("writing").unwrap();
        let quest = store.add_quest("finish draft", 10, 5, 2, Some(skill)).unwrap();
        let id = add(&store, "t", 0, DateConstraint::On(today()));
        store
            .conn
            .execute("UPDATE tasks SET quest = ? WHERE id = ?", params![quest, id])
            .unwrap();

        let (_, outcome) = store.close_task(id).unwrap();
        assert!(outcome.is_some());
        let xp_after = store.character().unwrap().xp;

        let (_, outcome) = store.close_task(id).unwrap();
        assert!(outcome.is_none());
        assert_eq!(store.character().unwrap().xp, xp_after);
        assert!(!store.get_task(id).unwrap().status.is_open());
    }

    #[test]
    fn add_close_scenario_drains_the_top_slot() {
        let store = store();
        let id = store
            .add_task(&NewTask {
                name: "Write report".into(),
                due: Some(DateConstraint::On(today())),
                ..NewTask::default()
            })
            .unwrap();

        let top = store.list_tasks(&TaskQuery::top()).unwrap();
        assert_eq!(names(&top), ["Write report"]);

        store.close_task(id).unwrap();
        assert!(store.list_tasks(&TaskQuery::top()).unwrap().is_empty());
    }

    #[test]
    fn delete_is_hard_and_missing_ids_error() {
        let store = store();
        let id = add(&store, "t", 0, DateConstraint::On(today()));
        store.delete_task(id).unwrap();
        assert!(matches!(
            store.get_task(id),
            Err(Error::NotFound { entity: "task", .. })
        ));
        assert!(matches!(
            store.delete_task(id),
            Err(Error::NotFound { entity: "task", .. })
        ));
    }

    #[test]
    fn total_weight_sums_today_by_scope() {
        let store = store();
        let a = store
            .add_task(&NewTask {
                name: "a".into(),
                weight: 1.5,
                ..NewTask::default()
            })
            .unwrap();
        store
            .add_task(&NewTask {
                name: "b".into(),
                weight: 2.0,
                ..NewTask::default()
            })
            .unwrap();
        store.close_task(a).unwrap();

        assert_eq!(store.total_weight(WeightScope::All, today()).unwrap(), 3.5);
        assert_eq!(
            store.total_weight(WeightScope::Closed, today()).unwrap(),
            1.5
        );
    }
}
