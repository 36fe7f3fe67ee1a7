//! Project CRUD. Deleting a project is deliberately not modeled.

use rusqlite::types::Value;
use rusqlite::{OptionalExtension, params, params_from_iter};

use crate::error::{Error, Result};
use crate::model::project::{Project, ProjectUpdate};

use super::Store;

impl Store {
    /// Active projects, highest priority first.
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, priority, open FROM projects \
             WHERE open = 1 ORDER BY priority DESC, id ASC",
        )?;
        let projects = stmt
            .query_map([], |row| {
                Ok(Project {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    priority: row.get(2)?,
                    open: row.get::<_, i64>(3)? != 0,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(projects)
    }

    pub fn add_project(&self, name: &str, priority: i64) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO projects(name, priority) VALUES (?, ?)",
            params![name, priority],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// A user-typed project id has to be checked before it lands in a task
    /// row; letting the FOREIGN KEY constraint fire would surface as a fatal
    /// storage error instead of a not-found message.
    pub(super) fn ensure_project(&self, id: i64) -> Result<()> {
        self.conn
            .query_row("SELECT 1 FROM projects WHERE id = ?", [id], |_| Ok(()))
            .optional()?
            .ok_or(Error::NotFound {
                entity: "project",
                id,
            })
    }

    pub fn modify_project(&self, id: i64, update: &ProjectUpdate) -> Result<()> {
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
        if let Some(open) = update.open {
            setters.push("open = ?");
            args.push(Value::Integer(i64::from(open)));
        }
        if setters.is_empty() {
            return Ok(());
        }

        args.push(Value::Integer(id));
        let sql = format!("UPDATE projects SET {} WHERE id = ?", setters.join(", "));
        let changed = self.conn.execute(&sql, params_from_iter(args))?;
        if changed == 0 {
            return Err(Error::NotFound {
                entity: "project",
                id,
            });
        }
        Ok(())
    }
}
