//! SQLite-backed persistence.
//!
//! The store owns the single connection shared by every screen and CLI
//! handler; it is opened once per process and all access is synchronous
//! and immediately committed. A bulk operation over a multi-selection
//! issues one mutation per entity sequentially, so a crash mid-batch
//! leaves a partially applied batch.

pub mod notes;
pub mod projects;
pub mod rpg;
pub mod tasks;

use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

/// The implicit project every task belongs to unless told otherwise.
pub const DEFAULT_PROJECT: i64 = 1;

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (creating if needed) the database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Store> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        Store::from_connection(conn)
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Store> {
        Store::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Store> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = Store { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                priority INTEGER NOT NULL DEFAULT 0,
                open INTEGER NOT NULL DEFAULT 1 CHECK (open IN (0, 1))
            );

            CREATE TABLE IF NOT EXISTS skills (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                value INTEGER NOT NULL DEFAULT 0,
                xp INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS quests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                xp INTEGER NOT NULL DEFAULT 0,
                willingness INTEGER NOT NULL DEFAULT 0,
                time INTEGER NOT NULL DEFAULT 0,
                trained_skill INTEGER REFERENCES skills(id),
                closed INTEGER NOT NULL DEFAULT 0 CHECK (closed IN (0, 1))
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                priority INTEGER NOT NULL DEFAULT 0,
                weight REAL NOT NULL DEFAULT 0,
                status INTEGER NOT NULL DEFAULT 1 CHECK (status IN (0, 1)),
                due_date TEXT,
                due_time TEXT,
                repeat_period TEXT,
                project INTEGER NOT NULL DEFAULT 1 REFERENCES projects(id),
                quest INTEGER REFERENCES quests(id),
                priority_in_project INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS character (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                level INTEGER NOT NULL DEFAULT 0,
                gold INTEGER NOT NULL DEFAULT 0,
                xp INTEGER NOT NULL DEFAULT 0,
                xp_for_next_level INTEGER NOT NULL DEFAULT 50
            );

            CREATE TABLE IF NOT EXISTS awards (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                price INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                text TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_status_due ON tasks(status, due_date);
            CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project);

            INSERT OR IGNORE INTO projects(id, name, priority, open)
                VALUES (1, 'inbox', 0, 1);
            INSERT OR IGNORE INTO character(id, level, gold, xp, xp_for_next_level)
                VALUES (1, 0, 0, 0, 50);
            ",
        )?;
        Ok(())
    }
}
