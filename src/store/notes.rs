//! Daily notes: free text attached to a date, unrelated to tasks.

use chrono::{Local, NaiveDate};
use rusqlite::params;

use crate::dates::DATE_FORMAT;
use crate::error::Result;

use super::Store;

impl Store {
    /// Add a note; the date defaults to today.
    pub fn add_note(&self, date: Option<NaiveDate>, text: &str) -> Result<()> {
        let date = date
            .unwrap_or_else(|| Local::now().date_naive())
            .format(DATE_FORMAT)
            .to_string();
        self.conn.execute(
            "INSERT INTO notes(date, text) VALUES (?, ?)",
            params![date, text],
        )?;
        Ok(())
    }

    /// Notes recorded for a given day, oldest first.
    pub fn notes_on(&self, date: NaiveDate) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT text FROM notes WHERE date = ? ORDER BY id ASC")?;
        let notes = stmt
            .query_map([date.format(DATE_FORMAT).to_string()], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn notes_default_to_today_and_read_back_in_order() {
        let store = Store::open_in_memory().unwrap();
        let today = Local::now().date_naive();
        let other = NaiveDate::from_ymd_opt(2021, 3, 4).unwrap();

        store.add_note(None, "first").unwrap();
        store.add_note(None, "second").unwrap();
        store.add_note(Some(other), "elsewhere").unwrap();

        assert_eq!(store.notes_on(today).unwrap(), ["first", "second"]);
        assert_eq!(store.notes_on(other).unwrap(), ["elsewhere"]);
    }
}
