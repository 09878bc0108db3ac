//! Daily traffic table operations.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::params;

use super::{DailyTraffic, Database};

impl Database {
    /// Count one visit for the given calendar day.
    ///
    /// A single upsert statement: the day's row is created with `visits = 1`
    /// if absent, otherwise its counter is incremented. Concurrent callers
    /// cannot lose increments.
    pub fn record_visit(&self, date: NaiveDate) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO daily_traffic (date, visits) VALUES (?1, 1)
             ON CONFLICT(date) DO UPDATE SET visits = visits + 1",
            params![date],
        )?;
        Ok(())
    }

    /// All visit rows ordered by ascending date.
    pub fn all_traffic(&self) -> Result<Vec<DailyTraffic>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT date, visits FROM daily_traffic ORDER BY date ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(DailyTraffic {
                date: row.get(0)?,
                visits: row.get(1)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// The visit count stored for one day, 0 when no row exists.
    pub fn visits_on(&self, date: NaiveDate) -> Result<u32> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare_cached("SELECT visits FROM daily_traffic WHERE date = ?1")?;
        let visits = stmt
            .query_row(params![date], |row| row.get(0))
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(0),
                other => Err(other),
            })?;
        Ok(visits)
    }
}
