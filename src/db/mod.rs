//! SQLite persistence layer for daily traffic and portfolio projects.
//!
//! Uses `rusqlite` with bundled SQLite. Handles:
//! - Per-day visit counters for the admin dashboard (one row per calendar date)
//! - Portfolio project rows with paged listing
//!
//! Visit rows are created lazily on the first visit of a day and are never
//! deleted by this layer.

mod projects;
mod traffic;

use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// Manages the SQLite database behind the admin API.
pub struct Database {
    conn: Mutex<Connection>,
}

/// One calendar day's visit counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTraffic {
    pub date: NaiveDate,
    pub visits: u32,
}

/// A stored portfolio project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub devstack: String,
    pub link: String,
    pub git: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating or updating a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub devstack: String,
    pub link: String,
    pub git: String,
    pub image_url: String,
}

/// One page of the project list together with the overall row count.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectPage {
    pub projects: Vec<Project>,
    pub total: u64,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS daily_traffic (
                date TEXT PRIMARY KEY,
                visits INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                devstack TEXT NOT NULL DEFAULT '',
                link TEXT NOT NULL DEFAULT '',
                git TEXT NOT NULL DEFAULT '',
                image_url TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_projects_created ON projects(created_at);
            ",
        )?;

        // Enable WAL mode for better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn open_memory_db() -> Database {
        Database::open_in_memory().expect("failed to open in-memory database")
    }

    pub fn day(s: &str) -> NaiveDate {
        s.parse().expect("invalid test date")
    }

    pub fn make_draft(title: &str) -> ProjectDraft {
        ProjectDraft {
            title: title.to_string(),
            description: format!("{title} description"),
            devstack: "Rust, SQLite".to_string(),
            link: format!("https://example.com/{title}"),
            git: format!("https://github.com/example/{title}"),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_open_creates_schema() {
        let db = open_memory_db();
        // Both tables exist and are empty.
        assert!(db.all_traffic().unwrap().is_empty());
        assert_eq!(db.count_projects().unwrap(), 0);
    }
}
