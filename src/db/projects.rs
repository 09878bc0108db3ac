//! Portfolio project table CRUD operations.

use anyhow::Result;
use chrono::Utc;
use rusqlite::params;

use super::{Database, Project, ProjectDraft, ProjectPage};

impl Database {
    /// Insert a new project and return its row id.
    pub fn insert_project(&self, draft: &ProjectDraft) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO projects (title, description, devstack, link, git, image_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                draft.title,
                draft.description,
                draft.devstack,
                draft.link,
                draft.git,
                draft.image_url,
                Utc::now(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Overwrite an existing project's fields. Returns the number of rows
    /// updated (0 when the id does not exist).
    pub fn update_project(&self, id: i64, draft: &ProjectDraft) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE projects
             SET title = ?1, description = ?2, devstack = ?3, link = ?4, git = ?5, image_url = ?6
             WHERE id = ?7",
            params![
                draft.title,
                draft.description,
                draft.devstack,
                draft.link,
                draft.git,
                draft.image_url,
                id,
            ],
        )?;
        Ok(updated)
    }

    /// Delete a project by id. Returns the number of rows deleted.
    pub fn delete_project(&self, id: i64) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(deleted)
    }

    /// One page of projects, newest first, plus the total row count.
    ///
    /// Pages are 1-based; an out-of-range page yields an empty list with the
    /// correct total.
    pub fn list_projects(&self, page: u32, page_size: u32) -> Result<ProjectPage> {
        let page = page.max(1);
        let offset = (page - 1) * page_size;

        let conn = self.conn.lock().unwrap();
        let total: u64 =
            conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?;

        let mut stmt = conn.prepare_cached(
            "SELECT id, title, description, devstack, link, git, image_url, created_at
             FROM projects
             ORDER BY created_at DESC, id DESC
             LIMIT ?1 OFFSET ?2",
        )?;

        let rows = stmt.query_map(params![page_size, offset], map_project_row)?;

        let mut projects = Vec::new();
        for row in rows {
            projects.push(row?);
        }
        Ok(ProjectPage { projects, total })
    }

    /// Total number of stored projects.
    pub fn count_projects(&self) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn map_project_row(row: &rusqlite::Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        devstack: row.get(3)?,
        link: row.get(4)?,
        git: row.get(5)?,
        image_url: row.get(6)?,
        created_at: row.get(7)?,
    })
}
