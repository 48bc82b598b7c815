mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rusqlite::{Connection, Row, Transaction};

use crate::error::{Error, Result};
use crate::models::*;

/// Persistence gateway over SQLite.
///
/// The connection is shared behind a mutex so the gateway can be cloned
/// into the router state. Multi-row units of work go through [`with_tx`],
/// which hands the caller an explicit transaction handle and commits (or
/// rolls back on error) when the closure returns.
///
/// [`with_tx`]: Database::with_tx
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_default() -> anyhow::Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "crewboard")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("crewboard.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    /// Runs `f` against an explicit transaction and commits on success.
    ///
    /// Any error out of `f` or the commit drops the transaction, so no
    /// partial writes from the unit of work are observable afterwards.
    pub fn with_tx<T>(&self, f: impl FnOnce(&Transaction) -> Result<T>) -> Result<T> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    // ============================================================
    // Board operations
    // ============================================================

    pub fn get_all_boards(&self) -> Result<Vec<Board>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT id, name FROM boards ORDER BY name")?;

        let boards = stmt
            .query_map([], |row| {
                Ok(Board {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(boards)
    }

    pub fn get_board(&self, id: i64) -> Result<Option<Board>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT id, name FROM boards WHERE id = ?")?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Board {
                id: row.get(0)?,
                name: row.get(1)?,
            }))
        } else {
            Ok(None)
        }
    }

    pub fn create_board(&self, input: CreateBoardInput) -> Result<Board> {
        if input.name.trim().is_empty() {
            return Err(Error::validation("Board name must not be empty"));
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute("INSERT INTO boards (name) VALUES (?)", [&input.name])?;

        Ok(Board {
            id: conn.last_insert_rowid(),
            name: input.name,
        })
    }

    pub fn update_board(&self, id: i64, input: UpdateBoardInput) -> Result<Option<Board>> {
        let Some(existing) = self.get_board(id)? else {
            return Ok(None);
        };

        let name = input.name.unwrap_or(existing.name);
        if name.trim().is_empty() {
            return Err(Error::validation("Board name must not be empty"));
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute("UPDATE boards SET name = ? WHERE id = ?", (&name, id))?;

        Ok(Some(Board { id, name }))
    }

    pub fn delete_board(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM boards WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Member operations
    // ============================================================

    pub fn get_members_by_board(&self, board_id: i64) -> Result<Vec<Member>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, board_id, name, avatar FROM members WHERE board_id = ? ORDER BY name",
        )?;

        let members = stmt
            .query_map([board_id], read_member)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(members)
    }

    pub fn get_member(&self, id: i64) -> Result<Option<Member>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt =
            conn.prepare("SELECT id, board_id, name, avatar FROM members WHERE id = ?")?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(read_member(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn create_member(&self, board_id: i64, input: CreateMemberInput) -> Result<Member> {
        self.get_board(board_id)?
            .ok_or(Error::not_found("board", board_id))?;

        if input.name.trim().is_empty() {
            return Err(Error::validation("Member name must not be empty"));
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO members (board_id, name, avatar) VALUES (?, ?, ?)",
            (board_id, &input.name, &input.avatar),
        )?;

        Ok(Member {
            id: conn.last_insert_rowid(),
            board_id,
            name: input.name,
            avatar: input.avatar,
        })
    }

    pub fn update_member(&self, id: i64, input: UpdateMemberInput) -> Result<Option<Member>> {
        let Some(existing) = self.get_member(id)? else {
            return Ok(None);
        };

        let name = input.name.unwrap_or(existing.name);
        let avatar = input.avatar.or(existing.avatar);
        if name.trim().is_empty() {
            return Err(Error::validation("Member name must not be empty"));
        }

        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "UPDATE members SET name = ?, avatar = ? WHERE id = ?",
            (&name, &avatar, id),
        )?;

        Ok(Some(Member {
            id,
            board_id: existing.board_id,
            name,
            avatar,
        }))
    }

    pub fn delete_member(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM members WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Task operations
    // ============================================================

    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, member_id, name, date, estimate, consumed, remaining
             FROM tasks WHERE id = ?",
        )?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(read_task(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn get_tasks_by_member(
        &self,
        member_id: i64,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Task>> {
        let conn = self.conn.lock().expect("database lock poisoned");

        let tasks = match date {
            Some(date) => {
                let mut stmt = conn.prepare(
                    "SELECT id, member_id, name, date, estimate, consumed, remaining
                     FROM tasks WHERE member_id = ? AND date = ? ORDER BY id",
                )?;
                let tasks = stmt
                    .query_map((member_id, date.to_string()), read_task)?
                    .collect::<Result<Vec<_>, _>>()?;
                tasks
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT id, member_id, name, date, estimate, consumed, remaining
                     FROM tasks WHERE member_id = ? ORDER BY date, id",
                )?;
                let tasks = stmt
                    .query_map([member_id], read_task)?
                    .collect::<Result<Vec<_>, _>>()?;
                tasks
            }
        };

        Ok(tasks)
    }

    /// Inserts a task and returns it with the id SQLite assigned.
    pub fn insert_task(&self, task: &Task) -> Result<Task> {
        let conn = self.conn.lock().expect("database lock poisoned");
        insert_task_row(&conn, task)
    }

    /// Writes every column of an already-persisted task.
    pub fn update_task(&self, task: &Task) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        update_task_row(&conn, task)
    }

    pub fn delete_task(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        delete_task_row(&conn, id)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

// ============================================================
// Row-level helpers
//
// These take a bare connection so the manager can compose them inside a
// `with_tx` unit of work (a `Transaction` derefs to `Connection`).
// ============================================================

pub(crate) fn insert_task_row(conn: &Connection, task: &Task) -> Result<Task> {
    conn.execute(
        "INSERT INTO tasks (member_id, name, date, estimate, consumed, remaining)
         VALUES (?, ?, ?, ?, ?, ?)",
        (
            task.member_id,
            &task.name,
            task.date.to_string(),
            task.estimate,
            task.consumed,
            task.remaining,
        ),
    )?;

    let mut task = task.clone();
    task.id = Some(conn.last_insert_rowid());
    Ok(task)
}

pub(crate) fn update_task_row(conn: &Connection, task: &Task) -> Result<bool> {
    let Some(id) = task.id else {
        return Ok(false);
    };

    let rows = conn.execute(
        "UPDATE tasks SET member_id = ?, name = ?, date = ?, estimate = ?, consumed = ?, remaining = ?
         WHERE id = ?",
        (
            task.member_id,
            &task.name,
            task.date.to_string(),
            task.estimate,
            task.consumed,
            task.remaining,
            id,
        ),
    )?;

    Ok(rows > 0)
}

pub(crate) fn delete_task_row(conn: &Connection, id: i64) -> Result<bool> {
    let rows = conn.execute("DELETE FROM tasks WHERE id = ?", [id])?;
    Ok(rows > 0)
}

fn read_member(row: &Row<'_>) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        board_id: row.get(1)?,
        name: row.get(2)?,
        avatar: row.get(3)?,
    })
}

fn read_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: Some(row.get(0)?),
        member_id: row.get(1)?,
        name: row.get(2)?,
        date: parse_date(row.get::<_, String>(3)?),
        estimate: row.get(4)?,
        consumed: row.get(5)?,
        remaining: row.get(6)?,
    })
}

fn parse_date(s: String) -> NaiveDate {
    s.parse().unwrap_or_default()
}
