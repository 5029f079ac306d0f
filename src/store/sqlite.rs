//! Embedded SQLite store with the same table layout as Planka.
//!
//! Runs in memory so imports can be exercised without a Planka server.

use super::{BOARD_TYPE, BoardRow, CardRow, KanbanStore, ListRow};
use crate::error::StoreResult;
use rusqlite::{Connection, OptionalExtension, params};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS user_account (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS project (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS project_membership (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES project(id),
    user_id INTEGER NOT NULL REFERENCES user_account(id)
);
CREATE TABLE IF NOT EXISTS board (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES project(id),
    type TEXT NOT NULL,
    name TEXT NOT NULL,
    position INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS list (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id INTEGER NOT NULL REFERENCES board(id),
    name TEXT NOT NULL,
    position INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS card (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id INTEGER NOT NULL REFERENCES board(id),
    list_id INTEGER NOT NULL REFERENCES list(id),
    name TEXT NOT NULL,
    position INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS task (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    card_id INTEGER NOT NULL REFERENCES card(id),
    name TEXT NOT NULL,
    is_completed INTEGER NOT NULL DEFAULT 0
);
";

/// Kanban store in a local SQLite file or in memory.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Create a user account, returning its id.
    pub fn add_user(&mut self, username: &str) -> StoreResult<i64> {
        let id = self.conn.query_row(
            "INSERT INTO user_account (username) VALUES (?1) RETURNING id",
            params![username],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Direct access to the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn insert_returning(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> StoreResult<i64> {
        tracing::debug!(query = sql, "Executing action");
        let id = self.conn.query_row(sql, params, |row| row.get(0))?;
        Ok(id)
    }

    fn query_max(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> StoreResult<Option<i64>> {
        tracing::debug!(query = sql, "Executing read query");
        let max = self.conn.query_row(sql, params, |row| row.get(0))?;
        Ok(max)
    }
}

impl KanbanStore for SqliteStore {
    fn find_project(&mut self, name: &str) -> StoreResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM project WHERE name = ?1 ORDER BY id LIMIT 1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn insert_project(&mut self, name: &str) -> StoreResult<i64> {
        self.insert_returning(
            "INSERT INTO project (name) VALUES (?1) RETURNING id",
            params![name],
        )
    }

    fn find_user(&mut self, username: &str) -> StoreResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM user_account WHERE username = ?1",
                params![username],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn add_project_member(&mut self, project_id: i64, user_id: i64) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO project_membership (project_id, user_id) VALUES (?1, ?2)",
            params![project_id, user_id],
        )?;
        Ok(())
    }

    fn find_board(&mut self, project_id: i64, name: &str) -> StoreResult<Option<BoardRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, position, project_id FROM board
                 WHERE name = ?1 AND project_id = ?2 ORDER BY id LIMIT 1",
                params![name, project_id],
                |row| {
                    Ok(BoardRow {
                        id: row.get(0)?,
                        position: row.get(1)?,
                        project_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn max_board_position(&mut self, project_id: i64) -> StoreResult<Option<i64>> {
        self.query_max(
            "SELECT MAX(position) FROM board WHERE project_id = ?1",
            params![project_id],
        )
    }

    fn insert_board(&mut self, project_id: i64, name: &str, position: i64) -> StoreResult<i64> {
        self.insert_returning(
            "INSERT INTO board (project_id, type, name, position) VALUES (?1, ?2, ?3, ?4) RETURNING id",
            params![project_id, BOARD_TYPE, name, position],
        )
    }

    fn find_list(&mut self, board_id: i64, name: &str) -> StoreResult<Option<ListRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, position, board_id FROM list
                 WHERE name = ?1 AND board_id = ?2 ORDER BY id LIMIT 1",
                params![name, board_id],
                |row| {
                    Ok(ListRow {
                        id: row.get(0)?,
                        position: row.get(1)?,
                        board_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn max_list_position(&mut self, board_id: i64) -> StoreResult<Option<i64>> {
        self.query_max(
            "SELECT MAX(position) FROM list WHERE board_id = ?1",
            params![board_id],
        )
    }

    fn insert_list(&mut self, board_id: i64, name: &str, position: i64) -> StoreResult<i64> {
        self.insert_returning(
            "INSERT INTO list (board_id, name, position) VALUES (?1, ?2, ?3) RETURNING id",
            params![board_id, name, position],
        )
    }

    fn find_card(
        &mut self,
        board_id: i64,
        list_id: i64,
        name: &str,
    ) -> StoreResult<Option<CardRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, position, board_id, list_id FROM card
                 WHERE name = ?1 AND board_id = ?2 AND list_id = ?3 ORDER BY id LIMIT 1",
                params![name, board_id, list_id],
                |row| {
                    Ok(CardRow {
                        id: row.get(0)?,
                        position: row.get(1)?,
                        board_id: row.get(2)?,
                        list_id: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn max_card_position(&mut self, board_id: i64, list_id: i64) -> StoreResult<Option<i64>> {
        self.query_max(
            "SELECT MAX(position) FROM card WHERE board_id = ?1 AND list_id = ?2",
            params![board_id, list_id],
        )
    }

    fn insert_card(
        &mut self,
        board_id: i64,
        list_id: i64,
        name: &str,
        position: i64,
    ) -> StoreResult<i64> {
        self.insert_returning(
            "INSERT INTO card (board_id, list_id, name, position) VALUES (?1, ?2, ?3, ?4) RETURNING id",
            params![board_id, list_id, name, position],
        )
    }

    fn task_names(&mut self, card_id: i64) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT name FROM task WHERE card_id = ?1")?;
        let names = stmt
            .query_map(params![card_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    fn insert_task(&mut self, card_id: i64, name: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO task (card_id, name, is_completed) VALUES (?1, ?2, 0)",
            params![card_id, name],
        )?;
        Ok(())
    }
}
