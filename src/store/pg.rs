//! PostgreSQL store backed by a single synchronous connection.

use super::{BOARD_TYPE, BoardRow, CardRow, KanbanStore, ListRow};
use crate::config::DatabaseConfig;
use crate::error::StoreResult;
use postgres::types::ToSql;
use postgres::{Client, NoTls};
use tracing::{debug, info};

/// Connection to a live Planka database.
///
/// Every statement runs outside an explicit transaction, so each insert is
/// committed as soon as it returns. Integer parameters and results are cast
/// to `BIGINT` so the store works whether Planka declares its keys and
/// positions as `integer`, `bigint` or `double precision`.
pub struct PgStore {
    client: Client,
}

impl PgStore {
    /// Open the connection described by `config`.
    pub fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        debug!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            user = %config.user,
            "Connecting to postgres"
        );
        let client = config.to_pg_config().connect(NoTls)?;
        info!("Connection to PostgreSQL DB successful");
        Ok(Self { client })
    }

    fn query_id(&mut self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StoreResult<Option<i64>> {
        debug!(query = sql, "Executing read query");
        let row = self.client.query_opt(sql, params)?;
        Ok(row.map(|r| r.get(0)))
    }

    fn query_max(&mut self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StoreResult<Option<i64>> {
        debug!(query = sql, "Executing read query");
        let row = self.client.query_one(sql, params)?;
        Ok(row.get(0))
    }

    fn insert_returning(&mut self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StoreResult<i64> {
        debug!(query = sql, "Executing action");
        let row = self.client.query_one(sql, params)?;
        Ok(row.get(0))
    }
}

impl KanbanStore for PgStore {
    fn find_project(&mut self, name: &str) -> StoreResult<Option<i64>> {
        self.query_id(
            "SELECT id::BIGINT FROM project WHERE name = $1 ORDER BY id LIMIT 1",
            &[&name],
        )
    }

    fn insert_project(&mut self, name: &str) -> StoreResult<i64> {
        self.insert_returning(
            "INSERT INTO project (name) VALUES ($1) RETURNING id::BIGINT",
            &[&name],
        )
    }

    fn find_user(&mut self, username: &str) -> StoreResult<Option<i64>> {
        self.query_id(
            "SELECT id::BIGINT FROM user_account WHERE username = $1 ORDER BY id LIMIT 1",
            &[&username],
        )
    }

    fn add_project_member(&mut self, project_id: i64, user_id: i64) -> StoreResult<()> {
        let sql = "INSERT INTO project_membership (project_id, user_id) VALUES ($1::BIGINT, $2::BIGINT)";
        debug!(query = sql, "Executing action");
        self.client.execute(sql, &[&project_id, &user_id])?;
        Ok(())
    }

    fn find_board(&mut self, project_id: i64, name: &str) -> StoreResult<Option<BoardRow>> {
        let sql = "SELECT id::BIGINT, position::BIGINT, project_id::BIGINT FROM board \
                   WHERE name = $1 AND project_id = $2::BIGINT ORDER BY id LIMIT 1";
        debug!(query = sql, "Executing read query");
        let row = self.client.query_opt(sql, &[&name, &project_id])?;
        Ok(row.map(|r| BoardRow {
            id: r.get(0),
            position: r.get(1),
            project_id: r.get(2),
        }))
    }

    fn max_board_position(&mut self, project_id: i64) -> StoreResult<Option<i64>> {
        self.query_max(
            "SELECT MAX(position)::BIGINT FROM board WHERE project_id = $1::BIGINT",
            &[&project_id],
        )
    }

    fn insert_board(&mut self, project_id: i64, name: &str, position: i64) -> StoreResult<i64> {
        self.insert_returning(
            "INSERT INTO board (project_id, type, name, position) \
             VALUES ($1::BIGINT, $2, $3, $4::BIGINT) RETURNING id::BIGINT",
            &[&project_id, &BOARD_TYPE, &name, &position],
        )
    }

    fn find_list(&mut self, board_id: i64, name: &str) -> StoreResult<Option<ListRow>> {
        let sql = "SELECT id::BIGINT, position::BIGINT, board_id::BIGINT FROM list \
                   WHERE name = $1 AND board_id = $2::BIGINT ORDER BY id LIMIT 1";
        debug!(query = sql, "Executing read query");
        let row = self.client.query_opt(sql, &[&name, &board_id])?;
        Ok(row.map(|r| ListRow {
            id: r.get(0),
            position: r.get(1),
            board_id: r.get(2),
        }))
    }

    fn max_list_position(&mut self, board_id: i64) -> StoreResult<Option<i64>> {
        self.query_max(
            "SELECT MAX(position)::BIGINT FROM list WHERE board_id = $1::BIGINT",
            &[&board_id],
        )
    }

    fn insert_list(&mut self, board_id: i64, name: &str, position: i64) -> StoreResult<i64> {
        self.insert_returning(
            "INSERT INTO list (board_id, name, position) \
             VALUES ($1::BIGINT, $2, $3::BIGINT) RETURNING id::BIGINT",
            &[&board_id, &name, &position],
        )
    }

    fn find_card(
        &mut self,
        board_id: i64,
        list_id: i64,
        name: &str,
    ) -> StoreResult<Option<CardRow>> {
        let sql = "SELECT id::BIGINT, position::BIGINT, board_id::BIGINT, list_id::BIGINT FROM card \
                   WHERE name = $1 AND board_id = $2::BIGINT AND list_id = $3::BIGINT \
                   ORDER BY id LIMIT 1";
        debug!(query = sql, "Executing read query");
        let row = self.client.query_opt(sql, &[&name, &board_id, &list_id])?;
        Ok(row.map(|r| CardRow {
            id: r.get(0),
            position: r.get(1),
            board_id: r.get(2),
            list_id: r.get(3),
        }))
    }

    fn max_card_position(&mut self, board_id: i64, list_id: i64) -> StoreResult<Option<i64>> {
        self.query_max(
            "SELECT MAX(position)::BIGINT FROM card WHERE board_id = $1::BIGINT AND list_id = $2::BIGINT",
            &[&board_id, &list_id],
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
            "INSERT INTO card (board_id, list_id, name, position) \
             VALUES ($1::BIGINT, $2::BIGINT, $3, $4::BIGINT) RETURNING id::BIGINT",
            &[&board_id, &list_id, &name, &position],
        )
    }

    fn task_names(&mut self, card_id: i64) -> StoreResult<Vec<String>> {
        let sql = "SELECT name FROM task WHERE card_id = $1::BIGINT";
        debug!(query = sql, "Executing read query");
        let rows = self.client.query(sql, &[&card_id])?;
        Ok(rows.iter().map(|r| r.get(0)).collect())
    }

    fn insert_task(&mut self, card_id: i64, name: &str) -> StoreResult<()> {
        let sql = "INSERT INTO task (card_id, name, is_completed) VALUES ($1::BIGINT, $2, false)";
        debug!(query = sql, "Executing action");
        self.client.execute(sql, &[&card_id, &name])?;
        Ok(())
    }
}
