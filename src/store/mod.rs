//! Storage contract for the Planka tables touched by an import.
//!
//! The schema is owned by Planka itself. An import only needs a handful of
//! natural-key lookups, scoped `MAX(position)` queries and single-row
//! inserts, which [`KanbanStore`] spells out. Every call is one statement
//! that commits on its own.

mod pg;
mod sqlite;

pub use pg::PgStore;
pub use sqlite::SqliteStore;

use crate::error::StoreResult;

/// Board type written for every board this tool creates.
pub const BOARD_TYPE: &str = "kanban";

/// Stored identity of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardRow {
    pub id: i64,
    pub position: i64,
    pub project_id: i64,
}

/// Stored identity of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRow {
    pub id: i64,
    pub position: i64,
    pub board_id: i64,
}

/// Stored identity of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardRow {
    pub id: i64,
    pub position: i64,
    pub board_id: i64,
    pub list_id: i64,
}

/// Row operations needed to resolve and insert kanban entities.
///
/// Lookups return `Ok(None)` when no row matches; `Err` always means the
/// store itself failed.
pub trait KanbanStore {
    fn find_project(&mut self, name: &str) -> StoreResult<Option<i64>>;
    fn insert_project(&mut self, name: &str) -> StoreResult<i64>;

    fn find_user(&mut self, username: &str) -> StoreResult<Option<i64>>;
    fn add_project_member(&mut self, project_id: i64, user_id: i64) -> StoreResult<()>;

    fn find_board(&mut self, project_id: i64, name: &str) -> StoreResult<Option<BoardRow>>;
    fn max_board_position(&mut self, project_id: i64) -> StoreResult<Option<i64>>;
    fn insert_board(&mut self, project_id: i64, name: &str, position: i64) -> StoreResult<i64>;

    fn find_list(&mut self, board_id: i64, name: &str) -> StoreResult<Option<ListRow>>;
    fn max_list_position(&mut self, board_id: i64) -> StoreResult<Option<i64>>;
    fn insert_list(&mut self, board_id: i64, name: &str, position: i64) -> StoreResult<i64>;

    fn find_card(&mut self, board_id: i64, list_id: i64, name: &str)
    -> StoreResult<Option<CardRow>>;
    fn max_card_position(&mut self, board_id: i64, list_id: i64) -> StoreResult<Option<i64>>;
    fn insert_card(
        &mut self,
        board_id: i64,
        list_id: i64,
        name: &str,
        position: i64,
    ) -> StoreResult<i64>;

    /// Names of every task already on the card.
    fn task_names(&mut self, card_id: i64) -> StoreResult<Vec<String>>;
    /// Insert an open (not completed) task.
    fn insert_task(&mut self, card_id: i64, name: &str) -> StoreResult<()>;
}
