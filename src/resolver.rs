//! Find-or-insert resolution for kanban entities.
//!
//! Each resolver looks the entity up by name within its parent scope. A
//! stored row always wins: its id, position and foreign keys replace
//! whatever the in-memory entity carried. When nothing matches, the entity
//! is appended after the current last sibling and inserted.
//!
//! Task names added during the current run count as already present, so a
//! name repeated within one card of a document is inserted only once.

use crate::error::StoreResult;
use crate::models::{Board, Card, List};
use crate::position::next_position;
use crate::store::KanbanStore;
use std::collections::HashSet;
use tracing::{debug, warn};

/// How an entity reached its resolved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// An existing row matched the natural key.
    Found,
    /// No row matched; a new one was inserted.
    Inserted,
}

/// An entity carrying a valid id, plus how it got there.
///
/// `id` repeats the id stored on `entity` so callers can thread it to
/// children without unwrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub entity: T,
    pub id: i64,
    pub origin: Origin,
}

impl<T> Resolved<T> {
    fn found(entity: T, id: i64) -> Self {
        Self {
            entity,
            id,
            origin: Origin::Found,
        }
    }

    fn inserted(entity: T, id: i64) -> Self {
        Self {
            entity,
            id,
            origin: Origin::Inserted,
        }
    }
}

/// Outcome of adding one task name to a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Inserted,
    /// A task with the same name is already on the card.
    AlreadyPresent,
}

/// Reuse the board named `board.name` in the project, or append a new one.
pub fn resolve_board<S: KanbanStore + ?Sized>(
    store: &mut S,
    mut board: Board,
    project_id: i64,
) -> StoreResult<Resolved<Board>> {
    if let Some(row) = store.find_board(project_id, board.name())? {
        board.id = Some(row.id);
        board.position = row.position;
        board.project_id = Some(row.project_id);
        return Ok(Resolved::found(board, row.id));
    }

    warn!("{} not found. Adding board.", board.name());
    board.position = next_position(store.max_board_position(project_id)?);
    board.project_id = Some(project_id);
    let id = store.insert_board(project_id, board.name(), board.position)?;
    board.id = Some(id);
    debug!(board_id = id, position = board.position, "Inserted board");
    Ok(Resolved::inserted(board, id))
}

/// Reuse the list named `list.name` on the board, or append a new one.
pub fn resolve_list<S: KanbanStore + ?Sized>(
    store: &mut S,
    mut list: List,
    board_id: i64,
) -> StoreResult<Resolved<List>> {
    if let Some(row) = store.find_list(board_id, list.name())? {
        list.id = Some(row.id);
        list.position = row.position;
        list.board_id = Some(row.board_id);
        return Ok(Resolved::found(list, row.id));
    }

    warn!("{} not found. Adding list.", list.name());
    list.position = next_position(store.max_list_position(board_id)?);
    list.board_id = Some(board_id);
    let id = store.insert_list(board_id, list.name(), list.position)?;
    list.id = Some(id);
    debug!(list_id = id, position = list.position, "Inserted list");
    Ok(Resolved::inserted(list, id))
}

/// Reuse the card named `card.name` in the list, or append a new one.
pub fn resolve_card<S: KanbanStore + ?Sized>(
    store: &mut S,
    card: Card,
    board_id: i64,
    list_id: i64,
) -> StoreResult<Resolved<Card>> {
    if let Some(row) = store.find_card(board_id, list_id, card.name())? {
        let mut card = card;
        card.id = Some(row.id);
        card.position = row.position;
        card.board_id = Some(row.board_id);
        card.list_id = Some(row.list_id);
        return Ok(Resolved::found(card, row.id));
    }

    warn!("{} not found. Adding card.", card.name());
    append_card(store, card, board_id, list_id)
}

/// Append `card` after the last card in the list without looking for an
/// existing card of the same name.
pub fn append_card<S: KanbanStore + ?Sized>(
    store: &mut S,
    mut card: Card,
    board_id: i64,
    list_id: i64,
) -> StoreResult<Resolved<Card>> {
    card.position = next_position(store.max_card_position(board_id, list_id)?);
    card.board_id = Some(board_id);
    card.list_id = Some(list_id);
    let id = store.insert_card(board_id, list_id, card.name(), card.position)?;
    card.id = Some(id);
    debug!(card_id = id, position = card.position, "Inserted card");
    Ok(Resolved::inserted(card, id))
}

/// Task names already stored on a card, tracked while adding more.
#[derive(Debug, Clone, Default)]
pub struct CardTasks {
    card_id: i64,
    names: HashSet<String>,
}

impl CardTasks {
    /// Load the existing task names for `card_id`.
    pub fn load<S: KanbanStore + ?Sized>(store: &mut S, card_id: i64) -> StoreResult<Self> {
        let names = store.task_names(card_id)?.into_iter().collect();
        Ok(Self { card_id, names })
    }

    /// Insert `name` unless the card already has a task with that name.
    pub fn add<S: KanbanStore + ?Sized>(
        &mut self,
        store: &mut S,
        name: &str,
    ) -> StoreResult<TaskOutcome> {
        if self.names.contains(name) {
            warn!("{} is already on card.", name);
            return Ok(TaskOutcome::AlreadyPresent);
        }

        debug!("Adding {}.", name);
        store.insert_task(self.card_id, name)?;
        self.names.insert(name.to_string());
        Ok(TaskOutcome::Inserted)
    }
}
