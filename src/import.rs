//! Import orchestration.
//!
//! Walks a parsed document project → boards → lists → cards → tasks and
//! pushes each entity through the store. Two modes are supported:
//! - Create: insert a new project and its whole tree unconditionally
//! - Merge: reuse boards and lists of an existing project by name, append
//!   cards, and skip tasks already on a card
//!
//! Statements are not wrapped in a transaction. A failure part way through
//! leaves every row written so far in place; re-running merge mode picks up
//! where it stopped (except that cards are appended again).

use crate::error::{ImportError, ImportResult};
use crate::models::{Board, Card, List, Mapping, Model, Project, unknown_keys};
use crate::position::RunningPosition;
use crate::resolver::{
    CardTasks, Origin, TaskOutcome, append_card, resolve_board, resolve_card, resolve_list,
};
use crate::store::KanbanStore;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// User account every newly created project is shared with.
pub const DEFAULT_MEMBER: &str = "demo";

/// Import mode determining how existing rows are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Create a new project and insert every entity.
    #[default]
    Create,
    /// Add to an existing project, reusing boards and lists by name.
    Merge,
}

/// Options for controlling import behavior.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub mode: ImportMode,
    /// Reuse cards by name in merge mode instead of always appending.
    pub dedupe_cards: bool,
    /// Username added as a member of newly created projects.
    pub member: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self::create()
    }
}

impl ImportOptions {
    /// Create options for a fresh project tree.
    pub fn create() -> Self {
        Self {
            mode: ImportMode::Create,
            dedupe_cards: false,
            member: DEFAULT_MEMBER.to_string(),
        }
    }

    /// Create options for merging into an existing project.
    pub fn merge() -> Self {
        Self {
            mode: ImportMode::Merge,
            ..Self::create()
        }
    }

    /// Reuse existing cards by name (builder pattern).
    pub fn with_dedupe_cards(mut self) -> Self {
        self.dedupe_cards = true;
        self
    }
}

/// Result of an import run.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub mode: ImportMode,
    /// The project tree with every id resolved.
    pub project: Project,
    /// Rows inserted per table.
    pub rows_inserted: BTreeMap<&'static str, usize>,
    /// Existing rows reused per table (merge mode).
    pub rows_reused: BTreeMap<&'static str, usize>,
    /// Rows skipped because they already existed (tasks).
    pub rows_skipped: BTreeMap<&'static str, usize>,
}

impl ImportReport {
    fn new(mode: ImportMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    fn inserted(&mut self, table: &'static str) {
        *self.rows_inserted.entry(table).or_default() += 1;
    }

    fn record(&mut self, table: &'static str, origin: Origin) {
        match origin {
            Origin::Inserted => self.inserted(table),
            Origin::Found => *self.rows_reused.entry(table).or_default() += 1,
        }
    }

    fn skipped(&mut self, table: &'static str) {
        *self.rows_skipped.entry(table).or_default() += 1;
    }

    /// Total number of rows inserted.
    pub fn total_inserted(&self) -> usize {
        self.rows_inserted.values().sum()
    }

    /// Total number of existing rows reused.
    pub fn total_reused(&self) -> usize {
        self.rows_reused.values().sum()
    }

    /// Total number of rows skipped.
    pub fn total_skipped(&self) -> usize {
        self.rows_skipped.values().sum()
    }
}

/// Run an import in the mode selected by `options`.
pub fn run_import<S: KanbanStore + ?Sized>(
    store: &mut S,
    project_name: &str,
    document: &Mapping,
    options: &ImportOptions,
) -> ImportResult<ImportReport> {
    match options.mode {
        ImportMode::Create => create_new(store, project_name, document, options),
        ImportMode::Merge => merge_load(store, project_name, document, options),
    }
}

/// Insert a new project named `project_name` and build its whole tree.
///
/// The project is assumed to start empty: nothing is looked up before
/// inserting. Fails with [`ImportError::UserNotFound`] when the member
/// account is missing; the project row has already been written by then.
pub fn create_new<S: KanbanStore + ?Sized>(
    store: &mut S,
    project_name: &str,
    document: &Mapping,
    options: &ImportOptions,
) -> ImportResult<ImportReport> {
    let mut report = ImportReport::new(ImportMode::Create);

    let mut project = Project::named(project_name);
    let project_id = store.insert_project(project_name)?;
    project.id = Some(project_id);
    report.inserted("project");
    debug!(project_id, "Created project {}", project_name);

    let user_id = store
        .find_user(&options.member)?
        .ok_or_else(|| ImportError::UserNotFound(options.member.clone()))?;
    store.add_project_member(project_id, user_id)?;
    report.inserted("project_membership");

    load_document(&mut project, document);
    let project = build_new(store, project, project_id, &mut report)?;
    report.project = project;
    Ok(report)
}

/// Insert every board, list, card and task in document order.
///
/// Positions come from one running counter per entity kind that is never
/// reset between parents, see [`RunningPosition`].
fn build_new<S: KanbanStore + ?Sized>(
    store: &mut S,
    mut project: Project,
    project_id: i64,
    report: &mut ImportReport,
) -> ImportResult<Project> {
    let mut board_position = RunningPosition::new();
    let mut list_position = RunningPosition::new();
    let mut card_position = RunningPosition::new();

    let boards = std::mem::take(&mut project.boards);
    for (board_index, mut board) in boards.into_iter().enumerate() {
        info!("Building {} Board.", board.name());

        board.position = board_position.advance(board_index);
        board.project_id = Some(project_id);
        let board_id = store.insert_board(project_id, board.name(), board.position)?;
        board.id = Some(board_id);
        report.inserted("board");
        debug!(board_id, "Board id");

        let lists = std::mem::take(&mut board.lists);
        for (list_index, mut list) in lists.into_iter().enumerate() {
            info!("Building {} List.", list.name());

            list.position = list_position.advance(list_index);
            list.board_id = Some(board_id);
            let list_id = store.insert_list(board_id, list.name(), list.position)?;
            list.id = Some(list_id);
            report.inserted("list");
            debug!(list_id, "List id");

            let cards = std::mem::take(&mut list.cards);
            for (card_index, mut card) in cards.into_iter().enumerate() {
                info!("Building {} Card.", card.name());

                card.position = card_position.advance(card_index);
                card.board_id = Some(board_id);
                card.list_id = Some(list_id);
                let card_id =
                    store.insert_card(board_id, list_id, card.name(), card.position)?;
                card.id = Some(card_id);
                report.inserted("card");
                debug!(card_id, "Card id");

                for task in &card.tasks {
                    debug!("Adding {}.", task);
                    store.insert_task(card_id, task)?;
                    report.inserted("task");
                }
                list.cards.push(card);
            }
            board.lists.push(list);
        }
        info!("{} Board Complete!", board.name());
        project.boards.push(board);
    }

    Ok(project)
}

/// Merge the document into the existing project named `project_name`.
///
/// Fails with [`ImportError::ProjectNotFound`] before writing anything when
/// the project does not exist.
pub fn merge_load<S: KanbanStore + ?Sized>(
    store: &mut S,
    project_name: &str,
    document: &Mapping,
    options: &ImportOptions,
) -> ImportResult<ImportReport> {
    let mut report = ImportReport::new(ImportMode::Merge);

    let project_id = store
        .find_project(project_name)?
        .ok_or_else(|| ImportError::ProjectNotFound(project_name.to_string()))?;
    let mut project = Project::named(project_name);
    project.id = Some(project_id);

    load_document(&mut project, document);

    let boards = std::mem::take(&mut project.boards);
    for board in boards {
        info!("Pulling {} Board.", board.name());
        let board = merge_board(store, board, project_id, options, &mut report)?;
        project.boards.push(board);
    }

    report.project = project;
    Ok(report)
}

fn merge_board<S: KanbanStore + ?Sized>(
    store: &mut S,
    board: Board,
    project_id: i64,
    options: &ImportOptions,
    report: &mut ImportReport,
) -> ImportResult<Board> {
    let resolved = resolve_board(store, board, project_id)?;
    report.record("board", resolved.origin);
    let board_id = resolved.id;
    let mut board = resolved.entity;
    debug!(board_id, "{} Board id", board.name());

    let lists = std::mem::take(&mut board.lists);
    for list in lists {
        info!("Pulling {} List.", list.name());
        let list = merge_list(store, list, board_id, options, report)?;
        board.lists.push(list);
    }
    Ok(board)
}

fn merge_list<S: KanbanStore + ?Sized>(
    store: &mut S,
    list: List,
    board_id: i64,
    options: &ImportOptions,
    report: &mut ImportReport,
) -> ImportResult<List> {
    let resolved = resolve_list(store, list, board_id)?;
    report.record("list", resolved.origin);
    let list_id = resolved.id;
    let mut list = resolved.entity;
    debug!(list_id, "{} List id", list.name());

    let cards = std::mem::take(&mut list.cards);
    for card in cards {
        let card = merge_card(store, card, board_id, list_id, options, report)?;
        list.cards.push(card);
    }
    Ok(list)
}

fn merge_card<S: KanbanStore + ?Sized>(
    store: &mut S,
    card: Card,
    board_id: i64,
    list_id: i64,
    options: &ImportOptions,
    report: &mut ImportReport,
) -> ImportResult<Card> {
    let resolved = if options.dedupe_cards {
        resolve_card(store, card, board_id, list_id)?
    } else {
        append_card(store, card, board_id, list_id)?
    };
    report.record("card", resolved.origin);
    let card_id = resolved.id;
    let card = resolved.entity;
    debug!(card_id, "Card id");

    let mut existing = CardTasks::load(store, card_id)?;
    for task in &card.tasks {
        match existing.add(store, task)? {
            TaskOutcome::Inserted => report.inserted("task"),
            TaskOutcome::AlreadyPresent => report.skipped("task"),
        }
    }
    Ok(card)
}

/// Merge the document into `project` without touching its name or id.
fn load_document(project: &mut Project, document: &Mapping) {
    let ignored = unknown_keys::<Project>(document);
    if !ignored.is_empty() {
        debug!(keys = ?ignored, "Ignoring unrecognized project keys");
    }
    project.load_json(document, false);
}
