//! Integration tests for create and merge imports.
//!
//! These tests run the importer against the embedded SQLite store, which
//! mirrors the Planka tables the importer touches.

use planka_import::document;
use planka_import::error::ImportError;
use planka_import::import::{ImportMode, ImportOptions, run_import};
use planka_import::models::Mapping;
use planka_import::store::{KanbanStore, SqliteStore};
use planka_import::template::template_document;
use rusqlite::params;
use serde_json::{Value, json};

/// Helper to create a fresh in-memory store with the demo account.
fn setup_store() -> SqliteStore {
    let mut store = SqliteStore::open_in_memory().expect("Failed to create in-memory store");
    store.add_user("demo").expect("Failed to add demo user");
    store
}

fn doc(value: Value) -> Mapping {
    document::from_json(&value.to_string()).expect("Failed to parse document")
}

fn count(store: &SqliteStore, table: &str) -> i64 {
    store
        .conn()
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .expect("Failed to count rows")
}

fn positions(store: &SqliteStore, table: &str) -> Vec<i64> {
    let mut stmt = store
        .conn()
        .prepare(&format!("SELECT position FROM {} ORDER BY id", table))
        .unwrap();
    let rows = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    rows
}

fn task_names(store: &SqliteStore) -> Vec<String> {
    let mut stmt = store
        .conn()
        .prepare("SELECT name FROM task ORDER BY id")
        .unwrap();
    let rows = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    rows
}

fn ids(store: &SqliteStore, table: &str) -> Vec<i64> {
    let mut stmt = store
        .conn()
        .prepare(&format!("SELECT id FROM {} ORDER BY id", table))
        .unwrap();
    let rows = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    rows
}

fn template() -> Mapping {
    doc(template_document())
}

mod create_tests {
    use super::*;

    #[test]
    fn create_inserts_whole_tree() {
        let mut store = setup_store();

        let report = run_import(&mut store, "Ops", &template(), &ImportOptions::create())
            .expect("Create failed");

        assert_eq!(report.mode, ImportMode::Create);
        assert_eq!(count(&store, "project"), 1);
        assert_eq!(count(&store, "project_membership"), 1);
        assert_eq!(count(&store, "board"), 1);
        assert_eq!(count(&store, "list"), 1);
        assert_eq!(count(&store, "card"), 1);
        assert_eq!(task_names(&store), vec!["Take 1", "Task 2"]);
        assert_eq!(report.total_inserted(), 7);
        assert_eq!(report.total_reused(), 0);
    }

    #[test]
    fn create_chains_foreign_keys() {
        let mut store = setup_store();
        let report = run_import(&mut store, "Ops", &template(), &ImportOptions::create()).unwrap();

        let project_id = report.project.id.unwrap();
        let board = &report.project.boards[0];
        let list = &board.lists[0];
        let card = &list.cards[0];

        assert_eq!(board.project_id, Some(project_id));
        assert_eq!(list.board_id, board.id);
        assert_eq!(card.board_id, board.id);
        assert_eq!(card.list_id, list.id);

        let (stored_board, stored_list): (i64, i64) = store
            .conn()
            .query_row(
                "SELECT board_id, list_id FROM card WHERE id = ?1",
                params![card.id.unwrap()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(Some(stored_board), board.id);
        assert_eq!(Some(stored_list), list.id);

        let board_type: String = store
            .conn()
            .query_row("SELECT type FROM board", [], |row| row.get(0))
            .unwrap();
        assert_eq!(board_type, "kanban");
    }

    #[test]
    fn create_links_every_stored_row() {
        let mut store = setup_store();
        let document = doc(json!({
            "boards": [{"name": "B", "lists": [{"name": "L", "cards": [
                {"name": "C", "tasks": ["T1", "T2"]}
            ]}]}]
        }));

        run_import(&mut store, "P", &document, &ImportOptions::create()).unwrap();
        let conn = store.conn();

        let project_id: i64 = conn
            .query_row("SELECT id FROM project WHERE name = 'P'", [], |row| row.get(0))
            .unwrap();
        let (member_project, member_user): (i64, i64) = conn
            .query_row(
                "SELECT project_id, user_id FROM project_membership",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        let demo_id: i64 = conn
            .query_row("SELECT id FROM user_account WHERE username = 'demo'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(member_project, project_id);
        assert_eq!(member_user, demo_id);

        let (board_id, board_project, board_position): (i64, i64, i64) = conn
            .query_row(
                "SELECT id, project_id, position FROM board WHERE name = 'B'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(board_project, project_id);
        assert_eq!(board_position, 0);

        let (list_id, list_board, list_position): (i64, i64, i64) = conn
            .query_row(
                "SELECT id, board_id, position FROM list WHERE name = 'L'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(list_board, board_id);
        assert_eq!(list_position, 0);

        let (card_id, card_board, card_list, card_position): (i64, i64, i64, i64) = conn
            .query_row(
                "SELECT id, board_id, list_id, position FROM card WHERE name = 'C'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();
        assert_eq!(card_board, board_id);
        assert_eq!(card_list, list_id);
        assert_eq!(card_position, 0);

        let mut stmt = conn
            .prepare("SELECT name, card_id, is_completed FROM task ORDER BY id")
            .unwrap();
        let tasks: Vec<(String, i64, bool)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            tasks,
            vec![
                ("T1".to_string(), card_id, false),
                ("T2".to_string(), card_id, false),
            ]
        );
    }

    #[test]
    fn create_first_entities_sit_at_zero() {
        let mut store = setup_store();
        run_import(&mut store, "Ops", &template(), &ImportOptions::create()).unwrap();

        assert_eq!(positions(&store, "board"), vec![0]);
        assert_eq!(positions(&store, "list"), vec![0]);
        assert_eq!(positions(&store, "card"), vec![0]);
    }

    #[test]
    fn create_positions_use_running_counter() {
        let mut store = setup_store();
        let document = doc(json!({
            "boards": [
                {"name": "B1", "lists": [{"name": "L1"}, {"name": "L2"}]},
                {"name": "B2", "lists": [{"name": "L3"}]},
                {"name": "B3"}
            ]
        }));

        run_import(&mut store, "Ops", &document, &ImportOptions::create()).unwrap();

        // The counter widens with the index and carries over between parents.
        assert_eq!(positions(&store, "board"), vec![0, 65535, 196605]);
        assert_eq!(positions(&store, "list"), vec![0, 65535, 65535]);
    }

    #[test]
    fn create_keeps_duplicate_tasks() {
        let mut store = setup_store();
        let document = doc(json!({
            "boards": [{"name": "B", "lists": [{"name": "L", "cards": [
                {"name": "C", "tasks": ["Same", "Same"]}
            ]}]}]
        }));

        run_import(&mut store, "Ops", &document, &ImportOptions::create()).unwrap();
        assert_eq!(task_names(&store), vec!["Same", "Same"]);
    }

    #[test]
    fn create_ignores_document_project_name() {
        let mut store = setup_store();
        let document = doc(json!({"name": "From File", "boards": []}));

        let report = run_import(&mut store, "Ops", &document, &ImportOptions::create()).unwrap();
        assert_eq!(report.project.name(), "Ops");
        assert_eq!(store.find_project("Ops").unwrap(), report.project.id);
        assert_eq!(store.find_project("From File").unwrap(), None);
    }

    #[test]
    fn create_without_member_account_fails() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        let err = run_import(&mut store, "Ops", &template(), &ImportOptions::create())
            .unwrap_err();

        assert!(matches!(err, ImportError::UserNotFound(ref name) if name == "demo"));
        // The project row is written before the member lookup.
        assert_eq!(count(&store, "project"), 1);
        assert_eq!(count(&store, "board"), 0);
    }
}

mod merge_tests {
    use super::*;

    #[test]
    fn merge_missing_project_writes_nothing() {
        let mut store = setup_store();

        let err = run_import(&mut store, "Nope", &template(), &ImportOptions::merge())
            .unwrap_err();

        assert!(matches!(err, ImportError::ProjectNotFound(ref name) if name == "Nope"));
        for table in ["project", "board", "list", "card", "task"] {
            assert_eq!(count(&store, table), 0, "{} should be empty", table);
        }
    }

    #[test]
    fn merge_reuses_boards_and_lists() {
        let mut store = setup_store();
        run_import(&mut store, "Ops", &template(), &ImportOptions::create()).unwrap();
        let boards = ids(&store, "board");
        let lists = ids(&store, "list");

        for _ in 0..2 {
            let report =
                run_import(&mut store, "Ops", &template(), &ImportOptions::merge()).unwrap();
            assert_eq!(report.rows_reused.get("board"), Some(&1));
            assert_eq!(report.rows_reused.get("list"), Some(&1));
        }

        assert_eq!(ids(&store, "board"), boards);
        assert_eq!(ids(&store, "list"), lists);
    }

    #[test]
    fn merge_appends_cards_again() {
        // Cards have no natural key by default, so every merge adds a copy.
        let mut store = setup_store();
        run_import(&mut store, "Ops", &template(), &ImportOptions::create()).unwrap();

        run_import(&mut store, "Ops", &template(), &ImportOptions::merge()).unwrap();
        run_import(&mut store, "Ops", &template(), &ImportOptions::merge()).unwrap();

        assert_eq!(count(&store, "card"), 3);
        assert_eq!(positions(&store, "card"), vec![0, 65535, 131070]);
        // Each copy is a fresh card, so its tasks are inserted too.
        assert_eq!(count(&store, "task"), 6);
    }

    #[test]
    fn merge_with_dedupe_cards_is_idempotent() {
        let mut store = setup_store();
        run_import(&mut store, "Ops", &template(), &ImportOptions::create()).unwrap();
        let options = ImportOptions::merge().with_dedupe_cards();

        for _ in 0..2 {
            let report = run_import(&mut store, "Ops", &template(), &options).unwrap();
            assert_eq!(report.total_inserted(), 0);
            assert_eq!(report.rows_skipped.get("task"), Some(&2));
        }

        assert_eq!(count(&store, "card"), 1);
        assert_eq!(count(&store, "task"), 2);
    }

    #[test]
    fn merge_inserts_only_missing_tasks() {
        let mut store = setup_store();
        let seed = doc(json!({
            "boards": [{"name": "B", "lists": [{"name": "L", "cards": [
                {"name": "C", "tasks": ["Take 1"]}
            ]}]}]
        }));
        run_import(&mut store, "Ops", &seed, &ImportOptions::create()).unwrap();

        let update = doc(json!({
            "boards": [{"name": "B", "lists": [{"name": "L", "cards": [
                {"name": "C", "tasks": ["Take 1", "Task 2"]}
            ]}]}]
        }));
        let report = run_import(
            &mut store,
            "Ops",
            &update,
            &ImportOptions::merge().with_dedupe_cards(),
        )
        .unwrap();

        assert_eq!(task_names(&store), vec!["Take 1", "Task 2"]);
        assert_eq!(report.rows_inserted.get("task"), Some(&1));
        assert_eq!(report.rows_skipped.get("task"), Some(&1));
    }

    #[test]
    fn merge_skips_repeated_task_in_same_document() {
        let mut store = setup_store();
        run_import(&mut store, "Ops", &doc(json!({})), &ImportOptions::create()).unwrap();

        let document = doc(json!({
            "boards": [{"name": "B", "lists": [{"name": "L", "cards": [
                {"name": "C", "tasks": ["Again", "Again"]}
            ]}]}]
        }));
        run_import(&mut store, "Ops", &document, &ImportOptions::merge()).unwrap();

        assert_eq!(task_names(&store), vec!["Again"]);
    }

    #[test]
    fn merge_appends_new_siblings_after_last() {
        let mut store = setup_store();
        run_import(&mut store, "Ops", &template(), &ImportOptions::create()).unwrap();

        let document = doc(json!({
            "boards": [
                {"name": "Board Name", "lists": [{"name": "Second List"}]},
                {"name": "Second Board"}
            ]
        }));
        let report = run_import(&mut store, "Ops", &document, &ImportOptions::merge()).unwrap();

        // A stored position of 0 still counts as an existing sibling.
        assert_eq!(positions(&store, "board"), vec![0, 65535]);
        assert_eq!(positions(&store, "list"), vec![0, 65535]);
        assert_eq!(report.rows_inserted.get("board"), Some(&1));
        assert_eq!(report.rows_inserted.get("list"), Some(&1));
    }

    #[test]
    fn merge_looks_up_boards_within_project() {
        let mut store = setup_store();
        let first = run_import(&mut store, "First", &template(), &ImportOptions::create()).unwrap();
        run_import(&mut store, "Second", &doc(json!({})), &ImportOptions::create()).unwrap();

        let report = run_import(&mut store, "Second", &template(), &ImportOptions::merge()).unwrap();

        let board = &report.project.boards[0];
        assert_eq!(report.rows_inserted.get("board"), Some(&1));
        assert_ne!(board.id, first.project.boards[0].id);
        assert_eq!(board.project_id, report.project.id);
        assert_eq!(board.position, 0);
    }

    #[test]
    fn merge_resolves_ids_in_report() {
        let mut store = setup_store();
        let created = run_import(&mut store, "Ops", &template(), &ImportOptions::create()).unwrap();

        let merged = run_import(
            &mut store,
            "Ops",
            &template(),
            &ImportOptions::merge().with_dedupe_cards(),
        )
        .unwrap();

        assert_eq!(merged.project.id, created.project.id);
        assert_eq!(merged.project.boards[0].id, created.project.boards[0].id);
        assert_eq!(
            merged.project.boards[0].lists[0].cards[0].id,
            created.project.boards[0].lists[0].cards[0].id
        );
    }
}

mod document_tests {
    use super::*;

    #[test]
    fn import_from_gzipped_file() {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ops.json.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(template_document().to_string().as_bytes())
            .unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let document = document::from_file(&path).unwrap();
        let mut store = setup_store();
        run_import(&mut store, "Ops", &document, &ImportOptions::create()).unwrap();

        assert_eq!(count(&store, "card"), 1);
    }
}
