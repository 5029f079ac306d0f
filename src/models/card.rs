use super::{
    FieldValue, Mapping, Model, describe, merge_id, merge_int, merge_strings, merge_text,
};
use serde_json::Value;
use std::fmt;

/// A card in a list. Tasks are plain names; they carry no id of their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Card {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub position: i64,
    pub tasks: Vec<String>,
    pub board_id: Option<i64>,
    pub list_id: Option<i64>,
}

impl Card {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

impl Model for Card {
    const KIND: &'static str = "Card";
    const FIELDS: &'static [&'static str] =
        &["id", "name", "position", "tasks", "board_id", "list_id"];

    fn load_json(&mut self, doc: &Mapping, force: bool) {
        for (key, value) in doc {
            match key.as_str() {
                "id" => merge_id(&mut self.id, value, force),
                "name" => merge_text(&mut self.name, value, force),
                "position" => merge_int(&mut self.position, value, force),
                "tasks" => merge_strings(&mut self.tasks, value, force),
                "board_id" => merge_id(&mut self.board_id, value, force),
                "list_id" => merge_id(&mut self.list_id, value, force),
                _ => {}
            }
        }
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", FieldValue::id(self.id)),
            ("name", FieldValue::text(&self.name)),
            ("position", FieldValue::int(self.position)),
            (
                "tasks",
                FieldValue::Scalar(Value::from(self.tasks.clone())),
            ),
            ("board_id", FieldValue::id(self.board_id)),
            ("list_id", FieldValue::id(self.list_id)),
        ]
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(f, Self::KIND, self.id, &self.name)
    }
}
