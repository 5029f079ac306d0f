use super::{
    Card, FieldValue, Mapping, Model, describe, merge_id, merge_int, merge_text, parse_children,
};
use std::fmt;

/// A column on a board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub position: i64,
    pub cards: Vec<Card>,
    pub board_id: Option<i64>,
}

impl List {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

impl Model for List {
    const KIND: &'static str = "List";
    const FIELDS: &'static [&'static str] = &["id", "name", "position", "cards", "board_id"];

    fn load_json(&mut self, doc: &Mapping, force: bool) {
        for (key, value) in doc {
            match key.as_str() {
                "id" => merge_id(&mut self.id, value, force),
                "name" => merge_text(&mut self.name, value, force),
                "position" => merge_int(&mut self.position, value, force),
                "cards" => self.cards = parse_children(value),
                "board_id" => merge_id(&mut self.board_id, value, force),
                _ => {}
            }
        }
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", FieldValue::id(self.id)),
            ("name", FieldValue::text(&self.name)),
            ("position", FieldValue::int(self.position)),
            ("cards", FieldValue::children(&self.cards)),
            ("board_id", FieldValue::id(self.board_id)),
        ]
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(f, Self::KIND, self.id, &self.name)
    }
}
