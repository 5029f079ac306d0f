use super::{Board, FieldValue, Mapping, Model, describe, merge_id, merge_text, parse_children};
use std::fmt;

/// A Planka project, the root of an import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub boards: Vec<Board>,
}

impl Project {
    /// A project known only by name, as given on the command line.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

impl Model for Project {
    const KIND: &'static str = "Project";
    const FIELDS: &'static [&'static str] = &["id", "name", "boards"];

    fn load_json(&mut self, doc: &Mapping, force: bool) {
        for (key, value) in doc {
            match key.as_str() {
                "id" => merge_id(&mut self.id, value, force),
                "name" => merge_text(&mut self.name, value, force),
                "boards" => self.boards = parse_children(value),
                _ => {}
            }
        }
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", FieldValue::id(self.id)),
            ("name", FieldValue::text(&self.name)),
            ("boards", FieldValue::children(&self.boards)),
        ]
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(f, Self::KIND, self.id, &self.name)
    }
}
