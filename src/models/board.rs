use super::{
    FieldValue, List, Mapping, Model, describe, merge_id, merge_int, merge_text, parse_children,
};
use std::fmt;

/// A kanban board inside a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub position: i64,
    pub lists: Vec<List>,
    pub project_id: Option<i64>,
}

impl Board {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

impl Model for Board {
    const KIND: &'static str = "Board";
    const FIELDS: &'static [&'static str] = &["id", "name", "position", "lists", "project_id"];

    fn load_json(&mut self, doc: &Mapping, force: bool) {
        for (key, value) in doc {
            match key.as_str() {
                "id" => merge_id(&mut self.id, value, force),
                "name" => merge_text(&mut self.name, value, force),
                "position" => merge_int(&mut self.position, value, force),
                "lists" => self.lists = parse_children(value),
                "project_id" => merge_id(&mut self.project_id, value, force),
                _ => {}
            }
        }
    }

    fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("id", FieldValue::id(self.id)),
            ("name", FieldValue::text(&self.name)),
            ("position", FieldValue::int(self.position)),
            ("lists", FieldValue::children(&self.lists)),
            ("project_id", FieldValue::id(self.project_id)),
        ]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe(f, Self::KIND, self.id, &self.name)
    }
}
