//! Starter document for new imports.

use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name written by [`generate_template`].
pub const TEMPLATE_FILE: &str = "planka_template.json";

/// One board with one list, one card and two tasks.
pub fn template_document() -> Value {
    json!({
        "boards": [
            {
                "name": "Board Name",
                "lists": [
                    {
                        "name": "List Name",
                        "cards": [
                            {
                                "name": "Card Name",
                                "tasks": ["Take 1", "Task 2"]
                            }
                        ]
                    }
                ]
            }
        ]
    })
}

/// Write the template into `dir`, returning the path written.
pub fn generate_template(dir: &Path) -> std::io::Result<PathBuf> {
    debug!("Creating Template File");
    let path = dir.join(TEMPLATE_FILE);
    let json = serde_json::to_string_pretty(&template_document())?;
    std::fs::write(&path, json)?;
    info!("Template saved to {}", path.display());
    Ok(path)
}
