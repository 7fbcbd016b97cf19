//! Forward migration of older board documents.
//!
//! Migration works on the raw JSON tree so that it can see fields the current
//! schema no longer has (the single-string `label`, the short key names) and
//! report whether anything moved. Every step is a no-op on a document that is
//! already current, so running [`migrate`] twice never reports a change the
//! second time.

use log::{debug, info};
use serde_json::{Map, Value};

use super::{DEFAULT_LANGUAGE, DEFAULT_VOLUME, MIGRATED_LANGUAGES};
use crate::language::coordinate_label;

/// Root keys renamed from the short legacy spelling to the current one.
const ROOT_RENAMES: [(&str, &str); 3] = [
    ("grid", "gridDimensions"),
    ("buttons", "cells"),
    ("__meta__", "meta"),
];

/// Bring `document` up to the current schema in place.
///
/// # Returns
///
/// `true` when any part of the document changed and should be persisted.
pub fn migrate(document: &mut Value) -> bool {
    let Some(root) = document.as_object_mut() else {
        return false;
    };

    let mut changed = false;
    for (legacy, current) in ROOT_RENAMES {
        changed |= rename_key(root, legacy, current);
    }

    if let Some(cells) = root.get_mut("cells").and_then(Value::as_array_mut) {
        for cell in cells.iter_mut().filter_map(Value::as_object_mut) {
            changed |= migrate_cell(cell);
        }
    }

    changed |= migrate_meta(root);

    if changed {
        info!("Migrated board config to the current schema");
    }
    changed
}

/// Move `legacy` to `current`. An existing `current` entry wins and the
/// legacy one is dropped.
fn rename_key(object: &mut Map<String, Value>, legacy: &str, current: &str) -> bool {
    let Some(value) = object.remove(legacy) else {
        return false;
    };
    if !object.contains_key(current) {
        debug!("renaming legacy key '{}' to '{}'", legacy, current);
        object.insert(current.to_string(), value);
    }
    true
}

fn migrate_cell(cell: &mut Map<String, Value>) -> bool {
    let mut changed = rename_key(cell, "file", "filePath");

    let has_labels = cell.get("labels").map(Value::is_object).unwrap_or(false);
    if !has_labels {
        let text = match cell.get("label") {
            Some(Value::String(label)) if !label.trim().is_empty() => label.clone(),
            _ => {
                let row = cell.get("row").and_then(Value::as_u64).unwrap_or(0) as usize;
                let col = cell.get("col").and_then(Value::as_u64).unwrap_or(0) as usize;
                coordinate_label(row, col)
            }
        };
        let labels: Map<String, Value> = MIGRATED_LANGUAGES
            .iter()
            .map(|lang| (lang.to_string(), Value::String(text.clone())))
            .collect();
        cell.insert("labels".to_string(), Value::Object(labels));
        changed = true;
    }

    if cell.remove("label").is_some() {
        changed = true;
    }

    changed
}

fn migrate_meta(root: &mut Map<String, Value>) -> bool {
    match root.get_mut("meta") {
        Some(Value::Object(meta)) => {
            let mut changed = rename_key(meta, "lang", "language");
            if !meta.contains_key("language") {
                meta.insert(
                    "language".to_string(),
                    Value::String(DEFAULT_LANGUAGE.to_string()),
                );
                changed = true;
            }
            changed
        }
        _ => {
            let mut meta = Map::new();
            meta.insert("volume".to_string(), Value::from(DEFAULT_VOLUME));
            meta.insert(
                "language".to_string(),
                Value::String(DEFAULT_LANGUAGE.to_string()),
            );
            root.insert("meta".to_string(), Value::Object(meta));
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_label_becomes_labels_for_both_languages() {
        let mut doc = json!({
            "gridDimensions": {"rows": 1, "cols": 1},
            "cells": [{"row": 0, "col": 0, "label": "Boom", "filePath": null}],
            "meta": {"volume": 80, "language": "es"}
        });

        assert!(migrate(&mut doc));

        let cell = &doc["cells"][0];
        assert_eq!(cell["labels"], json!({"en": "Boom", "es": "Boom"}));
        assert!(cell.get("label").is_none());
    }

    #[test]
    fn blank_legacy_label_falls_back_to_coordinates() {
        let mut doc = json!({
            "cells": [{"row": 1, "col": 2, "label": "   "}],
            "meta": {"volume": 80, "language": "es"}
        });

        assert!(migrate(&mut doc));
        assert_eq!(doc["cells"][0]["labels"], json!({"en": "2,3", "es": "2,3"}));
    }

    #[test]
    fn missing_meta_and_language_are_filled_in() {
        let mut doc = json!({"cells": []});
        assert!(migrate(&mut doc));
        assert_eq!(doc["meta"], json!({"volume": 80, "language": "es"}));

        let mut doc = json!({"cells": [], "meta": {"volume": 30}});
        assert!(migrate(&mut doc));
        assert_eq!(doc["meta"], json!({"volume": 30, "language": "es"}));
    }

    #[test]
    fn short_key_names_are_renamed() {
        let mut doc = json!({
            "grid": {"rows": 2, "cols": 2},
            "buttons": [{"row": 0, "col": 1, "labels": {"en": "Hit"}, "file": "hit.wav"}],
            "__meta__": {"volume": 40, "lang": "en"}
        });

        assert!(migrate(&mut doc));

        assert_eq!(doc["gridDimensions"], json!({"rows": 2, "cols": 2}));
        assert_eq!(doc["cells"][0]["filePath"], "hit.wav");
        assert!(doc["cells"][0].get("file").is_none());
        assert_eq!(doc["meta"], json!({"volume": 40, "language": "en"}));
        assert!(doc.get("grid").is_none());
        assert!(doc.get("buttons").is_none());
        assert!(doc.get("__meta__").is_none());
    }

    #[test]
    fn migration_is_idempotent() {
        let mut doc = json!({
            "grid": {"rows": 3, "cols": 4},
            "buttons": [
                {"row": 0, "col": 0, "label": "Boom"},
                {"row": 0, "col": 1}
            ]
        });

        assert!(migrate(&mut doc));
        let once = doc.clone();
        assert!(!migrate(&mut doc));
        assert_eq!(doc, once);
    }

    #[test]
    fn current_document_is_untouched() {
        let mut doc = json!({
            "gridDimensions": {"rows": 3, "cols": 4},
            "cells": [{"row": 0, "col": 0, "labels": {"es": "Explosión"}, "filePath": null}],
            "meta": {"volume": 80, "language": "es"}
        });
        let before = doc.clone();

        assert!(!migrate(&mut doc));
        assert_eq!(doc, before);
    }
}
