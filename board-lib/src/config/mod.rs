//! Persisted board configuration.
//!
//! A [`Config`] is the full on-disk state of a board: grid dimensions, the
//! per-cell bindings and the `meta` block holding volume and language. The
//! [`store`] module moves it between bytes and memory and [`legacy`] brings
//! older document shapes forward before they are deserialized.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

mod error;
pub mod legacy;
pub mod store;

pub use error::ConfigError;
pub use store::{load, load_or_init, save, LoadOrigin, Loaded};

/// Default number of rows for a fresh board.
pub const DEFAULT_ROWS: usize = 3;
/// Default number of columns for a fresh board.
pub const DEFAULT_COLS: usize = 4;
/// Default volume (percent) for a fresh board.
pub const DEFAULT_VOLUME: u8 = 80;
/// Default display language.
pub const DEFAULT_LANGUAGE: &str = "es";
/// Config file used when no explicit path is chosen.
pub const DEFAULT_CONFIG_FILE: &str = "button_config.json";

/// Languages that receive a label entry when a legacy cell is migrated.
pub const MIGRATED_LANGUAGES: [&str; 2] = ["en", "es"];

/// Persisted root document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub grid_dimensions: GridDimensions,
    #[serde(default, deserialize_with = "lenient_cells")]
    pub cells: Vec<CellConfig>,
    #[serde(default)]
    pub meta: Meta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub rows: usize,
    pub cols: usize,
}

impl GridDimensions {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Return true when `(row, col)` addresses a cell inside these dimensions.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

/// One persisted grid position.
///
/// `labels` may be missing entries for some languages; rendering falls back
/// to the coordinate string (see [`crate::language::resolve`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellConfig {
    pub row: usize,
    pub col: usize,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub file_path: Option<String>,
}

impl CellConfig {
    /// Build an unbound cell whose labels are the coordinate string in every
    /// migrated language.
    pub fn with_default_labels(row: usize, col: usize) -> Self {
        let coords = crate::language::coordinate_label(row, col);
        let labels = MIGRATED_LANGUAGES
            .iter()
            .map(|lang| (lang.to_string(), coords.clone()))
            .collect();
        Self {
            row,
            col,
            labels,
            file_path: None,
        }
    }

    pub fn has_file(&self) -> bool {
        self.file_path.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default = "default_volume", deserialize_with = "clamped_volume")]
    pub volume: u8,
    #[serde(default = "default_language", deserialize_with = "language_or_default")]
    pub language: String,
}

impl Default for Meta {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

fn default_volume() -> u8 {
    DEFAULT_VOLUME
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Clamp an integer percentage into `0..=100`.
pub fn clamp_volume(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

/// Trim and lowercase a language code.
pub fn normalize_language(lang: &str) -> String {
    lang.trim().to_lowercase()
}

fn clamped_volume<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let volume = match value {
        serde_json::Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|val| val.round() as i64))
            .map(clamp_volume)
            .unwrap_or(DEFAULT_VOLUME),
        _ => DEFAULT_VOLUME,
    };
    Ok(volume)
}

/// Keep every cell entry that deserializes; drop and log the rest.
///
/// An entry needs non-negative integer `row` and `col`. One broken entry must
/// not cost the rest of the board.
fn lenient_cells<'de, D>(deserializer: D) -> Result<Vec<CellConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(entries) => entries,
        serde_json::Value::Null => return Ok(Vec::new()),
        other => {
            warn!("ignoring cells: expected a list, found {}", other);
            return Ok(Vec::new());
        }
    };

    let cells = entries
        .into_iter()
        .filter_map(|entry| match CellConfig::deserialize(&entry) {
            Ok(cell) => Some(cell),
            Err(err) => {
                warn!("skipping cell entry {}: {}", entry, err);
                None
            }
        })
        .collect();
    Ok(cells)
}

fn language_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let language = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(lang) if !lang.trim().is_empty() => lang,
        _ => DEFAULT_LANGUAGE.to_string(),
    };
    Ok(language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_fresh_board() {
        let config = Config::default();
        assert_eq!(config.grid_dimensions, GridDimensions::new(3, 4));
        assert!(config.cells.is_empty());
        assert_eq!(config.meta.volume, 80);
        assert_eq!(config.meta.language, "es");
    }

    #[test]
    fn meta_volume_is_clamped_on_read() {
        let meta: Meta = serde_json::from_str(r#"{"volume":250,"language":"en"}"#).unwrap();
        assert_eq!(meta.volume, 100);
        let meta: Meta = serde_json::from_str(r#"{"volume":-4,"language":"en"}"#).unwrap();
        assert_eq!(meta.volume, 0);
        let meta: Meta = serde_json::from_str(r#"{"volume":55.6}"#).unwrap();
        assert_eq!(meta.volume, 56);
        assert_eq!(meta.language, "es");
    }

    #[test]
    fn null_or_blank_language_reads_as_default() {
        let meta: Meta = serde_json::from_str(r#"{"volume":40,"language":null}"#).unwrap();
        assert_eq!(meta.language, "es");
        assert_eq!(meta.volume, 40);
        let meta: Meta = serde_json::from_str(r#"{"language":"  "}"#).unwrap();
        assert_eq!(meta.language, "es");
        let meta: Meta = serde_json::from_str(r#"{"language":7}"#).unwrap();
        assert_eq!(meta.language, "es");
        let meta: Meta = serde_json::from_str(r#"{"language":"en"}"#).unwrap();
        assert_eq!(meta.language, "en");
    }

    #[test]
    fn unreadable_cell_entries_are_skipped() {
        let config: Config = serde_json::from_str(
            r#"{"cells":[
                {"row":0,"col":1,"labels":{"en":"Boom"},"filePath":"boom.wav"},
                {"row":-1,"col":0},
                {"row":1.5,"col":0},
                {"labels":{"en":"x"}},
                "junk",
                {"row":2,"col":3}
            ]}"#,
        )
        .unwrap();
        let coords: Vec<_> = config.cells.iter().map(|cell| (cell.row, cell.col)).collect();
        assert_eq!(coords, vec![(0, 1), (2, 3)]);
        assert_eq!(config.cells[0].file_path.as_deref(), Some("boom.wav"));

        let config: Config = serde_json::from_str(r#"{"cells":null}"#).unwrap();
        assert!(config.cells.is_empty());
    }

    #[test]
    fn cell_count_is_rows_times_cols() {
        assert_eq!(GridDimensions::default().cell_count(), 12);
        assert_eq!(GridDimensions::new(1, 6).cell_count(), 6);
    }

    #[test]
    fn cell_serializes_with_camel_case_keys() {
        let mut cell = CellConfig::with_default_labels(1, 2);
        cell.file_path = Some("kick.wav".to_string());
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["filePath"], "kick.wav");
        assert_eq!(json["labels"]["en"], "2,3");
        assert_eq!(json["labels"]["es"], "2,3");
    }

    #[test]
    fn unbound_cell_serializes_null_file_path() {
        let cell = CellConfig::with_default_labels(0, 0);
        let json = serde_json::to_value(&cell).unwrap();
        assert!(json["filePath"].is_null());
    }

    #[test]
    fn language_codes_are_normalized() {
        assert_eq!(normalize_language("  EN "), "en");
    }
}
