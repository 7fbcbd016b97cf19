//! Reading and writing board configuration documents.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{info, warn};

use super::{legacy, Config, ConfigError};

/// How a configuration came to be returned by [`load_or_init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// No document existed; a default one was created.
    Created,
    /// The document was in an older shape and was migrated.
    Migrated,
    /// The document was already current.
    Current,
}

/// Result of [`load_or_init`].
#[derive(Debug, Clone)]
pub struct Loaded {
    pub config: Config,
    pub origin: LoadOrigin,
    /// Whether this call wrote the document back to disk.
    pub persisted: bool,
}

/// Load the configuration at `path`, creating a default one when absent.
///
/// Older documents are migrated forward and written back once. A failure to
/// write back is logged and does not fail the load; the migrated value is
/// still returned.
///
/// # Errors
///
/// [`ConfigError::Read`] when the file exists but cannot be read and
/// [`ConfigError::Parse`] when its content is not a board configuration.
pub fn load_or_init(path: &Path) -> Result<Loaded, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!("No config at {}; creating defaults", path.display());
            let config = Config::default();
            let persisted = persist_logged(&config, path);
            return Ok(Loaded {
                config,
                origin: LoadOrigin::Created,
                persisted,
            });
        }
        Err(err) => return Err(ConfigError::read(path, err)),
    };
    parse_and_migrate(&text, path)
}

/// Load an existing configuration at `path`, migrating it when needed.
///
/// Unlike [`load_or_init`], a missing file is a [`ConfigError::Read`].
pub fn load(path: &Path) -> Result<Loaded, ConfigError> {
    let text = fs::read_to_string(path).map_err(|err| ConfigError::read(path, err))?;
    parse_and_migrate(&text, path)
}

fn parse_and_migrate(text: &str, path: &Path) -> Result<Loaded, ConfigError> {
    let mut document: serde_json::Value =
        serde_json::from_str(text).map_err(|err| ConfigError::parse(path, err))?;
    if !document.is_object() {
        return Err(ConfigError::parse(path, "document root is not an object"));
    }

    let migrated = legacy::migrate(&mut document);
    let config: Config =
        serde_json::from_value(document).map_err(|err| ConfigError::parse(path, err))?;

    let persisted = migrated && persist_logged(&config, path);
    Ok(Loaded {
        config,
        origin: if migrated {
            LoadOrigin::Migrated
        } else {
            LoadOrigin::Current
        },
        persisted,
    })
}

/// Serialize `config` to `path`.
///
/// Output is pretty-printed and deterministic for a given value. The write
/// goes to a sibling temporary file that is renamed into place, so a failed
/// save never leaves a truncated document behind.
///
/// # Errors
///
/// [`ConfigError::Write`] when the destination is not writable. Nothing is
/// retried.
pub fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let json = to_json(config).map_err(|err| ConfigError::write(path, err))?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    if let Err(err) = fs::write(tmp_path, json) {
        return Err(ConfigError::write(path, err));
    }
    if let Err(err) = fs::rename(tmp_path, path) {
        let _ = fs::remove_file(tmp_path);
        return Err(ConfigError::write(path, err));
    }
    Ok(())
}

/// Render `config` the way [`save`] writes it.
pub fn to_json(config: &Config) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(config)?;
    json.push('\n');
    Ok(json)
}

fn persist_logged(config: &Config, path: &Path) -> bool {
    match save(config, path) {
        Ok(()) => true,
        Err(err) => {
            warn!("{}", err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CellConfig, GridDimensions, Meta};
    use std::collections::BTreeMap;

    fn sample_config() -> Config {
        let mut labels = BTreeMap::new();
        labels.insert("en".to_string(), "Explosion".to_string());
        labels.insert("es".to_string(), "Explosión".to_string());
        Config {
            grid_dimensions: GridDimensions::new(2, 3),
            cells: vec![
                CellConfig {
                    row: 0,
                    col: 0,
                    labels,
                    file_path: Some("sounds/boom.mp3".to_string()),
                },
                CellConfig::with_default_labels(1, 2),
            ],
            meta: Meta {
                volume: 35,
                language: "en".to_string(),
            },
        }
    }

    #[test]
    fn creates_and_persists_default_when_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("button_config.json");

        let loaded = load_or_init(&path).expect("load");

        assert_eq!(loaded.origin, LoadOrigin::Created);
        assert!(loaded.persisted);
        assert_eq!(loaded.config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("board.json");
        let config = sample_config();

        save(&config, &path).expect("save");
        let loaded = load_or_init(&path).expect("load");

        assert_eq!(loaded.origin, LoadOrigin::Current);
        assert!(!loaded.persisted);
        assert_eq!(loaded.config, config);
    }

    #[test]
    fn output_is_deterministic_and_keeps_non_ascii() {
        let json = to_json(&sample_config()).expect("json");
        assert_eq!(json, to_json(&sample_config()).expect("json"));
        assert!(json.contains("Explosión"));
        assert!(json.contains("\"gridDimensions\""));
        assert!(json.contains("\"filePath\": null"));
    }

    #[test]
    fn malformed_document_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_or_init(&path).expect_err("should fail");
        assert!(err.is_read_error());
        assert!(matches!(err, ConfigError::Parse { .. }));

        fs::write(&path, "[1, 2, 3]").unwrap();
        let err = load_or_init(&path).expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn legacy_document_is_migrated_and_persisted_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("legacy.json");
        fs::write(
            &path,
            r#"{"grid":{"rows":3,"cols":4},"buttons":[{"row":0,"col":0,"label":"Boom","file":null}]}"#,
        )
        .unwrap();

        let first = load_or_init(&path).expect("load");
        assert_eq!(first.origin, LoadOrigin::Migrated);
        assert!(first.persisted);
        let cell = &first.config.cells[0];
        assert_eq!(cell.labels.get("en").map(String::as_str), Some("Boom"));
        assert_eq!(cell.labels.get("es").map(String::as_str), Some("Boom"));
        assert_eq!(first.config.meta.language, "es");

        let bytes_after_first = fs::read(&path).unwrap();
        let second = load_or_init(&path).expect("load");
        assert_eq!(second.origin, LoadOrigin::Current);
        assert!(!second.persisted);
        assert_eq!(second.config, first.config);
        assert_eq!(fs::read(&path).unwrap(), bytes_after_first);
        assert!(!String::from_utf8(bytes_after_first).unwrap().contains("\"label\""));
    }

    #[test]
    fn save_into_missing_directory_fails_without_side_effects() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("no-such-dir").join("board.json");

        let err = save(&sample_config(), &path).expect_err("should fail");
        assert!(matches!(err, ConfigError::Write { .. }));
        assert!(!err.is_read_error());
        assert!(!path.exists());
    }

    #[test]
    fn broken_cell_entries_do_not_discard_the_board() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("board.json");
        fs::write(
            &path,
            r#"{"gridDimensions":{"rows":2,"cols":2},"cells":[{"row":0,"col":0,"labels":{"es":"Bomba"},"filePath":"bomb.wav"},{"row":-1,"col":0,"labels":{},"filePath":"lost.wav"}],"meta":{"volume":35,"language":"en"}}"#,
        )
        .unwrap();

        let loaded = load_or_init(&path).expect("load");
        assert_eq!(loaded.config.grid_dimensions, GridDimensions::new(2, 2));
        assert_eq!(loaded.config.cells.len(), 1);
        assert_eq!(loaded.config.cells[0].file_path.as_deref(), Some("bomb.wav"));
        assert_eq!(loaded.config.meta.volume, 35);
        assert_eq!(loaded.config.meta.language, "en");
    }

    #[test]
    fn legacy_cell_without_coordinates_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("legacy.json");
        fs::write(
            &path,
            r#"{"grid":{"rows":1,"cols":2},"buttons":[{"row":0,"col":1,"label":"Boom","file":"boom.wav"},{"label":"x"}],"__meta__":{"volume":60,"lang":null}}"#,
        )
        .unwrap();

        let loaded = load_or_init(&path).expect("load");
        assert_eq!(loaded.origin, LoadOrigin::Migrated);
        assert_eq!(loaded.config.cells.len(), 1);
        assert_eq!(loaded.config.cells[0].col, 1);
        assert_eq!(loaded.config.cells[0].file_path.as_deref(), Some("boom.wav"));
        assert_eq!(loaded.config.meta.volume, 60);
        assert_eq!(loaded.config.meta.language, "es");
    }

    #[test]
    fn strict_load_does_not_create_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.json");

        let err = load(&path).expect_err("should fail");
        assert!(err.is_read_error());
        assert!(!path.exists());

        save(&sample_config(), &path).expect("save");
        let loaded = load(&path).expect("load");
        assert_eq!(loaded.config, sample_config());
        assert_eq!(loaded.origin, LoadOrigin::Current);
    }
}
