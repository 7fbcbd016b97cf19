//! Asset files and default folders.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

/// Extensions (lowercase, without the dot) a cell may be bound to.
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["wav", "mp3"];

/// Default folder offered for picking sounds.
pub const DEFAULT_SOUNDS_DIR: &str = "SOUND EFFECTS";

/// Default folder offered for "save as".
pub const DEFAULT_CONFIGS_DIR: &str = "configs";

const SOUNDS_README: &str = "# Sounds folder\n\nPut your .wav/.mp3 files here.\n";

/// Return true when `path` has an allowed extension (case-insensitive).
pub fn is_supported(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// File name without directory or extension, used as a cell label.
pub fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Create the sounds folder with a README stub when absent.
///
/// # Returns
///
/// Absolute path of the folder.
pub fn ensure_sounds_folder(folder: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(folder)?;
    let readme = folder.join("README.md");
    if !readme.exists() {
        info!("Writing sounds folder README to {}", readme.display());
        fs::write(&readme, SOUNDS_README)?;
    }
    absolute(folder)
}

/// Create the configs folder when absent.
pub fn ensure_configs_folder(folder: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(folder)?;
    absolute(folder)
}

/// Suggested file name for "save as" in the given language.
pub fn suggested_config_name(lang: &str) -> String {
    format!("buttons_{}.json", lang)
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
