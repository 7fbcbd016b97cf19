//! UI strings and colors, passed to the renderer at construction.

use board_lib::Status;
use ratatui::style::Color;

/// Strings for one language.
#[derive(Debug, Clone)]
pub struct Strings {
    pub title: &'static str,
    pub ready: &'static str,
    pub no_file: &'static str,
    pub not_found: &'static str,
    pub playing: &'static str,
    pub playback_failed: &'static str,
    pub assigned: &'static str,
    pub renamed: &'static str,
    pub cleared: &'static str,
    pub resized: &'static str,
    pub language: &'static str,
    pub volume: &'static str,
    pub saved_as: &'static str,
    pub loaded: &'static str,
    pub reset_ok: &'static str,
    pub stopped: &'static str,
    pub sounds_folder: &'static str,
    pub controls: &'static str,
    pub status_title: &'static str,
    pub logs_title: &'static str,
    pub no_logs: &'static str,
}

const ES: Strings = Strings {
    title: "Effects Board",
    ready: "Listo",
    no_file: "Sin archivo asignado",
    not_found: "Archivo no encontrado",
    playing: "▶ Reproduciendo",
    playback_failed: "Error de audio",
    assigned: "Asignado",
    renamed: "Botón renombrado",
    cleared: "Botón limpiado",
    resized: "Cuadrícula redimensionada",
    language: "Idioma",
    volume: "Volumen",
    saved_as: "💾 Guardado en:",
    loaded: "📂 Cargado:",
    reset_ok: "🔄 Configuración reseteada",
    stopped: "⏹ Detenido",
    sounds_folder: "Carpeta de sonidos:",
    controls: "←↑↓→=mover  enter=reproducir  1..0=fila 1  s=detener  -/+=volumen  l=idioma  q=salir",
    status_title: "Estado",
    logs_title: "Registro",
    no_logs: "Sin registros.",
};

const EN: Strings = Strings {
    title: "Effects Board",
    ready: "Ready",
    no_file: "No file assigned",
    not_found: "File not found",
    playing: "▶ Playing",
    playback_failed: "Audio error",
    assigned: "Assigned",
    renamed: "Button renamed",
    cleared: "Button cleared",
    resized: "Grid resized",
    language: "Language",
    volume: "Volume",
    saved_as: "💾 Saved to:",
    loaded: "📂 Loaded:",
    reset_ok: "🔄 Configuration reset",
    stopped: "⏹ Stopped",
    sounds_folder: "Sounds folder:",
    controls: "←↑↓→=move  enter=play  1..0=row 1  s=stop  -/+=volume  l=language  q=quit",
    status_title: "Status",
    logs_title: "Logs",
    no_logs: "No logs yet.",
};

/// Strings per language plus the cell palette.
#[derive(Debug, Clone)]
pub struct Texts {
    es: Strings,
    en: Strings,
    pub assigned_color: Color,
    pub empty_color: Color,
    pub selected_color: Color,
}

impl Default for Texts {
    fn default() -> Self {
        Self {
            es: ES,
            en: EN,
            assigned_color: Color::Rgb(0x0E, 0xA5, 0xE9),
            empty_color: Color::Rgb(0x33, 0x41, 0x55),
            selected_color: Color::Yellow,
        }
    }
}

impl Texts {
    /// Strings for `lang`; unknown languages get Spanish.
    pub fn get(&self, lang: &str) -> &Strings {
        match lang {
            "en" => &self.en,
            _ => &self.es,
        }
    }

    /// One-line description of `status` in `lang`.
    pub fn status(&self, lang: &str, status: &Status) -> String {
        let s = self.get(lang);
        match status {
            Status::Ready => s.ready.to_string(),
            Status::NoFileAssigned => s.no_file.to_string(),
            Status::FileNotFound(path) => format!("{}: {}", s.not_found, path),
            Status::Playing(path) => format!("{}: {}", s.playing, path),
            Status::PlaybackFailed(reason) => format!("{}: {}", s.playback_failed, reason),
            Status::Assigned(path) => format!("{}: {}", s.assigned, path),
            Status::Renamed => s.renamed.to_string(),
            Status::Cleared => s.cleared.to_string(),
            Status::Resized => s.resized.to_string(),
            Status::LanguageChanged(lang) => format!("{}: {}", s.language, lang.to_uppercase()),
            Status::VolumeChanged(volume) => format!("{}: {}", s.volume, volume),
            Status::SavedAs(path) => format!("{} {}", s.saved_as, path),
            Status::Loaded(path) => format!("{} {}", s.loaded, path),
            Status::Reset => s.reset_ok.to_string(),
            Status::Stopped => s.stopped.to_string(),
        }
    }
}
