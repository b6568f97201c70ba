use std::path::PathBuf;

use clap::Parser;
use lg_core::config::AppConfig;

/// lumaglyph : convertit une image en grille de caractères par luminosité.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image à convertir (PNG, JPEG, BMP, GIF).
    pub image: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Police utilisée pour mesurer les glyphes et pour le HTML.
    #[arg(long)]
    pub font: Option<String>,

    /// Fichier TrueType/OpenType de la police choisie.
    #[arg(long)]
    pub font_file: Option<PathBuf>,

    /// Fichier HTML écrit par `render`.
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    ///
    /// `--font-file` is registered under the effective font name.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(ref font) = self.font {
            config.font.clone_from(font);
        }
        if let Some(ref html) = self.html {
            config.html_output.clone_from(html);
        }
        if let Some(ref file) = self.font_file {
            config.fonts.insert(config.font.clone(), file.clone());
        }
    }
}
