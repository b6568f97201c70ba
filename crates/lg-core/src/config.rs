use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::CHARSET_DIGITS;
use crate::error::CoreError;

/// Font used when none is configured.
pub const DEFAULT_FONT: &str = "Courier New";

/// Complete application configuration.
///
/// Serializable to TOML. Every field has a sane default.
///
/// # Example
/// ```
/// use lg_core::config::AppConfig;
/// let config = AppConfig::default();
/// assert_eq!(config.chars_in_row, 64);
/// assert_eq!(config.glyph_resolution, 16);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AppConfig {
    // === Rendu ===
    /// Font name used for glyph brightness and HTML output.
    pub font: String,
    /// Initial number of characters per output row.
    pub chars_in_row: u32,
    /// Smallest tile side allowed, in pixels. Bounds `res up`.
    pub min_pixels_per_char: u32,
    /// Side of the square bitmap each glyph is rasterized into.
    pub glyph_resolution: u32,
    /// Initial active characters.
    pub charset: String,
    /// How earlier batches react to a range change.
    pub normalization: NormalizationPolicy,

    // === Sortie ===
    /// HTML document written by `render`.
    pub html_output: PathBuf,

    // === Polices ===
    /// Font name → TrueType/OpenType file.
    pub fonts: BTreeMap<String, PathBuf>,
}

/// Normalization policy for cached character brightness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum NormalizationPolicy {
    /// Each batch is scaled once against the range known at the time.
    /// Earlier batches keep their stored value.
    #[default]
    PerBatch,
    /// Every cached value is rescaled whenever the range moves.
    Global,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            font: DEFAULT_FONT.to_owned(),
            chars_in_row: 64,
            min_pixels_per_char: 2,
            glyph_resolution: 16,
            charset: CHARSET_DIGITS.to_owned(),
            normalization: NormalizationPolicy::PerBatch,
            html_output: PathBuf::from("out.html"),
            fonts: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.chars_in_row = self.chars_in_row.max(1);
        self.min_pixels_per_char = self.min_pixels_per_char.clamp(1, 64);
        self.glyph_resolution = self.glyph_resolution.clamp(4, 256);
    }

    /// Reject values that cannot be clamped into something usable.
    ///
    /// # Errors
    /// `CoreError::Config` on an empty font name or output path.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.font.trim().is_empty() {
            return Err(CoreError::Config("font name is empty".into()));
        }
        if self.html_output.as_os_str().is_empty() {
            return Err(CoreError::Config("html_output is empty".into()));
        }
        Ok(())
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    render: Option<RenderSection>,
    fonts: Option<BTreeMap<String, PathBuf>>,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct RenderSection {
    font: Option<String>,
    chars_in_row: Option<u32>,
    min_pixels_per_char: Option<u32>,
    glyph_resolution: Option<u32>,
    charset: Option<String>,
    normalization: Option<NormalizationPolicy>,
    html_output: Option<PathBuf>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML or holds invalid values.
///
/// # Example
/// ```
/// use lg_core::config::parse_config;
/// let config = parse_config("[render]\nchars_in_row = 32\n").unwrap();
/// assert_eq!(config.chars_in_row, 32);
/// assert_eq!(config.font, "Courier New");
/// ```
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = AppConfig::default();

    if let Some(r) = file.render {
        if let Some(v) = r.font {
            config.font = v;
        }
        if let Some(v) = r.chars_in_row {
            config.chars_in_row = v;
        }
        if let Some(v) = r.min_pixels_per_char {
            config.min_pixels_per_char = v;
        }
        if let Some(v) = r.glyph_resolution {
            config.glyph_resolution = v;
        }
        if let Some(v) = r.charset {
            config.charset = v;
        }
        if let Some(v) = r.normalization {
            config.normalization = v;
        }
        if let Some(v) = r.html_output {
            config.html_output = v;
        }
    }
    if let Some(fonts) = file.fonts {
        config.fonts = fonts;
    }

    config.clamp_all();
    config.validate()?;
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use lg_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Configuration invalide : {}", path.display()))?;
    log::debug!("Config chargée depuis {}", path.display());
    Ok(config)
}
