use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use lg_core::error::CoreError;
use lg_core::frame::GlyphBitmap;
use lg_core::traits::GlyphRasterizer;

/// Coverage at or above which a cell counts as ink.
const INK_THRESHOLD: f32 = 0.5;

/// Well-known install locations, tried after the configured paths.
const SYSTEM_FONTS: &[(&str, &[&str])] = &[
    (
        "Courier New",
        &[
            "/usr/share/fonts/truetype/msttcorefonts/Courier_New.ttf",
            "/usr/share/fonts/truetype/msttcorefonts/cour.ttf",
            "/Library/Fonts/Courier New.ttf",
            "/System/Library/Fonts/Supplemental/Courier New.ttf",
            "C:\\Windows\\Fonts\\cour.ttf",
        ],
    ),
    (
        "DejaVu Sans Mono",
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
            "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
            "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
            "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf",
        ],
    ),
    (
        "Liberation Mono",
        &[
            "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
            "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
            "/usr/share/fonts/TTF/LiberationMono-Regular.ttf",
        ],
    ),
    ("Menlo", &["/System/Library/Fonts/Menlo.ttc"]),
    ("Consolas", &["C:\\Windows\\Fonts\\consola.ttf"]),
    (
        "DejaVu Sans",
        &[
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        ],
    ),
];

/// Font name → font file resolution.
///
/// Lookup order: explicit entries (from the `[fonts]` config table or
/// `--font-file`), then the name itself if it is an existing file, then the
/// built-in system locations.
///
/// # Example
/// ```
/// use lg_glyph::rasterizer::FontRegistry;
/// use std::path::PathBuf;
///
/// let mut registry = FontRegistry::new();
/// registry.register("Mono", PathBuf::from("/opt/fonts/mono.ttf"));
/// assert_eq!(registry.resolve("Mono"), Some(PathBuf::from("/opt/fonts/mono.ttf")));
/// ```
#[derive(Clone, Debug, Default)]
pub struct FontRegistry {
    paths: BTreeMap<String, PathBuf>,
}

impl FontRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with configured entries.
    #[must_use]
    pub fn with_paths(paths: BTreeMap<String, PathBuf>) -> Self {
        Self { paths }
    }

    /// Map `name` to `path`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, path: PathBuf) {
        self.paths.insert(name.into(), path);
    }

    /// File backing `name`, if any.
    ///
    /// Explicit entries are returned even if the file is missing, so the
    /// load error names the configured path.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if let Some(path) = self.paths.get(name) {
            return Some(path.clone());
        }
        let direct = Path::new(name);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }
        SYSTEM_FONTS
            .iter()
            .filter(|(family, _)| family.eq_ignore_ascii_case(name))
            .flat_map(|(_, candidates)| candidates.iter())
            .map(PathBuf::from)
            .find(|p| p.is_file())
    }

    /// `name` when it resolves, otherwise the first well-known family
    /// available here. `None` when neither exists.
    #[must_use]
    pub fn resolve_family(&self, name: &str) -> Option<String> {
        if self.resolve(name).is_some() {
            return Some(name.to_owned());
        }
        let family = SYSTEM_FONTS
            .iter()
            .map(|(family, _)| *family)
            .find(|family| self.resolve(family).is_some())?;
        log::warn!("Police '{name}' introuvable, repli sur '{family}'");
        Some(family.to_owned())
    }
}

/// Glyph rasterizer over TrueType/OpenType fonts.
///
/// Fonts are loaded on first use and kept for the lifetime of the
/// rasterizer. Glyphs are scaled so the font's line height spans the
/// bitmap, centered horizontally, baseline at the ascent.
///
/// Single-threaded: the font cache uses `RefCell`.
pub struct FontRasterizer {
    registry: FontRegistry,
    fonts: RefCell<HashMap<String, Rc<FontVec>>>,
}

impl FontRasterizer {
    #[must_use]
    pub fn new(registry: FontRegistry) -> Self {
        Self {
            registry,
            fonts: RefCell::new(HashMap::new()),
        }
    }

    /// Load `name` now instead of on the first glyph, so a missing font is
    /// reported at startup.
    ///
    /// # Errors
    /// `Rasterization` if the font cannot be resolved or parsed.
    pub fn preload(&self, name: &str) -> Result<(), CoreError> {
        self.font(name).map(|_| ()).map_err(|reason| CoreError::rasterization(' ', name, reason))
    }

    fn font(&self, name: &str) -> Result<Rc<FontVec>, String> {
        if let Some(font) = self.fonts.borrow().get(name) {
            return Ok(Rc::clone(font));
        }
        let path = self
            .registry
            .resolve(name)
            .ok_or_else(|| "font not found (add it under [fonts] or pass --font-file)".to_owned())?;
        let bytes = std::fs::read(&path).map_err(|e| format!("{}: {e}", path.display()))?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| format!("{}: {e}", path.display()))?;
        log::info!("Police '{name}' chargée depuis {}", path.display());

        let font = Rc::new(font);
        self.fonts.borrow_mut().insert(name.to_owned(), Rc::clone(&font));
        Ok(font)
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&self, ch: char, resolution: u32, font: &str) -> Result<GlyphBitmap, CoreError> {
        if resolution == 0 {
            return Err(CoreError::rasterization(ch, font, "resolution must be positive"));
        }
        let face = self
            .font(font)
            .map_err(|reason| CoreError::rasterization(ch, font, reason))?;

        let gid = face.glyph_id(ch);
        // glyph_id 0 = .notdef; only whitespace may legitimately lack a glyph.
        if gid.0 == 0 && !ch.is_whitespace() {
            return Err(CoreError::rasterization(ch, font, "glyph absent from font"));
        }

        let side = resolution as f32;
        let scale = PxScale::from(side);
        let scaled = face.as_scaled(scale);
        let left = ((side - scaled.h_advance(gid)) / 2.0).max(0.0);
        let glyph = gid.with_scale_and_position(scale, point(left, scaled.ascent()));

        let mut bitmap = GlyphBitmap::blank(resolution);
        if let Some(outline) = face.outline_glyph(glyph) {
            let bounds = outline.px_bounds();
            #[allow(clippy::cast_possible_wrap)]
            outline.draw(|x, y, coverage| {
                if coverage < INK_THRESHOLD {
                    return;
                }
                let px = x as i32 + bounds.min.x as i32;
                let py = y as i32 + bounds.min.y as i32;
                if (0..resolution as i32).contains(&px) && (0..resolution as i32).contains(&py) {
                    bitmap.set(py as u32, px as u32, true);
                }
            });
        }
        log::trace!("Glyphe {ch:?} ({font}) : {} cellules", bitmap.ink_count());
        Ok(bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLED: &str = "DejaVu Sans Mono";

    fn bundled_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/DejaVuSansMono.ttf")
    }

    fn bundled() -> FontRasterizer {
        let mut registry = FontRegistry::new();
        registry.register(BUNDLED, bundled_path());
        FontRasterizer::new(registry)
    }

    /// (first, last) row and column holding ink.
    fn ink_bounds(bm: &GlyphBitmap) -> Option<((u32, u32), (u32, u32))> {
        let side = bm.side();
        let cells: Vec<(u32, u32)> = (0..side)
            .flat_map(|r| (0..side).map(move |c| (r, c)))
            .filter(|&(r, c)| bm.get(r, c))
            .collect();
        let rows = cells.iter().map(|&(r, _)| r);
        let cols = cells.iter().map(|&(_, c)| c);
        Some((
            (rows.clone().min()?, rows.max()?),
            (cols.clone().min()?, cols.max()?),
        ))
    }

    #[test]
    fn explicit_entries_win() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.ttf");
        std::fs::write(&file, b"x").unwrap();

        let mut paths = BTreeMap::new();
        paths.insert("DejaVu Sans Mono".to_owned(), file.clone());
        let registry = FontRegistry::with_paths(paths);
        assert_eq!(registry.resolve("DejaVu Sans Mono"), Some(file.clone()));

        // A path used as a name resolves to itself.
        let name = file.to_string_lossy().into_owned();
        assert_eq!(FontRegistry::new().resolve(&name), Some(file));
        assert_eq!(FontRegistry::new().resolve("No Such Font 4f1c"), None);
    }

    #[test]
    fn unresolved_family_falls_back_to_known_font() {
        let first = SYSTEM_FONTS[0].0;
        let mut registry = FontRegistry::new();
        registry.register(first, bundled_path());

        assert_eq!(registry.resolve_family("No Such Font 4f1c"), Some(first.to_owned()));
        assert_eq!(registry.resolve_family(first), Some(first.to_owned()));
    }

    #[test]
    fn unknown_font_is_a_rasterization_error() {
        let r = FontRasterizer::new(FontRegistry::new());
        let err = r.rasterize('a', 16, "No Such Font 4f1c").unwrap_err();
        assert!(matches!(err, CoreError::Rasterization { ch: 'a', .. }));
        assert!(r.preload("No Such Font 4f1c").is_err());
    }

    #[test]
    fn garbage_font_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.ttf");
        std::fs::write(&file, b"not a font at all").unwrap();
        let mut registry = FontRegistry::new();
        registry.register("Broken", file);

        let r = FontRasterizer::new(registry);
        assert!(matches!(
            r.rasterize('a', 16, "Broken"),
            Err(CoreError::Rasterization { .. })
        ));
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let r = FontRasterizer::new(FontRegistry::new());
        assert!(r.rasterize('a', 0, "anything").is_err());
    }

    #[test]
    fn denser_glyphs_ink_more_cells() {
        let r = bundled();
        r.preload(BUNDLED).unwrap();
        let space = r.rasterize(' ', 16, BUNDLED).unwrap();
        let dot = r.rasterize('.', 16, BUNDLED).unwrap();
        let hash = r.rasterize('#', 16, BUNDLED).unwrap();
        let at = r.rasterize('@', 16, BUNDLED).unwrap();

        assert_eq!(space.side(), 16);
        assert_eq!(space.ink_count(), 0);
        assert!(dot.ink_count() > 0);
        assert!(hash.ink_count() > dot.ink_count());
        assert!(at.ink_count() > dot.ink_count());
        assert!(at.ink_count() < 16 * 16);
    }

    #[test]
    fn same_glyph_same_bitmap() {
        let hash = bundled().rasterize('#', 16, BUNDLED).unwrap();
        let r = bundled();
        assert_eq!(r.rasterize('#', 16, BUNDLED).unwrap(), hash);
        assert_eq!(r.rasterize('#', 16, BUNDLED).unwrap(), hash);
    }

    #[test]
    fn glyphs_are_centered_and_sit_on_the_baseline() {
        let r = bundled();

        let bar = r.rasterize('|', 16, BUNDLED).unwrap();
        let (_, (left, right)) = ink_bounds(&bar).unwrap();
        let center = f64::from(left + right) / 2.0;
        assert!((center - 7.5).abs() <= 1.5, "bar centered at {center}");

        let underscore = r.rasterize('_', 16, BUNDLED).unwrap();
        let ((top, _), _) = ink_bounds(&underscore).unwrap();
        assert!(top >= 8, "underscore starts at row {top}");

        let apostrophe = r.rasterize('\'', 16, BUNDLED).unwrap();
        let ((_, bottom), _) = ink_bounds(&apostrophe).unwrap();
        assert!(bottom < 8, "apostrophe ends at row {bottom}");
    }

    #[test]
    fn glyph_missing_from_font_is_an_error() {
        let r = bundled();
        assert!(matches!(
            r.rasterize('漢', 16, BUNDLED),
            Err(CoreError::Rasterization { ch: '漢', .. })
        ));
    }
}
