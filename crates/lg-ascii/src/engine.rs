use std::collections::{BTreeMap, HashMap};

use lg_core::charset::CharSet;
use lg_core::config::NormalizationPolicy;
use lg_core::error::CoreError;
use lg_core::frame::{CharGrid, PixelSource};
use lg_core::traits::GlyphRasterizer;
use lg_source::tile::tiles;

use crate::luminance::{glyph_coverage, region_brightness};

/// Side of the bitmap glyphs are rasterized into, unless configured.
pub const DEFAULT_GLYPH_RESOLUTION: u32 = 16;

/// Brightness matcher: maps image tiles to the character of closest
/// brightness.
///
/// Owns a two-tier cache:
/// - `all_time`: every character ever rasterized → normalized brightness.
///   Grows, never shrinks.
/// - `active`: the subset selected by the last render call. Always a
///   projection of `all_time` (same keys, same values).
///
/// Raw glyph coverage is kept alongside so the `Global` policy can rescale
/// without rasterizing again.
///
/// Not `Sync`-safe by contract: one engine per thread, or serialize calls.
///
/// # Example
/// ```
/// use lg_ascii::engine::BrightnessEngine;
/// use lg_core::{CharSet, CoreError, GlyphBitmap, GlyphRasterizer, PixelBuffer};
///
/// struct Blocks;
/// impl GlyphRasterizer for Blocks {
///     fn rasterize(&self, ch: char, res: u32, _font: &str) -> Result<GlyphBitmap, CoreError> {
///         let mut bm = GlyphBitmap::blank(res);
///         if ch == '#' {
///             for r in 0..res { for c in 0..res { bm.set(r, c, true); } }
///         }
///         Ok(bm)
///     }
/// }
///
/// let mut engine = BrightnessEngine::new(Blocks, "Courier New");
/// let img = PixelBuffer::filled(4, 4, (255, 255, 255)).unwrap();
/// let grid = engine.render(&img, 2, &CharSet::from_chars(" #")).unwrap();
/// assert_eq!(grid.row_string(0), "##");
/// ```
pub struct BrightnessEngine<R> {
    rasterizer: R,
    font: String,
    resolution: u32,
    policy: NormalizationPolicy,
    raw: HashMap<char, f32>,
    all_time: HashMap<char, f32>,
    active: BTreeMap<char, f32>,
    /// Running (min, max) of raw coverage. `None` until the first glyph.
    range: Option<(f32, f32)>,
}

impl<R: GlyphRasterizer> BrightnessEngine<R> {
    /// Empty engine rendering glyphs of `font` through `rasterizer`.
    #[must_use]
    pub fn new(rasterizer: R, font: impl Into<String>) -> Self {
        Self {
            rasterizer,
            font: font.into(),
            resolution: DEFAULT_GLYPH_RESOLUTION,
            policy: NormalizationPolicy::default(),
            raw: HashMap::new(),
            all_time: HashMap::new(),
            active: BTreeMap::new(),
            range: None,
        }
    }

    /// Glyph bitmap side. Only affects characters not yet cached.
    #[must_use]
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution.max(1);
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: NormalizationPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    #[must_use]
    pub fn font(&self) -> &str {
        &self.font
    }

    /// Every character ever computed → normalized brightness.
    #[must_use]
    pub fn all_time(&self) -> &HashMap<char, f32> {
        &self.all_time
    }

    /// Characters eligible for matching, in code-point order.
    #[must_use]
    pub fn active(&self) -> &BTreeMap<char, f32> {
        &self.active
    }

    /// Running `(min, max)` of raw glyph coverage.
    #[must_use]
    pub fn range(&self) -> Option<(f32, f32)> {
        self.range
    }

    /// Make the active cache hold exactly `charset`.
    ///
    /// Characters never seen before are rasterized as one batch and
    /// normalized together against the running range. Nothing is mutated
    /// unless every glyph of the batch rasterizes.
    ///
    /// # Errors
    /// `Rasterization` if the rasterizer fails for any new character.
    pub fn update_active(&mut self, charset: &CharSet) -> Result<(), CoreError> {
        let batch = charset
            .iter()
            .filter(|ch| !self.all_time.contains_key(ch))
            .map(|ch| self.raw_brightness(ch).map(|raw| (ch, raw)))
            .collect::<Result<Vec<_>, _>>()?;

        self.active.retain(|ch, _| charset.contains(*ch));

        if !batch.is_empty() {
            self.absorb_batch(&batch);
        }

        for ch in charset.iter() {
            if let Some(&value) = self.all_time.get(&ch) {
                self.active.entry(ch).or_insert(value);
            }
        }
        log::trace!(
            "Cache actif : {} caractères ({} nouveaux)",
            self.active.len(),
            batch.len()
        );
        Ok(())
    }

    /// Character of the active set closest to `brightness`.
    ///
    /// Ties go to the lowest code point.
    ///
    /// # Errors
    /// `EmptyCharacterSet` if no character is active.
    pub fn select(&self, brightness: f32) -> Result<char, CoreError> {
        let mut best: Option<(char, f32)> = None;
        // BTreeMap order + strict `<` keeps the lowest code point on ties.
        for (&ch, &value) in &self.active {
            let diff = (brightness - value).abs();
            if best.is_none_or(|(_, best_diff)| diff < best_diff) {
                best = Some((ch, diff));
            }
        }
        best.map(|(ch, _)| ch).ok_or(CoreError::EmptyCharacterSet)
    }

    /// Render `source` as a grid of `chars_in_row` columns.
    ///
    /// The tile side is `width / chars_in_row`; it must divide both
    /// dimensions. Only the caches change as a side effect, and only once
    /// the inputs are known to be valid.
    ///
    /// # Errors
    /// `EmptyCharacterSet`, `InvalidTileSize`, or `Rasterization`.
    pub fn render<S: PixelSource + ?Sized>(
        &mut self,
        source: &S,
        chars_in_row: u32,
        charset: &CharSet,
    ) -> Result<CharGrid, CoreError> {
        if charset.is_empty() {
            return Err(CoreError::EmptyCharacterSet);
        }
        let (width, height) = (source.width(), source.height());
        if chars_in_row == 0 || chars_in_row > width || width % chars_in_row != 0 {
            return Err(CoreError::InvalidTileSize {
                tile: width.checked_div(chars_in_row).unwrap_or(0),
                width,
                height,
            });
        }
        let tile_size = width / chars_in_row;
        let tile_iter = tiles(source, tile_size)?;
        let (rows, cols) = tile_iter.grid_size();

        self.update_active(charset)?;

        let mut cells = Vec::with_capacity(tile_iter.len());
        for tile in tile_iter {
            cells.push(self.select(region_brightness(&tile))?);
        }
        log::debug!("Rendu {rows}×{cols} (tuiles de {tile_size}px)");
        CharGrid::from_cells(rows, cols, cells)
    }

    fn raw_brightness(&self, ch: char) -> Result<f32, CoreError> {
        let bitmap = self.rasterizer.rasterize(ch, self.resolution, &self.font)?;
        Ok(glyph_coverage(&bitmap))
    }

    /// Fold a rasterized batch into the range and both tiers.
    fn absorb_batch(&mut self, batch: &[(char, f32)]) {
        let previous = self.range;
        let range = batch.iter().fold(previous, |acc, &(_, raw)| match acc {
            Some((lo, hi)) => Some((lo.min(raw), hi.max(raw))),
            None => Some((raw, raw)),
        });
        self.range = range;
        let Some(range) = range else {
            return;
        };
        self.raw.extend(batch.iter().copied());

        if self.policy == NormalizationPolicy::Global && previous != Some(range) {
            for (&ch, &raw) in &self.raw {
                self.all_time.insert(ch, normalize(raw, range));
            }
            for (ch, value) in &mut self.active {
                if let Some(&fresh) = self.all_time.get(ch) {
                    *value = fresh;
                }
            }
            log::debug!(
                "Plage [{:.4}, {:.4}] : {} caractères renormalisés",
                range.0,
                range.1,
                self.all_time.len()
            );
        } else {
            for &(ch, raw) in batch {
                self.all_time.insert(ch, normalize(raw, range));
            }
            log::debug!(
                "Plage [{:.4}, {:.4}] : lot de {} caractères normalisé",
                range.0,
                range.1,
                batch.len()
            );
        }
    }
}

/// Rescale `raw` into [0.0, 1.0]. A degenerate range maps everything to 0.
fn normalize(raw: f32, (min, max): (f32, f32)) -> f32 {
    let span = max - min;
    if span <= f32::EPSILON {
        return 0.0;
    }
    ((raw - min) / span).clamp(0.0, 1.0)
}
