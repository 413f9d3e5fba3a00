//! Scrolling glyph wallpaper behind the quiz.
//!
//! A square tile of `cells x cells` glyphs is drawn once and registered as a
//! repeating fill pattern. Every frame the pattern origin drifts diagonally
//! (speed S horizontally, S/2 vertically), wrapping at the tile side so the
//! motion is seamless. The canvas/browser half lives in `canvas`.

pub mod canvas;

use indexmap::IndexSet;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::AnimationConfig;
use crate::dataset::Dataset;

pub const FALLBACK_GLYPHS: [&str; 3] = ["■", "▲", "●"];

// --- Vocabulary -------------------------------------------------------------

/// Glyphs the tile is drawn from. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    glyphs: Vec<String>,
}

impl Vocabulary {
    /// Unique icons of every category, shuffled. Falls back when the dataset
    /// carries no icons at all.
    pub fn from_dataset<R: Rng + ?Sized>(dataset: &Dataset, rng: &mut R) -> Self {
        let unique: IndexSet<&str> = dataset.all_icons().into_iter().collect();
        let mut glyphs: Vec<String> = unique.into_iter().map(str::to_string).collect();
        if glyphs.is_empty() {
            return Self::fallback();
        }
        glyphs.shuffle(rng);
        Self { glyphs }
    }

    pub fn fallback() -> Self {
        Self {
            glyphs: FALLBACK_GLYPHS.iter().map(|g| g.to_string()).collect(),
        }
    }

    pub fn glyphs(&self) -> &[String] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

// --- Tile layout ------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileLayout {
    pub pattern_size: f64,
    pub cells: u32,
    pub prime: i64,
}

impl TileLayout {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            pattern_size: config.pattern_size,
            cells: config.cells.max(1),
            prime: config.prime,
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.pattern_size / self.cells as f64
    }

    /// Vocabulary index for a cell. `row`/`col` are plane coordinates: cells
    /// outside the first tile map back onto it, so the pattern is periodic.
    pub fn glyph_index(&self, row: i64, col: i64, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let n = self.cells as i64;
        let (i, j) = (row.rem_euclid(n), col.rem_euclid(n));
        let seed = i.wrapping_mul(self.prime).wrapping_add(j).unsigned_abs();
        (seed % len as u64) as usize
    }

    pub fn glyph_at<'v>(&self, vocab: &'v Vocabulary, row: i64, col: i64) -> &'v str {
        &vocab.glyphs[self.glyph_index(row, col, vocab.len())]
    }

    pub fn cell_center(&self, row: u32, col: u32) -> (f64, f64) {
        let cell = self.cell_size();
        (
            col as f64 * cell + cell / 2.0,
            row as f64 * cell + cell / 2.0,
        )
    }

    /// `(x, y, glyph)` for every cell of one tile, row-major.
    pub fn cells<'v>(&self, vocab: &'v Vocabulary) -> Vec<(f64, f64, &'v str)> {
        let mut out = Vec::with_capacity((self.cells * self.cells) as usize);
        for i in 0..self.cells {
            for j in 0..self.cells {
                let (x, y) = self.cell_center(i, j);
                out.push((x, y, self.glyph_at(vocab, i as i64, j as i64)));
            }
        }
        out
    }
}

// --- Scrolling --------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScrollOffset {
    pub fn advance(&mut self, speed: f64, period: f64) {
        self.x = (self.x + speed) % period;
        self.y = (self.y + speed / 2.0) % period;
    }

    /// Area to fill after translating by the offset so the whole `width x height`
    /// viewport is covered.
    pub fn fill_region(&self, width: f64, height: f64) -> Rect {
        Rect {
            x: -self.x,
            y: -self.y,
            width: width + self.x,
            height: height + self.y,
        }
    }
}

/// Drawing operations one frame needs.
pub trait PatternSurface {
    fn size(&self) -> (f64, f64);
    fn clear(&mut self, width: f64, height: f64);
    fn translate(&mut self, x: f64, y: f64);
    fn fill_pattern(&mut self, rect: Rect);
    fn reset_transform(&mut self);
}

pub struct Animator {
    offset: ScrollOffset,
    speed: f64,
    period: f64,
}

impl Animator {
    pub fn new(layout: &TileLayout, speed: f64) -> Self {
        Self {
            offset: ScrollOffset::default(),
            speed,
            period: layout.pattern_size,
        }
    }

    pub fn offset(&self) -> ScrollOffset {
        self.offset
    }

    pub fn render_frame(&mut self, surface: &mut impl PatternSurface) {
        let (width, height) = surface.size();
        surface.clear(width, height);
        self.offset.advance(self.speed, self.period);
        surface.translate(self.offset.x, self.offset.y);
        surface.fill_pattern(self.offset.fill_region(width, height));
        surface.reset_transform();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn layout() -> TileLayout {
        TileLayout::new(&AnimationConfig::default())
    }

    #[test]
    fn vocabulary_is_deduplicated() {
        let ds = Dataset::from_json(
            r#"{"counters": {
                "a": {"name": {"ch": "a", "en": "a"}, "icon": ["●", "▲"], "items": []},
                "b": {"name": {"ch": "b", "en": "b"}, "icon": ["▲", "★"], "items": []}
            }}"#,
        )
        .unwrap();
        let vocab = Vocabulary::from_dataset(&ds, &mut StdRng::seed_from_u64(1));
        let mut glyphs = vocab.glyphs().to_vec();
        glyphs.sort();
        assert_eq!(glyphs, vec!["▲", "●", "★"]);
    }

    #[test]
    fn empty_dataset_falls_back() {
        let vocab = Vocabulary::from_dataset(&Dataset::default(), &mut StdRng::seed_from_u64(1));
        assert_eq!(vocab, Vocabulary::fallback());
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn glyph_index_matches_prime_formula() {
        let l = layout();
        assert_eq!(l.glyph_index(0, 5, 7), 5);
        assert_eq!(l.glyph_index(3, 4, 7), ((3 * 10007 + 4) % 7) as usize);
        assert_eq!(l.glyph_index(11, 11, 1), 0);
    }

    #[test]
    fn pattern_repeats_every_tile() {
        let l = layout();
        let vocab = Vocabulary {
            glyphs: (0..17).map(|i| i.to_string()).collect(),
        };
        for i in 0..12 {
            for j in 0..12 {
                let g = l.glyph_at(&vocab, i, j);
                assert_eq!(g, l.glyph_at(&vocab, i, j + 12));
                assert_eq!(g, l.glyph_at(&vocab, i + 12, j));
                assert_eq!(g, l.glyph_at(&vocab, i - 12, j - 24));
            }
        }
    }

    #[test]
    fn cells_are_centred_on_the_grid() {
        let l = layout();
        let vocab = Vocabulary::fallback();
        let cells = l.cells(&vocab);
        assert_eq!(cells.len(), 144);
        let cell = 500.0 / 12.0;
        assert!((cells[0].0 - cell / 2.0).abs() < 1e-9);
        let (x, y, _) = cells[12 + 2];
        assert!((x - 2.5 * cell).abs() < 1e-9);
        assert!((y - 1.5 * cell).abs() < 1e-9);
    }

    #[test]
    fn offset_wraps_at_tile_side() {
        let mut off = ScrollOffset { x: 499.9, y: 10.0 };
        off.advance(0.2, 500.0);
        assert!((off.x - 0.1).abs() < 1e-9);
        assert!((off.y - 10.1).abs() < 1e-9);
    }

    #[derive(Default)]
    struct Log(Vec<String>);

    impl PatternSurface for Log {
        fn size(&self) -> (f64, f64) {
            (800.0, 600.0)
        }
        fn clear(&mut self, w: f64, h: f64) {
            self.0.push(format!("clear {w}x{h}"));
        }
        fn translate(&mut self, x: f64, y: f64) {
            self.0.push(format!("translate {x:.1},{y:.1}"));
        }
        fn fill_pattern(&mut self, r: Rect) {
            self.0.push(format!("fill {:.1},{:.1} {:.1}x{:.1}", r.x, r.y, r.width, r.height));
        }
        fn reset_transform(&mut self) {
            self.0.push("reset".into());
        }
    }

    #[test]
    fn frame_clears_translates_fills_and_restores() {
        let mut anim = Animator::new(&layout(), 2.0);
        let mut log = Log::default();
        anim.render_frame(&mut log);
        assert_eq!(
            log.0,
            vec![
                "clear 800x600",
                "translate 2.0,1.0",
                "fill -2.0,-1.0 802.0x601.0",
                "reset"
            ]
        );
        anim.render_frame(&mut log);
        assert_eq!(anim.offset(), ScrollOffset { x: 4.0, y: 2.0 });
    }
}
