use deltacon::rendering::cell::Cell;
use deltacon::rendering::color::{
    RgbColor, Rgba64, ToneMapping, alpha_blend, hsv_to_rgb, rgb_to_hsv,
};
use deltacon::rendering::differ::FrameDiffer;
use deltacon::rendering::geometry::{Point, Rect};
use deltacon::rendering::grid::Grid;
use proptest::prelude::*;
use std::collections::BTreeMap;

const EPSILON: f64 = 1e-9;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn hue_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    d.min(1.0 - d)
}

fn rgba64() -> impl Strategy<Value = Rgba64> {
    (any::<u16>(), any::<u16>(), any::<u16>(), any::<u16>())
        .prop_map(|(r, g, b, a)| Rgba64::new(r, g, b, a))
}

/// A grid size and a list of writes into it. Glyphs are never the blank of a fresh grid.
fn grid_writes() -> impl Strategy<Value = (usize, usize, Vec<(usize, usize, char)>)> {
    (1usize..12, 1usize..12).prop_flat_map(|(width, height)| {
        let write = (0..width, 0..height, prop::char::range('a', 'z'));
        (
            Just(width),
            Just(height),
            prop::collection::vec(write, 0..40),
        )
    })
}

fn primed(width: usize, height: usize) -> (Grid, FrameDiffer) {
    let mut grid = Grid::new(width, height);
    let mut differ = FrameDiffer::new();
    differ.diff(&mut grid);
    (grid, differ)
}

proptest! {
    #[test]
    fn rgb_hsv_rgb_round_trip(r in 0.0..=1.0f64, g in 0.0..=1.0f64, b in 0.0..=1.0f64) {
        let (h, s, v) = rgb_to_hsv(r, g, b);
        prop_assert!((0.0..1.0).contains(&h));
        let (r2, g2, b2) = hsv_to_rgb(h, s, v);
        prop_assert!((r - r2).abs() < EPSILON, "r: {r} vs {r2}");
        prop_assert!((g - g2).abs() < EPSILON, "g: {g} vs {g2}");
        prop_assert!((b - b2).abs() < EPSILON, "b: {b} vs {b2}");
    }

    #[test]
    fn hsv_rgb_hsv_round_trip(h in 0.0..1.0f64, s in 0.01..=1.0f64, v in 0.01..=1.0f64) {
        let (r, g, b) = hsv_to_rgb(h, s, v);
        let (h2, s2, v2) = rgb_to_hsv(r, g, b);
        prop_assert!(hue_distance(h, h2) < 1e-6, "h: {h} vs {h2}");
        prop_assert!((s - s2).abs() < 1e-6, "s: {s} vs {s2}");
        prop_assert!((v - v2).abs() < EPSILON, "v: {v} vs {v2}");
    }

    #[test]
    fn exposure_is_monotonic(
        r in 0.0..50.0f64,
        g in 0.0..50.0f64,
        b in 0.0..50.0f64,
        delta in 0.0..50.0f64,
    ) {
        let base = RgbColor::new(r, g, b).tone_map(ToneMapping::Exposure);
        let brighter_r = RgbColor::new(r + delta, g, b).tone_map(ToneMapping::Exposure);
        let brighter_g = RgbColor::new(r, g + delta, b).tone_map(ToneMapping::Exposure);
        let brighter_b = RgbColor::new(r, g, b + delta).tone_map(ToneMapping::Exposure);
        prop_assert!(brighter_r.r >= base.r);
        prop_assert!(brighter_g.g >= base.g);
        prop_assert!(brighter_b.b >= base.b);
        prop_assert!(base.is_opaque());
    }

    #[test]
    fn opaque_over_anything_is_unchanged(new in rgba64(), background in rgba64()) {
        let new = new.with_alpha(u16::MAX);
        prop_assert_eq!(alpha_blend(new, background), new);
    }

    #[test]
    fn transparent_over_anything_is_background(new in rgba64(), background in rgba64()) {
        let new = new.with_alpha(0);
        prop_assert_eq!(alpha_blend(new, background), background);
    }

    #[test]
    fn diff_emits_exactly_the_changed_cells((width, height, writes) in grid_writes()) {
        init_logger();
        let (mut grid, mut differ) = primed(width, height);

        let mut expected = BTreeMap::new();
        for &(x, y, glyph) in &writes {
            grid.set(Point::new(x, y), Cell::new(glyph));
            // keyed row-major, last write wins
            expected.insert((y, x), glyph);
        }

        let frame: Vec<(Point, char)> = differ
            .diff(&mut grid)
            .iter()
            .map(|fc| (fc.position, fc.cell.glyph))
            .collect();
        let expected: Vec<(Point, char)> = expected
            .into_iter()
            .map(|((y, x), glyph)| (Point::new(x, y), glyph))
            .collect();
        prop_assert_eq!(frame, expected);
    }

    #[test]
    fn diff_stays_inside_written_area(
        (width, height, writes) in grid_writes(),
        blank_every in 1usize..4,
    ) {
        let (mut grid, mut differ) = primed(width, height);
        let mut written = Rect::default();
        for (i, &(x, y, glyph)) in writes.iter().enumerate() {
            // some writes repeat what is already there
            let cell = if i % blank_every == 0 { Cell::default() } else { Cell::new(glyph) };
            grid.set(Point::new(x, y), cell);
            written = written.union(Rect::from_point(Point::new(x, y)));
        }
        for fc in differ.diff(&mut grid) {
            prop_assert!(written.contains(fc.position), "{} outside {}", fc.position, written);
        }
    }

    #[test]
    fn second_diff_is_empty((width, height, writes) in grid_writes()) {
        let (mut grid, mut differ) = primed(width, height);
        for &(x, y, glyph) in &writes {
            grid.set(Point::new(x, y), Cell::new(glyph));
        }
        differ.diff(&mut grid);
        prop_assert!(differ.diff(&mut grid).is_empty());
    }

    #[test]
    fn full_refresh_emits_every_cell((width, height, writes) in grid_writes()) {
        let (mut grid, mut differ) = primed(width, height);
        for &(x, y, glyph) in &writes {
            grid.set(Point::new(x, y), Cell::new(glyph));
        }
        differ.invalidate();
        prop_assert_eq!(differ.diff(&mut grid).len(), width * height);
    }

    #[test]
    fn identical_overwrite_is_silent((width, height, writes) in grid_writes()) {
        let mut grid = Grid::new(width, height);
        for &(x, y, glyph) in &writes {
            grid.set(Point::new(x, y), Cell::new(glyph));
        }
        let mut differ = FrameDiffer::new();
        differ.diff(&mut grid);

        for &(x, y, _) in &writes {
            let p = Point::new(x, y);
            let current = grid.at(p);
            grid.set(p, current);
        }
        prop_assert!(differ.diff(&mut grid).is_empty());
    }
}
