//! Font fitting against the heuristic measurer and custom measurers.

use fukidashi_core::fit::{
    Extent, FIT_FLOOR, FontFitSizer, HeuristicMeasurer, TextMeasurer, WritingMode, best_fit_size,
};
use fukidashi_core::geometry::Orientation;
use fukidashi_core::layout::{Config, TextOrientation};
use fukidashi_core::types::LineMark;

#[test]
fn test_hi_in_a_100_by_40_box() {
    let config = Config::default();
    let pad = config.bounding_box_adjustment;
    let available = Extent::new(100.0 + pad, 40.0 + pad);
    let mut m = HeuristicMeasurer::default();

    let size = best_fit_size(&mut m, "Hi", available, WritingMode::HorizontalTb, 200);
    assert!(size <= 200);
    assert!(m.measure("Hi", size, WritingMode::HorizontalTb).width <= available.width);
    assert!(m.measure("Hi", size + 1, WritingMode::HorizontalTb).width > available.width);
    assert_eq!(size, 119);
}

#[test]
fn test_sizer_prefers_horizontal_for_a_wide_box() {
    let config = Config::default();
    let mut sizer = FontFitSizer::new(HeuristicMeasurer::default(), &config);
    let fit = sizer.fit("Hi", 100.0, 40.0, LineMark::Plain).unwrap();
    assert_eq!(fit.orientation, Orientation::Horizontal);
    assert_eq!(fit.font_size, 119.0);
    assert_eq!(fit.vertical_fit, 51.0);
}

#[test]
fn test_nothing_fits_returns_floor() {
    let mut m = HeuristicMeasurer::default();
    let size = best_fit_size(
        &mut m,
        "とても長いセリフです",
        Extent::new(3.0, 3.0),
        WritingMode::VerticalRl,
        200,
    );
    assert_eq!(size, FIT_FLOOR);
}

#[test]
fn test_ceiling_is_configurable() {
    let config = Config {
        fit_ceiling: 48,
        ..Config::default()
    };
    let mut sizer = FontFitSizer::new(HeuristicMeasurer::default(), &config);
    let fit = sizer.fit("a", 1000.0, 1000.0, LineMark::Plain).unwrap();
    assert_eq!(fit.font_size, 48.0);
}

#[test]
fn test_measurer_is_probed_for_both_orientations() {
    let mut modes = Vec::new();
    let config = Config {
        text_orientation: TextOrientation::ForceHorizontal,
        ..Config::default()
    };
    {
        let probe = |text: &str, size: u32, mode: WritingMode| {
            modes.push(mode);
            let n = text.chars().count() as f64 * size as f64;
            match mode {
                WritingMode::HorizontalTb => Extent::new(n, size as f64),
                WritingMode::VerticalRl => Extent::new(size as f64, n),
            }
        };
        let mut sizer = FontFitSizer::new(probe, &config);
        let fit = sizer.fit("ab", 60.0, 60.0, LineMark::Plain).unwrap();
        assert_eq!(fit.orientation, Orientation::Horizontal);
        assert_eq!(fit.horizontal_fit, 32.0);
    }
    assert!(modes.contains(&WritingMode::HorizontalTb));
    assert!(modes.contains(&WritingMode::VerticalRl));
}

#[test]
fn test_merged_text_is_measured_line_by_line() {
    let config = Config {
        bounding_box_adjustment: 0.0,
        ..Config::default()
    };
    let mut sizer = FontFitSizer::new(HeuristicMeasurer::default(), &config);
    let single = sizer.fit("ああああ", 200.0, 200.0, LineMark::Plain).unwrap();
    let merged = sizer
        .fit(
            "ああ\nああ",
            200.0,
            200.0,
            LineMark::MergedAnchor(Orientation::Horizontal),
        )
        .unwrap();
    // Two short lines fit larger than one long one, less the merged shrink.
    assert_eq!(single.horizontal_fit, 50.0);
    assert_eq!(merged.horizontal_fit, 100.0 * 0.8);
}
