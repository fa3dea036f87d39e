//! Display formatting for byte counts, link state and status bars

use crate::classifier::classify;
use crate::constants::{BAR_EMPTY, BAR_FILLED, BYTES_PER_GB};
use gpuwatch_types::{MetricThresholds, StyledText};

/// Bytes as GiB with one fractional digit, no unit suffix.
///
/// Rounding is done by the float formatter (correctly rounded, ties to even on
/// the exact binary value).
pub fn format_bytes_as_gb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / BYTES_PER_GB)
}

/// "Gen {generation} x{width}"
pub fn format_pcie(generation: u32, width: u32) -> String {
    format!("Gen {} x{}", generation, width)
}

/// "65°C"
pub fn format_temperature(celsius: u32) -> String {
    format!("{}°C", celsius)
}

/// "250.0W"
pub fn format_power(watts: f64) -> String {
    format!("{:.1}W", watts)
}

/// "5.0/24.0 GB"
pub fn format_memory_pair(used: u64, total: u64) -> String {
    format!("{}/{} GB", format_bytes_as_gb(used), format_bytes_as_gb(total))
}

/// Clamp into [0, 100]; NaN is treated as 0
fn clamp_percentage(percentage: f64) -> f64 {
    if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    }
}

/// Round to one decimal place
fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Render a colored status bar followed by the percentage.
///
/// Out-of-range input is clamped rather than rejected. The bar glyphs carry
/// the accent of the rounded percentage under `thresholds`; the percentage
/// itself is plain text right-aligned in a 5-character field.
pub fn render_bar(percentage: f64, width: usize, thresholds: &MetricThresholds) -> StyledText {
    let percentage = round_tenths(clamp_percentage(percentage));
    let filled = ((percentage * width as f64 / 100.0).floor() as usize).min(width);
    let accent = classify(percentage, thresholds).accent();

    let mut bar = String::with_capacity(width * BAR_FILLED.len_utf8());
    bar.extend(std::iter::repeat(BAR_FILLED).take(filled));
    bar.extend(std::iter::repeat(BAR_EMPTY).take(width - filled));

    let mut text = StyledText::accented(bar, accent);
    text.push_plain(format!(" {:>5.1}%", percentage));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_BAR_WIDTH;
    use gpuwatch_types::Accent;

    const GIB: u64 = 1 << 30;
    const PCT: MetricThresholds = MetricThresholds::PERCENTAGE;

    fn bar_glyphs(text: &StyledText) -> (usize, usize) {
        let bar = &text.segments()[0].text;
        (
            bar.chars().filter(|c| *c == BAR_FILLED).count(),
            bar.chars().filter(|c| *c == BAR_EMPTY).count(),
        )
    }

    #[test]
    fn test_format_bytes_as_gb() {
        assert_eq!(format_bytes_as_gb(GIB), "1.0");
        assert_eq!(format_bytes_as_gb(GIB + GIB / 2), "1.5");
        assert_eq!(format_bytes_as_gb(GIB / 2), "0.5");
        assert_eq!(format_bytes_as_gb(0), "0.0");
        assert_eq!(format_bytes_as_gb(24 * GIB), "24.0");
    }

    #[test]
    fn test_format_pcie() {
        assert_eq!(format_pcie(4, 16), "Gen 4 x16");
        assert_eq!(format_pcie(3, 8), "Gen 3 x8");
    }

    #[test]
    fn test_small_formatters() {
        assert_eq!(format_temperature(65), "65°C");
        assert_eq!(format_power(250.0), "250.0W");
        assert_eq!(format_power(87.456), "87.5W");
        assert_eq!(format_memory_pair(5 * GIB, 24 * GIB), "5.0/24.0 GB");
    }

    #[test]
    fn test_render_bar_empty() {
        let bar = render_bar(0.0, 5, &PCT);
        assert_eq!(bar_glyphs(&bar), (0, 5));
        assert_eq!(bar.accents(), vec![Accent::Cold]);
        assert_eq!(bar.plain_text(), "░░░░░   0.0%");
    }

    #[test]
    fn test_render_bar_half() {
        let bar = render_bar(50.0, 5, &PCT);
        assert_eq!(bar_glyphs(&bar), (2, 3));
        assert_eq!(bar.accents(), vec![Accent::Ok]);
        assert_eq!(bar.plain_text(), "██░░░  50.0%");
    }

    #[test]
    fn test_render_bar_full() {
        let bar = render_bar(100.0, 5, &PCT);
        assert_eq!(bar_glyphs(&bar), (5, 0));
        assert_eq!(bar.accents(), vec![Accent::Danger]);
        assert_eq!(bar.plain_text(), "█████ 100.0%");
    }

    #[test]
    fn test_render_bar_clamps_out_of_range() {
        assert_eq!(render_bar(-12.0, 5, &PCT), render_bar(0.0, 5, &PCT));
        assert_eq!(render_bar(140.0, 5, &PCT), render_bar(100.0, 5, &PCT));
        assert_eq!(render_bar(f64::NAN, 5, &PCT), render_bar(0.0, 5, &PCT));
    }

    #[test]
    fn test_render_bar_rounds_before_classifying() {
        // 89.96 rounds to 90.0, which is already critical
        let bar = render_bar(89.96, DEFAULT_BAR_WIDTH, &PCT);
        assert_eq!(bar.accents(), vec![Accent::Danger]);
        assert!(bar.plain_text().ends_with(" 90.0%"));
        assert_eq!(bar_glyphs(&bar), (13, 2));
    }

    #[test]
    fn test_render_bar_default_width() {
        let bar = render_bar(20.833, DEFAULT_BAR_WIDTH, &PCT);
        assert_eq!(bar_glyphs(&bar), (3, 12));
        assert!(bar.plain_text().ends_with(" 20.8%"));
    }

    #[test]
    fn test_formatters_are_idempotent() {
        assert_eq!(render_bar(42.0, 15, &PCT), render_bar(42.0, 15, &PCT));
        assert_eq!(format_bytes_as_gb(3 * GIB), format_bytes_as_gb(3 * GIB));
    }
}
