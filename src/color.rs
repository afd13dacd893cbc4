use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: column name → Color32
// ---------------------------------------------------------------------------

/// Maps selected column names to distinct colours, assigned in selection
/// order so a column keeps one colour across the line, bar, and pie charts.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map for the given columns, in order.
    pub fn new(columns: &[String]) -> Self {
        let palette = generate_palette(columns.len());
        let mapping = columns
            .iter()
            .cloned()
            .zip(palette.into_iter())
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a column; grey for columns never assigned.
    pub fn color_for(&self, column: &str) -> Color32 {
        self.mapping.get(column).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_sizes() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(5).len(), 5);
    }

    #[test]
    fn distinct_colors_per_column() {
        let cols = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let cm = ColorMap::new(&cols);
        assert_ne!(cm.color_for("A"), cm.color_for("B"));
        assert_ne!(cm.color_for("B"), cm.color_for("C"));
        assert_eq!(cm.color_for("unknown"), Color32::GRAY);
    }
}
