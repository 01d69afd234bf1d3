use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::{FieldValue, KnowledgeArea};

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
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Fixed colour per knowledge area, shared by every chart.
pub fn area_color(area: KnowledgeArea) -> Color32 {
    generate_palette(KnowledgeArea::ALL.len())[area.index()]
}

/// Series colour for the internet-access split.
pub fn internet_color(has_internet: bool) -> Color32 {
    if has_internet {
        Color32::from_rgb(60, 170, 90)
    } else {
        Color32::from_rgb(215, 70, 60)
    }
}

/// Blue → white → red ramp for proportions in `[0, 1]` (crosstab cells).
pub fn diverging(t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    let blue = Srgb::new(0.02_f32, 0.19, 0.38).into_linear::<f32>();
    let white = Srgb::new(0.97_f32, 0.97, 0.97).into_linear::<f32>();
    let red = Srgb::new(0.40_f32, 0.0, 0.12).into_linear::<f32>();
    let mixed: LinSrgb = if t < 0.5 {
        blue.mix(white, t * 2.0)
    } else {
        white.mix(red, (t - 0.5) * 2.0)
    };
    to_color32(Srgb::from_linear(mixed))
}

// ---------------------------------------------------------------------------
// Color mapping: group key → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a grouping attribute to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<FieldValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the group keys, in order.
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a FieldValue>) -> Self {
        let keys: Vec<&FieldValue> = keys.into_iter().collect();
        let palette = generate_palette(keys.len());
        let mapping = keys
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given key.
    pub fn color_for(&self, value: &FieldValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
