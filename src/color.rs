use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

use crate::data::model::MainComponent;

// ---------------------------------------------------------------------------
// Fixed colours
// ---------------------------------------------------------------------------

pub const BLACK: Srgb<u8> = Srgb::new(0, 0, 0);
pub const WHITE: Srgb<u8> = Srgb::new(255, 255, 255);
pub const GRID: Srgb<u8> = Srgb::new(0xb0, 0xb0, 0xb0);

pub const CONE_RESISTANCE: Srgb<u8> = Srgb::new(0x2d, 0x2e, 0x87);
pub const LOCAL_FRICTION: Srgb<u8> = Srgb::new(0xe0, 0x49, 0x13);

pub const TAB_BLUE: Srgb<u8> = Srgb::new(0x1f, 0x77, 0xb4);
pub const TAB_BROWN: Srgb<u8> = Srgb::new(0x8c, 0x56, 0x4b);
pub const TAB_GRAY: Srgb<u8> = Srgb::new(0x7f, 0x7f, 0x7f);

const NAMED: [(&str, Srgb<u8>); 8] = [
    ("black", BLACK),
    ("white", WHITE),
    ("gray", TAB_GRAY),
    ("grey", TAB_GRAY),
    ("tab:blue", TAB_BLUE),
    ("tab:brown", TAB_BROWN),
    ("tab:gray", TAB_GRAY),
    ("tab:grey", TAB_GRAY),
];

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a hex code (`#2d2e87`, `2d2e87`, `#abc`) or one of the named colours.
pub fn parse_color(spec: &str) -> Option<Srgb<u8>> {
    let spec = spec.trim();
    NAMED
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(spec))
        .map(|(_, color)| *color)
        .or_else(|| spec.parse::<Srgb<u8>>().ok())
}

pub(crate) fn to_rgb(color: Srgb<u8>) -> RGBColor {
    RGBColor(color.red, color.green, color.blue)
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Layer colours: API hex code, or a per-component fallback
// ---------------------------------------------------------------------------

/// Resolves the display colour of a soil layer.
#[derive(Debug, Clone)]
pub struct LayerColors {
    fallback: BTreeMap<MainComponent, Srgb<u8>>,
}

impl Default for LayerColors {
    fn default() -> Self {
        let fallback = MainComponent::ALL
            .into_iter()
            .zip(generate_palette(MainComponent::ALL.len()))
            .collect();
        Self { fallback }
    }
}

impl LayerColors {
    /// The layer's own colour when it parses, else the component's palette colour.
    pub fn color_for(&self, spec: &str, component: MainComponent) -> Srgb<u8> {
        if let Some(color) = parse_color(spec) {
            return color;
        }
        log::warn!("Unreadable layer colour '{spec}', using the {component} fallback");
        self.fallback.get(&component).copied().unwrap_or(TAB_GRAY)
    }
}
