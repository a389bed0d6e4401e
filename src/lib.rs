use eframe::egui::Color32;
use lazy_static::lazy_static;
use std::collections::HashMap;

pub mod about;
pub mod app;
pub mod chromosome;
pub mod engine;
pub mod gene_fetch;
pub mod gene_index;
pub mod inspector;
pub mod interaction;
pub mod ticks;
pub mod track_detail;
pub mod track_overview;
pub mod viewport;
pub mod zoom;

lazy_static! {
    // Stable per-gene colours, assigned by collection index, not draw order.
    pub static ref GENE_PALETTE: Vec<Color32> = vec![
        Color32::from_rgb(0x1f, 0x77, 0xb4),
        Color32::from_rgb(0xff, 0x7f, 0x0e),
        Color32::from_rgb(0x2c, 0xa0, 0x2c),
        Color32::from_rgb(0xd6, 0x27, 0x28),
        Color32::from_rgb(0x94, 0x67, 0xbd),
        Color32::from_rgb(0x8c, 0x56, 0x4b),
        Color32::from_rgb(0xe3, 0x77, 0xc2),
        Color32::from_rgb(0x7f, 0x7f, 0x7f),
        Color32::from_rgb(0xbc, 0xbd, 0x22),
        Color32::from_rgb(0x17, 0xbe, 0xcf),
    ];

    // Per-base letter colours for the deep-zoom sequence row.
    pub static ref BASE_COLORS: HashMap<char, Color32> = HashMap::from([
        ('A', Color32::from_rgb(0x2c, 0xa0, 0x2c)),
        ('C', Color32::from_rgb(0x1f, 0x77, 0xb4)),
        ('G', Color32::from_rgb(0xe6, 0x9f, 0x00)),
        ('T', Color32::from_rgb(0xd6, 0x27, 0x28)),
    ]);
}

/// Colour for one base letter; symbols outside the four recognized bases
/// (N runs, IUPAC ambiguity codes) fall back to a neutral default.
pub fn base_color(base: char) -> Color32 {
    BASE_COLORS
        .get(&base.to_ascii_uppercase())
        .copied()
        .unwrap_or(Color32::from_rgb(0x6e, 0x6e, 0x6e))
}
