/// RGB components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RgbColor {
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }
}

/// Print styling, independent of anything shown on screen. Sizes are in
/// points for fonts and millimetres otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTheme {
    pub header_background: RgbColor,
    pub header_text: RgbColor,
    pub body_text: RgbColor,
    pub border: RgbColor,
    pub border_thickness: f32,
    pub title_size: f32,
    pub header_font_size: f32,
    pub body_font_size: f32,
    pub line_spacing: f32,
    pub cell_padding_x: f32,
    pub cell_padding_y: f32,
    pub remarks_min_width: f32,
    /// Vertical room reserved above the table for the title.
    pub title_block: f32,
}

impl Default for ReportTheme {
    fn default() -> Self {
        Self {
            header_background: RgbColor::from_hex(0x4a90e2),
            header_text: RgbColor::from_hex(0xffffff),
            body_text: RgbColor::from_hex(0x333333),
            border: RgbColor::from_hex(0xdddddd),
            border_thickness: 0.5,
            title_size: 14.0,
            header_font_size: 10.0,
            body_font_size: 9.0,
            line_spacing: 1.3,
            cell_padding_x: 2.0,
            cell_padding_y: 1.5,
            remarks_min_width: 45.0,
            title_block: 12.0,
        }
    }
}
