use super::theme::ReportTheme;
use super::{COLUMN_COUNT, REMARKS_COLUMN, RenderError, ReportTable};

pub const PT_TO_MM: f32 = 0.352_778;

/// Page size and margins, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// A4 landscape with 10 mm margins.
    pub const A4_LANDSCAPE: PageGeometry = PageGeometry {
        width: 297.0,
        height: 210.0,
        margin: 10.0,
    };

    pub fn printable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn printable_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }
}

/// One positioned table cell. `x`/`y` are the top-left corner measured from
/// the page's top-left, in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct CellBox {
    pub row: usize,
    pub column: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub lines: Vec<String>,
    pub font_size: f32,
    pub bold: bool,
    pub header: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub page: PageGeometry,
    pub title: String,
    pub title_size: f32,
    /// Uniform factor applied to the theme's sizes (1.0 = unscaled).
    pub scale: f32,
    pub column_widths: [f32; COLUMN_COUNT],
    pub row_heights: Vec<f32>,
    pub cells: Vec<CellBox>,
}

impl TableLayout {
    pub fn table_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    pub fn table_height(&self) -> f32 {
        self.row_heights.iter().sum()
    }

    /// Body rows only (the header row is excluded).
    pub fn body_rows(&self) -> usize {
        self.row_heights.len().saturating_sub(1)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellBox> {
        self.cells
            .iter()
            .find(|cell| cell.row == row && cell.column == column)
    }
}

/// Approximate Helvetica advance widths, in thousandths of an em.
fn glyph_units(ch: char) -> u32 {
    match ch {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '!' | '|' | '\'' => 222,
        ' ' => 278,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '/' | '-' => 333,
        'm' | 'M' => 833,
        'W' => 944,
        'w' => 722,
        '0'..='9' => 556,
        c if c.is_uppercase() => 667,
        _ => 556,
    }
}

/// Rendered width of `text` in millimetres.
pub fn text_width(text: &str, font_size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(glyph_units).sum();
    let factor = if bold { 1.05 } else { 1.0 };
    units as f32 / 1000.0 * font_size * PT_TO_MM * factor
}

/// Greedy word wrap; words wider than the line are split by characters.
pub fn wrap_text(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if text_width(&candidate, font_size, false) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width(word, font_size, false) <= max_width {
                current = word.to_string();
                continue;
            }
            for ch in word.chars() {
                current.push(ch);
                if text_width(&current, font_size, false) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::replace(&mut current, ch.to_string()));
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Positions the table on the page.
///
/// Non-remarks columns keep their single-line natural width; when that is
/// wider than the printable area every size shrinks by the same factor.
/// The remarks column absorbs the remaining width and wraps. A table taller
/// than the printable area is then shrunk uniformly to fit both dimensions.
pub fn layout(
    table: &ReportTable,
    theme: &ReportTheme,
    page: PageGeometry,
) -> Result<TableLayout, RenderError> {
    let available_width = page.printable_width();
    let available_height = page.printable_height() - theme.title_block;
    if !(available_width > 0.0 && available_height > 0.0) {
        return Err(RenderError::Layout(format!(
            "page {}x{} mm leaves no room for the table",
            page.width, page.height
        )));
    }

    let natural = natural_widths(table, theme);
    let required: f32 = natural
        .iter()
        .enumerate()
        .map(|(column, width)| {
            if column == REMARKS_COLUMN {
                theme.remarks_min_width
            } else {
                *width
            }
        })
        .sum();
    let width_scale = (available_width / required).min(1.0);

    let mut sized = size_rows(table, theme, &natural, width_scale, available_width);
    let height = sized.row_heights.iter().sum::<f32>();
    if height > available_height {
        let height_scale = available_height / height;
        let scale = width_scale * height_scale;
        let scaled_width = available_width * height_scale;
        sized = size_rows(table, theme, &natural, scale, scaled_width);
    }

    if !sized.scale.is_finite() || sized.scale <= 0.0 {
        return Err(RenderError::Layout(format!(
            "invalid scale factor {}",
            sized.scale
        )));
    }

    let cells = place_cells(table, theme, &sized, page);
    Ok(TableLayout {
        page,
        title: table.title.clone(),
        title_size: theme.title_size,
        scale: sized.scale,
        column_widths: sized.column_widths,
        row_heights: sized.row_heights,
        cells,
    })
}

struct SizedRows {
    scale: f32,
    column_widths: [f32; COLUMN_COUNT],
    row_heights: Vec<f32>,
    /// Lines per (row, column); row 0 is the header.
    lines: Vec<[Vec<String>; COLUMN_COUNT]>,
}

fn natural_widths(table: &ReportTable, theme: &ReportTheme) -> [f32; COLUMN_COUNT] {
    let mut widths = [0.0_f32; COLUMN_COUNT];
    for (column, header) in table.headers.iter().enumerate() {
        widths[column] = text_width(header, theme.header_font_size, true);
    }
    for row in &table.rows {
        for (column, lines) in row.cells.iter().enumerate() {
            if column == REMARKS_COLUMN {
                continue;
            }
            let bold = column == 0;
            for line in lines {
                widths[column] = widths[column].max(text_width(line, theme.body_font_size, bold));
            }
        }
    }
    widths.map(|width| width + 2.0 * theme.cell_padding_x)
}

fn size_rows(
    table: &ReportTable,
    theme: &ReportTheme,
    natural: &[f32; COLUMN_COUNT],
    scale: f32,
    table_width: f32,
) -> SizedRows {
    let mut column_widths = natural.map(|width| width * scale);
    let fixed: f32 = column_widths
        .iter()
        .enumerate()
        .filter(|(column, _)| *column != REMARKS_COLUMN)
        .map(|(_, width)| *width)
        .sum();
    column_widths[REMARKS_COLUMN] = (table_width - fixed).max(theme.remarks_min_width * scale);

    let body_size = theme.body_font_size * scale;
    let header_size = theme.header_font_size * scale;
    let padding_y = theme.cell_padding_y * scale;
    let remarks_text_width = column_widths[REMARKS_COLUMN] - 2.0 * theme.cell_padding_x * scale;

    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    let mut row_heights = Vec::with_capacity(table.rows.len() + 1);

    let header_lines: [Vec<String>; COLUMN_COUNT] =
        std::array::from_fn(|column| vec![table.headers[column].to_string()]);
    row_heights.push(line_height(header_size, theme) + 2.0 * padding_y);
    lines.push(header_lines);

    for row in &table.rows {
        let cells: [Vec<String>; COLUMN_COUNT] = std::array::from_fn(|column| {
            if column == REMARKS_COLUMN {
                row.cells[column]
                    .iter()
                    .flat_map(|text| wrap_text(text, remarks_text_width, body_size))
                    .collect()
            } else {
                row.cells[column].clone()
            }
        });
        let line_count = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
        row_heights.push(line_count as f32 * line_height(body_size, theme) + 2.0 * padding_y);
        lines.push(cells);
    }

    SizedRows {
        scale,
        column_widths,
        row_heights,
        lines,
    }
}

pub(crate) fn line_height(font_size: f32, theme: &ReportTheme) -> f32 {
    font_size * PT_TO_MM * theme.line_spacing
}

fn place_cells(
    table: &ReportTable,
    theme: &ReportTheme,
    sized: &SizedRows,
    page: PageGeometry,
) -> Vec<CellBox> {
    let mut cells = Vec::with_capacity(sized.lines.len() * COLUMN_COUNT);
    let mut y = page.margin + theme.title_block;
    for (row, (row_lines, height)) in sized.lines.iter().zip(&sized.row_heights).enumerate() {
        let header = row == 0;
        let font_size = if header {
            theme.header_font_size
        } else {
            theme.body_font_size
        } * sized.scale;
        let mut x = page.margin;
        for (column, width) in sized.column_widths.iter().enumerate() {
            cells.push(CellBox {
                row,
                column,
                x,
                y,
                width: *width,
                height: *height,
                lines: row_lines[column].clone(),
                font_size,
                bold: header || column == 0,
                header,
            });
            x += width;
        }
        y += height;
    }
    debug_assert_eq!(cells.len(), (table.rows.len() + 1) * COLUMN_COUNT);
    cells
}
