use super::RenderError;
use super::layout::{CellBox, PT_TO_MM, TableLayout, line_height};
use super::theme::{ReportTheme, RgbColor};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon,
    Rgb,
};

fn color(rgb: RgbColor) -> Color {
    Color::Rgb(Rgb::new(rgb.r, rgb.g, rgb.b, None))
}

/// Corners of a box given in top-left page coordinates, converted to PDF
/// coordinates (origin bottom-left).
fn corners(layout: &TableLayout, x: f32, y: f32, width: f32, height: f32) -> Vec<(Point, bool)> {
    let top = layout.page.height - y;
    let bottom = top - height;
    vec![
        (Point::new(Mm(x), Mm(top)), false),
        (Point::new(Mm(x + width), Mm(top)), false),
        (Point::new(Mm(x + width), Mm(bottom)), false),
        (Point::new(Mm(x), Mm(bottom)), false),
    ]
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn draw_cell(
    layer: &PdfLayerReference,
    layout: &TableLayout,
    theme: &ReportTheme,
    fonts: &Fonts,
    cell: &CellBox,
) {
    if cell.header {
        layer.set_fill_color(color(theme.header_background));
        layer.add_polygon(Polygon {
            rings: vec![corners(layout, cell.x, cell.y, cell.width, cell.height)],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    layer.set_outline_color(color(theme.border));
    layer.set_outline_thickness(theme.border_thickness);
    layer.add_line(Line {
        points: corners(layout, cell.x, cell.y, cell.width, cell.height),
        is_closed: true,
    });

    let text_color = if cell.header {
        theme.header_text
    } else {
        theme.body_text
    };
    layer.set_fill_color(color(text_color));
    let font = if cell.bold { &fonts.bold } else { &fonts.regular };
    let padding_x = theme.cell_padding_x * layout.scale;
    let padding_y = theme.cell_padding_y * layout.scale;
    let step = line_height(cell.font_size, theme);
    let ascent = cell.font_size * PT_TO_MM * 0.8;
    for (index, line) in cell.lines.iter().enumerate() {
        let baseline = cell.y + padding_y + ascent + index as f32 * step;
        layer.use_text(
            line.as_str(),
            cell.font_size,
            Mm(cell.x + padding_x),
            Mm(layout.page.height - baseline),
            font,
        );
    }
}

/// Draws the laid-out table on a single page and returns the document bytes.
pub fn render(layout: &TableLayout, theme: &ReportTheme) -> Result<Vec<u8>, RenderError> {
    let (doc, page, layer) = PdfDocument::new(
        layout.title.as_str(),
        Mm(layout.page.width),
        Mm(layout.page.height),
        "table",
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };
    let layer = doc.get_page(page).get_layer(layer);

    layer.set_fill_color(color(theme.body_text));
    let title_baseline = layout.page.margin + layout.title_size * PT_TO_MM;
    layer.use_text(
        layout.title.as_str(),
        layout.title_size,
        Mm(layout.page.margin),
        Mm(layout.page.height - title_baseline),
        &fonts.bold,
    );

    for cell in &layout.cells {
        draw_cell(&layer, layout, theme, &fonts, cell);
    }

    Ok(doc.save_to_bytes()?)
}
