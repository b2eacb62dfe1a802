//! PDF Renderer
//!
//! Draws a laid-out `LabelDocument` with the standard Helvetica fonts.
//! Coordinates in the document are PDF points from the bottom-left corner.

use anyhow::{Context, Result};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};

use crate::domain::services::label_layout::{
    LabelDocument, LabelLayoutConfig, LabelPage, PriceCell, HEADER_LABELS,
};

const DOCUMENT_TITLE: &str = "Price Labels";
const LAYER_NAME: &str = "Labels";

/// Convert PDF points to millimetres
pub fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn red() -> Color {
    Color::Rgb(Rgb::new(1.0, 0.0, 0.0, None))
}

/// Fill colour for a NEW PRICE cell: red for attention, black otherwise
fn cell_fill(cell: &PriceCell) -> Color {
    match cell {
        PriceCell::Attention(_) => red(),
        PriceCell::Normal(_) | PriceCell::Placeholder => black(),
    }
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Render the document to PDF bytes
///
/// The printpdf document is not `Send`, so callers on the async runtime should
/// run this inside `spawn_blocking`.
pub fn render(document: &LabelDocument) -> Result<Vec<u8>> {
    let config = &document.config;
    let (doc, first_page, first_layer) = PdfDocument::new(
        DOCUMENT_TITLE,
        pt_to_mm(config.page_width),
        pt_to_mm(config.page_height),
        LAYER_NAME,
    );

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .context("Failed to load Helvetica")?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .context("Failed to load Helvetica-Bold")?,
    };

    for (i, page) in document.pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(
                pt_to_mm(config.page_width),
                pt_to_mm(config.page_height),
                LAYER_NAME,
            )
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        draw_page(&layer, config, page, &fonts);
    }

    doc.save_to_bytes().context("Failed to serialize PDF")
}

fn draw_page(
    layer: &PdfLayerReference,
    config: &LabelLayoutConfig,
    page: &LabelPage,
    fonts: &Fonts,
) {
    layer.set_fill_color(black());
    for (label, x) in HEADER_LABELS.iter().zip(config.column_x) {
        layer.use_text(
            *label,
            config.header_font_size,
            pt_to_mm(x),
            pt_to_mm(page.header_y),
            &fonts.bold,
        );
    }

    layer.set_outline_color(black());
    layer.add_line(Line {
        points: vec![
            (Point::new(pt_to_mm(config.rule_x.0), pt_to_mm(page.rule_y)), false),
            (Point::new(pt_to_mm(config.rule_x.1), pt_to_mm(page.rule_y)), false),
        ],
        is_closed: false,
    });

    let [sku_x, name_x, current_x, new_x] = config.column_x;
    for line in &page.lines {
        let y = pt_to_mm(line.y);
        let size = config.body_font_size;
        layer.use_text(line.sku.as_str(), size, pt_to_mm(sku_x), y, &fonts.regular);
        layer.use_text(
            line.product_name.as_str(),
            size,
            pt_to_mm(name_x),
            y,
            &fonts.regular,
        );
        layer.use_text(
            line.current_price.as_str(),
            size,
            pt_to_mm(current_x),
            y,
            &fonts.regular,
        );

        layer.set_fill_color(cell_fill(&line.new_price));
        layer.use_text(line.new_price.text(), size, pt_to_mm(new_x), y, &fonts.regular);
        layer.set_fill_color(black());
    }
}
