//! Table rasterisation: [`ParsedTable`] → PNG.
//!
//! ## Layout
//!
//! Column widths use a fixed monospace metric: every character counts as the
//! widest printable-ASCII advance of the embedded fonts. Real glyphs are
//! narrower, so text never spills into the next column, and the layout of a
//! table depends only on its character counts.
//!
//! ```text
//!  margin
//!  ┏━━━━━━━━━━┯━━━━━━━━━━━━┓  ← border_width
//!  ┃  Header  │  Header    ┃  ← header_height (row_height + header_extra_height)
//!  ┠──────────┼────────────┨  ← grid_width
//!  ┃  cell    │  cell      ┃  ← row_height
//!  ┗━━━━━━━━━━┷━━━━━━━━━━━━┛
//! ```
//!
//! ## Determinism
//!
//! Fonts are compiled into the binary (`notosans`), ab_glyph rasterisation is
//! pure, and the PNG encoder has no timestamps, so equal inputs produce
//! byte-identical images.

use crate::config::{RenderStyle, Rgb};
use crate::error::RenderError;
use crate::output::ImageFormat;
use crate::pipeline::encode;
use crate::pipeline::parse::{Alignment, ParsedTable};
use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::RgbImage;
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use tracing::debug;

/// Largest allowed canvas edge in pixels.
pub const MAX_CANVAS_DIM: u64 = 16_384;

/// Every table rendered with the default style encodes to more bytes than
/// this, down to a one-character header with no body rows.
pub const MIN_ARTIFACT_BYTES: usize = 500;

/// Encoded image plus its pixel size.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Turns a parsed table into encoded image bytes.
///
/// The orchestrator depends on this trait rather than on [`PngRenderer`]
/// directly, so tests and embedders can substitute their own rasteriser.
pub trait Renderer {
    fn render(&self, table: &ParsedTable) -> Result<RenderedImage, RenderError>;

    /// Format of the bytes returned by [`Renderer::render`].
    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }
}

/// The default renderer: draws with [`RenderStyle`] and encodes PNG.
#[derive(Debug, Clone, Default)]
pub struct PngRenderer {
    pub style: RenderStyle,
}

impl PngRenderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }
}

impl Renderer for PngRenderer {
    fn render(&self, table: &ParsedTable) -> Result<RenderedImage, RenderError> {
        render(table, &self.style)
    }
}

/// Regular and bold faces used for body and header text.
struct Fonts {
    regular: FontRef<'static>,
    bold: FontRef<'static>,
}

impl Fonts {
    fn load() -> Result<Self, RenderError> {
        let regular = FontRef::try_from_slice(notosans::REGULAR_TTF)
            .map_err(|e| RenderError::Font(format!("Noto Sans Regular: {e}")))?;
        let bold = FontRef::try_from_slice(notosans::BOLD_TTF)
            .map_err(|e| RenderError::Font(format!("Noto Sans Bold: {e}")))?;
        Ok(Self { regular, bold })
    }

    /// Monospace advance and line height covering both faces.
    fn metrics(&self, scale: PxScale) -> FontMetrics {
        let mut advance = 0f32;
        let mut line_height = 0f32;
        for font in [&self.regular, &self.bold] {
            let scaled = font.as_scaled(scale);
            for c in ' '..='~' {
                advance = advance.max(scaled.h_advance(scaled.glyph_id(c)));
            }
            line_height = line_height.max(scaled.ascent() - scaled.descent());
        }
        FontMetrics {
            advance: (advance.ceil() as u32).max(1),
            line_height: (line_height.ceil() as u32).max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    /// Width of one character in the monospace metric.
    pub advance: u32,
    pub line_height: u32,
}

/// Pixel geometry of a table image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    pub column_widths: Vec<u32>,
    pub row_height: u32,
    pub header_height: u32,
    pub rows: usize,
    pub width: u32,
    pub height: u32,
    /// Left edge of the table interior (inside the border).
    pub origin_x: u32,
    /// Top edge of the table interior (inside the border).
    pub origin_y: u32,
    grid: u32,
}

impl TableLayout {
    /// Compute the layout of `table` for the given style and font metrics.
    pub fn compute(
        table: &ParsedTable,
        style: &RenderStyle,
        metrics: FontMetrics,
    ) -> Result<Self, RenderError> {
        let columns = table.column_count();
        let rows = table.row_count();
        let grid = u64::from(style.grid_width);

        let column_widths: Vec<u64> = (0..columns)
            .map(|col| {
                let chars = table
                    .column(col)
                    .map(|cell| cell.chars().count() as u64)
                    .max()
                    .unwrap_or(0)
                    .max(1);
                chars * u64::from(metrics.advance) + 2 * u64::from(style.padding_x)
            })
            .collect();

        let row_height = u64::from(metrics.line_height) + 2 * u64::from(style.padding_y);
        let header_height = row_height + u64::from(style.header_extra_height);

        let frame = 2 * u64::from(style.margin) + 2 * u64::from(style.border_width);
        let width = frame
            .saturating_add(column_widths.iter().fold(0u64, |acc, &w| acc.saturating_add(w)))
            .saturating_add((columns.saturating_sub(1) as u64).saturating_mul(grid));
        let height = frame
            .saturating_add(header_height)
            .saturating_add((rows as u64).saturating_mul(row_height + grid));

        if columns == 0 || width > MAX_CANVAS_DIM || height > MAX_CANVAS_DIM {
            return Err(RenderError::DegenerateCanvas {
                columns,
                width,
                height,
            });
        }

        // Every quantity below is bounded by the canvas size checked above.
        let inset = style.margin + style.border_width;
        Ok(Self {
            column_widths: column_widths.into_iter().map(|w| w as u32).collect(),
            row_height: row_height as u32,
            header_height: header_height as u32,
            rows,
            width: width as u32,
            height: height as u32,
            origin_x: inset,
            origin_y: inset,
            grid: style.grid_width,
        })
    }

    /// Left edge of column `col`.
    pub fn column_x(&self, col: usize) -> u32 {
        self.origin_x
            + self.column_widths[..col]
                .iter()
                .map(|w| w + self.grid)
                .sum::<u32>()
    }

    /// Top edge of body row `row`.
    pub fn row_y(&self, row: usize) -> u32 {
        self.origin_y + self.header_height + self.grid + row as u32 * (self.row_height + self.grid)
    }

    /// Width of the area inside the border.
    pub fn inner_width(&self) -> u32 {
        self.column_widths.iter().sum::<u32>()
            + self.column_widths.len().saturating_sub(1) as u32 * self.grid
    }

    /// Height of the area inside the border.
    pub fn inner_height(&self) -> u32 {
        self.header_height + self.rows as u32 * (self.row_height + self.grid)
    }
}

/// Render `table` as a PNG using `style`.
///
/// Tables with no body rows still produce a framed header band.
pub fn render(table: &ParsedTable, style: &RenderStyle) -> Result<RenderedImage, RenderError> {
    let fonts = Fonts::load()?;
    let scale = PxScale::from(style.font_size);
    let metrics = fonts.metrics(scale);
    let layout = TableLayout::compute(table, style, metrics)?;

    let img = draw(table, style, &layout, &fonts, scale, metrics);
    let bytes = encode::encode_png(&img)?;

    debug!(
        "Rendered {}x{} table → {}x{} px, {} bytes",
        table.column_count(),
        table.row_count(),
        layout.width,
        layout.height,
        bytes.len()
    );

    Ok(RenderedImage {
        bytes,
        width: layout.width,
        height: layout.height,
    })
}

fn draw(
    table: &ParsedTable,
    style: &RenderStyle,
    layout: &TableLayout,
    fonts: &Fonts,
    scale: PxScale,
    metrics: FontMetrics,
) -> RgbImage {
    let mut img = RgbImage::from_pixel(layout.width, layout.height, rgb(style.background));
    let (x0, y0) = (layout.origin_x, layout.origin_y);
    let inner_w = layout.inner_width();
    let inner_h = layout.inner_height();

    // Header band
    fill(&mut img, x0, y0, inner_w, layout.header_height, style.header_background);

    // Body stripes and row separators
    for row in 0..layout.rows {
        let y = layout.row_y(row);
        fill(&mut img, x0, y - layout.grid, inner_w, layout.grid, style.grid_color);
        if let Some(stripe) = style.stripe_background.filter(|_| row % 2 == 1) {
            fill(&mut img, x0, y, inner_w, layout.row_height, stripe);
        }
    }

    // Column separators
    for col in 1..layout.column_widths.len() {
        let x = layout.column_x(col) - layout.grid;
        fill(&mut img, x, y0, layout.grid, inner_h, style.grid_color);
    }

    // Outer border
    for t in 0..style.border_width {
        let w = layout.width.saturating_sub(2 * (style.margin + t));
        let h = layout.height.saturating_sub(2 * (style.margin + t));
        if w > 0 && h > 0 {
            let rect = Rect::at((style.margin + t) as i32, (style.margin + t) as i32).of_size(w, h);
            draw_hollow_rect_mut(&mut img, rect, rgb(style.border_color));
        }
    }

    // Text
    let text_offset = |height: u32| height.saturating_sub(metrics.line_height) / 2;
    let columns = layout.column_widths.len();
    let alignment = |col: usize| table.alignments.get(col).copied().unwrap_or_default();
    for (col, cell) in table.header.iter().enumerate().take(columns) {
        let cell_box = CellBox {
            x: layout.column_x(col),
            y: y0 + text_offset(layout.header_height),
            width: layout.column_widths[col],
        };
        draw_cell_text(
            &mut img,
            cell,
            cell_box,
            alignment(col),
            style,
            &fonts.bold,
            scale,
            style.header_text_color,
        );
    }
    for (row, cells) in table.rows.iter().enumerate() {
        let y = layout.row_y(row) + text_offset(layout.row_height);
        for (col, cell) in cells.iter().enumerate().take(columns) {
            let cell_box = CellBox {
                x: layout.column_x(col),
                y,
                width: layout.column_widths[col],
            };
            draw_cell_text(
                &mut img,
                cell,
                cell_box,
                alignment(col),
                style,
                &fonts.regular,
                scale,
                style.text_color,
            );
        }
    }

    img
}

#[derive(Debug, Clone, Copy)]
struct CellBox {
    x: u32,
    /// Top of the text line.
    y: u32,
    width: u32,
}

#[allow(clippy::too_many_arguments)]
fn draw_cell_text(
    img: &mut RgbImage,
    text: &str,
    cell: CellBox,
    alignment: Alignment,
    style: &RenderStyle,
    font: &FontRef<'static>,
    scale: PxScale,
    color: Rgb,
) {
    if text.is_empty() {
        return;
    }
    let (text_w, _) = text_size(scale, font, text);
    let free = cell.width.saturating_sub(2 * style.padding_x + text_w);
    let x = match alignment.effective() {
        Alignment::Center => cell.x + style.padding_x + free / 2,
        Alignment::Right => cell.x + style.padding_x + free,
        _ => cell.x + style.padding_x,
    };
    draw_text_mut(img, rgb(color), x as i32, cell.y as i32, scale, font, text);
}

fn fill(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb) {
    if w == 0 || h == 0 {
        return;
    }
    draw_filled_rect_mut(img, Rect::at(x as i32, y as i32).of_size(w, h), rgb(color));
}

fn rgb(c: Rgb) -> image::Rgb<u8> {
    image::Rgb(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse::parse;

    fn table(lines: &[&str]) -> ParsedTable {
        parse(lines).unwrap()
    }

    fn metrics() -> FontMetrics {
        FontMetrics {
            advance: 10,
            line_height: 20,
        }
    }

    #[test]
    fn layout_column_widths_follow_longest_cell() {
        let t = table(&["| a | bb |", "|---|---|", "| abcd | b |"]);
        let style = RenderStyle::default();
        let layout = TableLayout::compute(&t, &style, metrics()).unwrap();
        assert_eq!(
            layout.column_widths,
            vec![4 * 10 + 2 * style.padding_x, 2 * 10 + 2 * style.padding_x]
        );
    }

    #[test]
    fn layout_canvas_size() {
        let t = table(&["| a | b |", "|---|---|", "| 1 | 2 |", "| 3 | 4 |"]);
        let style = RenderStyle::default();
        let layout = TableLayout::compute(&t, &style, metrics()).unwrap();

        let row_h = 20 + 2 * style.padding_y;
        assert_eq!(layout.row_height, row_h);
        assert_eq!(layout.header_height, row_h + style.header_extra_height);

        let frame = 2 * (style.margin + style.border_width);
        let col_w = 10 + 2 * style.padding_x;
        assert_eq!(layout.width, frame + 2 * col_w + style.grid_width);
        assert_eq!(
            layout.height,
            frame + layout.header_height + 2 * (row_h + style.grid_width)
        );
    }

    #[test]
    fn empty_column_gets_minimum_width() {
        let t = table(&["| a | b |", "|---|---|"]);
        let mut t2 = t.clone();
        t2.header[1].clear();
        let layout = TableLayout::compute(&t2, &RenderStyle::default(), metrics()).unwrap();
        assert!(layout.column_widths[1] >= 10);
    }

    #[test]
    fn zero_columns_is_degenerate() {
        let t = ParsedTable {
            header: vec![],
            alignments: vec![],
            rows: vec![],
        };
        let err = TableLayout::compute(&t, &RenderStyle::default(), metrics()).unwrap_err();
        assert!(matches!(err, RenderError::DegenerateCanvas { columns: 0, .. }));
    }

    #[test]
    fn oversized_canvas_is_degenerate() {
        let wide = "x".repeat(5000);
        let header = format!("| {wide} |");
        let t = table(&[header.as_str(), "|---|"]);
        let err = render(&t, &RenderStyle::default()).unwrap_err();
        assert!(matches!(err, RenderError::DegenerateCanvas { .. }));
    }

    #[test]
    fn row_positions_are_increasing() {
        let t = table(&["| a |", "|---|", "| 1 |", "| 2 |", "| 3 |"]);
        let layout = TableLayout::compute(&t, &RenderStyle::default(), metrics()).unwrap();
        let ys: Vec<u32> = (0..3).map(|r| layout.row_y(r)).collect();
        assert!(ys.windows(2).all(|w| w[1] - w[0] == layout.row_height + 1));
        assert_eq!(
            layout.row_y(2) + layout.row_height,
            layout.origin_y + layout.inner_height()
        );
    }

    #[test]
    fn renders_png() {
        let t = table(&[
            "| Team | Record | PPG |",
            "|:-----|:------:|----:|",
            "| Michigan | 24-1 | 90.6 |",
            "| Houston | 23-2 | 78.3 |",
            "| Iowa State | 22-3 | 84.2 |",
        ]);
        let img = render(&t, &RenderStyle::default()).unwrap();
        assert!(img.bytes.starts_with(ImageFormat::Png.magic()));
        assert!(img.bytes.len() > 1000, "only {} bytes", img.bytes.len());
        assert!(img.width > 0 && img.height > 0);
    }

    #[test]
    fn header_only_table_renders() {
        let t = table(&["| Header A | Header B |", "|---|---|"]);
        let img = render(&t, &RenderStyle::default()).unwrap();
        assert!(img.bytes.starts_with(ImageFormat::Png.magic()));
    }

    #[test]
    fn smallest_tables_clear_size_floor() {
        let style = RenderStyle::default();
        for lines in [&["| a |", "|---|"][..], &["| a |", "|---|", "| 1 |"][..]] {
            let img = render(&table(lines), &style).unwrap();
            assert!(
                img.bytes.len() > MIN_ARTIFACT_BYTES,
                "{lines:?}: only {} bytes",
                img.bytes.len()
            );
        }
    }

    #[test]
    fn huge_style_values_are_degenerate_not_panics() {
        let t = table(&["| a |", "|---|", "| 1 |"]);
        let huge = [
            RenderStyle {
                header_extra_height: u32::MAX,
                ..RenderStyle::default()
            },
            RenderStyle {
                padding_x: u32::MAX,
                ..RenderStyle::default()
            },
            RenderStyle {
                padding_y: u32::MAX,
                ..RenderStyle::default()
            },
            RenderStyle {
                margin: u32::MAX,
                border_width: u32::MAX,
                grid_width: u32::MAX,
                ..RenderStyle::default()
            },
        ];
        for style in &huge {
            let err = TableLayout::compute(&t, style, metrics()).unwrap_err();
            assert!(matches!(err, RenderError::DegenerateCanvas { .. }));
        }
    }

    #[test]
    fn hand_built_ragged_table_renders() {
        let t = ParsedTable {
            header: vec!["a".into(), "b".into()],
            alignments: vec![Alignment::Right],
            rows: vec![
                vec!["1".into(), "2".into(), "overflow".into()],
                vec!["3".into()],
            ],
        };
        let img = render(&t, &RenderStyle::default()).unwrap();
        assert!(img.bytes.starts_with(ImageFormat::Png.magic()));
    }

    #[test]
    fn rendering_is_deterministic() {
        let t = table(&["| a | b |", "|---|---|", "| 1 | 2 |"]);
        let first = render(&t, &RenderStyle::default()).unwrap();
        let second = render(&t, &RenderStyle::default()).unwrap();
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn header_band_is_drawn() {
        let t = table(&["| a |", "|---|", "| 1 |"]);
        let style = RenderStyle::default();
        let fonts = Fonts::load().unwrap();
        let scale = PxScale::from(style.font_size);
        let m = fonts.metrics(scale);
        let layout = TableLayout::compute(&t, &style, m).unwrap();
        let img = draw(&t, &style, &layout, &fonts, scale, m);

        // Top-left interior pixel sits in the header band, away from text.
        let header_px = img.get_pixel(layout.origin_x, layout.origin_y);
        assert_eq!(header_px.0, style.header_background);
        // Corner of the canvas is margin background.
        assert_eq!(img.get_pixel(0, 0).0, style.background);
        // Border pixel.
        assert_eq!(img.get_pixel(style.margin, style.margin).0, style.border_color);
    }

    #[test]
    fn monospace_metric_covers_ascii() {
        let fonts = Fonts::load().unwrap();
        let scale = PxScale::from(18.0);
        let m = fonts.metrics(scale);
        let (w, _) = text_size(scale, &fonts.bold, "WWWWWWWWWW");
        assert!(w <= 10 * m.advance, "{w} > {}", 10 * m.advance);
    }
}
