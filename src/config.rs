//! Rendering configuration for table images.
//!
//! Every visual knob lives in [`RenderStyle`], built via its
//! [`RenderStyleBuilder`]. The default style is the deterministic house style
//! used by [`crate::convert_tables_to_images`]; callers normally never touch
//! it. Keeping the knobs in one serialisable struct means two runs can be
//! diffed to see why their images differ.

use crate::error::TableImageError;
use serde::{Deserialize, Serialize};

/// Smallest accepted font size in pixels.
pub const MIN_FONT_SIZE: f32 = 8.0;
/// Largest accepted font size in pixels.
pub const MAX_FONT_SIZE: f32 = 72.0;

/// Largest accepted cell padding and header extra height in pixels.
pub const MAX_PADDING: u32 = 200;
/// Largest accepted outer margin in pixels.
pub const MAX_MARGIN: u32 = 500;
/// Largest accepted border thickness in pixels.
pub const MAX_BORDER_WIDTH: u32 = 50;
/// Largest accepted grid-line thickness in pixels.
pub const MAX_GRID_WIDTH: u32 = 20;

/// An RGB colour.
pub type Rgb = [u8; 3];

/// Visual style of a rendered table.
///
/// # Example
/// ```rust
/// use mdtable2png::RenderStyle;
///
/// let style = RenderStyle::builder()
///     .font_size(20.0)
///     .padding(14, 8)
///     .build()
///     .unwrap();
/// assert_eq!(style.padding_x, 14);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Font size in pixels for header and body text. Default: 18.
    pub font_size: f32,

    /// Horizontal padding on each side of a cell's text. Default: 12.
    pub padding_x: u32,

    /// Vertical padding above and below a cell's text. Default: 8.
    pub padding_y: u32,

    /// Extra height added to the header row. Default: 6.
    pub header_extra_height: u32,

    /// Empty space around the outer border. Default: 16.
    pub margin: u32,

    /// Thickness of the outer border. Default: 2.
    pub border_width: u32,

    /// Thickness of row and column separators. Default: 1.
    pub grid_width: u32,

    pub background: Rgb,
    pub header_background: Rgb,
    /// Background of every second body row; `None` disables striping.
    pub stripe_background: Option<Rgb>,
    pub grid_color: Rgb,
    pub border_color: Rgb,
    pub text_color: Rgb,
    pub header_text_color: Rgb,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            padding_x: 12,
            padding_y: 8,
            header_extra_height: 6,
            margin: 16,
            border_width: 2,
            grid_width: 1,
            background: [255, 255, 255],
            header_background: [44, 62, 80],
            stripe_background: Some([242, 245, 248]),
            grid_color: [200, 206, 212],
            border_color: [44, 62, 80],
            text_color: [33, 37, 41],
            header_text_color: [255, 255, 255],
        }
    }
}

impl RenderStyle {
    /// Create a new builder starting from the default style.
    pub fn builder() -> RenderStyleBuilder {
        RenderStyleBuilder {
            style: Self::default(),
        }
    }
}

/// Builder for [`RenderStyle`].
#[derive(Debug)]
pub struct RenderStyleBuilder {
    style: RenderStyle,
}

impl RenderStyleBuilder {
    pub fn font_size(mut self, px: f32) -> Self {
        self.style.font_size = px;
        self
    }

    pub fn padding(mut self, x: u32, y: u32) -> Self {
        self.style.padding_x = x;
        self.style.padding_y = y;
        self
    }

    pub fn header_extra_height(mut self, px: u32) -> Self {
        self.style.header_extra_height = px;
        self
    }

    pub fn margin(mut self, px: u32) -> Self {
        self.style.margin = px;
        self
    }

    pub fn border_width(mut self, px: u32) -> Self {
        self.style.border_width = px.max(1);
        self
    }

    pub fn grid_width(mut self, px: u32) -> Self {
        self.style.grid_width = px.max(1);
        self
    }

    pub fn background(mut self, rgb: Rgb) -> Self {
        self.style.background = rgb;
        self
    }

    pub fn header_background(mut self, rgb: Rgb) -> Self {
        self.style.header_background = rgb;
        self
    }

    pub fn stripe_background(mut self, rgb: Option<Rgb>) -> Self {
        self.style.stripe_background = rgb;
        self
    }

    pub fn grid_color(mut self, rgb: Rgb) -> Self {
        self.style.grid_color = rgb;
        self
    }

    pub fn border_color(mut self, rgb: Rgb) -> Self {
        self.style.border_color = rgb;
        self
    }

    pub fn text_color(mut self, rgb: Rgb) -> Self {
        self.style.text_color = rgb;
        self
    }

    pub fn header_text_color(mut self, rgb: Rgb) -> Self {
        self.style.header_text_color = rgb;
        self
    }

    /// Build the style, validating constraints.
    pub fn build(self) -> Result<RenderStyle, TableImageError> {
        let s = &self.style;
        if !s.font_size.is_finite() || s.font_size < MIN_FONT_SIZE || s.font_size > MAX_FONT_SIZE {
            return Err(TableImageError::InvalidConfig(format!(
                "font size must be {MIN_FONT_SIZE}–{MAX_FONT_SIZE} px, got {}",
                s.font_size
            )));
        }
        if s.padding_x > MAX_PADDING || s.padding_y > MAX_PADDING {
            return Err(TableImageError::InvalidConfig(format!(
                "cell padding must be ≤ {MAX_PADDING} px, got {}x{}",
                s.padding_x, s.padding_y
            )));
        }
        if s.header_extra_height > MAX_PADDING {
            return Err(TableImageError::InvalidConfig(format!(
                "header extra height must be ≤ {MAX_PADDING} px, got {}",
                s.header_extra_height
            )));
        }
        if s.margin > MAX_MARGIN {
            return Err(TableImageError::InvalidConfig(format!(
                "margin must be ≤ {MAX_MARGIN} px, got {}",
                s.margin
            )));
        }
        if s.border_width > MAX_BORDER_WIDTH || s.grid_width > MAX_GRID_WIDTH {
            return Err(TableImageError::InvalidConfig(format!(
                "border/grid width must be ≤ {MAX_BORDER_WIDTH}/{MAX_GRID_WIDTH} px, got {}/{}",
                s.border_width, s.grid_width
            )));
        }
        Ok(self.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_builds() {
        let style = RenderStyle::builder().build().unwrap();
        assert_eq!(style, RenderStyle::default());
    }

    #[test]
    fn rejects_tiny_font() {
        let err = RenderStyle::builder().font_size(2.0).build().unwrap_err();
        assert!(matches!(err, TableImageError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_nan_font() {
        assert!(RenderStyle::builder().font_size(f32::NAN).build().is_err());
    }

    #[test]
    fn rejects_huge_padding() {
        assert!(RenderStyle::builder().padding(500, 4).build().is_err());
    }

    #[test]
    fn rejects_huge_header_extra_height() {
        let err = RenderStyle::builder()
            .header_extra_height(u32::MAX)
            .build()
            .unwrap_err();
        assert!(matches!(err, TableImageError::InvalidConfig(_)));
        assert!(RenderStyle::builder()
            .header_extra_height(MAX_PADDING)
            .build()
            .is_ok());
    }

    #[test]
    fn rejects_thick_lines() {
        assert!(RenderStyle::builder().border_width(51).build().is_err());
        assert!(RenderStyle::builder().grid_width(u32::MAX).build().is_err());
        assert!(RenderStyle::builder().margin(501).build().is_err());
    }

    #[test]
    fn line_widths_never_zero() {
        let style = RenderStyle::builder()
            .border_width(0)
            .grid_width(0)
            .build()
            .unwrap();
        assert_eq!(style.border_width, 1);
        assert_eq!(style.grid_width, 1);
    }

    #[test]
    fn style_serialises() {
        let json = serde_json::to_string(&RenderStyle::default()).unwrap();
        let back: RenderStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RenderStyle::default());
    }
}
