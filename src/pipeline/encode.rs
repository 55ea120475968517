//! Image encoding: `RgbImage` → PNG bytes.
//!
//! PNG is lossless, so thin grid lines and small glyphs stay crisp, and the
//! encoder writes no timestamps, which keeps output byte-stable.

use crate::output::ImageFormat;
use image::RgbImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a rendered table as PNG.
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    debug!("Encoded {}x{} image → {} bytes PNG", img.width(), img.height(), buf.len());
    Ok(buf)
}

/// True when `bytes` start with the PNG signature.
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(ImageFormat::Png.magic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn encode_small_image() {
        let img = RgbImage::from_pixel(10, 10, Rgb([255, 0, 0]));
        let data = encode_png(&img).expect("encode should succeed");
        assert!(is_png(&data));
        let decoded = image::load_from_memory(&data).expect("valid png");
        assert_eq!(decoded.width(), 10);
    }

    #[test]
    fn rejects_other_bytes() {
        assert!(!is_png(b"GIF89a"));
        assert!(!is_png(&[]));
    }
}
