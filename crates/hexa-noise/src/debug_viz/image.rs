//! A 2D debug image represented as a flat array of RGBA pixels.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::DebugVizError;

/// A 2D debug image for noise slices, stored as row-major RGBA pixels.
#[derive(Clone, Debug)]
pub struct DebugImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data in row-major RGBA format. Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

impl DebugImage {
    /// Create a new black (all-zero) image with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Set a single pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) {
        let idx = self.index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&[r, g, b, a]);
    }

    /// Get a pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let idx = self.index(x, y);
        (
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        )
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Count the number of unique colors (ignoring alpha) in the image.
    pub fn unique_color_count(&self) -> usize {
        let mut colors = std::collections::HashSet::new();
        for chunk in self.pixels.chunks_exact(4) {
            colors.insert((chunk[0], chunk[1], chunk[2]));
        }
        colors.len()
    }

    /// Encode the image as an 8-bit RGBA PNG at `path`.
    pub fn write_png(&self, path: &Path) -> Result<(), DebugVizError> {
        let file = File::create(path)?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        writer.finish()?;

        tracing::debug!(
            path = %path.display(),
            width = self.width,
            height = self.height,
            "wrote debug image"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_image_correct_dimensions() {
        let image = DebugImage::new(256, 128);
        assert_eq!(image.dimensions(), (256, 128));
        assert_eq!(image.pixels.len(), 256 * 128 * 4);
    }

    #[test]
    fn test_set_pixel_layout_is_row_major() {
        let mut image = DebugImage::new(10, 10);
        image.set_pixel(3, 5, 255, 128, 64, 255);

        let idx = (5 * 10 + 3) * 4;
        assert_eq!(&image.pixels[idx..idx + 4], &[255, 128, 64, 255]);
        assert_eq!(image.get_pixel(3, 5), (255, 128, 64, 255));
        assert_eq!(image.get_pixel(5, 3), (0, 0, 0, 0));
    }

    #[test]
    fn test_unique_color_count_ignores_alpha() {
        let mut image = DebugImage::new(4, 1);
        image.set_pixel(0, 0, 10, 10, 10, 255);
        image.set_pixel(1, 0, 10, 10, 10, 0);
        image.set_pixel(2, 0, 200, 200, 200, 255);
        image.set_pixel(3, 0, 0, 0, 0, 255);
        assert_eq!(image.unique_color_count(), 3);
    }

    #[test]
    fn test_write_png_produces_decodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slice.png");

        let mut image = DebugImage::new(3, 2);
        image.set_pixel(1, 1, 9, 8, 7, 255);
        image.write_png(&path).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();

        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(&buf[..info.buffer_size()], image.pixels.as_slice());
    }

    #[test]
    fn test_write_png_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("slice.png");

        let result = DebugImage::new(1, 1).write_png(&path);
        assert!(matches!(result, Err(DebugVizError::Io(_))));
    }
}
