//! Slice renderers for 3D and 4D handles.

use hexa_handle::RawHandle;

use super::image::DebugImage;
use crate::{NoiseEngine, NoiseError};

/// An axis-aligned rectangle in the XY plane, sampled at fixed Z (and W).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliceParams {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// `(x0, y0, x1, y1)` in noise space, before the caller's scale.
    pub region: (f64, f64, f64, f64),
    /// Z coordinate of the slice.
    pub depth: f64,
    /// W coordinate of the slice; ignored for 3D handles.
    pub time: f64,
}

impl SliceParams {
    /// Noise-space `(x, y)` under the top-left corner of pixel `(px, py)`.
    fn point(&self, px: u32, py: u32) -> (f64, f64) {
        let (x0, y0, x1, y1) = self.region;
        let x = x0 + (px as f64 / self.width as f64) * (x1 - x0);
        let y = y0 + (py as f64 / self.height as f64) * (y1 - y0);
        (x, y)
    }
}

/// Render a 3D sampler or layered generator over `slice`.
///
/// Values are normalized by the handle's maximum amplitude and written as
/// opaque grey pixels.
///
/// # Errors
///
/// Whatever [`NoiseEngine::sample_3d`] reports for `handle`.
pub fn render_slice_3d(
    engine: &NoiseEngine,
    handle: RawHandle,
    scale: f64,
    slice: &SliceParams,
) -> Result<DebugImage, NoiseError> {
    render(engine, handle, slice, |x, y| {
        engine.sample_3d(handle, scale, x, y, slice.depth)
    })
}

/// Render a 4D sampler or layered generator over `slice` at `slice.time`.
///
/// # Errors
///
/// Whatever [`NoiseEngine::sample_4d`] reports for `handle`.
pub fn render_slice_4d(
    engine: &NoiseEngine,
    handle: RawHandle,
    scale: f64,
    slice: &SliceParams,
) -> Result<DebugImage, NoiseError> {
    render(engine, handle, slice, |x, y| {
        engine.sample_4d(handle, scale, x, y, slice.depth, slice.time)
    })
}

fn render(
    engine: &NoiseEngine,
    handle: RawHandle,
    slice: &SliceParams,
    mut sample: impl FnMut(f64, f64) -> Result<f64, NoiseError>,
) -> Result<DebugImage, NoiseError> {
    let max_abs = engine.max_amplitude(handle)?;
    let mut image = DebugImage::new(slice.width, slice.height);

    for py in 0..slice.height {
        for px in 0..slice.width {
            let (x, y) = slice.point(px, py);
            let grey = value_to_grey(sample(x, y)?, max_abs);
            image.set_pixel(px, py, grey, grey, grey, 255);
        }
    }

    Ok(image)
}

/// Map `value` in `[-max_abs, max_abs]` to a grey level, clamping outliers.
///
/// A non-positive `max_abs` maps everything to mid grey.
pub fn value_to_grey(value: f64, max_abs: f64) -> u8 {
    let normalized = if max_abs > 0.0 {
        ((value / max_abs) + 1.0) * 0.5
    } else {
        0.5
    };
    (normalized.clamp(0.0, 1.0) * 255.0).round() as u8
}
