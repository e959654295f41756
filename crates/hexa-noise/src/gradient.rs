//! Single-octave lattice gradient noise (Improved Perlin) in 3 and 4 dimensions.
//!
//! For a sample point, the surrounding unit lattice cell is located, every
//! corner hashes its integer coordinates through the permutation table to pick
//! a gradient, and the corner dot products are blended with the quintic fade
//! curve one axis at a time: x, then y, then z (then w).
//!
//! Noise is exactly zero at every integer lattice point.

use std::fmt;
use std::sync::Arc;

use glam::{DVec3, DVec4};

use crate::PermutationTable;

/// 4D gradients: every vector with one zero component and three `±1`
/// components, indexed by `hash & 31`.
#[rustfmt::skip]
const GRAD4: [[i8; 4]; 32] = [
    [0, 1, 1, 1],   [0, 1, 1, -1],   [0, 1, -1, 1],   [0, 1, -1, -1],
    [0, -1, 1, 1],  [0, -1, 1, -1],  [0, -1, -1, 1],  [0, -1, -1, -1],
    [1, 0, 1, 1],   [1, 0, 1, -1],   [1, 0, -1, 1],   [1, 0, -1, -1],
    [-1, 0, 1, 1],  [-1, 0, 1, -1],  [-1, 0, -1, 1],  [-1, 0, -1, -1],
    [1, 1, 0, 1],   [1, 1, 0, -1],   [1, -1, 0, 1],   [1, -1, 0, -1],
    [-1, 1, 0, 1],  [-1, 1, 0, -1],  [-1, -1, 0, 1],  [-1, -1, 0, -1],
    [1, 1, 1, 0],   [1, 1, -1, 0],   [1, -1, 1, 0],   [1, -1, -1, 0],
    [-1, 1, 1, 0],  [-1, 1, -1, 0],  [-1, -1, 1, 0],  [-1, -1, -1, 0],
];

/// Number of coordinates a sampler consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// `(x, y, z)`
    Three,
    /// `(x, y, z, w)`
    Four,
}

impl Dimension {
    /// Number of axes.
    pub fn axes(self) -> usize {
        match self {
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    /// Maps an axis count back to a dimension.
    pub fn from_axes(axes: usize) -> Option<Self> {
        match axes {
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.axes())
    }
}

/// Quintic smootherstep `6t^5 - 15t^4 + 10t^3`.
#[inline]
pub fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Splits a coordinate into its wrapped lattice index, the offset inside the
/// cell, and the faded offset.
#[inline]
fn lattice(c: f64) -> (usize, f64, f64) {
    let floor = c.floor();
    let offset = c - floor;
    ((floor as i32 & 255) as usize, offset, fade(offset))
}

/// Dot product with one of the 12 cube-edge gradients (4 duplicated to fill 16).
#[inline]
fn grad3(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

#[inline]
fn grad4(hash: usize, x: f64, y: f64, z: f64, w: f64) -> f64 {
    let [gx, gy, gz, gw] = GRAD4[hash & 31];
    f64::from(gx) * x + f64::from(gy) * y + f64::from(gz) * z + f64::from(gw) * w
}

/// Improved Perlin noise at `(x, y, z)`.
pub fn perlin_3d(table: &PermutationTable, x: f64, y: f64, z: f64) -> f64 {
    let (xi, xf, tx) = lattice(x);
    let (yi, yf, ty) = lattice(y);
    let (zi, zf, tz) = lattice(z);

    let corner = |dx: usize, dy: usize, dz: usize| {
        let hash = table.hash(table.hash(table.hash(xi + dx) + yi + dy) + zi + dz);
        grad3(hash, xf - dx as f64, yf - dy as f64, zf - dz as f64)
    };
    let along_x = |dy, dz| lerp(corner(0, dy, dz), corner(1, dy, dz), tx);

    let z0 = lerp(along_x(0, 0), along_x(1, 0), ty);
    let z1 = lerp(along_x(0, 1), along_x(1, 1), ty);
    lerp(z0, z1, tz)
}

/// Improved Perlin noise at `(x, y, z, w)`.
///
/// Lattice hashing nests from `w` inwards; blending runs x, y, z, w.
pub fn perlin_4d(table: &PermutationTable, x: f64, y: f64, z: f64, w: f64) -> f64 {
    let (xi, xf, tx) = lattice(x);
    let (yi, yf, ty) = lattice(y);
    let (zi, zf, tz) = lattice(z);
    let (wi, wf, tw) = lattice(w);

    let corner = |dx: usize, dy: usize, dz: usize, dw: usize| {
        let hash = table
            .hash(table.hash(table.hash(table.hash(wi + dw) + zi + dz) + yi + dy) + xi + dx);
        grad4(
            hash,
            xf - dx as f64,
            yf - dy as f64,
            zf - dz as f64,
            wf - dw as f64,
        )
    };
    let along_xy = |dz, dw| {
        let y0 = lerp(corner(0, 0, dz, dw), corner(1, 0, dz, dw), tx);
        let y1 = lerp(corner(0, 1, dz, dw), corner(1, 1, dz, dw), tx);
        lerp(y0, y1, ty)
    };

    let w0 = lerp(along_xy(0, 0), along_xy(1, 0), tz);
    let w1 = lerp(along_xy(0, 1), along_xy(1, 1), tz);
    lerp(w0, w1, tw)
}

/// One octave of gradient noise over a shared permutation table.
///
/// Holds no mutable state: identical inputs always give bit-identical output.
/// The dimension is a tag checked by the engine; both `noise_*` methods work
/// on any table.
#[derive(Clone, Debug)]
pub struct GradientSampler {
    dimension: Dimension,
    table: Arc<PermutationTable>,
}

impl GradientSampler {
    /// Creates a sampler over `table`.
    pub fn new(dimension: Dimension, table: Arc<PermutationTable>) -> Self {
        Self { dimension, table }
    }

    /// The dimension this sampler was created for.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// The permutation table driving gradient selection.
    pub fn table(&self) -> &Arc<PermutationTable> {
        &self.table
    }

    /// 3D noise with coordinates multiplied by `scale` before lattice lookup.
    #[inline]
    pub fn noise_3d(&self, scale: f64, point: DVec3) -> f64 {
        perlin_3d(
            &self.table,
            point.x * scale,
            point.y * scale,
            point.z * scale,
        )
    }

    /// 4D noise with coordinates multiplied by `scale` before lattice lookup.
    #[inline]
    pub fn noise_4d(&self, scale: f64, point: DVec4) -> f64 {
        perlin_4d(
            &self.table,
            point.x * scale,
            point.y * scale,
            point.z * scale,
            point.w * scale,
        )
    }
}
