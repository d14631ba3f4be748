//! Scanline-based region features
//!
//! All functions here work on the scanline representation directly, so
//! none of them needs to expand a region into single pixels.

use crate::scanline::ScanLine;
use icl_core::{Point, Point32f, Rect};

/// Principal component analysis of a region's pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PcaInfo {
    /// Center of gravity
    pub center: Point32f,
    /// Standard deviation along the major axis
    pub len1: f32,
    /// Standard deviation along the minor axis
    pub len2: f32,
    /// Angle of the major axis in radians, in `(-pi/2, pi/2]`
    pub arc1: f32,
    /// Angle of the minor axis (`arc1 + pi/2`)
    pub arc2: f32,
}

impl PcaInfo {
    /// Ratio of minor to major axis; 1 for isotropic regions, 0 for lines.
    pub fn axis_ratio(&self) -> f32 {
        if self.len1 > 0.0 {
            self.len2 / self.len1
        } else {
            1.0
        }
    }
}

/// First and second order coordinate moments
#[derive(Debug, Clone, Copy, Default)]
struct Moments {
    n: f64,
    sx: f64,
    sy: f64,
    sxx: f64,
    sxy: f64,
    syy: f64,
}

impl Moments {
    fn of(scanlines: &[ScanLine]) -> Self {
        let mut m = Moments::default();
        for sl in scanlines {
            let l = sl.len as f64;
            let x = sl.x as f64;
            let y = sl.y as f64;
            // closed forms of sum(x + i), sum((x + i)^2) for i in 0..l
            let sum_x = l * x + l * (l - 1.0) / 2.0;
            let sum_xx = l * x * x + x * l * (l - 1.0) + (l - 1.0) * l * (2.0 * l - 1.0) / 6.0;
            m.n += l;
            m.sx += sum_x;
            m.sy += l * y;
            m.sxx += sum_xx;
            m.sxy += y * sum_x;
            m.syy += l * y * y;
        }
        m
    }
}

/// Total number of pixels
pub(crate) fn pixel_count(scanlines: &[ScanLine]) -> usize {
    scanlines.iter().map(|s| s.len as usize).sum()
}

/// Smallest rect containing all scanlines; empty rect for no scanlines.
pub(crate) fn bounding_box(scanlines: &[ScanLine]) -> Rect {
    let Some(first) = scanlines.first() else {
        return Rect::default();
    };
    let (mut x1, mut y1) = (first.x, first.y);
    let (mut x2, mut y2) = (first.end() - 1, first.y);
    for sl in &scanlines[1..] {
        x1 = x1.min(sl.x);
        x2 = x2.max(sl.end() - 1);
        y1 = y1.min(sl.y);
        y2 = y2.max(sl.y);
    }
    Rect::from_inclusive_corners(x1, y1, x2, y2)
}

/// Pixel-count weighted centroid of the pixel centers
pub(crate) fn center_of_gravity(scanlines: &[ScanLine]) -> Point32f {
    let m = Moments::of(scanlines);
    if m.n == 0.0 {
        return Point32f::default();
    }
    Point32f::new((m.sx / m.n) as f32, (m.sy / m.n) as f32)
}

/// Expand the scanlines into single pixels, scanline by scanline.
pub(crate) fn expand_pixels(scanlines: &[ScanLine]) -> Vec<Point> {
    let mut pixels = Vec::with_capacity(pixel_count(scanlines));
    for sl in scanlines {
        pixels.extend(sl.pixels());
    }
    pixels
}

/// Eigen-decomposition of the coordinate covariance about the centroid
pub(crate) fn pca(scanlines: &[ScanLine]) -> PcaInfo {
    let m = Moments::of(scanlines);
    if m.n == 0.0 {
        return PcaInfo::default();
    }
    let cx = m.sx / m.n;
    let cy = m.sy / m.n;
    let a = m.sxx / m.n - cx * cx;
    let b = m.sxy / m.n - cx * cy;
    let c = m.syy / m.n - cy * cy;

    let mean = (a + c) / 2.0;
    let r = (((a - c) / 2.0).powi(2) + b * b).sqrt();
    let l1 = (mean + r).max(0.0);
    let l2 = (mean - r).max(0.0);
    let arc1 = 0.5 * (2.0 * b).atan2(a - c);

    PcaInfo {
        center: Point32f::new(cx as f32, cy as f32),
        len1: l1.sqrt() as f32,
        len2: l2.sqrt() as f32,
        arc1: arc1 as f32,
        arc2: (arc1 + std::f64::consts::FRAC_PI_2) as f32,
    }
}
