//! Curvature scale space corner detection
//!
//! Finds corners on a closed contour:
//!
//! 1. The contour is smoothed with a circular Gaussian of width `sigma`.
//! 2. Curvature is estimated by central differences on the smoothed curve.
//! 3. Local maxima of absolute curvature are corner candidates. A candidate
//!    survives the round-corner test if its curvature exceeds `rc_coeff`
//!    times the mean curvature over its region of support (the strictly
//!    descending flanks around the peak).
//! 4. False corners are removed iteratively: the angle between the tangents
//!    toward the neighbouring corners must not exceed `angle_thresh`.
//!    Tangents follow the chord when the arc is nearly straight, and the
//!    circle through corner, arc midpoint and arc end otherwise.

use crate::error::{RegionError, RegionResult};
use icl_core::Point32f;

/// Parameters of the corner detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssParams {
    /// Maximum included angle (degrees) of a corner
    pub angle_thresh: f32,
    /// Round corner coefficient
    pub rc_coeff: f32,
    /// Standard deviation of the smoothing Gaussian
    pub sigma: f32,
    /// Gaussian taps lighter than `1 / curvature_cutoff` of the center tap
    /// are dropped
    pub curvature_cutoff: f32,
    /// Maximum deviation / chord ratio of an arc treated as straight
    pub straight_line_thresh: f32,
}

impl Default for CssParams {
    fn default() -> Self {
        Self {
            angle_thresh: 162.0,
            rc_coeff: 1.5,
            sigma: 3.0,
            curvature_cutoff: 100.0,
            straight_line_thresh: 0.1,
        }
    }
}

impl CssParams {
    /// Create new parameters with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum corner angle in degrees
    pub fn with_angle_thresh(mut self, degrees: f32) -> Self {
        self.angle_thresh = degrees;
        self
    }

    /// Set the round corner coefficient
    pub fn with_rc_coeff(mut self, coeff: f32) -> Self {
        self.rc_coeff = coeff;
        self
    }

    /// Set the smoothing sigma
    pub fn with_sigma(mut self, sigma: f32) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set the kernel cutoff
    pub fn with_curvature_cutoff(mut self, cutoff: f32) -> Self {
        self.curvature_cutoff = cutoff;
        self
    }

    /// Set the straight line threshold
    pub fn with_straight_line_thresh(mut self, thresh: f32) -> Self {
        self.straight_line_thresh = thresh;
        self
    }
}

/// A detected corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssCorner {
    /// Corner position (unsmoothed contour point)
    pub position: Point32f,
    /// Index of the corner in the contour
    pub index: usize,
    /// Included angle in degrees
    pub angle: f32,
}

/// Curvature below this is treated as flat
const MIN_CURVATURE: f64 = 1e-6;

/// Detect corners on a closed contour.
///
/// Contours with fewer than 3 points have no corners.
pub fn detect_corners(contour: &[Point32f], params: &CssParams) -> Vec<CssCorner> {
    let n = contour.len();
    if n < 3 {
        return Vec::new();
    }

    let kernel = gaussian_kernel(params.sigma as f64, params.curvature_cutoff as f64, n);
    let xs: Vec<f64> = contour.iter().map(|p| p.x as f64).collect();
    let ys: Vec<f64> = contour.iter().map(|p| p.y as f64).collect();
    let xs = smooth_circular(&xs, &kernel);
    let ys = smooth_circular(&ys, &kernel);
    let kappa = curvature(&xs, &ys);

    let candidates = curvature_peaks(&kappa, params.rc_coeff as f64);
    log::trace!(
        "css: {} contour points, kernel {} taps, {} candidates",
        n,
        kernel.len(),
        candidates.len()
    );

    remove_false_corners(contour, candidates, params)
}

/// Normalized Gaussian, truncated by `cutoff` and to at most `n` taps.
fn gaussian_kernel(sigma: f64, cutoff: f64, n: usize) -> Vec<f64> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    let reach = if cutoff > 1.0 {
        sigma * (2.0 * cutoff.ln()).sqrt()
    } else {
        3.0 * sigma
    };
    let half = (reach.ceil() as usize).clamp(1, (n - 1) / 2);

    let mut kernel: Vec<f64> = (0..=2 * half)
        .map(|i| {
            let d = i as f64 - half as f64;
            (-d * d / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

fn smooth_circular(values: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = values.len();
    let half = kernel.len() / 2;
    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, g)| g * values[(i + n + k - half) % n])
                .sum()
        })
        .collect()
}

/// Signed curvature of a closed, uniformly sampled curve
fn curvature(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    (0..n)
        .map(|i| {
            let (prev, next) = ((i + n - 1) % n, (i + 1) % n);
            let dx = (xs[next] - xs[prev]) / 2.0;
            let dy = (ys[next] - ys[prev]) / 2.0;
            let ddx = xs[next] - 2.0 * xs[i] + xs[prev];
            let ddy = ys[next] - 2.0 * ys[i] + ys[prev];
            let denom = (dx * dx + dy * dy).powf(1.5);
            if denom < 1e-12 {
                0.0
            } else {
                (dx * ddy - dy * ddx) / denom
            }
        })
        .collect()
}

/// Indices of absolute curvature maxima that pass the round-corner test.
fn curvature_peaks(kappa: &[f64], rc_coeff: f64) -> Vec<usize> {
    let n = kappa.len();
    let a: Vec<f64> = kappa.iter().map(|k| k.abs()).collect();
    let prev = |i: usize| (i + n - 1) % n;
    let next = |i: usize| (i + 1) % n;

    let mut peaks = Vec::new();
    for i in 0..n {
        if a[i] <= MIN_CURVATURE || a[i] <= a[prev(i)] || a[i] < a[next(i)] {
            continue;
        }

        // region of support: strictly descending flanks
        let mut sum = a[i];
        let mut count = 1usize;
        let mut j = i;
        while count < n && a[prev(j)] < a[j] {
            j = prev(j);
            sum += a[j];
            count += 1;
        }
        let mut j = i;
        while count < n && a[next(j)] < a[j] {
            j = next(j);
            sum += a[j];
            count += 1;
        }

        if a[i] > rc_coeff * sum / count as f64 {
            peaks.push(i);
        }
    }
    peaks
}

fn remove_false_corners(
    contour: &[Point32f],
    mut corners: Vec<usize>,
    params: &CssParams,
) -> Vec<CssCorner> {
    loop {
        let m = corners.len();
        if m == 0 {
            return Vec::new();
        }

        let mut kept = Vec::with_capacity(m);
        for k in 0..m {
            let c = corners[k];
            let before = corners[(k + m - 1) % m];
            let after = corners[(k + 1) % m];
            let thresh = params.straight_line_thresh;
            let angle = match corner_angle(contour, before, c, after, thresh) {
                Ok(angle) => angle,
                Err(e) => {
                    log::trace!("css: corner {} dropped: {}", c, e);
                    180.0
                }
            };
            if angle <= params.angle_thresh {
                kept.push(CssCorner {
                    position: contour[c],
                    index: c,
                    angle,
                });
            }
        }

        if kept.len() == m {
            return kept;
        }
        corners = kept.iter().map(|c| c.index).collect();
    }
}

/// Included angle (degrees) at contour index `c` between the arcs toward
/// `before` and `after`. A lone corner uses half the contour on each side.
fn corner_angle(
    contour: &[Point32f],
    before: usize,
    c: usize,
    after: usize,
    straight_thresh: f32,
) -> RegionResult<f32> {
    let n = contour.len();
    let (back_steps, fwd_steps) = if before == c {
        (n / 2, n / 2)
    } else {
        ((c + n - before) % n, (after + n - c) % n)
    };

    let backward: Vec<Point32f> = (0..=back_steps).map(|s| contour[(c + n - s) % n]).collect();
    let forward: Vec<Point32f> = (0..=fwd_steps).map(|s| contour[(c + s) % n]).collect();

    let t1 = arc_tangent(&backward, straight_thresh)?;
    let t2 = arc_tangent(&forward, straight_thresh)?;
    let cos = (t1.0 * t2.0 + t1.1 * t2.1).clamp(-1.0, 1.0);
    Ok(cos.acos().to_degrees() as f32)
}

/// Unit tangent at `arc[0]` pointing along the arc.
fn arc_tangent(arc: &[Point32f], straight_thresh: f32) -> RegionResult<(f64, f64)> {
    let start = arc[0];
    let end = arc[arc.len() - 1];
    let chord = ((end.x - start.x) as f64, (end.y - start.y) as f64);
    let chord_len = chord.0.hypot(chord.1);
    if chord_len < 1e-6 {
        return Err(RegionError::DegenerateGeometry(
            "zero-length tangent segment".to_string(),
        ));
    }
    let chord_dir = (chord.0 / chord_len, chord.1 / chord_len);

    let max_dev = arc
        .iter()
        .map(|p| {
            let (vx, vy) = ((p.x - start.x) as f64, (p.y - start.y) as f64);
            (vx * chord_dir.1 - vy * chord_dir.0).abs()
        })
        .fold(0.0f64, f64::max);
    if max_dev / chord_len < straight_thresh as f64 {
        return Ok(chord_dir);
    }

    let mid = arc[arc.len() / 2];
    let Some(center) = circumcenter(start, mid, end) else {
        return Ok(chord_dir);
    };
    // perpendicular to the radius, oriented toward the arc
    let radius = (start.x as f64 - center.0, start.y as f64 - center.1);
    let mut t = (-radius.1, radius.0);
    let to_mid = ((mid.x - start.x) as f64, (mid.y - start.y) as f64);
    if t.0 * to_mid.0 + t.1 * to_mid.1 < 0.0 {
        t = (-t.0, -t.1);
    }
    let len = t.0.hypot(t.1);
    if len < 1e-9 {
        return Ok(chord_dir);
    }
    Ok((t.0 / len, t.1 / len))
}

fn circumcenter(a: Point32f, b: Point32f, c: Point32f) -> Option<(f64, f64)> {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (cx, cy) = (c.x as f64, c.y as f64);
    let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
    if d.abs() < 1e-9 {
        return None;
    }
    let a2 = ax * ax + ay * ay;
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
    let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;
    Some((ux, uy))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clockwise pixel contour of an axis-aligned rectangle
    fn rectangle(w: i32, h: i32) -> Vec<Point32f> {
        let mut pts = Vec::new();
        for x in 0..w {
            pts.push(Point32f::new(x as f32, 0.0));
        }
        for y in 1..h {
            pts.push(Point32f::new((w - 1) as f32, y as f32));
        }
        for x in (0..w - 1).rev() {
            pts.push(Point32f::new(x as f32, (h - 1) as f32));
        }
        for y in (1..h - 1).rev() {
            pts.push(Point32f::new(0.0, y as f32));
        }
        pts
    }

    fn circle(r: f32, n: usize) -> Vec<Point32f> {
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32 * std::f32::consts::TAU;
                Point32f::new(r * t.cos(), r * t.sin())
            })
            .collect()
    }

    #[test]
    fn test_gaussian_kernel() {
        let k = gaussian_kernel(3.0, 100.0, 1000);
        assert_eq!(k.len(), 21);
        assert!((k.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(k[10] > k[9] && k[9] > k[0]);
        // clamped for short contours
        assert_eq!(gaussian_kernel(3.0, 100.0, 7).len(), 7);
        assert_eq!(gaussian_kernel(0.0, 100.0, 50), vec![1.0]);
    }

    #[test]
    fn test_rectangle_has_four_corners() {
        let corners = detect_corners(&rectangle(40, 30), &CssParams::default());
        assert_eq!(corners.len(), 4);
        for c in &corners {
            assert!((c.angle - 90.0).abs() < 5.0, "angle {}", c.angle);
        }
        let positions: Vec<(f32, f32)> =
            corners.iter().map(|c| (c.position.x, c.position.y)).collect();
        assert!(positions.contains(&(0.0, 0.0)));
        assert!(positions.contains(&(39.0, 0.0)));
        assert!(positions.contains(&(39.0, 29.0)));
        assert!(positions.contains(&(0.0, 29.0)));
    }

    #[test]
    fn test_circle_has_no_corners() {
        let corners = detect_corners(&circle(40.0, 250), &CssParams::default());
        assert!(corners.is_empty(), "{:?}", corners);
    }

    #[test]
    fn test_degenerate_contours() {
        let params = CssParams::default();
        assert!(detect_corners(&[], &params).is_empty());
        assert!(detect_corners(&[Point32f::new(1.0, 1.0), Point32f::new(2.0, 1.0)], &params).is_empty());
        let same = vec![Point32f::new(3.0, 3.0); 10];
        assert!(detect_corners(&same, &params).is_empty());
    }

    #[test]
    fn test_arc_tangent_straight_and_curved() {
        let line: Vec<Point32f> = (0..10).map(|i| Point32f::new(i as f32, 0.0)).collect();
        let t = arc_tangent(&line, 0.1).unwrap();
        assert!((t.0 - 1.0).abs() < 1e-9 && t.1.abs() < 1e-9);

        // quarter circle starting at (10, 0) heading toward (0, 10)
        let arc: Vec<Point32f> = (0..=20)
            .map(|i| {
                let t = i as f32 / 20.0 * std::f32::consts::FRAC_PI_2;
                Point32f::new(10.0 * t.cos(), 10.0 * t.sin())
            })
            .collect();
        let t = arc_tangent(&arc, 0.1).unwrap();
        assert!(t.0.abs() < 1e-3 && (t.1 - 1.0).abs() < 1e-3, "{:?}", t);

        let point = vec![Point32f::new(1.0, 1.0); 3];
        assert!(matches!(
            arc_tangent(&point, 0.1),
            Err(RegionError::DegenerateGeometry(_))
        ));
    }
}
