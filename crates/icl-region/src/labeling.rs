//! Scanline labeling pass
//!
//! Converts the ROI of a single-channel image into region parts in one
//! row-major pass. Each pixel is compared with its left neighbour (same
//! row) and its upper neighbour (previous row):
//!
//! - equal to neither: the current run is closed, a new part starts
//! - equal to the left pixel only: the run is extended
//! - equal to the upper pixel only: a new run starts on the upper part
//! - equal to both: the run is extended and, if the upper pixel belongs to
//!   another component, the two components are merged
//!
//! The label buffer holds one part index per ROI pixel. Indices written
//! before a merge are not rewritten; they are resolved through
//! [`PartArena::find`] whenever they are read.

use crate::part::PartArena;
use crate::scanline::ScanLine;
use icl_core::{Pixel, Rect};

/// Label the pixels inside `roi` of `data` (row stride `stride`).
///
/// `lim` is resized to `roi.w * roi.h`; on return it holds, for every ROI
/// pixel, the index of a part of the pixel's component. `parts` must be
/// cleared by the caller.
pub(crate) fn label_runs<T, F>(
    data: &[T],
    stride: usize,
    roi: Rect,
    eq: &F,
    parts: &mut PartArena,
    lim: &mut Vec<u32>,
) where
    T: Pixel,
    F: Fn(T, T) -> bool,
{
    let w = roi.w as usize;
    let h = roi.h as usize;
    lim.clear();
    lim.resize(w * h, 0);
    if w == 0 || h == 0 {
        return;
    }

    let x0 = roi.x as usize;
    let y0 = roi.y as usize;

    for iy in 0..h {
        let row = (y0 + iy) * stride + x0;
        let lim_row = iy * w;
        // ROI offset of the row above, if any
        let above = (iy > 0).then(|| row - stride);

        let mut run_start = 0usize;
        let mut run_part = match above {
            Some(up) if eq(data[row], data[up]) => parts.find(lim[lim_row - w]),
            _ => parts.create(),
        };

        for ix in 1..w {
            let v = data[row + ix];
            let up_label = above
                .filter(|&up| eq(v, data[up + ix]))
                .map(|_| lim[lim_row - w + ix]);

            if eq(v, data[row + ix - 1]) {
                if let Some(label) = up_label {
                    let up_part = parts.find(label);
                    if up_part != run_part {
                        let survivor = parts.merge(run_part, up_part);
                        log::trace!(
                            "merge at ({}, {}): parts {} + {} -> {}",
                            x0 + ix,
                            y0 + iy,
                            run_part,
                            up_part,
                            survivor
                        );
                        run_part = survivor;
                    }
                }
            } else {
                close_run(parts, lim, run_part, roi, iy, run_start, ix);
                run_start = ix;
                run_part = match up_label {
                    Some(label) => parts.find(label),
                    None => parts.create(),
                };
            }
        }

        close_run(parts, lim, run_part, roi, iy, run_start, w);
    }
}

/// Attach the run `[start, end)` of ROI row `iy` to `part`.
fn close_run(
    parts: &mut PartArena,
    lim: &mut [u32],
    part: u32,
    roi: Rect,
    iy: usize,
    start: usize,
    end: usize,
) {
    parts.push_scanline(
        part,
        ScanLine::new(
            roi.x + start as i32,
            roi.y + iy as i32,
            (end - start) as i32,
        ),
    );
    let lim_row = iy * roi.w as usize;
    lim[lim_row + start..lim_row + end].fill(part);
}
