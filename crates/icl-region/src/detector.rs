//! Connected-component region detector
//!
//! [`RegionDetector`] partitions the ROI of a single-channel image into
//! maximal 4-connected regions of equal pixels. A detection run consists of
//!
//! 1. the labeling pass, which builds region parts from scanlines,
//! 2. extraction, which turns every top-level part into a region and applies
//!    the size and value filters,
//! 3. optionally, the adjacency graph (neighbours, border flags, nesting).
//!
//! The detector owns all buffers and reuses them across runs. Regions of a
//! run are reachable through [`Region`] handles until the next run.

use crate::error::{RegionError, RegionResult};
use crate::graph::RegionGraph;
use crate::labeling::label_runs;
use crate::part::PartArena;
use crate::region::{Region, RegionArena, RegionData, RegionView};
use icl_core::{Img, Pixel, Point, Rect};

/// Options for region detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionDetectorOptions {
    /// Minimum region size in pixels (inclusive)
    pub min_size: usize,
    /// Maximum region size in pixels (inclusive)
    pub max_size: usize,
    /// Minimum region value (inclusive)
    pub min_value: f64,
    /// Maximum region value (inclusive)
    pub max_value: f64,
    /// Build neighbour and nesting information
    pub build_graph: bool,
}

impl Default for RegionDetectorOptions {
    fn default() -> Self {
        Self {
            min_size: 0,
            max_size: 2 << 20,
            min_value: 0.0,
            max_value: 255.0,
            build_graph: false,
        }
    }
}

impl RegionDetectorOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accepted region size range
    pub fn with_size_range(mut self, min: usize, max: usize) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    /// Set the accepted region value range
    pub fn with_value_range(mut self, min: f64, max: f64) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Enable or disable graph building
    pub fn with_build_graph(mut self, build_graph: bool) -> Self {
        self.build_graph = build_graph;
        self
    }

    fn accepts(&self, size: usize, value: f64) -> bool {
        (self.min_size..=self.max_size).contains(&size)
            && value >= self.min_value
            && value <= self.max_value
    }
}

/// Connected-component region detector
#[derive(Debug, Default)]
pub struct RegionDetector {
    options: RegionDetectorOptions,
    parts: PartArena,
    /// Region index per part, `u32::MAX` for absorbed parts
    part_region: Vec<u32>,
    arena: RegionArena,
    generation: u64,
}

impl RegionDetector {
    /// Create a detector with the given options
    pub fn new(options: RegionDetectorOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Replace all filter and graph options at once.
    pub fn configure(
        &mut self,
        min_size: usize,
        max_size: usize,
        min_value: f64,
        max_value: f64,
        build_graph: bool,
    ) {
        self.options = RegionDetectorOptions {
            min_size,
            max_size,
            min_value,
            max_value,
            build_graph,
        };
    }

    /// Current options
    pub fn options(&self) -> &RegionDetectorOptions {
        &self.options
    }

    /// Number of completed detection runs (including rejected ones)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Detect regions of equal pixels.
    ///
    /// Returns handles to the regions passing the size and value filters.
    /// Invalid input (more or less than one channel, empty ROI) is logged and
    /// yields no regions; use [`RegionDetector::try_detect`] to get the error.
    pub fn detect<T: Pixel>(&mut self, img: &Img<T>) -> Vec<Region> {
        self.detect_with(img, |a: T, b: T| a == b)
    }

    /// Like [`RegionDetector::detect`], with a custom equality predicate.
    ///
    /// The predicate is only evaluated between 4-neighbours, so a tolerance
    /// predicate may chain values that are further apart than the tolerance.
    pub fn detect_with<T, F>(&mut self, img: &Img<T>, eq: F) -> Vec<Region>
    where
        T: Pixel,
        F: Fn(T, T) -> bool,
    {
        match self.try_detect_with(img, eq) {
            Ok(regions) => regions,
            Err(e) => {
                log::warn!("region detection skipped: {}", e);
                Vec::new()
            }
        }
    }

    /// Detect regions, reporting invalid input as an error.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidInput`] if the image does not have
    /// exactly one channel or its ROI is empty.
    pub fn try_detect<T: Pixel>(&mut self, img: &Img<T>) -> RegionResult<Vec<Region>> {
        self.try_detect_with(img, |a: T, b: T| a == b)
    }

    /// Fallible variant of [`RegionDetector::detect_with`].
    pub fn try_detect_with<T, F>(&mut self, img: &Img<T>, eq: F) -> RegionResult<Vec<Region>>
    where
        T: Pixel,
        F: Fn(T, T) -> bool,
    {
        // every run invalidates the previous one, even a rejected run
        self.generation += 1;
        self.arena.reset(self.generation);

        if img.channels() != 1 {
            return Err(RegionError::InvalidInput(format!(
                "expected 1 channel, got {}",
                img.channels()
            )));
        }
        let roi = img.roi();
        let bounds = Rect::new_unchecked(0, 0, img.width() as i32, img.height() as i32);
        if roi.is_empty() || !bounds.contains_rect(&roi) {
            return Err(RegionError::InvalidInput(format!(
                "ROI {:?} selects no pixels of a {}x{} image",
                roi,
                img.width(),
                img.height()
            )));
        }
        let data = img
            .channel(0)
            .ok_or_else(|| RegionError::InvalidInput("missing channel 0".to_string()))?;
        let stride = img.width() as usize;

        self.parts.clear();
        label_runs(data, stride, roi, &eq, &mut self.parts, &mut self.arena.map);
        self.extract(data, stride, roi);

        if self.options.build_graph {
            if roi.w >= 2 && roi.h >= 2 {
                let (w, h) = (roi.w as usize, roi.h as usize);
                let n = self.arena.regions.len();
                self.arena.graph = Some(RegionGraph::build(&self.arena.map, w, h, n));
            } else {
                log::debug!("ROI {:?} too small for a region graph", roi);
            }
        }

        log::debug!(
            "detected {} regions ({} filtered) from {} parts ({} slots) in ROI {:?}, graph edges: {}",
            self.arena.regions.len(),
            self.arena.filtered.len(),
            self.parts.len(),
            self.parts.capacity(),
            roi,
            self.arena.graph.as_ref().map_or(0, RegionGraph::edge_count)
        );

        Ok(self
            .arena
            .filtered
            .iter()
            .map(|&i| self.arena.handle(i))
            .collect())
    }

    /// Convert top-level parts into regions and resolve the label buffer
    /// into a region-index map.
    fn extract<T: Pixel>(&mut self, data: &[T], stride: usize, roi: Rect) {
        let arena = &mut self.arena;
        arena.roi = roi;
        self.part_region.clear();
        self.part_region.resize(self.parts.len(), u32::MAX);

        for p in 0..self.parts.len() as u32 {
            let part = self.parts.get_mut(p);
            if !part.top {
                continue;
            }
            part.scanlines.sort_unstable_by_key(|s| (s.y, s.x));
            let first = part.scanlines[0];
            let value: f64 = data[first.y as usize * stride + first.x as usize].into();

            let index = arena.regions.len() as u32;
            let region = RegionData::new(index as usize, value, part.scanlines.clone());
            if self.options.accepts(region.size(), region.value()) {
                arena.filtered.push(index);
            }
            arena.regions.push(region);
            self.part_region[p as usize] = index;
        }

        for label in arena.map.iter_mut() {
            *label = self.part_region[self.parts.find(*label) as usize];
        }
    }

    /// Resolve a handle of the current run.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::StaleRegion`] for handles of earlier runs and
    /// [`RegionError::UnknownRegion`] for indices out of range.
    pub fn region(&self, handle: Region) -> RegionResult<RegionView<'_>> {
        self.arena.resolve(handle)
    }

    /// All regions of the last run, including filtered-out ones, by id
    pub fn all_regions(&self) -> Vec<RegionView<'_>> {
        (0..self.arena.regions.len() as u32)
            .map(|i| self.arena.view(i))
            .collect()
    }

    /// Regions of the last run that passed the filters
    pub fn filtered_regions(&self) -> Vec<RegionView<'_>> {
        self.arena
            .filtered
            .iter()
            .map(|&i| self.arena.view(i))
            .collect()
    }

    /// Region containing pixel (x, y), `None` outside the last run's ROI
    pub fn region_at(&self, x: i32, y: i32) -> Option<RegionView<'_>> {
        self.arena
            .label_map()
            .at(Point::new(x, y))
            .map(|i| self.arena.view(i))
    }

    /// Whether the last run built neighbour and nesting information
    pub fn has_graph(&self) -> bool {
        self.arena.graph.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icl_core::Size;

    fn image(w: u32, h: u32, data: &[u8]) -> Img<u8> {
        Img::from_data(Size::new(w, h), data.to_vec()).unwrap()
    }

    fn graph_detector() -> RegionDetector {
        RegionDetector::new(RegionDetectorOptions::new().with_build_graph(true))
    }

    #[test]
    fn test_uniform_image() {
        let mut det = RegionDetector::default();
        let regions = det.detect(&image(4, 4, &[7; 16]));
        assert_eq!(regions.len(), 1);
        let r = det.region(regions[0]).unwrap();
        assert_eq!(r.size(), 16);
        assert_eq!(r.value(), 7.0);
        assert_eq!(r.bounding_box(), Rect::new_unchecked(0, 0, 4, 4));
        assert_eq!(r.id(), 0);
    }

    #[test]
    fn test_single_row() {
        let mut det = graph_detector();
        let regions = det.detect(&image(2, 1, &[1, 2]));
        assert_eq!(regions.len(), 2);
        for h in &regions {
            assert_eq!(det.region(*h).unwrap().size(), 1);
        }
        // too thin for a graph
        assert!(!det.has_graph());
        let r = det.region(regions[0]).unwrap();
        assert_eq!(r.neighbours().unwrap_err(), RegionError::GraphUnavailable);
    }

    #[test]
    fn test_checkerboard() {
        let data: Vec<u8> = (0..16).map(|i| ((i % 4 + i / 4) % 2) as u8).collect();
        let mut det = graph_detector();
        let regions = det.detect(&image(4, 4, &data));
        assert_eq!(regions.len(), 16);

        let border = det
            .all_regions()
            .iter()
            .filter(|r| r.is_border_region().unwrap())
            .count();
        assert_eq!(border, 12);
        assert!(det.all_regions().iter().all(|r| r.size() == 1));
        assert!(!det.region_at(1, 1).unwrap().is_border_region().unwrap());
    }

    #[test]
    fn test_framed_interior() {
        #[rustfmt::skip]
        let data = [
            0, 0, 0, 0, 0,
            0, 1, 1, 1, 0,
            0, 1, 1, 1, 0,
            0, 1, 1, 1, 0,
            0, 0, 0, 0, 0,
        ];
        let mut det = graph_detector();
        det.detect(&image(5, 5, &data));
        let frame = det.region_at(0, 0).unwrap();
        let interior = det.region_at(2, 2).unwrap();

        let ids: Vec<usize> = interior.neighbours().unwrap().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![frame.id()]);
        let ids: Vec<usize> = frame.neighbours().unwrap().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![interior.id()]);
        assert!(frame.is_border_region().unwrap());
        assert!(!interior.is_border_region().unwrap());
        assert_eq!(interior.parent_region().unwrap().map(|r| r.id()), Some(frame.id()));
    }

    #[test]
    fn test_filters() {
        let data = [0u8, 0, 0, 9, 200, 200];
        let img = image(6, 1, &data);

        let mut det = RegionDetector::new(RegionDetectorOptions::new().with_size_range(2, 10));
        let regions = det.detect(&img);
        let sizes: Vec<usize> = regions.iter().map(|&h| det.region(h).unwrap().size()).collect();
        assert_eq!(sizes, vec![3, 2]);
        assert_eq!(det.all_regions().len(), 3);

        det.configure(0, 100, 5.0, 100.0, false);
        let regions = det.detect(&img);
        assert_eq!(regions.len(), 1);
        assert_eq!(det.region(regions[0]).unwrap().value(), 9.0);
        assert_eq!(det.filtered_regions().len(), 1);
    }

    #[test]
    fn test_stale_and_unknown_handles() {
        let mut det = RegionDetector::default();
        let img = image(2, 2, &[1, 2, 3, 4]);
        let first = det.detect(&img);
        assert_eq!(det.generation(), 1);
        let second = det.detect(&img);

        assert_eq!(
            det.region(first[0]).unwrap_err(),
            RegionError::StaleRegion { generation: 1, current: 2 }
        );
        assert!(det.region(second[0]).is_ok());

        let bogus = Region { index: 99, generation: det.generation() };
        assert_eq!(det.region(bogus).unwrap_err(), RegionError::UnknownRegion(99));
    }

    #[test]
    fn test_invalid_input() {
        let mut det = RegionDetector::default();
        det.detect(&image(2, 2, &[1, 1, 1, 1]));

        let two = Img::<u8>::new(Size::new(3, 3), 2).unwrap();
        assert!(matches!(det.try_detect(&two), Err(RegionError::InvalidInput(_))));
        assert!(det.all_regions().is_empty());
        assert!(det.detect(&two).is_empty());

        let mut empty = image(3, 3, &[0; 9]);
        empty.set_roi(Rect::new_unchecked(1, 1, 0, 2)).unwrap();
        assert!(matches!(det.try_detect(&empty), Err(RegionError::InvalidInput(_))));
        assert!(det.region_at(1, 1).is_none());
    }

    #[test]
    fn test_roi_offset() {
        #[rustfmt::skip]
        let data = [
            5, 5, 5, 5,
            5, 1, 1, 5,
            5, 1, 2, 5,
            5, 5, 5, 5,
        ];
        let img = image(4, 4, &data)
            .with_roi(Rect::new_unchecked(1, 1, 2, 2))
            .unwrap();
        let mut det = graph_detector();
        let regions = det.detect(&img);
        assert_eq!(regions.len(), 2);

        let ones = det.region_at(1, 1).unwrap();
        assert_eq!(ones.size(), 3);
        assert_eq!(ones.bounding_box(), Rect::new_unchecked(1, 1, 2, 2));
        assert!(det.region_at(0, 0).is_none());
        // the ROI border counts as image border
        assert!(ones.is_border_region().unwrap());
        assert!(det.region_at(2, 2).unwrap().is_border_region().unwrap());
    }

    #[test]
    fn test_detect_with_tolerance() {
        let data = [10u8, 11, 12, 13, 60, 61, 62, 63];
        let img = image(4, 2, &data);
        let mut det = RegionDetector::default();
        let near = |a: u8, b: u8| a.abs_diff(b) <= 2;

        assert_eq!(det.detect(&img).len(), 8);
        let regions = det.detect_with(&img, near);
        assert_eq!(regions.len(), 2);
        let first = det.region(regions[0]).unwrap();
        assert_eq!(first.size(), 4);
        assert_eq!(first.value(), 10.0);
    }

    #[test]
    fn test_buffers_are_reused() {
        let mut det = RegionDetector::default();
        let noisy: Vec<u8> = (0..64).map(|i| (i * 7 % 3) as u8).collect();
        det.detect(&image(8, 8, &noisy));
        let slots = det.parts.capacity();
        det.detect(&image(2, 2, &[1, 1, 1, 1]));
        assert_eq!(det.parts.capacity(), slots);
        assert_eq!(det.all_regions().len(), 1);
    }
}
