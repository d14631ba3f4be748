//! Detected regions and their lazily computed features
//!
//! The detector keeps the regions of its last run in a [`RegionArena`].
//! Callers hold [`Region`] handles and borrow [`RegionView`]s through the
//! detector; features are computed on first access and cached for the
//! lifetime of the run.

use std::cell::{OnceCell, RefCell};

use crate::boundary::{self, LabelMap};
use crate::css::{self, CssCorner, CssParams};
use crate::error::{RegionError, RegionResult};
use crate::features::{self, PcaInfo};
use crate::graph::RegionGraph;
use crate::scanline::ScanLine;
use icl_core::{Img, Point, Point32f, Rect, Size};

/// Handle to a region of one detection run.
///
/// Handles are plain indices tagged with the detector generation that
/// produced them. Resolving a handle after the next `detect` call fails
/// with [`RegionError::StaleRegion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub(crate) index: u32,
    pub(crate) generation: u64,
}

impl Region {
    /// Position of the region in the detector's list of all regions
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Detector generation this handle belongs to
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owned copy of the core data of a region; outlives re-detection.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSnapshot {
    pub id: usize,
    pub value: f64,
    pub size: usize,
    pub scanlines: Vec<ScanLine>,
    pub bounding_box: Rect,
}

/// Storage of one region with its feature caches
#[derive(Debug)]
pub(crate) struct RegionData {
    id: usize,
    value: f64,
    size: usize,
    /// Sorted by (y, x)
    scanlines: Vec<ScanLine>,
    bbox: OnceCell<Rect>,
    cog: OnceCell<Point32f>,
    pixels: OnceCell<Vec<Point>>,
    boundary: OnceCell<Vec<Point>>,
    thinned: OnceCell<Vec<Point>>,
    pca: OnceCell<PcaInfo>,
    corners: RefCell<Option<(CssParams, Vec<CssCorner>)>>,
}

impl RegionData {
    /// `scanlines` must be sorted by (y, x).
    pub fn new(id: usize, value: f64, scanlines: Vec<ScanLine>) -> Self {
        Self {
            id,
            value,
            size: features::pixel_count(&scanlines),
            scanlines,
            bbox: OnceCell::new(),
            cog: OnceCell::new(),
            pixels: OnceCell::new(),
            boundary: OnceCell::new(),
            thinned: OnceCell::new(),
            pca: OnceCell::new(),
            corners: RefCell::new(None),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Results of one detection run
#[derive(Debug, Default)]
pub(crate) struct RegionArena {
    /// All regions, indexed by region index
    pub regions: Vec<RegionData>,
    /// Indices of the regions passing the detector's filters
    pub filtered: Vec<u32>,
    /// Region index per ROI pixel
    pub map: Vec<u32>,
    pub roi: Rect,
    pub graph: Option<RegionGraph>,
    pub generation: u64,
}

impl RegionArena {
    /// Drop the previous run's regions and start generation `generation`.
    pub fn reset(&mut self, generation: u64) {
        self.regions.clear();
        self.filtered.clear();
        self.roi = Rect::default();
        self.graph = None;
        self.generation = generation;
    }

    pub fn handle(&self, index: u32) -> Region {
        Region {
            index,
            generation: self.generation,
        }
    }

    #[inline]
    pub fn view(&self, index: u32) -> RegionView<'_> {
        RegionView { arena: self, index }
    }

    pub fn resolve(&self, handle: Region) -> RegionResult<RegionView<'_>> {
        if handle.generation != self.generation {
            return Err(RegionError::StaleRegion {
                generation: handle.generation,
                current: self.generation,
            });
        }
        if handle.index as usize >= self.regions.len() {
            return Err(RegionError::UnknownRegion(handle.index as usize));
        }
        Ok(self.view(handle.index))
    }

    pub fn label_map(&self) -> LabelMap<'_> {
        LabelMap {
            labels: &self.map,
            roi: self.roi,
        }
    }

    fn graph(&self) -> RegionResult<&RegionGraph> {
        self.graph.as_ref().ok_or(RegionError::GraphUnavailable)
    }
}

/// Borrowed access to one region of the detector's last run
#[derive(Debug, Clone, Copy)]
pub struct RegionView<'a> {
    arena: &'a RegionArena,
    index: u32,
}

impl<'a> RegionView<'a> {
    #[inline]
    fn data(&self) -> &'a RegionData {
        &self.arena.regions[self.index as usize]
    }

    fn views(&self, indices: &[u32]) -> Vec<RegionView<'a>> {
        indices.iter().map(|&i| self.arena.view(i)).collect()
    }

    /// Handle of this region, valid until the next detection run
    pub fn handle(&self) -> Region {
        self.arena.handle(self.index)
    }

    /// Region id (dense over all regions of the run)
    pub fn id(&self) -> usize {
        self.data().id
    }

    /// Pixel value of the region
    pub fn value(&self) -> f64 {
        self.data().value
    }

    /// Number of pixels
    pub fn size(&self) -> usize {
        self.data().size
    }

    /// Scanlines, sorted top to bottom and left to right
    pub fn scanlines(&self) -> &'a [ScanLine] {
        &self.data().scanlines
    }

    pub fn bounding_box(&self) -> Rect {
        let data = self.data();
        *data.bbox.get_or_init(|| features::bounding_box(&data.scanlines))
    }

    /// Center of gravity
    pub fn cog(&self) -> Point32f {
        let data = self.data();
        *data.cog.get_or_init(|| features::center_of_gravity(&data.scanlines))
    }

    /// All pixels of the region, in scanline order
    pub fn pixels(&self) -> &'a [Point] {
        let data = self.data();
        data.pixels.get_or_init(|| features::expand_pixels(&data.scanlines))
    }

    /// Outer boundary, clockwise from the topmost-leftmost pixel
    pub fn boundary(&self) -> &'a [Point] {
        let data = self.data();
        data.boundary.get_or_init(|| {
            let first = data.scanlines[0];
            self.arena
                .label_map()
                .trace_boundary(Point::new(first.x, first.y), self.index)
        })
    }

    /// Boundary without detour points
    pub fn thinned_boundary(&self) -> &'a [Point] {
        let data = self.data();
        let boundary = self.boundary();
        data.thinned.get_or_init(|| boundary::thin_boundary(boundary))
    }

    /// Length of the closed boundary chain
    pub fn boundary_length(&self) -> f32 {
        boundary::chain_length(self.boundary())
    }

    /// `boundary_length^2 / (4 pi size)`; about 1 for discs, larger for
    /// elongated or ragged shapes.
    pub fn form_factor(&self) -> f32 {
        let len = self.boundary_length();
        len * len / (4.0 * std::f32::consts::PI * self.size() as f32)
    }

    pub fn pca_info(&self) -> PcaInfo {
        let data = self.data();
        *data.pca.get_or_init(|| features::pca(&data.scanlines))
    }

    /// Corners of the thinned boundary.
    ///
    /// The result is cached together with `params` and recomputed when
    /// called with different parameters.
    pub fn boundary_corners(&self, params: &CssParams) -> Vec<CssCorner> {
        let data = self.data();
        if let Some((cached, corners)) = data.corners.borrow().as_ref() {
            if cached == params {
                return corners.clone();
            }
        }

        let contour: Vec<Point32f> = self
            .thinned_boundary()
            .iter()
            .map(|&p| Point32f::from(p))
            .collect();
        let corners = css::detect_corners(&contour, params);
        *data.corners.borrow_mut() = Some((*params, corners.clone()));
        corners
    }

    /// Check if pixel (x, y) belongs to this region
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.arena.label_map().at(Point::new(x, y)) == Some(self.index)
    }

    /// Binary mask over the bounding box: 255 inside the region, 0 outside.
    pub fn mask(&self) -> RegionResult<Img<u8>> {
        let bb = self.bounding_box();
        let (w, h) = (bb.w as usize, bb.h as usize);
        let mut data = vec![0u8; w * h];
        for sl in self.scanlines() {
            let row = (sl.y - bb.y) as usize * w;
            let x = (sl.x - bb.x) as usize;
            data[row + x..row + x + sl.len as usize].fill(255);
        }
        Ok(Img::from_data(Size::new(bb.w as u32, bb.h as u32), data)?)
    }

    /// Owned copy of id, value, size, scanlines and bounding box
    pub fn snapshot(&self) -> RegionSnapshot {
        RegionSnapshot {
            id: self.id(),
            value: self.value(),
            size: self.size(),
            scanlines: self.scanlines().to_vec(),
            bounding_box: self.bounding_box(),
        }
    }

    /// Whether the region touches the border of the ROI
    pub fn is_border_region(&self) -> RegionResult<bool> {
        Ok(self.arena.graph()?.is_border[self.index as usize])
    }

    /// Adjacent regions, ordered by index
    pub fn neighbours(&self) -> RegionResult<Vec<RegionView<'a>>> {
        let graph = self.arena.graph()?;
        Ok(self.views(&graph.neighbours[self.index as usize]))
    }

    /// Regions enclosed by this region.
    ///
    /// With `direct_only` only the directly enclosed regions are returned,
    /// otherwise all descendants in depth-first order.
    pub fn sub_regions(&self, direct_only: bool) -> RegionResult<Vec<RegionView<'a>>> {
        let graph = self.arena.graph()?;
        let children = &graph.children[self.index as usize];
        if direct_only {
            return Ok(self.views(children));
        }

        let mut out = Vec::new();
        let mut stack: Vec<u32> = children.iter().rev().copied().collect();
        while let Some(r) = stack.pop() {
            out.push(r);
            stack.extend(graph.children[r as usize].iter().rev());
        }
        Ok(self.views(&out))
    }

    /// Directly enclosing region, `None` for top-level regions
    pub fn parent_region(&self) -> RegionResult<Option<RegionView<'a>>> {
        let graph = self.arena.graph()?;
        Ok(graph.parent[self.index as usize].map(|p| self.arena.view(p)))
    }

    /// Enclosing regions from the direct parent up to the top-level ancestor
    pub fn parent_tree(&self) -> RegionResult<Vec<RegionView<'a>>> {
        let graph = self.arena.graph()?;
        let mut chain = Vec::new();
        let mut cur = graph.parent[self.index as usize];
        while let Some(p) = cur {
            chain.push(p);
            cur = graph.parent[p as usize];
        }
        Ok(self.views(&chain))
    }
}
