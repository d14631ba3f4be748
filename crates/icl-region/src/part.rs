//! Region parts - the mergeable nodes of the labeling pass
//!
//! Every new run that cannot be attached to an existing part starts a new
//! [`RegionPart`]. When two runs touch, their parts are merged: the part
//! with fewer scanlines is absorbed, its scanlines move to the survivor and
//! its parent link is redirected. Parts live in an index arena, so merging
//! is a disjoint-set union with path compression.
//!
//! The arena keeps its parts (and their scanline buffers) across detection
//! runs; [`PartArena::clear`] only resets the active count.

use crate::scanline::ScanLine;

/// One union-find node
#[derive(Debug, Clone, Default)]
pub(crate) struct RegionPart {
    /// Scanlines owned by this part
    pub scanlines: Vec<ScanLine>,
    /// Union-find link; equal to the own index while the part is top-level
    parent: u32,
    /// Whether this part is the representative of its component
    pub top: bool,
}

/// Arena of region parts
#[derive(Debug, Default)]
pub(crate) struct PartArena {
    parts: Vec<RegionPart>,
    len: usize,
}

impl PartArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deactivate all parts, keeping their allocations.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Number of parts created since the last [`PartArena::clear`].
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of part slots allocated so far.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.parts.len()
    }

    /// Create a new top-level part and return its index.
    pub fn create(&mut self) -> u32 {
        let idx = self.len;
        if idx == self.parts.len() {
            self.parts.push(RegionPart::default());
        }
        let part = &mut self.parts[idx];
        part.scanlines.clear();
        part.parent = idx as u32;
        part.top = true;
        self.len += 1;
        idx as u32
    }

    #[inline]
    pub fn get(&self, idx: u32) -> &RegionPart {
        &self.parts[idx as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, idx: u32) -> &mut RegionPart {
        &mut self.parts[idx as usize]
    }

    /// Append a scanline to a part.
    #[inline]
    pub fn push_scanline(&mut self, idx: u32, scanline: ScanLine) {
        self.parts[idx as usize].scanlines.push(scanline);
    }

    /// Resolve a part to its current top-level representative.
    pub fn find(&mut self, idx: u32) -> u32 {
        let mut root = idx;
        while self.parts[root as usize].parent != root {
            root = self.parts[root as usize].parent;
        }

        // collapse the chain
        let mut cur = idx;
        while self.parts[cur as usize].parent != root {
            let next = self.parts[cur as usize].parent;
            self.parts[cur as usize].parent = root;
            cur = next;
        }

        root
    }

    /// Merge the components of `a` and `b` and return the survivor.
    ///
    /// Both arguments are resolved first, so merging into a part that was
    /// absorbed earlier ends up at its current representative. The part with
    /// more scanlines survives; on ties the older part does.
    pub fn merge(&mut self, a: u32, b: u32) -> u32 {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }

        let (na, nb) = (self.get(ra).scanlines.len(), self.get(rb).scanlines.len());
        let (survivor, absorbed) = if na > nb || (na == nb && ra < rb) {
            (ra, rb)
        } else {
            (rb, ra)
        };

        let (kept, gone) = self.pair_mut(survivor as usize, absorbed as usize);
        kept.scanlines.append(&mut gone.scanlines);
        gone.parent = survivor;
        gone.top = false;

        survivor
    }

    fn pair_mut(&mut self, i: usize, j: usize) -> (&mut RegionPart, &mut RegionPart) {
        debug_assert_ne!(i, j);
        if i < j {
            let (lo, hi) = self.parts.split_at_mut(j);
            (&mut lo[i], &mut hi[0])
        } else {
            let (lo, hi) = self.parts.split_at_mut(i);
            (&mut hi[0], &mut lo[j])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with(n: usize) -> PartArena {
        let mut arena = PartArena::new();
        for i in 0..n {
            let idx = arena.create();
            arena.push_scanline(idx, ScanLine::new(i as i32, 0, 1));
        }
        arena
    }

    #[test]
    fn test_create_and_find() {
        let mut arena = arena_with(3);
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.find(2), 2);
        assert!(arena.get(1).top);
    }

    #[test]
    fn test_merge_moves_scanlines() {
        let mut arena = arena_with(3);
        arena.push_scanline(2, ScanLine::new(2, 1, 1));

        let s = arena.merge(0, 2);
        assert_eq!(s, 2);
        assert_eq!(arena.get(2).scanlines.len(), 3);
        assert!(arena.get(0).scanlines.is_empty());
        assert!(!arena.get(0).top);
        assert_eq!(arena.find(0), 2);
    }

    #[test]
    fn test_merge_is_transitive() {
        let mut arena = arena_with(4);
        arena.merge(0, 1);
        arena.merge(2, 3);
        // 1 and 3 were absorbed; merging them must reach their representatives
        let s = arena.merge(1, 3);
        for i in 0..4 {
            assert_eq!(arena.find(i), s);
        }
        assert_eq!(arena.get(s).scanlines.len(), 4);
        assert_eq!((0..4).filter(|&i| arena.get(i).top).count(), 1);
        assert_eq!(arena.merge(0, 3), s);
    }

    #[test]
    fn test_clear_reuses_slots() {
        let mut arena = arena_with(5);
        arena.merge(0, 4);
        arena.clear();
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.capacity(), 5);

        let idx = arena.create();
        assert_eq!(idx, 0);
        assert!(arena.get(0).scanlines.is_empty());
        assert!(arena.get(0).top);
        assert_eq!(arena.find(0), 0);
    }
}
