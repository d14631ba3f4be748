//! Region adjacency graph
//!
//! Built from the region-index map after extraction. Two regions are
//! neighbours when some pixel of one is the left or upper neighbour of a
//! pixel of the other. Regions touching the ROI border are flagged and are
//! adjacent to a synthetic outside node.
//!
//! Nesting is derived from the neighbour graph: the parent of a region is
//! its immediate dominator when the graph is rooted at the outside node,
//! i.e. the innermost region that every path from the border has to cross.
//! Dominators are computed with the iterative algorithm of Cooper, Harvey
//! and Kennedy.

/// Neighbour relation, border flags and nesting forest of one detection run
#[derive(Debug, Clone, Default)]
pub(crate) struct RegionGraph {
    /// Sorted neighbour indices per region
    pub neighbours: Vec<Vec<u32>>,
    pub is_border: Vec<bool>,
    /// Enclosing region, `None` for top-level regions
    pub parent: Vec<Option<u32>>,
    /// Directly enclosed regions, ascending
    pub children: Vec<Vec<u32>>,
}

impl RegionGraph {
    /// Build the graph for `n` regions from a `w x h` region-index map.
    pub fn build(map: &[u32], w: usize, h: usize, n: usize) -> Self {
        debug_assert_eq!(map.len(), w * h);
        let is_border = border_flags(map, w, h, n);
        let neighbours = neighbour_lists(map, w, h, n);
        let parent = nesting(&neighbours, &is_border);

        let mut children = vec![Vec::new(); n];
        for (child, p) in parent.iter().enumerate() {
            if let Some(p) = p {
                children[*p as usize].push(child as u32);
            }
        }

        Self {
            neighbours,
            is_border,
            parent,
            children,
        }
    }

    /// Number of undirected neighbour edges
    pub fn edge_count(&self) -> usize {
        self.neighbours.iter().map(Vec::len).sum::<usize>() / 2
    }
}

fn border_flags(map: &[u32], w: usize, h: usize, n: usize) -> Vec<bool> {
    let mut flags = vec![false; n];
    if w == 0 || h == 0 {
        return flags;
    }
    for x in 0..w {
        flags[map[x] as usize] = true;
        flags[map[(h - 1) * w + x] as usize] = true;
    }
    for y in 0..h {
        flags[map[y * w] as usize] = true;
        flags[map[y * w + w - 1] as usize] = true;
    }
    flags
}

fn neighbour_lists(map: &[u32], w: usize, h: usize, n: usize) -> Vec<Vec<u32>> {
    let mut edges: Vec<(u32, u32)> = Vec::new();
    let mut add = |a: u32, b: u32| {
        if a != b {
            let e = (a.min(b), a.max(b));
            // runs along a shared border repeat the same pair
            if edges.last() != Some(&e) {
                edges.push(e);
            }
        }
    };

    for y in 0..h {
        let row = y * w;
        for x in 0..w {
            let r = map[row + x];
            if x > 0 {
                add(r, map[row + x - 1]);
            }
            if y > 0 {
                add(r, map[row - w + x]);
            }
        }
    }

    edges.sort_unstable();
    edges.dedup();

    let mut lists = vec![Vec::new(); n];
    for (a, b) in edges {
        lists[a as usize].push(b);
        lists[b as usize].push(a);
    }
    for list in &mut lists {
        list.sort_unstable();
    }
    lists
}

/// Immediate dominators of all regions, rooted at the outside node `n`.
fn nesting(neighbours: &[Vec<u32>], is_border: &[bool]) -> Vec<Option<u32>> {
    let n = neighbours.len();
    let root = n;
    let succ = |v: usize| -> Vec<usize> {
        if v == root {
            (0..n).filter(|&r| is_border[r]).collect()
        } else {
            neighbours[v].iter().map(|&r| r as usize).collect()
        }
    };

    // iterative DFS for postorder numbers
    const UNVISITED: usize = usize::MAX;
    let mut post = vec![UNVISITED; n + 1];
    let mut order = Vec::with_capacity(n + 1);
    let mut visited = vec![false; n + 1];
    let mut stack: Vec<(usize, Vec<usize>, usize)> = vec![(root, succ(root), 0)];
    visited[root] = true;
    while let Some((v, next, i)) = stack.last_mut() {
        if *i < next.len() {
            let s = next[*i];
            *i += 1;
            if !visited[s] {
                visited[s] = true;
                let s_next = succ(s);
                stack.push((s, s_next, 0));
            }
        } else {
            post[*v] = order.len();
            order.push(*v);
            stack.pop();
        }
    }

    let mut idom = vec![UNVISITED; n + 1];
    idom[root] = root;
    let intersect = |idom: &[usize], mut a: usize, mut b: usize| {
        while a != b {
            while post[a] < post[b] {
                a = idom[a];
            }
            while post[b] < post[a] {
                b = idom[b];
            }
        }
        a
    };

    let mut changed = true;
    while changed {
        changed = false;
        // reverse postorder, root excluded
        for &v in order.iter().rev().skip(1) {
            let preds = neighbours[v]
                .iter()
                .map(|&r| r as usize)
                .chain(is_border[v].then_some(root));
            let mut new_idom = UNVISITED;
            for p in preds {
                if idom[p] == UNVISITED {
                    continue;
                }
                new_idom = if new_idom == UNVISITED {
                    p
                } else {
                    intersect(&idom, p, new_idom)
                };
            }
            if new_idom != UNVISITED && idom[v] != new_idom {
                idom[v] = new_idom;
                changed = true;
            }
        }
    }

    (0..n)
        .map(|v| match idom[v] {
            d if d == root || d == UNVISITED => None,
            d => Some(d as u32),
        })
        .collect()
}
