//! Randomized region detector properties
//!
//! Partition, connectivity, neighbour symmetry, size consistency,
//! idempotence and filter correctness on seeded random images.

use std::collections::{HashSet, VecDeque};

use icl_core::{Img, Point, Rect, Size};
use icl_region::{RegionDetector, RegionDetectorOptions, RegionError, RegionView};
use icl_test::RegParams;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEED: u64 = 0x1c1_5eed;

/// Random image with few distinct values, so that regions grow large
fn random_image(rng: &mut StdRng) -> Img<u8> {
    let w = rng.random_range(1..24u32);
    let h = rng.random_range(1..24u32);
    let levels = rng.random_range(2..5u8);
    let data = (0..w * h).map(|_| rng.random_range(0..levels)).collect();
    let mut img = Img::from_data(Size::new(w, h), data).unwrap();

    if rng.random_bool(0.5) {
        let x = rng.random_range(0..w as i32);
        let y = rng.random_range(0..h as i32);
        let rw = rng.random_range(1..=w as i32 - x);
        let rh = rng.random_range(1..=h as i32 - y);
        img.set_roi(Rect::new_unchecked(x, y, rw, rh)).unwrap();
    }
    img
}

/// Check that all pixels of `region` are 4-connected through the region
fn is_connected(region: &RegionView<'_>) -> bool {
    let pixels: HashSet<Point> = region.pixels().iter().copied().collect();
    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([region.pixels()[0]]);
    seen.insert(region.pixels()[0]);
    while let Some(p) = queue.pop_front() {
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let q = p.offset(dx, dy);
            if pixels.contains(&q) && seen.insert(q) {
                queue.push_back(q);
            }
        }
    }
    seen.len() == pixels.len()
}

#[test]
fn properties_reg() {
    let mut rp = RegParams::new("properties");
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut det = RegionDetector::new(RegionDetectorOptions::new().with_build_graph(true));

    for round in 0..40 {
        let img = random_image(&mut rng);
        let roi = img.roi();
        det.detect(&img);
        let regions = det.all_regions();

        // --- partition ---
        let mut covered = HashSet::new();
        let mut overlap = false;
        for r in &regions {
            for &p in r.pixels() {
                overlap |= !covered.insert(p);
            }
        }
        let in_roi = covered.iter().all(|p| roi.contains_point(p.x, p.y));
        rp.check(!overlap, "regions are disjoint");
        rp.check(in_roi, "regions stay inside the ROI");
        rp.compare_values(roi.area() as f64, covered.len() as f64, 0.0);

        for r in &regions {
            // --- size and value ---
            let sum: i32 = r.scanlines().iter().map(|s| s.len).sum();
            rp.compare_values(sum as f64, r.size() as f64, 0.0);
            let first = r.scanlines()[0];
            let v = img.get(first.x, first.y, 0).unwrap();
            rp.compare_values(v as f64, r.value(), 0.0);
            rp.check(
                r.pixels().iter().all(|p| img.get(p.x, p.y, 0) == Some(v)),
                "regions are uniform",
            );

            // --- connectivity ---
            rp.check(is_connected(r), "regions are 4-connected");

            // --- lookup ---
            rp.check(
                r.pixels()
                    .iter()
                    .all(|p| det.region_at(p.x, p.y).map(|q| q.id()) == Some(r.id())),
                "region_at resolves every pixel",
            );
        }

        // --- neighbour symmetry ---
        if det.has_graph() {
            for a in &regions {
                for b in a.neighbours().unwrap() {
                    let back = b.neighbours().unwrap().iter().any(|c| c.id() == a.id());
                    rp.check(back, "neighbour relation is symmetric");
                    rp.check(a.value() != b.value(), "neighbours differ in value");
                }
            }
        } else {
            rp.check(roi.w < 2 || roi.h < 2, "graph only skipped for thin ROIs");
        }

        if rp.display() {
            eprintln!("  round {}: roi {:?}, {} regions", round, roi, regions.len());
        }
    }

    assert!(rp.cleanup());
}

#[test]
fn idempotence_reg() {
    let mut rp = RegParams::new("idempotence");
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    let mut det = RegionDetector::default();

    for _ in 0..20 {
        let img = random_image(&mut rng);
        det.detect(&img);
        let first: Vec<_> = det.all_regions().iter().map(|r| r.snapshot()).collect();
        let handles = det.detect(&img);
        let second: Vec<_> = det.all_regions().iter().map(|r| r.snapshot()).collect();
        rp.check(first == second, "re-detection yields identical regions");
        rp.compare_values(first.len() as f64, handles.len() as f64, 0.0);
    }

    assert!(rp.cleanup());
}

#[test]
fn filter_reg() {
    let mut rp = RegParams::new("filter");
    let mut rng = StdRng::seed_from_u64(SEED + 2);
    let mut det = RegionDetector::default();

    for _ in 0..20 {
        let img = random_image(&mut rng);
        let min_size = rng.random_range(0..4usize);
        let max_size = rng.random_range(min_size..min_size + 30);
        let min_value = rng.random_range(0..3u8) as f64;
        let max_value = min_value + rng.random_range(0..3u8) as f64;
        det.configure(min_size, max_size, min_value, max_value, false);

        let handles = det.detect(&img);
        let accepted: HashSet<usize> = handles.iter().map(|h| h.index()).collect();
        for r in det.all_regions() {
            let ok = (min_size..=max_size).contains(&r.size())
                && r.value() >= min_value
                && r.value() <= max_value;
            rp.check(ok == accepted.contains(&r.id()), "filter matches the bounds");
        }
        let filtered: Vec<usize> = det.filtered_regions().iter().map(|r| r.id()).collect();
        let mut expected: Vec<usize> = accepted.into_iter().collect();
        expected.sort_unstable();
        rp.check(filtered == expected, "filtered_regions matches detect");
    }

    assert!(rp.cleanup());
}

#[test]
fn stale_handle_reg() {
    let mut rp = RegParams::new("stale_handle");
    let mut rng = StdRng::seed_from_u64(SEED + 3);
    let mut det = RegionDetector::default();

    let img = random_image(&mut rng);
    let old = det.detect(&img);
    let snapshot = det.region(old[0]).unwrap().snapshot();
    let new = det.detect(&img);

    rp.check(
        matches!(det.region(old[0]), Err(RegionError::StaleRegion { .. })),
        "old handles are stale",
    );
    rp.check(det.region(new[0]).is_ok(), "new handles resolve");
    rp.check(
        det.region(new[0]).unwrap().snapshot() == snapshot,
        "snapshot survives re-detection",
    );
    rp.compare_values(2.0, det.generation() as f64, 0.0);

    assert!(rp.cleanup());
}
