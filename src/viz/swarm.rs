//! Point placement along the category axis: beeswarm and jittered strip.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lateral offsets (px) that keep markers of `radius` px from overlapping.
///
/// Points are placed in ascending `ys_px` order, each at the candidate offset
/// closest to the center that clears every already-placed neighbor. Offsets
/// beyond `max_offset` are clamped to it; the second value counts those.
pub fn beeswarm_offsets(ys_px: &[f64], radius: f64, max_offset: f64) -> (Vec<f64>, usize) {
    let diameter = 2.0 * radius;
    let mut order: Vec<usize> = (0..ys_px.len()).collect();
    order.sort_by(|a, b| ys_px[*a].total_cmp(&ys_px[*b]));

    let mut offsets = vec![0.0; ys_px.len()];
    let mut placed: Vec<(f64, f64)> = Vec::with_capacity(ys_px.len());
    let mut clamped = 0usize;

    for idx in order {
        let y = ys_px[idx];
        let neighbors: Vec<(f64, f64)> = placed
            .iter()
            .copied()
            .filter(|(_, py)| (py - y).abs() < diameter)
            .collect();

        let mut candidates = vec![0.0f64];
        for (px, py) in &neighbors {
            let dy = py - y;
            let dx = (diameter * diameter - dy * dy).max(0.0).sqrt();
            candidates.push(px + dx);
            candidates.push(px - dx);
        }
        candidates.sort_by(|a, b| a.abs().total_cmp(&b.abs()).then(a.total_cmp(b)));

        let clear = |x: f64| {
            neighbors.iter().all(|(px, py)| {
                let (dx, dy) = (x - px, y - py);
                dx * dx + dy * dy >= diameter * diameter - 1e-6
            })
        };
        let mut x = candidates.into_iter().find(|c| clear(*c)).unwrap_or(0.0);
        if x.abs() > max_offset {
            x = max_offset.copysign(x);
            clamped += 1;
        }
        offsets[idx] = x;
        placed.push((x, y));
    }
    (offsets, clamped)
}

/// Uniform offsets in `[-jitter, jitter]` from a seeded generator.
pub fn jitter_offsets(n: usize, jitter: f64, seed: u64) -> Vec<f64> {
    if jitter <= 0.0 {
        return vec![0.0; n];
    }
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(-jitter..=jitter)).collect()
}
