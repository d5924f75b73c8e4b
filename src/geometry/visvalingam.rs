use std::cmp::Ordering;
use std::collections::BinaryHeap;

use geo_types::Coord;

/// Vertex budget for a boundary of `length` raw vertices under a maximum
/// budget of `max_vertices`. The tanh taper keeps short boundaries close
/// to their raw count while capping long ones at the budget.
pub fn target_vertex_count(length: usize, max_vertices: usize) -> usize {
    if max_vertices == 0 {
        return 0;
    }
    let v = max_vertices as f64;
    (v * (length as f64 / v).tanh()).floor() as usize
}

/// Visvalingam-Wyatt simplification of a vertex sequence down to at most
/// `target` vertices. The first and last vertices are pinned, so a closed
/// ring stays closed. Returns the input unchanged when it is already at or
/// under the target.
pub fn simplify(points: &[Coord<f64>], target: usize) -> Vec<Coord<f64>> {
    if points.len() <= target || points.len() <= 2 {
        return points.to_vec();
    }
    let target = target.max(2);

    let n = points.len();
    let mut prev: Vec<usize> = (0..n).map(|i| i.wrapping_sub(1)).collect();
    let mut next: Vec<usize> = (1..=n).collect();
    let mut removed = vec![false; n];
    let mut version = vec![0u64; n];

    let mut heap: BinaryHeap<Candidate> = BinaryHeap::new();
    for i in 1..n - 1 {
        heap.push(Candidate {
            area: triangle_area(points[i - 1], points[i], points[i + 1]),
            index: i,
            version: 0,
        });
    }

    let mut remaining = n;
    while remaining > target {
        let candidate = match heap.pop() {
            Some(candidate) => candidate,
            None => break,
        };
        let i = candidate.index;
        if removed[i] || candidate.version != version[i] {
            continue;
        }

        removed[i] = true;
        remaining -= 1;

        let p = prev[i];
        let q = next[i];
        next[p] = q;
        prev[q] = p;

        // Neighbours gained a new effective triangle; stale heap entries
        // are skipped via the version check above.
        if p > 0 {
            version[p] += 1;
            heap.push(Candidate {
                area: triangle_area(points[prev[p]], points[p], points[q]),
                index: p,
                version: version[p],
            });
        }
        if q < n - 1 {
            version[q] += 1;
            heap.push(Candidate {
                area: triangle_area(points[p], points[q], points[next[q]]),
                index: q,
                version: version[q],
            });
        }
    }

    let mut out = Vec::with_capacity(remaining);
    let mut i = 0;
    loop {
        out.push(points[i]);
        if i == n - 1 {
            break;
        }
        i = next[i];
    }
    out
}

fn triangle_area(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0
}

struct Candidate {
    area: f64,
    index: usize,
    version: u64,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.area == other.area && self.index == other.index
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    // Min-heap on effective area: the smallest triangle pops first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .area
            .total_cmp(&self.area)
            .then(other.index.cmp(&self.index))
    }
}
