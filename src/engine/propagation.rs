use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::image::{color_distance, LabImage};
use crate::config::{Connectivity, MattingConfig};

/// Geodesic distance from every pixel to the nearest scribble of one class
///
/// Values start at `+inf` and only ever decrease as scribbles are added.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceField {
    values: Vec<f64>,
}

impl EvidenceField {
    /// Field with no sources: every pixel is unreachable
    pub fn unreached(len: usize) -> Self {
        Self {
            values: vec![f64::INFINITY; len],
        }
    }

    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.values[index]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

const AXIAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// Multi-source shortest-path solver over the pixel grid
///
/// Edge weight between neighbours `p` and `q` is
/// `step_cost * |p - q| + color_weight * ||color(p) - color(q)||`, so paths
/// are cheap along uniform regions and expensive across color edges.
#[derive(Debug, Clone)]
pub struct Propagator {
    connectivity: Connectivity,
    step_cost: f64,
    color_weight: f64,
}

impl Propagator {
    pub fn new(config: &MattingConfig) -> Self {
        Self {
            connectivity: config.connectivity,
            step_cost: config.step_cost,
            color_weight: config.color_weight,
        }
    }

    /// Weight of the edge between two neighbouring pixels
    #[inline]
    pub fn edge_weight(&self, image: &LabImage, from: usize, to: usize, diagonal: bool) -> f64 {
        let step = if diagonal {
            self.step_cost * std::f64::consts::SQRT_2
        } else {
            self.step_cost
        };
        step + self.color_weight * color_distance(image.color(from), image.color(to))
    }

    /// Seed `field` with zero at `seeds` and relax outward
    ///
    /// Continues from whatever the field already holds: only pixels whose
    /// distance strictly decreases are touched, so earlier scribbles keep
    /// their influence wherever the new seeds are not closer.
    /// Returns the number of pixels whose distance changed.
    pub fn reseed(&self, image: &LabImage, field: &mut EvidenceField, seeds: &[usize]) -> usize {
        let _span = tracing::debug_span!("propagate", seeds = seeds.len()).entered();

        let width = image.width() as i32;
        let height = image.height() as i32;
        let values = &mut field.values;
        let mut heap = BinaryHeap::with_capacity(seeds.len() * 4);
        let mut updated = 0usize;

        // a seed already at zero was settled by an earlier reseed
        for &seed in seeds {
            if values[seed] > 0.0 {
                values[seed] = 0.0;
                heap.push(QueueEntry {
                    cost: 0.0,
                    index: seed,
                });
            }
        }

        while let Some(QueueEntry { cost, index }) = heap.pop() {
            if cost > values[index] {
                continue;
            }
            assert!(cost >= 0.0, "negative evidence distance {cost} at pixel {index}");
            updated += 1;

            let x = (index % width as usize) as i32;
            let y = (index / width as usize) as i32;

            let diagonals: &[(i32, i32)] = match self.connectivity {
                Connectivity::Four => &[],
                Connectivity::Eight => &DIAGONAL,
            };
            let neighbours = AXIAL
                .iter()
                .map(|offset| (offset, false))
                .chain(diagonals.iter().map(|offset| (offset, true)));

            for (&(dx, dy), diagonal) in neighbours {
                let nx = x + dx;
                let ny = y + dy;
                if nx < 0 || ny < 0 || nx >= width || ny >= height {
                    continue;
                }
                let next = ny as usize * width as usize + nx as usize;
                let candidate = cost + self.edge_weight(image, index, next, diagonal);
                if candidate < values[next] {
                    values[next] = candidate;
                    heap.push(QueueEntry {
                        cost: candidate,
                        index: next,
                    });
                }
            }
        }

        tracing::debug!("Propagation settled {} pixels", updated);
        updated
    }
}

/// Heap entry ordered so that `BinaryHeap` pops the lowest cost first and,
/// among equal costs, the lowest pixel index
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    cost: f64,
    index: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}
