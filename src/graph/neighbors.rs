//! Visibility sweep finding same-page neighbors.
//!
//! For each object A, the objects further along the sweep axis are visited
//! nearest first. An object is a neighbor of A when it still sees part of
//! A's band (the perpendicular extent of A) that no nearer neighbor hides;
//! it then hides its own extent from the farther objects.

use std::cmp::Ordering;

use crate::model::BoundingBox;

/// Sweep direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    /// Left to right, bands are vertical extents
    Horizontal,
    /// Top to bottom, bands are horizontal extents
    Vertical,
}

impl Axis {
    fn start(self, b: &BoundingBox) -> f64 {
        match self {
            Axis::Horizontal => b.x,
            Axis::Vertical => b.y,
        }
    }

    fn band(self, b: &BoundingBox) -> (f64, f64) {
        match self {
            Axis::Horizontal => (b.y, b.y2()),
            Axis::Vertical => (b.x, b.x2()),
        }
    }
}

/// The part of a band still visible from its owner.
///
/// Intervals are closed. A candidate sharing a single point with the visible
/// part counts unless that point lies in a hidden interval.
struct Visibility {
    pieces: Vec<(f64, f64)>,
    hidden: Vec<(f64, f64)>,
}

impl Visibility {
    fn new(band: (f64, f64)) -> Self {
        Self {
            pieces: vec![band],
            hidden: Vec::new(),
        }
    }

    fn is_hidden(&self) -> bool {
        self.pieces.is_empty()
    }

    fn sees(&self, (lo, hi): (f64, f64)) -> bool {
        self.pieces.iter().any(|&(plo, phi)| {
            let olo = plo.max(lo);
            let ohi = phi.min(hi);
            ohi > olo || (ohi == olo && !self.is_point_hidden(olo))
        })
    }

    fn is_point_hidden(&self, p: f64) -> bool {
        self.hidden.iter().any(|&(lo, hi)| lo <= p && p <= hi)
    }

    fn hide(&mut self, (lo, hi): (f64, f64)) {
        let mut pieces = Vec::with_capacity(self.pieces.len() + 1);
        for &(plo, phi) in &self.pieces {
            if hi <= plo || lo >= phi {
                pieces.push((plo, phi));
                continue;
            }
            if lo > plo {
                pieces.push((plo, lo));
            }
            if hi < phi {
                pieces.push((hi, phi));
            }
        }
        self.pieces = pieces;
        self.hidden.push((lo, hi));
    }
}

/// Neighbor pairs `(a, b)` along `axis`, `b` after `a`.
///
/// Pairs are grouped by `a` in input order; inside a group they follow the
/// sweep order. Boxes must be valid.
pub(crate) fn neighbor_pairs(boxes: &[BoundingBox], axis: Axis) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&i, &j| {
        axis.start(&boxes[i])
            .total_cmp(&axis.start(&boxes[j]))
            .then_with(|| i.cmp(&j))
    });

    let mut pairs = Vec::new();
    for (a, abox) in boxes.iter().enumerate() {
        let start = axis.start(abox);
        let first = order.partition_point(|&i| {
            axis.start(&boxes[i]).total_cmp(&start) != Ordering::Greater
        });

        let mut visible = Visibility::new(axis.band(abox));
        for &b in &order[first..] {
            let band = axis.band(&boxes[b]);
            if !visible.sees(band) {
                continue;
            }
            pairs.push((a, b));
            visible.hide(band);
            if visible.is_hidden() {
                break;
            }
        }
    }
    pairs
}
