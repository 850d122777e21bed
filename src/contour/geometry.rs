//! # Contour Geometry
//!
//! Polyline operations used to post-process traced contours:
//!
//! - [`join_fragments`] splices fragments that touch into single polylines,
//! - [`make_holes`] turns polylines lying inside another polyline into holes
//!   of it, for filled rendering,
//! - [`snap_to_boundaries`] moves points close to the plot boundary onto it.
//!
//! Polylines are plain owned point lists. A polyline is closed when its last
//! point repeats the first one; the ring of a polyline is its point list
//! without that repetition.

use serde::{Deserialize, Serialize};

/// A point in the plane of the two scanned parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle, the plotted domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

/// An ordered list of points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn from_xy(xy: &[(f64, f64)]) -> Self {
        Self::new(xy.iter().map(|&p| p.into()).collect())
    }

    /// The closed rectangle `(xmin, ymin) -> (xmin, ymax) -> (xmax, ymax) ->
    /// (xmax, ymin) -> (xmin, ymin)`.
    pub fn rectangle(bounds: &Bounds) -> Self {
        Self::from_xy(&[
            (bounds.xmin, bounds.ymin),
            (bounds.xmin, bounds.ymax),
            (bounds.xmax, bounds.ymax),
            (bounds.xmax, bounds.ymin),
            (bounds.xmin, bounds.ymin),
        ])
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True if the last point repeats the first one.
    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    /// The points without the closing repetition of the first point.
    pub fn ring(&self) -> &[Point] {
        if self.is_closed() {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points
        }
    }

    /// Append the first point if the polyline is not closed yet.
    pub fn close(&mut self) {
        if !self.is_closed() {
            if let Some(&first) = self.points.first() {
                self.points.push(first);
            }
        }
    }

    /// Shoelace area of the ring, positive for counter-clockwise orientation.
    pub fn signed_area(&self) -> f64 {
        let ring = self.ring();
        let n = ring.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|i| {
                let (a, b) = (ring[i], ring[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum();
        0.5 * twice
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Even-odd point-in-polygon test by ray casting. Points inside a hole of
    /// a spliced polyline are outside.
    pub fn contains(&self, p: &Point) -> bool {
        let ring = self.ring();
        let n = ring.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (ring[i], ring[j]);
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// True if every point of `other` lies inside `self`.
    pub fn encloses(&self, other: &Polyline) -> bool {
        !other.is_empty() && other.ring().iter().all(|p| self.contains(p))
    }

    /// Indices into the rings of `self` and `other` of the closest pair of
    /// points, with their distance. `None` if either polyline is empty.
    pub fn closest_points(&self, other: &Polyline) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for (i, a) in self.ring().iter().enumerate() {
            for (j, b) in other.ring().iter().enumerate() {
                let d = a.distance(b);
                if best.map_or(true, |(_, _, bd)| d < bd) {
                    best = Some((i, j, d));
                }
            }
        }
        best
    }

    /// The ring started at `index` and closed again at that point.
    pub fn rotated_closed(&self, index: usize) -> Polyline {
        let ring = self.ring();
        let n = ring.len();
        let mut points: Vec<Point> = (0..n).map(|k| ring[(index + k) % n]).collect();
        if let Some(&first) = points.first() {
            points.push(first);
        }
        Polyline::new(points)
    }

    pub fn reversed(&self) -> Polyline {
        Polyline::new(self.points.iter().rev().copied().collect())
    }

    /// Splice `inner` into `self` at their closest points, producing a single
    /// closed polyline that traces `self` and then `inner`. The orientation of
    /// `inner` is reversed if needed so that its area is subtracted.
    pub fn with_hole(&self, inner: &Polyline) -> Polyline {
        let Some((i, j, _)) = self.closest_points(inner) else {
            return self.clone();
        };
        let mut hole = inner.rotated_closed(j);
        if hole.signed_area().signum() == self.signed_area().signum() {
            // walk the hole the other way round, still starting at point j
            hole = hole.reversed();
        }
        let mut points = self.rotated_closed(i).points;
        points.extend(hole.points);
        let mut joined = Polyline::new(points);
        joined.close();
        joined
    }

    /// Move points closer than `range_x` (`range_y`) to a vertical
    /// (horizontal) edge of `bounds` onto that edge.
    pub fn snap_to(&mut self, bounds: &Bounds, range_x: f64, range_y: f64) {
        for p in &mut self.points {
            if (p.x - bounds.xmin).abs() < range_x {
                p.x = bounds.xmin;
            }
            if (p.x - bounds.xmax).abs() < range_x {
                p.x = bounds.xmax;
            }
            if (p.y - bounds.ymin).abs() < range_y {
                p.y = bounds.ymin;
            }
            if (p.y - bounds.ymax).abs() < range_y {
                p.y = bounds.ymax;
            }
        }
    }
}

/// Distance between two fragments for joining. Open fragments are compared
/// by their end points only, closed ones by all of their points.
fn fragment_gap(a: &Polyline, b: &Polyline) -> Option<f64> {
    if a.is_closed() || b.is_closed() {
        return a.closest_points(b).map(|(_, _, d)| d);
    }
    let ends = |p: &Polyline| [p.points.first().copied(), p.points.last().copied()];
    let mut best: Option<f64> = None;
    for pa in ends(a).into_iter().flatten() {
        for pb in ends(b).into_iter().flatten() {
            let d = pa.distance(&pb);
            if best.map_or(true, |bd| d < bd) {
                best = Some(d);
            }
        }
    }
    best
}

/// Join two fragments into one polyline.
fn splice(a: &Polyline, b: &Polyline) -> Polyline {
    if a.is_closed() || b.is_closed() {
        let Some((i, j, _)) = a.closest_points(b) else {
            return a.clone();
        };
        let mut points = a.rotated_closed(i).points;
        points.extend(b.rotated_closed(j).points);
        return Polyline::new(points);
    }

    // orient `a` to end and `b` to start at the touching end points
    let (a_first, a_last) = (a.points[0], a.points[a.len() - 1]);
    let (b_first, b_last) = (b.points[0], b.points[b.len() - 1]);
    let candidates = [
        (a_last.distance(&b_first), false, false),
        (a_last.distance(&b_last), false, true),
        (a_first.distance(&b_first), true, false),
        (a_first.distance(&b_last), true, true),
    ];
    let (_, rev_a, rev_b) = candidates
        .iter()
        .copied()
        .fold(candidates[0], |best, c| if c.0 < best.0 { c } else { best });
    let mut points = if rev_a { a.reversed().points } else { a.points.clone() };
    let tail = if rev_b { b.reversed().points } else { b.points.clone() };
    points.extend(tail);
    Polyline::new(points)
}

/// Splice fragments whose gap is below `tolerance` until no such pair is
/// left, then close every polyline.
pub fn join_fragments(mut fragments: Vec<Polyline>, tolerance: f64) -> Vec<Polyline> {
    fragments.retain(|f| !f.is_empty());
    loop {
        let mut pair = None;
        'search: for i in 0..fragments.len() {
            for j in i + 1..fragments.len() {
                if fragment_gap(&fragments[i], &fragments[j]).map_or(false, |d| d < tolerance) {
                    pair = Some((i, j));
                    break 'search;
                }
            }
        }
        let Some((i, j)) = pair else { break };
        let b = fragments.remove(j);
        let merged = splice(&fragments[i], &b);
        fragments[i] = merged;
    }
    for f in &mut fragments {
        f.close();
    }
    fragments
}

/// Punch holes: whenever one polyline lies entirely inside another, the two
/// are replaced by the outer one with the inner one spliced in as a hole.
/// Repeats until no polyline is inside another.
pub fn make_holes(polylines: Vec<Polyline>) -> Vec<Polyline> {
    let n = polylines.len();
    for i1 in 0..n {
        for i2 in i1 + 1..n {
            let (a, b) = (&polylines[i1], &polylines[i2]);
            let joined = if a.encloses(b) {
                Some(a.with_hole(b))
            } else if b.encloses(a) {
                Some(b.with_hole(a))
            } else {
                None
            };
            if let Some(joined) = joined {
                let mut next = Vec::with_capacity(n - 1);
                next.push(joined);
                next.extend(
                    polylines
                        .into_iter()
                        .enumerate()
                        .filter(|&(k, _)| k != i1 && k != i2)
                        .map(|(_, p)| p),
                );
                return make_holes(next);
            }
        }
    }
    polylines
}

/// Snap all polylines onto the edges of `bounds`, see [`Polyline::snap_to`].
pub fn snap_to_boundaries(polylines: &mut [Polyline], bounds: &Bounds, range_x: f64, range_y: f64) {
    for p in polylines {
        p.snap_to(bounds, range_x, range_y);
    }
}
