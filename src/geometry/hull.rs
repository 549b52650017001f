//! Convex hulls and hit-testing for blob regions.
//!
//! Hulls are recomputed from live layout coordinates on every frame, so
//! nothing here caches. Clusters of fewer than three points have no area;
//! they get dedicated fallbacks instead of errors.

use serde::Serialize;

use crate::types::Point;

/// Hit radius around a 1-point hull, or around the midpoint of a 2-point
/// hull, so singleton clusters stay clickable.
pub const SINGLETON_HIT_RADIUS: f64 = 30.0;

/// Perpendicular offset of the synthesized wing points of a 2-point blob,
/// as a fraction of the padding.
pub const WING_RATIO: f64 = 0.6;

// ---------------------------------------------------------------------------
// convex_hull
// ---------------------------------------------------------------------------

/// Z component of `(a - o) × (b - o)`; positive for a left turn.
fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Push `p` onto a monotone chain, first popping every trailing point that
/// would not make a left turn.
fn push_left_turn(chain: &mut Vec<Point>, p: Point) {
    while chain.len() >= 2 && cross(chain[chain.len() - 2], chain[chain.len() - 1], p) <= 0.0 {
        chain.pop();
    }
    chain.push(p);
}

/// Convex hull by Andrew's monotone chain, counter-clockwise from the
/// lowest-x point. Collinear points are dropped.
///
/// Fewer than three points are returned as a copy without hull logic.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));

    let mut lower = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        push_left_turn(&mut lower, p);
    }
    let mut upper = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        push_left_turn(&mut upper, p);
    }

    // Each chain ends where the other begins.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

// ---------------------------------------------------------------------------
// expand_hull_pts
// ---------------------------------------------------------------------------

fn centroid(points: &[Point]) -> Point {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
    [sx / n, sy / n]
}

/// Push every vertex `padding` units further from the centroid along the
/// centroid→vertex ray. A vertex sitting on the centroid stays put.
pub fn expand_hull_pts(hull: &[Point], padding: f64) -> Vec<Point> {
    if hull.is_empty() {
        return Vec::new();
    }
    let [cx, cy] = centroid(hull);
    hull.iter()
        .map(|&[x, y]| {
            let (dx, dy) = (x - cx, y - cy);
            let len = dx.hypot(dy);
            if len == 0.0 {
                [x, y]
            } else {
                [x + dx / len * padding, y + dy / len * padding]
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// point_in_polygon
// ---------------------------------------------------------------------------

/// Whether `(x, y)` lies inside `hull`.
///
/// Ray casting for 3+ vertices. An empty hull contains nothing; 1- and
/// 2-point hulls fall back to a [`SINGLETON_HIT_RADIUS`] circle.
pub fn point_in_polygon(x: f64, y: f64, hull: &[Point]) -> bool {
    point_in_hull(x, y, hull, SINGLETON_HIT_RADIUS)
}

/// [`point_in_polygon`] with a caller-chosen fallback radius.
pub fn point_in_hull(x: f64, y: f64, hull: &[Point], singleton_radius: f64) -> bool {
    match hull {
        [] => false,
        [[px, py]] => (x - px).hypot(y - py) < singleton_radius,
        [[ax, ay], [bx, by]] => {
            let (mx, my) = ((ax + bx) / 2.0, (ay + by) / 2.0);
            (x - mx).hypot(y - my) < singleton_radius
        }
        _ => ray_cast(x, y, hull),
    }
}

fn ray_cast(x: f64, y: f64, polygon: &[Point]) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let [xi, yi] = polygon[i];
        let [xj, yj] = polygon[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

// ---------------------------------------------------------------------------
// Blob outlines
// ---------------------------------------------------------------------------

/// What the drawing layer should paint for one cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum BlobShape {
    Empty,
    Circle { center: Point, radius: f64 },
    Polygon { points: Vec<Point> },
}

/// Padded outline of a point cluster.
///
/// A two-point hull would expand into a zero-area line, so it is first
/// widened into a diamond by two wing points perpendicular to the segment.
pub fn blob_outline(points: &[Point], padding: f64) -> BlobShape {
    let hull = convex_hull(points);
    match hull.as_slice() {
        [] => BlobShape::Empty,
        [center] => BlobShape::Circle {
            center: *center,
            radius: padding,
        },
        [a, b] if a == b => BlobShape::Circle {
            center: *a,
            radius: padding,
        },
        [a, b] => BlobShape::Polygon {
            points: expand_hull_pts(&diamond(*a, *b, padding), padding),
        },
        _ => BlobShape::Polygon {
            points: expand_hull_pts(&hull, padding),
        },
    }
}

fn diamond(a: Point, b: Point, padding: f64) -> [Point; 4] {
    let mid = [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0];
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len = dx.hypot(dy);
    let wing = padding * WING_RATIO;
    let (nx, ny) = (-dy / len * wing, dx / len * wing);
    [a, [mid[0] + nx, mid[1] + ny], b, [mid[0] - nx, mid[1] - ny]]
}

// ---------------------------------------------------------------------------
// Blob hit-testing
// ---------------------------------------------------------------------------

/// A labelled cluster outline used for mouse hit-testing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Blob {
    pub key: String,
    pub hull: Vec<Point>,
}

impl Blob {
    /// Hull of `points`, padded when it has area. Degenerate hulls are kept
    /// as-is so the radius fallback applies to them.
    pub fn from_points(key: impl Into<String>, points: &[Point], padding: f64) -> Self {
        let hull = convex_hull(points);
        let hull = if hull.len() >= 3 {
            expand_hull_pts(&hull, padding)
        } else {
            hull
        };
        Self {
            key: key.into(),
            hull,
        }
    }
}

/// First blob, in caller order, containing `(x, y)`.
pub fn hit_test_blobs(x: f64, y: f64, blobs: &[Blob], singleton_radius: f64) -> Option<&Blob> {
    blobs
        .iter()
        .find(|blob| point_in_hull(x, y, &blob.hull, singleton_radius))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
