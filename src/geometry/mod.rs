//! Geometry layer: blob outlines and mouse hit-testing.

pub mod hull;

pub use hull::{
    blob_outline, convex_hull, expand_hull_pts, hit_test_blobs, point_in_hull, point_in_polygon,
    Blob, BlobShape, SINGLETON_HIT_RADIUS,
};
