//! Track boundary data with order-dependent windowed lookup.
//!
//! A [`Track`] is an ordered sequence of boundary segments. The ordering is a
//! correctness invariant, not a convenience: consecutive indices must be
//! spatially adjacent along the track, because sensing only tests segments
//! inside a small index window around the segment nearest to the vehicle.

use kdtree::KdTree;
use kdtree::distance::squared_euclidean;
use kdtree::ErrorKind as KdTreeError;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::geometry::{Segment, Vec2};

/// Window segments kept behind the nearest boundary index.
pub const WINDOW_BEHIND: usize = 5;
/// Window segments kept ahead of the nearest boundary index.
pub const WINDOW_AHEAD: usize = 25;

/// Type alias for the 2-D kd-tree over boundary start points.
pub type TrackTree = KdTree<f32, usize, Vec<f32>>;

/// An ordered track boundary.
///
/// Invariant: segment order encodes spatial adjacency along the track
/// (either one side of the track, or both sides interleaved/concatenated so
/// that neighbors in the sequence are neighbors in space). The windowed
/// lookup used by sensing trades a small risk of missed hits on tracks that
/// curve back on themselves for never scanning the full sequence per ray.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Boundary segments in track order.
    pub segments: Vec<Segment>,
    /// Spawn position for vehicles on this track.
    pub start_position: Vec2,
}

impl Track {
    /// Creates a track from segments already in track order.
    pub fn from_segments(segments: Vec<Segment>, start_position: Vec2) -> Self {
        Self {
            segments,
            start_position,
        }
    }

    /// Creates a track boundary from an ordered polyline of points.
    pub fn from_polyline(points: &[Vec2], start_position: Vec2) -> Self {
        let segments = points
            .windows(2)
            .map(|pair| Segment::new(pair[0], pair[1]))
            .collect();
        Self {
            segments,
            start_position,
        }
    }

    /// Number of boundary segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the track has no boundary segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Index of the segment whose start point is closest to `pos`.
    ///
    /// Linear scan fallback; returns 0 for an empty track. Prefer
    /// [`TrackIndex::nearest`] when an index has been built.
    pub fn nearest_segment_index(&self, pos: Vec2) -> usize {
        let mut best = 0;
        let mut best_distance = f32::MAX;
        for (i, segment) in self.segments.iter().enumerate() {
            let distance = pos.distance(segment.start);
            if distance < best_distance {
                best_distance = distance;
                best = i;
            }
        }
        best
    }

    /// The boundary slice `[center - WINDOW_BEHIND, center + WINDOW_AHEAD)`
    /// clamped to the valid index range.
    pub fn window(&self, center: usize) -> &[Segment] {
        let hi = center.saturating_add(WINDOW_AHEAD).min(self.segments.len());
        let lo = center.saturating_sub(WINDOW_BEHIND).min(hi);
        &self.segments[lo..hi]
    }

    /// Builds a kd-tree over segment start points for nearest-segment
    /// queries.
    pub fn build_index(&self) -> Result<TrackIndex, KdTreeError> {
        let mut tree = KdTree::with_capacity(2, self.segments.len().max(1));
        for (i, segment) in self.segments.iter().enumerate() {
            tree.add(vec![segment.start.x, segment.start.y], i)?;
        }
        Ok(TrackIndex { tree })
    }
}

/// Pre-built spatial index over a track's boundary start points.
pub struct TrackIndex {
    tree: TrackTree,
}

impl TrackIndex {
    /// Index of the segment whose start point is closest to `pos`, or `None`
    /// for an empty track.
    pub fn nearest(&self, pos: Vec2) -> Option<usize> {
        self.tree
            .nearest(&[pos.x, pos.y], 1, &squared_euclidean)
            .ok()?
            .first()
            .map(|&(_, &index)| index)
    }
}

impl fmt::Debug for TrackIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackIndex")
            .field("size", &self.tree.size())
            .finish()
    }
}
