//! Temporal geometry over `(start, duration)` intervals.
//!
//! Pure functions with no state: overlap tests, free-track search,
//! snap-point collection, and split arithmetic.

use layercut_project_model::{Element, Track, TrackId};

/// Strict overlap of `[a_start, a_end)` and `[b_start, b_end)`.
/// Touching edges do not overlap.
pub fn intervals_overlap(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> bool {
    a_start < b_end && a_end > b_start
}

/// First track (ascending id) with no element overlapping
/// `[candidate_start, candidate_end)`.
///
/// Returns `None` when every track is occupied; the caller then has to
/// create a new track.
pub fn find_free_track(
    tracks: &[Track],
    elements: &[Element],
    candidate_start: f64,
    candidate_end: f64,
) -> Option<TrackId> {
    let mut ids: Vec<TrackId> = tracks.iter().map(|t| t.id).collect();
    ids.sort_unstable();
    ids.into_iter().find(|&track_id| {
        !elements.iter().any(|e| {
            e.track_id == track_id
                && intervals_overlap(candidate_start, candidate_end, e.start_time, e.end_time())
        })
    })
}

/// Snap targets for an element being edited on `track_id`: zero plus the
/// start and end of every other element on the same track. Sorted and
/// de-duplicated.
pub fn collect_snap_points(
    elements: &[Element],
    track_id: TrackId,
    exclude_element_id: Option<&str>,
) -> Vec<f64> {
    let mut points = vec![0.0];
    for e in elements {
        if e.track_id != track_id || Some(e.id.as_str()) == exclude_element_id {
            continue;
        }
        points.push(e.start_time);
        points.push(e.end_time());
    }
    points.sort_by(f64::total_cmp);
    points.dedup();
    points
}

/// Result of a snap attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub time: f64,
    pub snapped: bool,
}

/// Snap `time` to the closest point within `threshold_secs`, if any.
///
/// Ties resolve to the earliest point. Snapping an already-snapped time
/// returns it unchanged.
pub fn snap_to_nearest(time: f64, snap_points: &[f64], threshold_secs: f64) -> SnapResult {
    let nearest = snap_points
        .iter()
        .copied()
        .map(|p| (p, (p - time).abs()))
        .filter(|&(_, dist)| dist <= threshold_secs)
        .fold(None::<(f64, f64)>, |best, cand| match best {
            Some(b) if b.1 <= cand.1 => Some(b),
            _ => Some(cand),
        });

    match nearest {
        Some((point, _)) => SnapResult {
            time: point,
            snapped: true,
        },
        None => SnapResult {
            time,
            snapped: false,
        },
    }
}

/// Convert a screen-space snap threshold to seconds at the current zoom.
pub fn snap_threshold_secs(threshold_px: f64, pixels_per_second: f64) -> f64 {
    if pixels_per_second <= 0.0 {
        return 0.0;
    }
    threshold_px / pixels_per_second
}

/// Timing of one side of a split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanPart {
    pub start_time: f64,
    pub duration: f64,
    pub media_offset: f64,
}

/// Split `[start, start + duration)` at `at`.
///
/// Returns `None` unless `start < at < start + duration`. The right part's
/// media offset continues where the left part ends.
pub fn split_span(
    start: f64,
    duration: f64,
    media_offset: f64,
    at: f64,
) -> Option<(SpanPart, SpanPart)> {
    let end = start + duration;
    if !(start < at && at < end) {
        return None;
    }
    let left = SpanPart {
        start_time: start,
        duration: at - start,
        media_offset,
    };
    let right = SpanPart {
        start_time: at,
        duration: end - at,
        media_offset: media_offset + (at - start),
    };
    Some((left, right))
}
