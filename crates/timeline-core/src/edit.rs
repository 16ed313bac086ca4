//! Edit operations built on the Store.
//!
//! Each operation computes its whole effect on a copy of the state and
//! commits it in one step, so structural edits (track shifts, renumbering)
//! are never observable half-done.

use layercut_project_model::{
    Element, ElementProps, ElementType, TimelineState, Track, TrackId, TrackKind,
};

use crate::geometry::split_span;
use crate::placement::new_element_id;
use crate::store::{renumber_tracks, Store};

/// Which elements a split applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitScope {
    /// Every element straddling the split time.
    All,
    /// Only the selected element (no-op without a selection).
    Selected,
}

/// Split every element in scope that straddles `time`.
///
/// The left part keeps its id and media offset; the right part gets a new
/// id, a "(Copy)" suffix, and a media offset continuing where the left
/// part ends. Returns the ids of the new right parts.
pub fn split_at_time(store: &mut Store, time: f64, scope: SplitScope) -> Vec<String> {
    let created = store
        .mutate(|state| {
            let selected = state.selected_element_id.clone();
            if scope == SplitScope::Selected && selected.is_none() {
                return None;
            }

            let mut next = Vec::with_capacity(state.elements.len() + 1);
            let mut created = vec![];

            for element in state.elements.drain(..) {
                let in_scope = match scope {
                    SplitScope::All => true,
                    SplitScope::Selected => selected.as_deref() == Some(element.id.as_str()),
                };
                let parts = in_scope
                    .then(|| split_span(element.start_time, element.duration, element.media_offset, time))
                    .flatten();

                match parts {
                    Some((left_span, right_span)) => {
                        let mut left = element;
                        let mut right = left.clone();

                        left.duration = left_span.duration;

                        right.id = new_element_id();
                        right.name = format!("{} (Copy)", left.name);
                        right.start_time = right_span.start_time;
                        right.duration = right_span.duration;
                        right.media_offset = right_span.media_offset;
                        // Edge transitions stay on the outer edges.
                        right.transition_in = None;
                        left.transition_out = None;

                        created.push(right.id.clone());
                        next.push(left);
                        next.push(right);
                    }
                    None => next.push(element),
                }
            }

            state.elements = next;
            if created.is_empty() {
                None
            } else {
                Some(created)
            }
        })
        .unwrap_or_default();
    if !created.is_empty() {
        tracing::debug!(time, count = created.len(), "Split elements");
    }
    created
}

/// Shift every track with id > `after` (and elements on them) up by one,
/// then insert a new track at `after + 1`.
fn insert_track_in(state: &mut TimelineState, after: TrackId, kind: TrackKind) -> TrackId {
    for track in &mut state.tracks {
        if track.id > after {
            track.id += 1;
        }
    }
    for element in &mut state.elements {
        if element.track_id > after {
            element.track_id += 1;
        }
    }
    let new_id = after + 1;
    state.tracks.push(Track::new(new_id, kind));
    state.tracks.sort_by_key(|t| t.id);
    new_id
}

/// Insert a track immediately after track `after`. Returns the new id, or
/// `None` if `after` does not exist.
pub fn insert_track_after(store: &mut Store, after: TrackId, kind: TrackKind) -> Option<TrackId> {
    store.mutate(|state| {
        state.track(after)?;
        Some(insert_track_in(state, after, kind))
    })
}

/// Delete a track and its elements, then renumber remaining tracks to
/// `1..=N`. Refused for the last remaining track. Clears the selection.
pub fn delete_track(store: &mut Store, track_id: TrackId) -> bool {
    store
        .mutate(|state| {
            if state.tracks.len() <= 1 || state.track(track_id).is_none() {
                tracing::debug!(track_id, "delete_track refused");
                return None;
            }
            let before = state.elements.len();
            state.elements.retain(|e| e.track_id != track_id);
            state.tracks.retain(|t| t.id != track_id);
            renumber_tracks(state);
            state.selected_element_id = None;
            tracing::debug!(
                track_id,
                removed_elements = before - state.elements.len(),
                "Deleted track"
            );
            Some(())
        })
        .is_some()
}

/// Detach the audio of a video element onto a new track right below it.
///
/// The new audio element mirrors the video's timing and media offset,
/// carries its volume and asset, and becomes the selection; the video is
/// muted. Returns the new element id.
pub fn split_audio_from_video(store: &mut Store, video_id: &str) -> Option<String> {
    store.mutate(|state| {
        let video = state.element(video_id)?;
        if video.element_type != ElementType::Video {
            tracing::debug!(element_id = video_id, "split_audio refused: not a video");
            return None;
        }
        let video_track = video.track_id;

        let new_track = insert_track_in(state, video_track, TrackKind::Audio);
        let z_index = state.elements.len() as i64;

        let video = state.elements.iter_mut().find(|e| e.id == video_id)?;
        let audio = Element {
            id: new_element_id(),
            element_type: ElementType::Audio,
            track_id: new_track,
            name: format!("{} (Audio)", video.name),
            start_time: video.start_time,
            duration: video.duration,
            media_offset: video.media_offset,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            z_index,
            flip_x: false,
            flip_y: false,
            lock_aspect_ratio: false,
            transition_in: None,
            transition_out: None,
            clip_color: video.clip_color,
            asset_id: video.asset_id.clone(),
            props: ElementProps {
                src: video.props.src.clone(),
                volume: Some(video.props.effective_volume()),
                is_muted: Some(false),
                ..Default::default()
            },
        };
        video.props.is_muted = Some(true);

        let audio_id = audio.id.clone();
        state.elements.push(audio);
        state.selected_element_id = Some(audio_id.clone());

        tracing::debug!(element_id = video_id, audio_id = %audio_id, track_id = new_track, "Split audio from video");
        Some(audio_id)
    })
}

/// Clone the selected element with a new id, a "Copy" suffix, and its
/// canvas position nudged by `offset` (clamped to `[0, 90]`). The copy is
/// selected and painted on top.
pub fn duplicate_selected(store: &mut Store, offset: f64) -> Option<String> {
    store.mutate(|state| {
        let original = state.selected_element()?;
        let mut copy = original.clone();
        copy.id = new_element_id();
        copy.name = format!("{} Copy", original.name);
        copy.x = (original.x + offset).clamp(0.0, 90.0);
        copy.y = (original.y + offset).clamp(0.0, 90.0);
        copy.z_index = state.elements.len() as i64;

        let id = copy.id.clone();
        state.elements.push(copy);
        state.selected_element_id = Some(id.clone());
        Some(id)
    })
}

/// Arrow-key direction for canvas nudging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Move the selected element by `step` percent, clamped to `[0, 100]`.
pub fn nudge_selected(store: &mut Store, direction: NudgeDirection, step: f64) -> bool {
    store
        .mutate(|state| {
            let id = state.selected_element_id.clone()?;
            let element = state.elements.iter_mut().find(|e| e.id == id)?;
            let (dx, dy) = match direction {
                NudgeDirection::Left => (-step, 0.0),
                NudgeDirection::Right => (step, 0.0),
                NudgeDirection::Up => (0.0, -step),
                NudgeDirection::Down => (0.0, step),
            };
            element.x = (element.x + dx).clamp(0.0, 100.0);
            element.y = (element.y + dy).clamp(0.0, 100.0);
            Some(())
        })
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{element_on, tracks};

    fn store_with(track_ids: &[TrackId], elements: Vec<Element>) -> Store {
        let mut state = TimelineState::new();
        state.tracks = tracks(track_ids);
        state.elements = elements;
        Store::from_state(state)
    }

    #[test]
    fn test_split_at_time_all() {
        let mut a = element_on("a", 1, 0.0, 10.0);
        a.media_offset = 2.0;
        let mut store = store_with(&[1, 2], vec![a, element_on("b", 2, 20.0, 5.0)]);

        let created = split_at_time(&mut store, 4.0, SplitScope::All);
        assert_eq!(created.len(), 1);

        let state = store.state();
        assert_eq!(state.elements.len(), 3);
        let left = state.element("a").unwrap();
        let right = state.element(&created[0]).unwrap();
        assert_eq!(left.duration, 4.0);
        assert_eq!(right.start_time, 4.0);
        assert_eq!(right.duration, 6.0);
        assert_eq!(right.media_offset, 6.0);
        assert_eq!(right.name, "a (Copy)");
        // Right part directly follows the left one in array order.
        assert_eq!(state.elements[1].id, right.id);
    }

    #[test]
    fn test_split_without_straddler_is_noop() {
        let mut store = store_with(&[1], vec![element_on("a", 1, 0.0, 10.0)]);
        let rev = store.revision();
        assert!(split_at_time(&mut store, 10.0, SplitScope::All).is_empty());
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn test_split_selected_only() {
        let mut store = store_with(
            &[1, 2],
            vec![element_on("a", 1, 0.0, 10.0), element_on("b", 2, 0.0, 10.0)],
        );
        assert!(split_at_time(&mut store, 5.0, SplitScope::Selected).is_empty());
        store.select(Some("b"));
        let created = split_at_time(&mut store, 5.0, SplitScope::Selected);
        assert_eq!(created.len(), 1);
        assert_eq!(store.state().element("a").unwrap().duration, 10.0);
    }

    #[test]
    fn test_insert_track_shifts_following() {
        let mut store = store_with(
            &[1, 2, 3],
            vec![element_on("a", 1, 0.0, 1.0), element_on("c", 3, 0.0, 1.0)],
        );
        let id = insert_track_after(&mut store, 1, TrackKind::Overlay).unwrap();
        assert_eq!(id, 2);
        let ids: Vec<_> = store.state().tracks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(store.state().element("a").unwrap().track_id, 1);
        assert_eq!(store.state().element("c").unwrap().track_id, 4);
        assert!(insert_track_after(&mut store, 42, TrackKind::Video).is_none());
    }

    #[test]
    fn test_delete_only_track_refused() {
        let mut store = store_with(&[1], vec![element_on("a", 1, 0.0, 1.0)]);
        assert!(!delete_track(&mut store, 1));
        assert_eq!(store.state().elements.len(), 1);
    }

    #[test]
    fn test_duplicate_clamps_position() {
        let mut a = element_on("a", 1, 0.0, 5.0);
        a.x = 88.0;
        a.y = 10.0;
        let mut store = store_with(&[1], vec![a]);
        assert!(duplicate_selected(&mut store, 5.0).is_none());

        store.select(Some("a"));
        let id = duplicate_selected(&mut store, 5.0).unwrap();
        let copy = store.state().element(&id).unwrap();
        assert_eq!(copy.name, "a Copy");
        assert_eq!(copy.x, 90.0);
        assert_eq!(copy.y, 15.0);
        assert_eq!(copy.z_index, 1);
        assert_eq!(store.state().selected_element_id.as_deref(), Some(id.as_str()));
    }

    #[test]
    fn test_nudge_clamps() {
        let mut a = element_on("a", 1, 0.0, 5.0);
        a.x = 0.5;
        let mut store = store_with(&[1], vec![a]);
        store.select(Some("a"));
        nudge_selected(&mut store, NudgeDirection::Left, 1.0);
        assert_eq!(store.state().element("a").unwrap().x, 0.0);
        nudge_selected(&mut store, NudgeDirection::Down, 10.0);
        assert_eq!(store.state().element("a").unwrap().y, 10.0);
    }

    #[test]
    fn test_split_audio_rejects_non_video() {
        let mut store = store_with(&[1], vec![element_on("a", 1, 0.0, 5.0)]);
        assert!(split_audio_from_video(&mut store, "a").is_none());
        assert_eq!(store.state().tracks.len(), 1);
    }
}
