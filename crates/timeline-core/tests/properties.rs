use proptest::prelude::*;

use layercut_project_model::{ElementPatch, ElementType, TrackKind};
use layercut_timeline_core::edit::{delete_track, split_at_time, SplitScope};
use layercut_timeline_core::geometry::{intervals_overlap, snap_to_nearest};
use layercut_timeline_core::{place_new_element, PlacementRequest, Store};

const TYPES: [ElementType; 7] = [
    ElementType::Video,
    ElementType::Audio,
    ElementType::Text,
    ElementType::Shape,
    ElementType::Image,
    ElementType::AiGenerated,
    ElementType::Adjustment,
];

fn no_same_track_overlap(store: &Store) -> bool {
    let elements = &store.state().elements;
    elements.iter().enumerate().all(|(i, a)| {
        elements[i + 1..].iter().all(|b| {
            a.track_id != b.track_id
                || !intervals_overlap(a.start_time, a.end_time(), b.start_time, b.end_time())
        })
    })
}

#[derive(Debug, Clone)]
enum Op {
    Place { kind: usize, at: f64 },
    Resize { index: usize, start: f64, duration: f64 },
    Remove { index: usize },
    Split { at: f64 },
    DeleteTrack { index: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..TYPES.len(), 0.0..120.0f64).prop_map(|(kind, at)| Op::Place { kind, at }),
        (0..16usize, 0.0..200.0f64, 0.1..60.0f64)
            .prop_map(|(index, start, duration)| Op::Resize { index, start, duration }),
        (0..16usize).prop_map(|index| Op::Remove { index }),
        (0.0..150.0f64).prop_map(|at| Op::Split { at }),
        (0..8usize).prop_map(|index| Op::DeleteTrack { index }),
    ]
}

proptest! {
    #[test]
    fn auto_placement_never_overlaps(
        placements in prop::collection::vec((0..TYPES.len(), 0.0..60.0f64), 1..40)
    ) {
        let mut store = Store::new();
        for (kind, at) in placements {
            store.set_current_time(at);
            let placed = place_new_element(&mut store, PlacementRequest::new(TYPES[kind]));
            prop_assert!(placed.is_some());
            prop_assert!(no_same_track_overlap(&store));
        }
    }

    #[test]
    fn split_conserves_duration(
        start in 0.0..100.0f64,
        duration in 0.5..60.0f64,
        offset in 0.0..30.0f64,
        fraction in 0.01..0.99f64,
    ) {
        let mut store = Store::new();
        let el = place_new_element(
            &mut store,
            PlacementRequest::new(ElementType::Video).at(start).with_duration(duration),
        ).unwrap();
        store.update_element(&el.id, ElementPatch { media_offset: Some(offset), ..Default::default() });

        let at = start + duration * fraction;
        let created = split_at_time(&mut store, at, SplitScope::All);
        prop_assert_eq!(created.len(), 1);

        let state = store.state();
        let left = state.element(&el.id).unwrap();
        let right = state.element(&created[0]).unwrap();
        prop_assert!((left.duration + right.duration - duration).abs() < 1e-9);
        prop_assert!((right.media_offset - (left.media_offset + left.duration)).abs() < 1e-9);
        prop_assert!((right.start_time - left.end_time()).abs() < 1e-9);
    }

    #[test]
    fn delete_track_renumbers_densely(
        extra_tracks in 0usize..5,
        elements in prop::collection::vec((0usize..8, 0.0..50.0f64), 0..20),
        victim in 0usize..8,
    ) {
        let mut store = Store::new();
        for _ in 0..extra_tracks {
            store.add_track(TrackKind::Video);
        }
        let track_count = store.state().tracks.len();
        for (track_index, at) in elements {
            let track_id = (track_index % track_count) as u32 + 1;
            place_new_element(
                &mut store,
                PlacementRequest::new(ElementType::Shape).on_track(track_id).at(at),
            );
        }

        let victim_id = (victim % track_count) as u32 + 1;
        prop_assert!(delete_track(&mut store, victim_id));

        let state = store.state();
        let ids: Vec<u32> = state.tracks.iter().map(|t| t.id).collect();
        let expected: Vec<u32> = (1..=(track_count as u32 - 1)).collect();
        prop_assert_eq!(ids, expected);
        for el in &state.elements {
            prop_assert!(state.track(el.track_id).is_some());
        }
        prop_assert!(state.selected_element_id.is_none());
    }

    #[test]
    fn snapping_is_idempotent(
        points in prop::collection::vec(0.0..100.0f64, 0..20),
        time in -10.0..110.0f64,
        threshold in 0.0..5.0f64,
    ) {
        let once = snap_to_nearest(time, &points, threshold);
        let twice = snap_to_nearest(once.time, &points, threshold);
        prop_assert_eq!(once.time, twice.time);
    }

    #[test]
    fn duration_watermark_never_decreases(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut store = Store::new();
        let mut watermark = store.state().total_duration;

        for op in ops {
            match op {
                Op::Place { kind, at } => {
                    place_new_element(&mut store, PlacementRequest::new(TYPES[kind]).at(at));
                }
                Op::Resize { index, start, duration } => {
                    if let Some(id) = store.state().elements.get(index).map(|e| e.id.clone()) {
                        store.update_element(&id, ElementPatch::timing(start, duration));
                    }
                }
                Op::Remove { index } => {
                    if let Some(id) = store.state().elements.get(index).map(|e| e.id.clone()) {
                        store.remove_element(&id);
                    }
                }
                Op::Split { at } => {
                    split_at_time(&mut store, at, SplitScope::All);
                }
                Op::DeleteTrack { index } => {
                    let id = index as u32 + 1;
                    delete_track(&mut store, id);
                }
            }

            let state = store.state();
            prop_assert!(state.total_duration >= watermark);
            let content_end = state.elements.iter().map(|e| e.end_time()).fold(0.0, f64::max);
            prop_assert!(state.total_duration >= content_end);
            watermark = state.total_duration;
        }
    }
}
