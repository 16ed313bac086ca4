use layercut_project_model::{ElementProps, ElementType, TrackKind};
use layercut_timeline_core::edit::{delete_track, split_audio_from_video};
use layercut_timeline_core::{place_new_element, PlacementRequest, Store};

fn store_with_tracks(count: usize) -> Store {
    let mut store = Store::new();
    while store.state().tracks.len() < count {
        store.add_track(TrackKind::Video);
    }
    store
}

#[test]
fn auto_placement_reuses_first_free_track() {
    let mut store = store_with_tracks(5);
    let first = place_new_element(
        &mut store,
        PlacementRequest::new(ElementType::Video).at(0.0).with_duration(10.0),
    )
    .unwrap();
    assert_eq!(first.track_id, 1);

    let second = place_new_element(
        &mut store,
        PlacementRequest::new(ElementType::Shape).at(0.0).with_duration(5.0),
    )
    .unwrap();

    assert_eq!(second.track_id, 2);
    assert_eq!(store.state().tracks.len(), 5);
}

#[test]
fn split_audio_inserts_track_below_video() {
    let mut store = store_with_tracks(4);
    let video = place_new_element(
        &mut store,
        PlacementRequest::new(ElementType::Video)
            .on_track(2)
            .at(3.0)
            .with_duration(10.0)
            .with_asset("asset-42")
            .with_props(ElementProps {
                volume: Some(0.8),
                ..Default::default()
            }),
    )
    .unwrap();
    let below = place_new_element(
        &mut store,
        PlacementRequest::new(ElementType::Text).on_track(3).at(0.0),
    )
    .unwrap();

    let audio_id = split_audio_from_video(&mut store, &video.id).unwrap();
    let state = store.state();

    let ids: Vec<u32> = state.tracks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(state.track(3).unwrap().kind, TrackKind::Audio);

    let audio = state.element(&audio_id).unwrap();
    assert_eq!(audio.element_type, ElementType::Audio);
    assert_eq!(audio.track_id, 3);
    assert_eq!(audio.start_time, 3.0);
    assert_eq!(audio.end_time(), 13.0);
    assert_eq!(audio.media_offset, 0.0);
    assert_eq!(audio.props.volume, Some(0.8));
    assert_eq!(audio.asset_id.as_deref(), Some("asset-42"));

    let video = state.element(&video.id).unwrap();
    assert_eq!(video.track_id, 2);
    assert_eq!(video.props.is_muted, Some(true));

    assert_eq!(state.element(&below.id).unwrap().track_id, 4);
    assert_eq!(state.selected_element_id.as_deref(), Some(audio_id.as_str()));
}

#[test]
fn delete_track_cascades_and_renumbers() {
    let mut store = store_with_tracks(4);
    let place = |store: &mut Store, track: u32| {
        place_new_element(
            store,
            PlacementRequest::new(ElementType::Shape).on_track(track).at(0.0),
        )
        .unwrap()
    };
    let a = place(&mut store, 2);
    let b = place(&mut store, 2);
    let c = place(&mut store, 1);
    let d = place(&mut store, 4);

    assert!(delete_track(&mut store, 2));
    let state = store.state();

    assert!(state.element(&a.id).is_none());
    assert!(state.element(&b.id).is_none());
    let ids: Vec<u32> = state.tracks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(state.tracks[2].name, "Track 3");
    assert_eq!(state.element(&c.id).unwrap().track_id, 1);
    assert_eq!(state.element(&d.id).unwrap().track_id, 3);
    for el in &state.elements {
        assert!((1..=3).contains(&el.track_id));
    }
    assert!(state.selected_element_id.is_none());
}

#[test]
fn auto_created_tracks_are_appended_not_renumbered() {
    let mut store = Store::new();
    // Leaves a gap in the ids: 1, 3.
    assert!(store.remove_track(2));

    for _ in 0..3 {
        place_new_element(&mut store, PlacementRequest::new(ElementType::Shape).at(0.0));
    }
    let ids: Vec<u32> = store.state().tracks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}
