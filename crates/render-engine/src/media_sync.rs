//! Keeps native media players in step with the project clock.
//!
//! Each time-based element owns a player with its own playback clock.
//! Every frame the planner compares the player against the element's
//! expected local time and the global transport, and issues the minimal
//! set of [`MediaCommand`]s to bring it back in line.

use std::collections::HashMap;

use layercut_project_model::{Element, TimelineState};

/// Default drift beyond which a player is hard-reseeked.
pub const DEFAULT_RESYNC_TOLERANCE_SECS: f64 = 0.3;

/// A single instruction for a media player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaCommand {
    Seek(f64),
    Play,
    Pause,
    SetVolume(f64),
    SetMuted(bool),
}

/// A native media element (video or audio decoder) with its own clock.
pub trait MediaPlayer {
    /// Current position in the source media (seconds).
    fn current_time(&self) -> f64;

    fn is_paused(&self) -> bool;

    fn volume(&self) -> f64;

    fn is_muted(&self) -> bool;

    fn apply(&mut self, command: MediaCommand);
}

/// Commands needed to bring `player` in line with `element` at `time`.
///
/// Outside the element's active window the player is paused, never just
/// hidden. Inside it, drift beyond `tolerance` triggers a seek; smaller
/// drift is left to catch up naturally.
pub fn plan_media_sync(
    element: &Element,
    time: f64,
    playing: bool,
    player: &dyn MediaPlayer,
    tolerance: f64,
) -> Vec<MediaCommand> {
    let mut commands = Vec::new();

    if !element.is_active_at(time) {
        if !player.is_paused() {
            commands.push(MediaCommand::Pause);
        }
        return commands;
    }

    let target = element.media_time_at(time);
    if (player.current_time() - target).abs() > tolerance {
        commands.push(MediaCommand::Seek(target));
    }

    let muted = element.props.muted();
    if player.is_muted() != muted {
        commands.push(MediaCommand::SetMuted(muted));
    }
    let volume = element.props.effective_volume();
    if (player.volume() - volume).abs() > 1e-6 {
        commands.push(MediaCommand::SetVolume(volume));
    }

    match (playing, player.is_paused()) {
        (true, true) => commands.push(MediaCommand::Play),
        (false, false) => commands.push(MediaCommand::Pause),
        _ => {}
    }
    commands
}

/// Sync every time-based element that has a player. Returns the number of
/// commands issued.
pub fn sync_media<P: MediaPlayer>(
    state: &TimelineState,
    players: &mut HashMap<String, P>,
    tolerance: f64,
) -> usize {
    let mut issued = 0;
    for element in state.elements.iter().filter(|e| e.element_type.is_time_based()) {
        let Some(player) = players.get_mut(&element.id) else {
            continue;
        };
        let commands = plan_media_sync(
            element,
            state.current_time,
            state.is_playing,
            &*player,
            tolerance,
        );
        for command in &commands {
            if let MediaCommand::Seek(target) = command {
                tracing::debug!(element_id = %element.id, target, "Media drifted; reseeking");
            }
            player.apply(*command);
        }
        issued += commands.len();
    }
    issued
}

#[cfg(test)]
mod tests {
    use super::*;
    use layercut_project_model::{ElementProps, ElementType};

    #[derive(Debug, Default)]
    struct FakePlayer {
        time: f64,
        paused: bool,
        volume: f64,
        muted: bool,
        log: Vec<MediaCommand>,
    }

    impl FakePlayer {
        fn at(time: f64, paused: bool) -> Self {
            Self {
                time,
                paused,
                volume: 1.0,
                ..Default::default()
            }
        }
    }

    impl MediaPlayer for FakePlayer {
        fn current_time(&self) -> f64 {
            self.time
        }
        fn is_paused(&self) -> bool {
            self.paused
        }
        fn volume(&self) -> f64 {
            self.volume
        }
        fn is_muted(&self) -> bool {
            self.muted
        }
        fn apply(&mut self, command: MediaCommand) {
            match command {
                MediaCommand::Seek(t) => self.time = t,
                MediaCommand::Play => self.paused = false,
                MediaCommand::Pause => self.paused = true,
                MediaCommand::SetVolume(v) => self.volume = v,
                MediaCommand::SetMuted(m) => self.muted = m,
            }
            self.log.push(command);
        }
    }

    fn video(start: f64, duration: f64, offset: f64) -> Element {
        Element {
            id: "v".to_string(),
            element_type: ElementType::Video,
            track_id: 1,
            name: "Video".to_string(),
            start_time: start,
            duration,
            media_offset: offset,
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            z_index: 0,
            flip_x: false,
            flip_y: false,
            lock_aspect_ratio: true,
            transition_in: None,
            transition_out: None,
            clip_color: Default::default(),
            asset_id: None,
            props: ElementProps::default(),
        }
    }

    #[test]
    fn test_small_drift_is_tolerated() {
        let el = video(0.0, 10.0, 0.0);
        let player = FakePlayer::at(2.2, false);
        let commands = plan_media_sync(&el, 2.0, true, &player, DEFAULT_RESYNC_TOLERANCE_SECS);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_large_drift_reseeks_to_local_time() {
        let el = video(5.0, 10.0, 1.0);
        let player = FakePlayer::at(0.0, false);
        let commands = plan_media_sync(&el, 7.0, true, &player, DEFAULT_RESYNC_TOLERANCE_SECS);
        assert_eq!(commands, vec![MediaCommand::Seek(3.0)]);
    }

    #[test]
    fn test_outside_window_pauses() {
        let el = video(5.0, 2.0, 0.0);
        let player = FakePlayer::at(1.0, false);
        let commands = plan_media_sync(&el, 8.0, true, &player, DEFAULT_RESYNC_TOLERANCE_SECS);
        assert_eq!(commands, vec![MediaCommand::Pause]);

        let paused = FakePlayer::at(1.0, true);
        assert!(plan_media_sync(&el, 8.0, true, &paused, DEFAULT_RESYNC_TOLERANCE_SECS).is_empty());
    }

    #[test]
    fn test_follows_transport_and_props() {
        let mut el = video(0.0, 10.0, 0.0);
        el.props.volume = Some(0.5);
        el.props.is_muted = Some(true);
        let player = FakePlayer::at(1.0, true);
        let commands = plan_media_sync(&el, 1.0, true, &player, DEFAULT_RESYNC_TOLERANCE_SECS);
        assert_eq!(
            commands,
            vec![
                MediaCommand::SetMuted(true),
                MediaCommand::SetVolume(0.5),
                MediaCommand::Play
            ]
        );

        let playing = FakePlayer::at(1.0, false);
        let commands = plan_media_sync(&el, 1.0, false, &playing, DEFAULT_RESYNC_TOLERANCE_SECS);
        assert!(commands.contains(&MediaCommand::Pause));
    }

    #[test]
    fn test_sync_media_applies_commands() {
        let mut state = TimelineState::new();
        state.elements = vec![video(0.0, 10.0, 0.0)];
        state.current_time = 4.0;
        state.is_playing = true;

        let mut players = HashMap::new();
        players.insert("v".to_string(), FakePlayer::at(0.0, true));

        let issued = sync_media(&state, &mut players, DEFAULT_RESYNC_TOLERANCE_SECS);
        assert_eq!(issued, 2);
        let player = &players["v"];
        assert_eq!(player.time, 4.0);
        assert!(!player.paused);

        // Already in sync: nothing more to do.
        assert_eq!(sync_media(&state, &mut players, DEFAULT_RESYNC_TOLERANCE_SECS), 0);
    }

    #[test]
    fn test_editor_settings_tolerance_drives_reseek() {
        let settings = layercut_common::config::EditorSettings::default();
        assert_eq!(settings.media_resync_tolerance_secs, DEFAULT_RESYNC_TOLERANCE_SECS);

        let el = video(0.0, 10.0, 0.0);
        let player = FakePlayer::at(2.2, false);
        let strict = plan_media_sync(&el, 2.0, true, &player, 0.1);
        assert_eq!(strict, vec![MediaCommand::Seek(2.0)]);
        let relaxed =
            plan_media_sync(&el, 2.0, true, &player, settings.media_resync_tolerance_secs);
        assert!(relaxed.is_empty());
    }
}
