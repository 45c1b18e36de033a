use std::time::Duration;

use serenity::all::GuildId;

use crate::{
    error::playback::PlaybackError,
    playback::{
        test::mock::{guild, manager, track, MockChannel, MockNode, MockPlayer},
        PlayerEvent,
    },
};

/// Tests two consecutive track starts.
///
/// Expected: the second start leaves as many timers as the first
#[tokio::test(start_paused = true)]
async fn consecutive_track_starts_keep_timer_count() {
    let a = track("a", 60_000);
    let node = MockNode::new();
    let manager = manager(&node);
    let player = MockPlayer::new(80);
    manager.register_player(player.clone(), Some(MockChannel::new()), false);

    player.set_current(Some(a.clone()));
    manager
        .handle_event(guild(), PlayerEvent::TrackStart(a.clone()))
        .await;
    let after_first = manager.active_timers(guild());

    manager.handle_event(guild(), PlayerEvent::TrackStart(a)).await;

    assert_eq!(after_first, 2);
    assert_eq!(manager.active_timers(guild()), after_first);
}

/// Tests cleanup of a player that has no timers.
///
/// Expected: repeated cleanups succeed and touch nothing
#[tokio::test]
async fn cleanup_is_idempotent() {
    let node = MockNode::new();
    let manager = manager(&node);
    let player = MockPlayer::new(80);
    manager.register_player(player.clone(), None, false);

    assert!(manager.cleanup_player(guild()));
    assert!(manager.cleanup_player(guild()));

    assert_eq!(manager.active_timers(guild()), 0);
    assert!(player.volume_calls().is_empty());
}

/// Tests cleanup of a guild without a registered player.
///
/// Expected: reports that nothing was cleaned up
#[tokio::test]
async fn cleanup_without_session_reports_false() {
    let node = MockNode::new();
    let manager = manager(&node);

    assert!(!manager.cleanup_player(GuildId::new(99)));
}

/// Tests the failure events of the current track.
///
/// Expected: every timer of the player is retired
#[tokio::test(start_paused = true)]
async fn track_error_and_stuck_retire_timers() {
    let a = track("a", 60_000);
    let node = MockNode::new();
    let manager = manager(&node);
    let player = MockPlayer::new(80);
    manager.register_player(player.clone(), Some(MockChannel::new()), false);
    player.set_current(Some(a.clone()));

    manager
        .handle_event(guild(), PlayerEvent::TrackStart(a.clone()))
        .await;
    manager
        .handle_event(
            guild(),
            PlayerEvent::TrackError {
                track: a.clone(),
                message: "decoder error".to_string(),
            },
        )
        .await;
    assert_eq!(manager.active_timers(guild()), 0);

    manager
        .handle_event(guild(), PlayerEvent::TrackStart(a.clone()))
        .await;
    manager
        .handle_event(
            guild(),
            PlayerEvent::TrackStuck {
                track: a,
                threshold_ms: 10_000,
            },
        )
        .await;
    assert_eq!(manager.active_timers(guild()), 0);
}

/// Tests destroying a player in the middle of a crossfade.
///
/// Expected: the session is removed and the volume is not touched again
#[tokio::test(start_paused = true)]
async fn destroy_removes_session_without_restoring_volume() {
    let node = MockNode::new();
    let manager = manager(&node);
    let player = MockPlayer::new(80);
    manager.register_player(player.clone(), None, true);

    manager.crossfade(guild(), track("b", 20_000)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(350)).await;

    manager
        .handle_event(guild(), PlayerEvent::PlayerDestroy)
        .await;
    tokio::time::sleep(Duration::from_millis(3_000)).await;

    assert!(!manager.has_session(guild()));
    assert_eq!(player.volume_calls(), vec![10, 17]);
}

/// Tests a voice disconnect of a registered player.
///
/// Expected: the session is removed
#[tokio::test]
async fn disconnect_removes_session() {
    let node = MockNode::new();
    let manager = manager(&node);
    manager.register_player(MockPlayer::new(80), None, false);

    manager
        .handle_event(guild(), PlayerEvent::PlayerDisconnect)
        .await;

    assert!(!manager.has_session(guild()));
}

/// Tests queue end with autoplay disabled.
///
/// Expected: no related track is searched
#[tokio::test]
async fn queue_end_without_autoplay_stays_idle() {
    let node = MockNode::returning(vec![track("b", 20_000)]);
    let manager = manager(&node);
    let player = MockPlayer::new(80);
    manager.register_player(player.clone(), None, false);

    manager
        .handle_event(
            guild(),
            PlayerEvent::QueueEnd {
                track: Some(track("a", 10_000)),
            },
        )
        .await;

    assert!(node.queries().is_empty());
    assert!(player.play_calls().is_empty());
}

/// Tests queue end with autoplay enabled.
///
/// Expected: the first related track that is not the ended one is played
#[tokio::test(start_paused = true)]
async fn queue_end_with_autoplay_plays_related_track() {
    let node = MockNode::returning(vec![track("a", 10_000), track("b", 20_000)]);
    let manager = manager(&node);
    let player = MockPlayer::new(80);
    manager.register_player(player.clone(), None, true);

    manager
        .handle_event(
            guild(),
            PlayerEvent::QueueEnd {
                track: Some(track("a", 10_000)),
            },
        )
        .await;

    assert_eq!(node.queries(), vec!["Artist Title a".to_string()]);
    assert_eq!(player.play_calls(), vec!["encoded-b".to_string()]);
}

/// Tests queue end with autoplay enabled but no usable candidate.
///
/// Expected: the player is left idle
#[tokio::test]
async fn queue_end_without_candidates_stays_idle() {
    let node = MockNode::returning(vec![track("a", 10_000)]);
    let manager = manager(&node);
    let player = MockPlayer::new(80);
    manager.register_player(player.clone(), None, true);

    manager
        .handle_event(
            guild(),
            PlayerEvent::QueueEnd {
                track: Some(track("a", 10_000)),
            },
        )
        .await;

    assert_eq!(node.queries().len(), 1);
    assert!(player.play_calls().is_empty());
}

/// Tests events for a guild without a registered player.
///
/// Expected: they are ignored
#[tokio::test]
async fn events_without_session_are_ignored() {
    let node = MockNode::new();
    let manager = manager(&node);

    manager
        .handle_event(guild(), PlayerEvent::TrackStart(track("a", 10_000)))
        .await;

    assert!(!manager.has_session(guild()));
    assert_eq!(manager.active_timers(guild()), 0);
}

/// Tests registering a player twice for the same guild.
///
/// Expected: the old session's timers are aborted
#[tokio::test(start_paused = true)]
async fn reregistering_replaces_session() {
    let a = track("a", 60_000);
    let node = MockNode::new();
    let manager = manager(&node);
    let player = MockPlayer::new(80);
    manager.register_player(player.clone(), None, false);
    player.set_current(Some(a.clone()));
    manager.handle_event(guild(), PlayerEvent::TrackStart(a)).await;

    manager.register_player(player, None, true);

    assert_eq!(manager.active_timers(guild()), 0);
    assert_eq!(manager.autoplay_enabled(guild()), Some(true));
}

/// Tests toggling autoplay.
///
/// Expected: registered players accept it, unknown guilds report NoSession
#[tokio::test]
async fn set_autoplay_requires_session() {
    let node = MockNode::new();
    let manager = manager(&node);
    manager.register_player(MockPlayer::new(80), None, false);

    manager.set_autoplay(guild(), true).unwrap();
    assert_eq!(manager.autoplay_enabled(guild()), Some(true));

    assert!(matches!(
        manager.set_autoplay(GuildId::new(99), true),
        Err(PlaybackError::NoSession(_))
    ));
}

/// Tests a track error that arrives while the track's announcement is in flight.
///
/// Expected: the late announcement is discarded and no progress loop is started
#[tokio::test(start_paused = true)]
async fn cleanup_during_announce_discards_late_message() {
    let a = track("a", 60_000);
    let node = MockNode::new();
    let manager = manager(&node);
    let player = MockPlayer::new(80);
    let channel = MockChannel::with_delay(Duration::from_millis(500));
    manager.register_player(player.clone(), Some(channel.clone()), false);
    player.set_current(Some(a.clone()));

    let start = tokio::spawn({
        let manager = manager.clone();
        let a = a.clone();
        async move { manager.handle_event(guild(), PlayerEvent::TrackStart(a)).await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    manager
        .handle_event(
            guild(),
            PlayerEvent::TrackError {
                track: a,
                message: "decoder failure".to_string(),
            },
        )
        .await;
    assert_eq!(manager.active_timers(guild()), 0);

    start.await.unwrap();
    tokio::time::sleep(Duration::from_millis(2_000)).await;

    assert_eq!(manager.active_timers(guild()), 0);
    let message = channel.last_message().unwrap();
    assert!(message.updates().is_empty());
}
