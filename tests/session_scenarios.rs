use std::time::Duration;

use fogquest::core::driver::StopReason;
use fogquest::discovery::proximity::{DiscoveredSet, Geofence, QuestState};
use fogquest::location::provider::{ChannelProvider, RandomWalkProvider, ScriptedProvider};
use fogquest::render::fog::RedrawKind;
use fogquest::{CameraEvent, Coordinate, ExplorerConfig, ExplorerSession, Quest, QuestId, SessionDriver};

fn small_config() -> ExplorerConfig {
    let mut config = ExplorerConfig::default();
    config.viewport.width = 256;
    config.viewport.height = 192;
    config
}

fn walking_session(quests: Vec<Quest>, jitter: f64, seed: u64) -> ExplorerSession {
    let config = small_config();
    let provider = RandomWalkProvider::new(config.origin, jitter, Some(seed));
    ExplorerSession::new(config, quests, Box::new(provider))
}

#[test]
fn temple_at_origin_is_found_on_first_tick() {
    let temple = Quest::new(1u64, "Virupaksha Temple", 15.3350, 76.4600, 50);
    let mut session = walking_session(vec![temple.clone()], 0.004, 42);
    assert!(session.init_map().unwrap());

    let outcome = session.tick();
    assert_eq!(outcome.discovered, vec![temple.clone()]);
    assert_eq!(session.progress().to_string(), "1/1");

    let marker = session.markers().get(&temple.id).unwrap();
    assert!(marker.popup.contains("Virupaksha Temple"));
    assert!(marker.popup.contains("50"));
}

#[test]
fn distant_quest_stays_hidden() {
    let far = Quest::new("far", "Far Shrine", 16.0, 77.0, 10);
    let mut session = walking_session(vec![far.clone()], 0.005, 3);
    session.init_map().unwrap();

    for _ in 0..100 {
        assert!(session.tick().discovered.is_empty());
    }
    assert_eq!(session.quest_state(&far.id), QuestState::Hidden);
    assert_eq!(session.progress().to_string(), "0/1");
    assert!(session.markers().is_empty());
}

#[test]
fn path_grows_by_one_per_tick() {
    let mut session = walking_session(vec![], 0.005, 11);
    session.init_map().unwrap();
    for n in 1..=25 {
        session.tick();
        assert_eq!(session.path().len(), n + 1);
    }
    assert_eq!(session.path()[0], session.config().origin);
}

#[test]
fn discovery_is_monotonic_and_reported_once() {
    let origin = small_config().origin;
    let quests = vec![
        Quest::new("a", "Near", origin.lat, origin.lng, 10),
        Quest::new("b", "North", origin.lat + 0.02, origin.lng, 20),
    ];
    let points = vec![
        origin,
        origin.offset(0.02, 0.0),
        origin,
        origin.offset(0.02, 0.0),
        origin.offset(0.5, 0.5),
    ];
    let mut session = ExplorerSession::new(small_config(), quests, Box::new(ScriptedProvider::new(points)));
    session.init_map().unwrap();

    let mut reported = Vec::new();
    let mut previous = 0;
    for _ in 0..5 {
        let outcome = session.tick();
        reported.extend(outcome.discovered.into_iter().map(|quest| quest.id));
        assert!(session.discovered().len() >= previous);
        previous = session.discovered().len();
        assert_eq!(session.markers().len(), session.discovered().len());
    }

    assert_eq!(reported, vec![QuestId::new("a"), QuestId::new("b")]);
    let order: Vec<&QuestId> = session.discovered().iter().collect();
    assert_eq!(order, vec![&QuestId::new("a"), &QuestId::new("b")]);
}

#[test]
fn geofence_boundary_per_axis() {
    let fence = Geofence::default();
    let quest = Quest::new("q", "Gate", 15.3350, 76.4600, 5);
    let mut discovered = DiscoveredSet::new();

    let outside = Coordinate::new(15.3350 + 0.006, 76.4600 - 0.006);
    assert!(fence.check(&outside, std::slice::from_ref(&quest), &mut discovered).is_empty());

    let lat_only_outside = Coordinate::new(15.3350 + 0.006, 76.4600);
    assert!(!fence.contains(&lat_only_outside, &quest));

    let inside = Coordinate::new(15.3350 + 0.004, 76.4600 - 0.004);
    assert_eq!(fence.check(&inside, std::slice::from_ref(&quest), &mut discovered).len(), 1);
}

#[test]
fn quest_without_position_is_never_discovered() {
    let origin = small_config().origin;
    let riddle = Quest::unplaced("riddle", "Storyteller's Riddle", 30);
    let half_placed = Quest {
        lat: None,
        ..Quest::new("half", "Half", origin.lat, origin.lng, 5)
    };
    let mut session = ExplorerSession::new(
        small_config(),
        vec![riddle.clone(), half_placed.clone()],
        Box::new(ScriptedProvider::new(vec![origin; 5])),
    );
    session.init_map().unwrap();

    for _ in 0..5 {
        assert!(session.tick().discovered.is_empty());
    }
    assert_eq!(session.progress().to_string(), "0/2");
    assert!(!session.markers().contains(&riddle.id));
    assert!(!session.markers().contains(&half_placed.id));
}

#[test]
fn proximity_waits_for_the_map() {
    let origin = small_config().origin;
    let temple = Quest::new("t", "Temple", origin.lat, origin.lng, 50);
    let mut session = ExplorerSession::new(
        small_config(),
        vec![temple.clone()],
        Box::new(ScriptedProvider::new(vec![origin, origin])),
    );

    let outcome = session.tick();
    assert!(outcome.discovered.is_empty());
    assert_eq!(outcome.redraw, RedrawKind::Skipped);
    assert_eq!(session.path().len(), 2);

    session.init_map().unwrap();
    assert_eq!(session.tick().discovered, vec![temple]);
}

#[test]
fn camera_moves_replay_the_whole_path() {
    let mut session = walking_session(vec![], 0.001, 5);
    session.init_map().unwrap();
    for _ in 0..4 {
        session.tick();
    }

    let kind = session.handle_camera(CameraEvent::Zoom { delta: 1.0, anchor: None });
    assert_eq!(kind, RedrawKind::Full { holes: 5 });
    assert_eq!(session.camera().zoom(), 14.0);

    let kind = session.handle_camera(CameraEvent::Resize { width: 300, height: 100 });
    assert!(matches!(kind, RedrawKind::Full { .. }));
    let surface = session.map().unwrap().surface();
    assert_eq!((surface.width(), surface.height()), (300, 100));
}

#[test]
fn fog_is_cleared_around_agent() {
    let mut session = walking_session(vec![], 0.0, 1);
    session.init_map().unwrap();
    session.tick();

    let surface = session.map().unwrap().surface();
    let center = surface.alpha_at(128, 96).unwrap();
    let corner = surface.alpha_at(0, 0).unwrap();
    assert!(center < 0.05);
    assert!(corner > 0.9);
}

#[test]
fn channel_provider_feeds_session() {
    let (tx, provider) = ChannelProvider::channel();
    let mut session = ExplorerSession::new(small_config(), vec![], Box::new(provider));
    session.init_map().unwrap();

    assert_eq!(session.tick().position, None);
    let fix = Coordinate::new(15.3360, 76.4610);
    tx.send(fix).unwrap();
    assert_eq!(session.tick().position, Some(fix));
    assert_eq!(session.agent_position(), fix);
}

#[test]
fn driver_runs_and_releases_map() {
    let temple = Quest::new(1u64, "Virupaksha Temple", 15.3350, 76.4600, 50);
    let session = walking_session(vec![temple], 0.004, 9);
    let report = SessionDriver::new(session)
        .run(Duration::from_millis(5), Some(10), |_, _| {})
        .unwrap();

    assert_eq!(report.stop_reason, StopReason::TickLimit);
    assert_eq!(report.session.path().len(), 11);
    assert!(!report.session.is_map_live());

    let summary = report.session.summary();
    assert_eq!(summary.ticks, 10);
    assert_eq!(summary.total_xp, 50);
    assert_eq!(summary.progress.to_string(), "1/1");
}
