//! Serial event loop around an [`ExplorerSession`].
//!
//! Timer ticks and camera events are delivered through one queue and handled
//! one at a time on the driving thread, so the session never sees overlapping
//! ticks. The ticker thread only produces `Tick` events; it is cancelled and
//! joined before the map is released.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use image::RgbaImage;
use tracing::{debug, info, warn};

use super::session::{CameraEvent, ExplorerSession, TickOutcome};
use crate::render::fog::RedrawKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    Tick,
    Camera(CameraEvent),
    Teardown,
}

/// What the driver just did, handed to the update callback.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    Ticked(TickOutcome),
    CameraChanged(RedrawKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TickLimit,
    Teardown,
    Disconnected,
}

pub struct DriverReport {
    pub session: ExplorerSession,
    pub final_frame: Option<RgbaImage>,
    /// Tile URLs covering the final camera; empty unless capture was on.
    pub final_tiles: Vec<String>,
    pub stop_reason: StopReason,
}

struct Ticker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    fn start(interval: Duration, events: Sender<SessionEvent>) -> io::Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("fogquest-ticker".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if events.send(SessionEvent::Tick).is_err() {
                            break;
                        }
                    }
                    // Explicit stop or the owner went away
                    _ => break,
                }
            })?;

        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    fn cancel(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub struct SessionDriver {
    session: ExplorerSession,
    events_tx: Sender<SessionEvent>,
    events_rx: Receiver<SessionEvent>,
    capture_frame: bool,
}

impl SessionDriver {
    pub fn new(session: ExplorerSession) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            session,
            events_tx,
            events_rx,
            capture_frame: false,
        }
    }

    /// Keep a rendered frame and the covering tile URLs of the final state
    /// in the report.
    pub fn with_frame_capture(mut self, capture: bool) -> Self {
        self.capture_frame = capture;
        self
    }

    /// Handle for posting camera events or a teardown from other threads.
    pub fn sender(&self) -> Sender<SessionEvent> {
        self.events_tx.clone()
    }

    pub fn session(&self) -> &ExplorerSession {
        &self.session
    }

    /// Attaches the map, starts the ticker and processes events until `limit`
    /// ticks have run, a `Teardown` arrives, or every sender is gone.
    pub fn run<F>(self, interval: Duration, limit: Option<u64>, mut on_update: F) -> Result<DriverReport>
    where
        F: FnMut(&ExplorerSession, &SessionUpdate),
    {
        let SessionDriver {
            mut session,
            events_tx,
            events_rx,
            capture_frame,
        } = self;

        session.attach_map();

        let mut ticker = Ticker::start(interval, events_tx)
            .context("failed to start ticker thread")?;
        info!("Session started, ticking every {} ms", interval.as_millis());

        let mut ticks = 0u64;
        let stop_reason = loop {
            if limit.is_some_and(|limit| ticks >= limit) {
                break StopReason::TickLimit;
            }

            let event = match events_rx.recv() {
                Ok(event) => event,
                Err(_) => break StopReason::Disconnected,
            };

            match event {
                SessionEvent::Tick => {
                    let outcome = session.tick();
                    ticks += 1;
                    on_update(&session, &SessionUpdate::Ticked(outcome));
                }
                SessionEvent::Camera(camera_event) => {
                    let redraw = session.handle_camera(camera_event);
                    on_update(&session, &SessionUpdate::CameraChanged(redraw));
                }
                SessionEvent::Teardown => break StopReason::Teardown,
            }
        };

        ticker.cancel();
        let dropped = events_rx.try_iter().count();
        if dropped > 0 {
            debug!("Discarded {} queued events after stop", dropped);
        }

        let (final_frame, final_tiles) = if capture_frame {
            let tiles = session.map().map(|map| map.visible_tile_urls()).unwrap_or_default();
            (session.render_frame(), tiles)
        } else {
            (None, Vec::new())
        };
        session.release_map();
        info!("Session stopped ({:?}) after {} ticks", stop_reason, ticks);

        Ok(DriverReport {
            session,
            final_frame,
            final_tiles,
            stop_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::explorer_config::ExplorerConfig;
    use crate::location::provider::RandomWalkProvider;

    fn session() -> ExplorerSession {
        let mut config = ExplorerConfig::default();
        config.viewport.width = 200;
        config.viewport.height = 150;
        let provider = RandomWalkProvider::new(config.origin, config.walk_jitter_deg, Some(7));
        ExplorerSession::new(config, vec![], Box::new(provider))
    }

    #[test]
    fn test_runs_until_tick_limit() {
        let report = SessionDriver::new(session())
            .with_frame_capture(true)
            .run(Duration::from_millis(5), Some(10), |_, _| {})
            .unwrap();

        assert_eq!(report.stop_reason, StopReason::TickLimit);
        assert_eq!(report.session.path().len(), 11);
        assert!(!report.session.is_map_live());
        let frame = report.final_frame.unwrap();
        assert_eq!(frame.dimensions(), (200, 150));
        assert!(!report.final_tiles.is_empty());
        assert!(report.final_tiles.iter().all(|url| url.starts_with("https://") && url.ends_with(".png")));
    }

    #[test]
    fn test_teardown_stops_loop() {
        let driver = SessionDriver::new(session());
        let sender = driver.sender();
        let mut seen = 0;
        let report = driver
            .run(Duration::from_millis(5), None, |_, update| {
                if let SessionUpdate::Ticked(_) = update {
                    seen += 1;
                    if seen == 3 {
                        let _ = sender.send(SessionEvent::Teardown);
                    }
                }
            })
            .unwrap();

        assert_eq!(report.stop_reason, StopReason::Teardown);
        assert!(report.session.ticks() >= 3);
        assert!(report.final_frame.is_none());
        assert!(report.final_tiles.is_empty());
    }

    #[test]
    fn test_camera_events_are_serialised_with_ticks() {
        let driver = SessionDriver::new(session());
        let sender = driver.sender();
        sender.send(SessionEvent::Camera(CameraEvent::Resize { width: 64, height: 48 })).unwrap();

        let mut camera_updates = 0;
        let report = driver
            .run(Duration::from_millis(5), Some(2), |session, update| {
                if let SessionUpdate::CameraChanged(kind) = update {
                    camera_updates += 1;
                    assert!(matches!(kind, RedrawKind::Full { .. }));
                    assert_eq!(session.camera().width(), 64);
                }
            })
            .unwrap();

        assert_eq!(camera_updates, 1);
        assert_eq!(report.session.camera().height(), 48);
    }
}
