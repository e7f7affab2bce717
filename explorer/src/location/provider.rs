use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use csv::ReaderBuilder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::constants::MAX_WALK_JITTER_DEG;
use crate::data::poi::Coordinate;
use crate::utils::logging::{self, FileIOType, OperationCategory};
use crate::utils::traits::LocationProvider;

/// Stand-in for a positioning sensor: every fix is the anchor perturbed by a
/// uniform offset in `[-jitter, jitter)` degrees on each axis.
pub struct RandomWalkProvider {
    anchor: Coordinate,
    jitter_deg: f64,
    rng: StdRng,
}

impl RandomWalkProvider {
    pub fn new(anchor: Coordinate, jitter_deg: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        // gen_range panics on ranges that overflow, so keep the span finite
        let jitter_deg = if jitter_deg.is_finite() {
            jitter_deg.abs().min(MAX_WALK_JITTER_DEG)
        } else {
            0.0
        };
        Self {
            anchor,
            jitter_deg,
            rng,
        }
    }
}

impl LocationProvider for RandomWalkProvider {
    fn next_position(&mut self) -> Option<Coordinate> {
        if self.jitter_deg == 0.0 {
            return Some(self.anchor);
        }
        let d_lat = self.rng.gen_range(-self.jitter_deg..self.jitter_deg);
        let d_lng = self.rng.gen_range(-self.jitter_deg..self.jitter_deg);
        Some(self.anchor.offset(d_lat, d_lng))
    }

    fn describe(&self) -> String {
        format!("simulated walk (±{}° around {:.4}, {:.4})", self.jitter_deg, self.anchor.lat, self.anchor.lng)
    }
}

#[derive(Debug, Error)]
pub enum TrackLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row} holds a non-finite coordinate")]
    NonFinite { row: usize },
}

/// Replays a recorded track, one point per tick. Exhausted tracks yield no fix.
pub struct ScriptedProvider {
    points: VecDeque<Coordinate>,
}

impl ScriptedProvider {
    pub fn new(points: impl IntoIterator<Item = Coordinate>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Reads a `lat,lng` CSV with a header row.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, TrackLoadError> {
        let _timing = logging::start_timing("load_track",
            OperationCategory::FileIO { subcategory: FileIOType::TrackLoad });

        let file = File::open(path.as_ref())?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut points = Vec::new();
        for (index, record) in reader.deserialize::<Coordinate>().enumerate() {
            let coordinate = record?;
            if !coordinate.is_finite() {
                return Err(TrackLoadError::NonFinite { row: index + 1 });
            }
            points.push(coordinate);
        }

        info!("Loaded {} track points from {}", points.len(), path.as_ref().display());
        Ok(Self::new(points))
    }

    pub fn remaining(&self) -> usize {
        self.points.len()
    }
}

impl LocationProvider for ScriptedProvider {
    fn next_position(&mut self) -> Option<Coordinate> {
        self.points.pop_front()
    }

    fn describe(&self) -> String {
        format!("recorded track ({} points left)", self.points.len())
    }
}

/// Push-based adapter: a sensor thread sends fixes, each tick takes the newest
/// one and drops anything older.
pub struct ChannelProvider {
    receiver: Receiver<Coordinate>,
    disconnected: bool,
}

impl ChannelProvider {
    pub fn channel() -> (Sender<Coordinate>, Self) {
        let (sender, receiver) = mpsc::channel();
        (sender, Self { receiver, disconnected: false })
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl LocationProvider for ChannelProvider {
    fn next_position(&mut self) -> Option<Coordinate> {
        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(coordinate) => latest = Some(coordinate),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        debug!("Location feed disconnected");
                    }
                    self.disconnected = true;
                    break;
                }
            }
        }
        latest
    }

    fn describe(&self) -> String {
        "sensor channel".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_random_walk_stays_in_bounds() {
        let anchor = Coordinate::new(15.3350, 76.4600);
        let mut provider = RandomWalkProvider::new(anchor, 0.005, Some(7));
        for _ in 0..500 {
            let p = provider.next_position().unwrap();
            assert!((p.lat - anchor.lat).abs() <= 0.005);
            assert!((p.lng - anchor.lng).abs() <= 0.005);
        }
    }

    #[test]
    fn test_random_walk_clamps_extreme_jitter() {
        let anchor = Coordinate::new(15.3350, 76.4600);
        let mut huge = RandomWalkProvider::new(anchor, 1e308, Some(1));
        let p = huge.next_position().unwrap();
        assert!(p.is_finite());
        assert!((p.lat - anchor.lat).abs() <= MAX_WALK_JITTER_DEG);

        let mut nan = RandomWalkProvider::new(anchor, f64::NAN, Some(1));
        assert_eq!(nan.next_position(), Some(anchor));
    }

    #[test]
    fn test_random_walk_is_deterministic_with_seed() {
        let anchor = Coordinate::new(0.0, 0.0);
        let mut a = RandomWalkProvider::new(anchor, 0.01, Some(42));
        let mut b = RandomWalkProvider::new(anchor, 0.01, Some(42));
        for _ in 0..10 {
            assert_eq!(a.next_position(), b.next_position());
        }
    }

    #[test]
    fn test_scripted_provider_exhausts() {
        let mut provider = ScriptedProvider::new(vec![
            Coordinate::new(1.0, 2.0),
            Coordinate::new(3.0, 4.0),
        ]);
        assert_eq!(provider.next_position(), Some(Coordinate::new(1.0, 2.0)));
        assert_eq!(provider.next_position(), Some(Coordinate::new(3.0, 4.0)));
        assert_eq!(provider.next_position(), None);
    }

    #[test]
    fn test_track_from_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lat,lng").unwrap();
        writeln!(file, "15.3350, 76.4600").unwrap();
        writeln!(file, "15.3361,76.4622").unwrap();
        file.flush().unwrap();

        let provider = ScriptedProvider::from_csv(file.path()).unwrap();
        assert_eq!(provider.remaining(), 2);
    }

    #[test]
    fn test_channel_keeps_latest_fix() {
        let (sender, mut provider) = ChannelProvider::channel();
        assert_eq!(provider.next_position(), None);
        sender.send(Coordinate::new(1.0, 1.0)).unwrap();
        sender.send(Coordinate::new(2.0, 2.0)).unwrap();
        assert_eq!(provider.next_position(), Some(Coordinate::new(2.0, 2.0)));
        drop(sender);
        assert_eq!(provider.next_position(), None);
        assert!(provider.is_disconnected());
    }
}
