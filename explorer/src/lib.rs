// Module declarations for the fog-of-war explorer

// Session core: tracking, map lifetime, event loop
pub mod core {
    pub mod tracker;
    pub mod map_handle;
    pub mod session;
    pub mod driver;
}

// Configuration modules
pub mod config {
    pub mod constants;
    pub mod explorer_config;
}

// Data definitions and loaders
pub mod data {
    pub mod poi;
    pub mod quest;
    pub mod quests_loader;
}

// Map geometry
pub mod geo {
    pub mod projection;
    pub mod tiles;
}

// Position sources
pub mod location {
    pub mod provider;
}

// Geofencing and discovery bookkeeping
pub mod discovery {
    pub mod proximity;
}

// Fog overlay, markers and frame export
pub mod render {
    pub mod surface;
    pub mod fog;
    pub mod markers;
    pub mod export;
}

// Utility functions
pub mod utils {
    pub mod logging;
    pub mod csv_export;
    pub mod reporting;
    pub mod traits;
}

// CLI interface
pub mod cli {
    pub mod cli;
}

// Re-export commonly used types
pub use crate::core::session::{CameraEvent, ExplorerSession, TickOutcome};
pub use crate::core::driver::{SessionDriver, SessionEvent};
pub use crate::data::poi::Coordinate;
pub use crate::data::quest::{Quest, QuestId};
pub use crate::config::explorer_config::ExplorerConfig;
