// Seam between the path tracker and whatever produces positions

use crate::data::poi::Coordinate;

/// Poll-based position source. `None` means no fix is available this tick.
pub trait LocationProvider {
    fn next_position(&mut self) -> Option<Coordinate>;

    fn describe(&self) -> String {
        "location provider".to_string()
    }
}
