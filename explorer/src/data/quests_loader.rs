use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use super::quest::{Quest, QuestId};
use crate::utils::logging::{self, FileIOType, OperationCategory};

#[derive(Debug, Error)]
pub enum QuestLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate quest id: {0}")]
    DuplicateId(QuestId),
}

#[derive(Deserialize)]
struct QuestFile {
    quests: Vec<Quest>,
}

// Pick the shape up front so a bad record reports its own line and column
fn parse_quest_list(json: &str) -> Result<Vec<Quest>, serde_json::Error> {
    if json.trim_start().starts_with('{') {
        serde_json::from_str::<QuestFile>(json).map(|file| file.quests)
    } else {
        serde_json::from_str::<Vec<Quest>>(json)
    }
}

pub fn parse_quests(json: &str) -> Result<Vec<Quest>, QuestLoadError> {
    let quests = parse_quest_list(json)?;

    let mut seen = HashSet::new();
    for quest in &quests {
        if !seen.insert(quest.id.clone()) {
            return Err(QuestLoadError::DuplicateId(quest.id.clone()));
        }
    }

    let unplaced = quests.iter().filter(|quest| !quest.is_placed()).count();
    if unplaced > 0 {
        warn!("{} of {} quests have no position and can never be discovered", unplaced, quests.len());
    }
    Ok(quests)
}

pub fn load_quests(path: impl AsRef<Path>) -> Result<Vec<Quest>, QuestLoadError> {
    let _timing = logging::start_timing("load_quests",
        OperationCategory::FileIO { subcategory: FileIOType::QuestLoad });

    let contents = fs::read_to_string(path.as_ref())?;
    let quests = parse_quests(&contents)?;
    info!("Loaded {} quests from {}", quests.len(), path.as_ref().display());
    Ok(quests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let quests = parse_quests(r#"[
            {"id": 1, "name": "Vittala Temple", "lat": 15.3424, "lng": 76.4747, "xp": 100},
            {"id": 2, "title": "Storyteller", "lat": null, "lng": null, "xp": 20}
        ]"#).unwrap();
        assert_eq!(quests.len(), 2);
        assert!(quests[0].is_placed());
        assert!(!quests[1].is_placed());
    }

    #[test]
    fn test_wrapped_list() {
        let quests = parse_quests(r#"{"quests": [{"id": "x", "name": "Lotus Mahal", "lat": 15.3198, "lng": 76.471}]}"#).unwrap();
        assert_eq!(quests[0].id, QuestId::new("x"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = parse_quests(r#"[{"id": 1, "name": "a"}, {"id": "1", "name": "b"}]"#);
        assert!(matches!(result, Err(QuestLoadError::DuplicateId(_))));
    }

    #[test]
    fn test_bad_record_keeps_position() {
        for json in [
            r#"[{"id": 1, "name": "a", "lat": "north"}]"#,
            r#"{"quests": [{"id": 1, "name": "a", "lat": "north"}]}"#,
        ] {
            let message = match parse_quests(json) {
                Err(QuestLoadError::Json(err)) => {
                    assert_eq!(err.line(), 1);
                    assert!(err.column() > 0);
                    err.to_string()
                }
                other => panic!("expected a JSON error, got {:?}", other),
            };
            assert!(message.contains("north"), "{}", message);
            assert!(!message.contains("untagged"));
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(load_quests("/nonexistent/quests.json"), Err(QuestLoadError::Io(_))));
    }
}
