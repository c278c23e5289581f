//! Quest Data Model
//!
//! Quests are generated by an external collaborator and held in the
//! session's pool until completed.

use serde::{Deserialize, Serialize};

/// Difficulty tier of a quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Experience awarded on successful completion
    pub fn experience(&self) -> u64 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 20,
            Difficulty::Hard => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// What a quest generator produces: everything but an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestSpec {
    pub title: String,
    pub description: String,
    /// Name of the sword awarded for this quest
    pub reward: String,
    pub difficulty: Difficulty,
}

/// A quest held in a session's pool
///
/// Immutable once generated, except for the completion flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    /// Unique opaque identifier
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward: String,
    pub difficulty: Difficulty,
    pub completed: bool,
}

impl Quest {
    /// Create a fresh, uncompleted quest from a generated spec
    pub fn from_spec(spec: QuestSpec) -> Self {
        Self {
            id: format!("quest-{}", uuid::Uuid::new_v4()),
            title: spec.title,
            description: spec.description,
            reward: spec.reward,
            difficulty: spec.difficulty,
            completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_experience() {
        assert_eq!(Difficulty::Easy.experience(), 10);
        assert_eq!(Difficulty::Medium.experience(), 20);
        assert_eq!(Difficulty::Hard.experience(), 30);
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!(Difficulty::from_str("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_str("medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("legendary"), None);
    }

    #[test]
    fn test_quest_from_spec() {
        let spec = QuestSpec {
            title: "Goblin Encampment Raid".to_string(),
            description: "Clear out the goblin encampment.".to_string(),
            reward: "Goblin Cleaver".to_string(),
            difficulty: Difficulty::Medium,
        };
        let a = Quest::from_spec(spec.clone());
        let b = Quest::from_spec(spec);

        assert!(!a.completed);
        assert!(a.id.starts_with("quest-"));
        assert_ne!(a.id, b.id);
    }
}
