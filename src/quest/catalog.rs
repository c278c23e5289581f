//! Quest Catalog
//!
//! Templates the mock quest generator draws from. Loaded from a TOML file
//! at startup, falling back to the compiled-in set when the file is missing
//! or malformed.

use std::path::Path;

use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{info, warn};

use super::definition::{Difficulty, QuestSpec};

/// Raw catalog file as it appears in TOML
#[derive(Debug, Deserialize)]
struct RawCatalogFile {
    #[serde(rename = "quest")]
    quests: Vec<QuestSpec>,
}

/// Pool of quest templates for the mock generator
#[derive(Debug, Clone)]
pub struct QuestCatalog {
    templates: Vec<QuestSpec>,
}

impl QuestCatalog {
    /// The compiled-in template set
    pub fn builtin() -> Self {
        let template = |title: &str, description: &str, reward: &str, difficulty| QuestSpec {
            title: title.to_string(),
            description: description.to_string(),
            reward: reward.to_string(),
            difficulty,
        };

        Self {
            templates: vec![
                template(
                    "Dragon's Lair Expedition",
                    "Venture into the ancient dragon's lair and retrieve a scale from the sleeping beast without waking it.",
                    "Dragon Slayer Sword",
                    Difficulty::Hard,
                ),
                template(
                    "Goblin Encampment Raid",
                    "Clear out the goblin encampment that has been terrorizing local farmers.",
                    "Goblin Cleaver",
                    Difficulty::Medium,
                ),
                template(
                    "Lost Artifact Recovery",
                    "Recover the lost artifact from the abandoned temple in the forest.",
                    "Ancient Relic Blade",
                    Difficulty::Medium,
                ),
                template(
                    "Magical Essence Collection",
                    "Collect magical essence from the glowing crystals in the enchanted cave.",
                    "Arcane Sword",
                    Difficulty::Easy,
                ),
                template(
                    "Bandit Leader Takedown",
                    "Defeat the bandit leader who has been organizing raids on merchant caravans.",
                    "Bandit's Bane",
                    Difficulty::Medium,
                ),
            ],
        }
    }

    /// Load templates from a TOML catalog file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;

        let raw: RawCatalogFile = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;

        if raw.quests.is_empty() {
            return Err(format!("Catalog {:?} contains no quests", path));
        }

        Ok(Self { templates: raw.quests })
    }

    /// Load from the data directory, falling back to the compiled-in set.
    ///
    /// A bad or missing catalog file is never fatal.
    pub fn load_or_builtin(data_dir: &Path) -> Self {
        let path = data_dir.join("quests.toml");
        match Self::load_from_file(&path) {
            Ok(catalog) => {
                info!("Loaded {} quest templates from {:?}", catalog.len(), path);
                catalog
            }
            Err(e) => {
                warn!("{}; using built-in quest templates", e);
                Self::builtin()
            }
        }
    }

    /// Pick a random template
    pub fn pick(&self) -> QuestSpec {
        let mut rng = rand::thread_rng();
        self.templates
            .choose(&mut rng)
            .cloned()
            .expect("catalog is never empty")
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
