//! NFT Collectibles
//!
//! Sword NFTs earned from quests. Minting and evolution go through the
//! `NftService` collaborator; this module is just the data model and the
//! evolution derivation.

use serde::{Deserialize, Serialize};

/// On-chain attributes of a sword NFT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NftAttributes {
    /// Item category, e.g. "sword"
    #[serde(rename = "type")]
    pub kind: String,
    pub rarity: String,
    pub power: u32,
    pub level: u32,
}

/// A minted collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nft {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub attributes: NftAttributes,
    pub evolution_stage: u32,
    /// Ids of the quests this sword has been carried through
    pub quests_used_in: Vec<String>,
}

impl Nft {
    /// Derive the next evolution stage of this NFT.
    ///
    /// Power +5, level +1, stage +1; the quest it was used in is appended
    /// to its history. Name and description are extended, not replaced.
    pub fn evolved(&self, quest_id: &str, image_url: String) -> Nft {
        let mut quests_used_in = self.quests_used_in.clone();
        quests_used_in.push(quest_id.to_string());

        Nft {
            id: self.id.clone(),
            name: format!("{} +1", self.name),
            description: format!(
                "{} This sword has been strengthened through battle.",
                self.description
            ),
            image_url,
            attributes: NftAttributes {
                kind: self.attributes.kind.clone(),
                rarity: self.attributes.rarity.clone(),
                power: self.attributes.power + 5,
                level: self.attributes.level + 1,
            },
            evolution_stage: self.evolution_stage + 1,
            quests_used_in,
        }
    }
}
