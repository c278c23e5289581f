//! Mock Collaborators
//!
//! Development stand-ins for the quest-generation backend, the completion
//! verifier, and the NFT chain. The generator draws from the quest
//! catalog; the verifier always passes; the ledger keeps per-wallet
//! collections in memory.

use std::collections::HashMap;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use super::{GenerationError, NftService, QuestGenerator, QuestVerifier, VerificationError};
use crate::nft::{Nft, NftAttributes};
use crate::quest::{QuestCatalog, QuestSpec};

/// Sample sword artwork used for every mock mint
const SAMPLE_IMAGES: [&str; 4] = [
    "https://images.unsplash.com/photo-1590845947698-8924d7409b56?q=80&w=1000&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1602910344008-22f323cc1817?q=80&w=1000&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1589656966895-2f33e7653819?q=80&w=1000&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1608231387042-66d1773070a5?q=80&w=1000&auto=format&fit=crop",
];

fn random_image() -> String {
    let mut rng = rand::thread_rng();
    SAMPLE_IMAGES
        .choose(&mut rng)
        .copied()
        .unwrap_or(SAMPLE_IMAGES[0])
        .to_string()
}

/// Generator that picks a random template from the quest catalog
pub struct CatalogQuestGenerator {
    catalog: QuestCatalog,
}

impl CatalogQuestGenerator {
    pub fn new(catalog: QuestCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl QuestGenerator for CatalogQuestGenerator {
    async fn generate(&self) -> Result<QuestSpec, GenerationError> {
        if self.catalog.is_empty() {
            return Err(GenerationError::Unavailable(
                "quest catalog is empty".to_string(),
            ));
        }
        Ok(self.catalog.pick())
    }
}

/// Verifier that confirms every completion, like the development backend
pub struct AutoPassVerifier;

#[async_trait]
impl QuestVerifier for AutoPassVerifier {
    async fn verify(&self, _quest_id: &str) -> Result<bool, VerificationError> {
        Ok(true)
    }
}

/// In-memory NFT chain keyed by wallet address.
///
/// Every wallet starts with one Novice Sword the first time it is looked
/// up, matching the development seed data.
#[derive(Default)]
pub struct MockNftLedger {
    collections: RwLock<HashMap<String, Vec<Nft>>>,
}

impl MockNftLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn starter_sword() -> Nft {
        Nft {
            id: "nft-1".to_string(),
            name: "Novice Sword".to_string(),
            description:
                "A basic sword for beginners. It has seen better days but still cuts true."
                    .to_string(),
            image_url: SAMPLE_IMAGES[0].to_string(),
            attributes: NftAttributes {
                kind: "sword".to_string(),
                rarity: "common".to_string(),
                power: 10,
                level: 1,
            },
            evolution_stage: 1,
            quests_used_in: vec![],
        }
    }
}

#[async_trait]
impl NftService for MockNftLedger {
    async fn fetch_user_nfts(&self, wallet: &str) -> Vec<Nft> {
        let mut collections = self.collections.write().await;
        collections
            .entry(wallet.to_string())
            .or_insert_with(|| vec![Self::starter_sword()])
            .clone()
    }

    async fn mint(&self, wallet: &str, quest_id: &str) -> Option<Nft> {
        let nft = Nft {
            id: format!("nft-{}", uuid::Uuid::new_v4()),
            name: "Quest Reward Sword".to_string(),
            description:
                "A sword earned through completing a dangerous quest. It glows with a faint blue light."
                    .to_string(),
            image_url: random_image(),
            attributes: NftAttributes {
                kind: "sword".to_string(),
                rarity: "uncommon".to_string(),
                power: 15,
                level: 1,
            },
            evolution_stage: 1,
            quests_used_in: vec![quest_id.to_string()],
        };

        let mut collections = self.collections.write().await;
        collections
            .entry(wallet.to_string())
            .or_default()
            .push(nft.clone());
        Some(nft)
    }

    async fn evolve(&self, wallet: &str, nft_id: &str, quest_id: &str) -> Option<Nft> {
        let mut collections = self.collections.write().await;
        let collection = collections.get_mut(wallet)?;
        let slot = collection.iter_mut().find(|n| n.id == nft_id)?;

        let evolved = slot.evolved(quest_id, random_image());
        *slot = evolved.clone();
        Some(evolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catalog_generator() {
        let generator = CatalogQuestGenerator::new(QuestCatalog::builtin());
        let spec = generator.generate().await.unwrap();
        assert!(!spec.title.is_empty());
        assert!(!spec.reward.is_empty());
    }

    #[tokio::test]
    async fn test_ledger_seeds_starter_sword() {
        let ledger = MockNftLedger::new();
        let nfts = ledger.fetch_user_nfts("wallet-a").await;
        assert_eq!(nfts.len(), 1);
        assert_eq!(nfts[0].name, "Novice Sword");

        // Second fetch does not re-seed
        let nfts = ledger.fetch_user_nfts("wallet-a").await;
        assert_eq!(nfts.len(), 1);
    }

    #[tokio::test]
    async fn test_mint_and_evolve() {
        let ledger = MockNftLedger::new();
        let minted = ledger.mint("wallet-a", "quest-1").await.unwrap();
        assert_eq!(minted.quests_used_in, vec!["quest-1".to_string()]);

        let evolved = ledger.evolve("wallet-a", &minted.id, "quest-2").await.unwrap();
        assert_eq!(evolved.attributes.power, 20);
        assert_eq!(evolved.evolution_stage, 2);

        // Unknown NFT or wallet evolves to nothing
        assert!(ledger.evolve("wallet-a", "nft-missing", "quest-2").await.is_none());
        assert!(ledger.evolve("wallet-b", &minted.id, "quest-2").await.is_none());
    }
}
