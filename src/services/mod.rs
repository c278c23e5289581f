//! Collaborator Services
//!
//! The session core talks to quest generation, completion verification,
//! and the NFT chain through these traits. The shipped implementations
//! in [`mock`] stand in for the real backends.

pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

use crate::nft::Nft;
use crate::quest::QuestSpec;

/// Quest-pool refill failed
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("quest generator unavailable: {0}")]
    Unavailable(String),
}

/// Completion check failed or threw
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("quest verifier unavailable: {0}")]
    Unavailable(String),
}

/// Reward minting or evolution produced no NFT
#[derive(Debug, Error)]
pub enum MintError {
    #[error("minting returned no NFT for quest {quest_id}")]
    NothingMinted { quest_id: String },
    #[error("no NFT {nft_id} to evolve")]
    UnknownNft { nft_id: String },
}

/// Produces quests on demand (the "AI" backend in production)
#[async_trait]
pub trait QuestGenerator: Send + Sync {
    async fn generate(&self) -> Result<QuestSpec, GenerationError>;
}

/// Confirms whether a quest was actually completed
#[async_trait]
pub trait QuestVerifier: Send + Sync {
    async fn verify(&self, quest_id: &str) -> Result<bool, VerificationError>;
}

/// Mints and evolves sword NFTs for a wallet.
///
/// Failure is represented as `None`, mirroring the chain API: a mint that
/// goes through but yields nothing is not a transport error.
#[async_trait]
pub trait NftService: Send + Sync {
    async fn fetch_user_nfts(&self, wallet: &str) -> Vec<Nft>;
    async fn mint(&self, wallet: &str, quest_id: &str) -> Option<Nft>;
    async fn evolve(&self, wallet: &str, nft_id: &str, quest_id: &str) -> Option<Nft>;
}
