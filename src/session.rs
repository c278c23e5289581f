//! Game Session
//!
//! One session per connected wallet: the quest pool, cumulative player
//! stats, the event feed, and the NFT collection. All of it sits behind a
//! single async mutex that is held across collaborator awaits, so a second
//! command issued while one is in flight queues instead of interleaving
//! with it. A transition mutates state only after the awaited collaborator
//! result is known; it commits fully or not at all.

use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::events::GameEventLog;
use crate::nft::Nft;
use crate::progression::PlayerStats;
use crate::quest::{Quest, QuestPool};
use crate::services::{MintError, NftService, QuestGenerator, QuestVerifier};

/// Quests offered per refill
pub const QUEST_POOL_SIZE: usize = 3;

const EVENT_QUESTS_ARRIVED: &str = "New quests have arrived!";
const EVENT_QUESTS_FAILED: &str = "Failed to load new quests. Try again later.";
const EVENT_COMPLETE_FAILED: &str = "Failed to complete the quest. Try again.";
const EVENT_COMPLETE_ERROR: &str = "An error occurred while completing the quest.";
const EVENT_MINT_FAILED: &str = "There was an issue minting your NFT.";
const EVENT_EVOLVE_FAILED: &str = "There was an issue evolving your NFT.";

/// Everything a session mutates, guarded as one unit
struct SessionState {
    pool: QuestPool,
    stats: PlayerStats,
    events: GameEventLog,
    collection: Vec<Nft>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            pool: QuestPool::new(),
            stats: PlayerStats::new(),
            events: GameEventLog::new(),
            collection: Vec::new(),
        }
    }
}

/// Point-in-time view of the quest pool for clients
#[derive(Debug, Clone)]
pub struct PoolSnapshot {
    pub quests: Vec<Quest>,
    pub active_quest_id: Option<String>,
}

/// A wallet-bound game session
pub struct GameSession {
    pub wallet: String,
    state: Mutex<SessionState>,
    generator: Arc<dyn QuestGenerator>,
    verifier: Arc<dyn QuestVerifier>,
    nfts: Arc<dyn NftService>,
}

impl GameSession {
    pub fn new(
        wallet: String,
        generator: Arc<dyn QuestGenerator>,
        verifier: Arc<dyn QuestVerifier>,
        nfts: Arc<dyn NftService>,
    ) -> Self {
        Self {
            wallet,
            state: Mutex::new(SessionState::new()),
            generator,
            verifier,
            nfts,
        }
    }

    /// Wallet-connect bootstrap: seed the NFT collection from the chain
    /// and load the initial quest pool.
    pub async fn initialize(&self) {
        let owned = self.nfts.fetch_user_nfts(&self.wallet).await;
        let mut guard = self.state.lock().await;
        info!("Session {} starts with {} NFT(s)", self.wallet, owned.len());
        guard.collection = owned;
        self.refill(&mut guard).await;
    }

    /// Request a fresh quest pool from the generator.
    ///
    /// Generation failure is absorbed here: the pool is left as it was and
    /// the failure surfaces only through the event feed.
    pub async fn load_quests(&self) {
        let mut guard = self.state.lock().await;
        self.refill(&mut guard).await;
    }

    /// Refill the pool in place. Caller holds the state lock.
    async fn refill(&self, state: &mut SessionState) {
        let calls = (0..QUEST_POOL_SIZE).map(|_| self.generator.generate());
        match try_join_all(calls).await {
            Ok(specs) => {
                let quests: Vec<Quest> = specs.into_iter().map(Quest::from_spec).collect();
                info!(
                    "Session {}: loaded {} new quests",
                    self.wallet,
                    quests.len()
                );
                state.pool.replace(quests);
                state.events.push(EVENT_QUESTS_ARRIVED);
            }
            Err(e) => {
                error!("Session {}: failed to load quests: {}", self.wallet, e);
                state.events.push(EVENT_QUESTS_FAILED);
            }
        }
    }

    /// Make a quest the active quest.
    ///
    /// No-op (returns false) when the id does not name an existing,
    /// non-completed quest.
    pub async fn start_quest(&self, quest_id: &str) -> bool {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        match state.pool.start(quest_id) {
            Some(quest) => {
                let title = quest.title.clone();
                info!("Session {}: started quest {}", self.wallet, quest_id);
                state.events.push(format!("You've started the quest: {}", title));
                true
            }
            None => false,
        }
    }

    /// Complete the active quest through the external verifier.
    ///
    /// Returns false with no event when nothing is active. A verifier
    /// rejection or error leaves all state untouched apart from the
    /// failure event. On success the completion commits as one unit, and
    /// a pool that is now fully completed triggers a refill whose failure
    /// does not roll the completion back.
    pub async fn complete_active_quest(&self) -> bool {
        let mut guard = self.state.lock().await;

        let Some(active_id) = guard.pool.active().map(|q| q.id.clone()) else {
            return false;
        };

        match self.verifier.verify(&active_id).await {
            Ok(true) => {
                let Some(finished) = guard.pool.finish_active() else {
                    // Unreachable while the lock is held, but never panic for it
                    warn!("Session {}: active quest vanished mid-completion", self.wallet);
                    return false;
                };

                let notices = guard
                    .stats
                    .record_completion(finished.difficulty, &finished.description);

                info!(
                    "Session {}: completed quest {} ({}), {} xp total",
                    self.wallet,
                    finished.id,
                    finished.difficulty.as_str(),
                    guard.stats.experience
                );

                guard.events.push(format!(
                    "Quest completed: {}! You earned a new NFT!",
                    finished.title
                ));
                for notice in notices {
                    guard.events.push(notice.message());
                }

                if guard.pool.all_completed() {
                    self.refill(&mut guard).await;
                }
                true
            }
            Ok(false) => {
                guard.events.push(EVENT_COMPLETE_FAILED);
                false
            }
            Err(e) => {
                error!(
                    "Session {}: error verifying quest {}: {}",
                    self.wallet, active_id, e
                );
                guard.events.push(EVENT_COMPLETE_ERROR);
                false
            }
        }
    }

    /// Mint the reward NFT for a completed quest
    pub async fn mint_reward(&self, quest_id: &str) -> Result<Nft, MintError> {
        let mut guard = self.state.lock().await;
        match self.nfts.mint(&self.wallet, quest_id).await {
            Some(nft) => {
                info!("Session {}: minted NFT {} for {}", self.wallet, nft.id, quest_id);
                guard.collection.push(nft.clone());
                Ok(nft)
            }
            None => {
                error!("Session {}: mint returned no NFT for {}", self.wallet, quest_id);
                guard.events.push(EVENT_MINT_FAILED);
                Err(MintError::NothingMinted {
                    quest_id: quest_id.to_string(),
                })
            }
        }
    }

    /// Evolve an owned NFT through a further quest
    pub async fn evolve_nft(&self, nft_id: &str, quest_id: &str) -> Result<Nft, MintError> {
        let mut guard = self.state.lock().await;
        match self.nfts.evolve(&self.wallet, nft_id, quest_id).await {
            Some(evolved) => {
                info!(
                    "Session {}: evolved NFT {} to stage {}",
                    self.wallet, evolved.id, evolved.evolution_stage
                );
                if let Some(slot) = guard.collection.iter_mut().find(|n| n.id == nft_id) {
                    *slot = evolved.clone();
                } else {
                    guard.collection.push(evolved.clone());
                }
                Ok(evolved)
            }
            None => {
                error!("Session {}: nothing to evolve for NFT {}", self.wallet, nft_id);
                guard.events.push(EVENT_EVOLVE_FAILED);
                Err(MintError::UnknownNft {
                    nft_id: nft_id.to_string(),
                })
            }
        }
    }

    pub async fn pool_snapshot(&self) -> PoolSnapshot {
        let guard = self.state.lock().await;
        PoolSnapshot {
            quests: guard.pool.quests().to_vec(),
            active_quest_id: guard.pool.active().map(|q| q.id.clone()),
        }
    }

    pub async fn stats(&self) -> PlayerStats {
        self.state.lock().await.stats.clone()
    }

    pub async fn events(&self) -> Vec<String> {
        self.state.lock().await.events.to_vec()
    }

    pub async fn collection(&self) -> Vec<Nft> {
        self.state.lock().await.collection.clone()
    }
}
