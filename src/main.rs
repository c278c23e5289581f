use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Path as UrlPath, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use dashmap::DashMap;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use uuid::Uuid;

mod config;
mod events;
mod nft;
mod progression;
mod quest;
mod services;
mod session;

use config::ServerConfig;
use nft::Nft;
use progression::PlayerStats;
use quest::{Quest, QuestCatalog};
use services::mock::{AutoPassVerifier, CatalogQuestGenerator, MockNftLedger};
use services::{NftService, QuestGenerator, QuestVerifier};
use session::GameSession;

/// Development wallet used when a connect request carries no public key
const DEV_WALLET: &str = "DummyPublicKeyForDevelopment";

// ============================================================================
// App State
// ============================================================================

#[derive(Clone)]
struct AppState {
    /// Session id -> live session
    sessions: Arc<DashMap<String, Arc<GameSession>>>,
    token_signer: SessionTokenSigner,
    generator: Arc<dyn QuestGenerator>,
    verifier: Arc<dyn QuestVerifier>,
    nft_service: Arc<dyn NftService>,
}

impl AppState {
    fn new(config: &ServerConfig) -> Self {
        let catalog = QuestCatalog::load_or_builtin(&config.data_dir);

        Self {
            sessions: Arc::new(DashMap::new()),
            token_signer: SessionTokenSigner::new(config.session_ttl_secs),
            generator: Arc::new(CatalogQuestGenerator::new(catalog)),
            verifier: Arc::new(AutoPassVerifier),
            nft_service: Arc::new(MockNftLedger::new()),
        }
    }

    /// Find the session already bound to a wallet, if one is live
    fn session_for_wallet(&self, wallet: &str) -> Option<(String, Arc<GameSession>)> {
        self.sessions
            .iter()
            .find(|entry| entry.value().wallet == wallet)
            .map(|entry| (entry.key().clone(), entry.value().clone()))
    }
}

// ============================================================================
// Signed Session Tokens
// ============================================================================

type HmacSha256 = Hmac<Sha256>;

/// Signs and validates wallet-session bearer tokens
#[derive(Clone)]
struct SessionTokenSigner {
    /// HMAC secret generated at startup
    secret: Arc<Vec<u8>>,
    ttl_secs: u64,
}

impl SessionTokenSigner {
    fn new(ttl_secs: u64) -> Self {
        use rand::RngCore;
        let mut secret = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        Self {
            secret: Arc::new(secret),
            ttl_secs,
        }
    }

    fn now_secs() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    fn sign(&self, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Create a signed token.
    /// Format: base64(session_id:wallet:expiry:signature)
    fn create_token(&self, session_id: &str, wallet: &str) -> String {
        let expiry = Self::now_secs() + self.ttl_secs;
        let payload = format!("{}:{}:{}", session_id, wallet, expiry);
        let signature = self.sign(&payload);
        base64::engine::general_purpose::URL_SAFE.encode(format!("{}:{}", payload, signature))
    }

    /// Validate a token, returning the session id it names
    fn validate_token(&self, token: &str) -> Option<String> {
        let token_data = base64::engine::general_purpose::URL_SAFE.decode(token).ok()?;
        let token_str = String::from_utf8(token_data).ok()?;

        let parts: Vec<&str> = token_str.splitn(4, ':').collect();
        if parts.len() != 4 {
            return None;
        }
        let (session_id, wallet, expiry_str, signature) =
            (parts[0], parts[1], parts[2], parts[3]);

        let expiry: u64 = expiry_str.parse().ok()?;
        if Self::now_secs() > expiry {
            warn!("Session token expired for wallet {}", wallet);
            return None;
        }

        let payload = format!("{}:{}:{}", session_id, wallet, expiry);
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        let expected = base64::engine::general_purpose::STANDARD.decode(signature).ok()?;
        if mac.verify_slice(&expected).is_err() {
            warn!("Session token signature invalid");
            return None;
        }

        Some(session_id.to_string())
    }
}

/// Resolve the Bearer token in the request headers to a live session
fn authorize(headers: &axum::http::HeaderMap, state: &AppState) -> Option<Arc<GameSession>> {
    let auth_str = headers.get("Authorization")?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;
    let session_id = state.token_signer.validate_token(token)?;
    state.sessions.get(&session_id).map(|s| s.value().clone())
}

fn unauthorized() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": "Not authenticated" })),
    )
}

// ============================================================================
// HTTP Handlers - Wallet Session
// ============================================================================

#[derive(Deserialize)]
struct ConnectRequest {
    #[serde(rename = "publicKey")]
    public_key: Option<String>,
}

#[derive(Serialize)]
struct ConnectResponse {
    success: bool,
    token: Option<String>,
    wallet: Option<String>,
    error: Option<String>,
}

/// POST /api/wallet/connect - Bind a wallet to a session and bootstrap it
async fn connect_wallet(
    State(state): State<AppState>,
    Json(req): Json<ConnectRequest>,
) -> impl IntoResponse {
    let wallet = req
        .public_key
        .filter(|k| !k.trim().is_empty())
        .unwrap_or_else(|| DEV_WALLET.to_string());

    // Reconnecting the same wallet reuses its session; only the token is new
    let (session_id, session, fresh) = match state.session_for_wallet(&wallet) {
        Some((id, session)) => (id, session, false),
        None => {
            let id = Uuid::new_v4().to_string();
            let session = Arc::new(GameSession::new(
                wallet.clone(),
                state.generator.clone(),
                state.verifier.clone(),
                state.nft_service.clone(),
            ));
            state.sessions.insert(id.clone(), session.clone());
            (id, session, true)
        }
    };

    if fresh {
        session.initialize().await;
        info!("Wallet connected: {} (session {})", wallet, session_id);
    } else {
        info!("Wallet reconnected: {} (session {})", wallet, session_id);
    }

    let token = state.token_signer.create_token(&session_id, &wallet);
    Json(ConnectResponse {
        success: true,
        token: Some(token),
        wallet: Some(wallet),
        error: None,
    })
}

/// POST /api/wallet/disconnect - Drop the session
async fn disconnect_wallet(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> impl IntoResponse {
    if let Some(auth_str) = headers.get("Authorization").and_then(|h| h.to_str().ok()) {
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            if let Some(session_id) = state.token_signer.validate_token(token) {
                if let Some((_, session)) = state.sessions.remove(&session_id) {
                    info!("Wallet disconnected: {}", session.wallet);
                }
            }
        }
    }
    Json(serde_json::json!({ "success": true }))
}

// ============================================================================
// HTTP Handlers - Quests
// ============================================================================

#[derive(Serialize)]
struct QuestsResponse {
    quests: Vec<Quest>,
    #[serde(rename = "activeQuestId")]
    active_quest_id: Option<String>,
}

/// GET /api/quests - Current pool and active quest
async fn get_quests(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> impl IntoResponse {
    let Some(session) = authorize(&headers, &state) else {
        return unauthorized().into_response();
    };

    let snapshot = session.pool_snapshot().await;
    Json(QuestsResponse {
        quests: snapshot.quests,
        active_quest_id: snapshot.active_quest_id,
    })
    .into_response()
}

/// POST /api/quests/reload - Ask the generator for a fresh pool
async fn reload_quests(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> impl IntoResponse {
    let Some(session) = authorize(&headers, &state) else {
        return unauthorized().into_response();
    };

    session.load_quests().await;
    let snapshot = session.pool_snapshot().await;
    Json(QuestsResponse {
        quests: snapshot.quests,
        active_quest_id: snapshot.active_quest_id,
    })
    .into_response()
}

#[derive(Serialize)]
struct CommandResponse {
    success: bool,
}

/// POST /api/quests/:id/start
async fn start_quest(
    State(state): State<AppState>,
    UrlPath(quest_id): UrlPath<String>,
    headers: axum::http::HeaderMap,
) -> impl IntoResponse {
    let Some(session) = authorize(&headers, &state) else {
        return unauthorized().into_response();
    };

    let started = session.start_quest(&quest_id).await;
    let status = if started {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    (status, Json(CommandResponse { success: started })).into_response()
}

/// POST /api/quests/complete - Complete the active quest
async fn complete_quest(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> impl IntoResponse {
    let Some(session) = authorize(&headers, &state) else {
        return unauthorized().into_response();
    };

    let success = session.complete_active_quest().await;
    Json(CommandResponse { success }).into_response()
}

// ============================================================================
// HTTP Handlers - NFTs, Stats, Events
// ============================================================================

#[derive(Deserialize)]
struct MintRequest {
    #[serde(rename = "questId")]
    quest_id: String,
}

#[derive(Serialize)]
struct NftResponse {
    success: bool,
    nft: Option<Nft>,
    error: Option<String>,
}

/// POST /api/nfts/mint - Mint the reward for a completed quest
async fn mint_nft(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Json(req): Json<MintRequest>,
) -> impl IntoResponse {
    let Some(session) = authorize(&headers, &state) else {
        return unauthorized().into_response();
    };

    match session.mint_reward(&req.quest_id).await {
        Ok(nft) => (
            StatusCode::OK,
            Json(NftResponse {
                success: true,
                nft: Some(nft),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(NftResponse {
                success: false,
                nft: None,
                error: Some(e.to_string()),
            }),
        )
            .into_response(),
    }
}

/// POST /api/nfts/:id/evolve - Evolve an owned NFT through another quest
async fn evolve_nft(
    State(state): State<AppState>,
    UrlPath(nft_id): UrlPath<String>,
    headers: axum::http::HeaderMap,
    Json(req): Json<MintRequest>,
) -> impl IntoResponse {
    let Some(session) = authorize(&headers, &state) else {
        return unauthorized().into_response();
    };

    match session.evolve_nft(&nft_id, &req.quest_id).await {
        Ok(nft) => (
            StatusCode::OK,
            Json(NftResponse {
                success: true,
                nft: Some(nft),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::NOT_FOUND,
            Json(NftResponse {
                success: false,
                nft: None,
                error: Some(e.to_string()),
            }),
        )
            .into_response(),
    }
}

#[derive(Serialize)]
struct CollectionResponse {
    nfts: Vec<Nft>,
}

/// GET /api/nfts
async fn get_nfts(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> impl IntoResponse {
    let Some(session) = authorize(&headers, &state) else {
        return unauthorized().into_response();
    };
    Json(CollectionResponse {
        nfts: session.collection().await,
    })
    .into_response()
}

#[derive(Serialize)]
struct StatsResponse {
    stats: PlayerStats,
}

/// GET /api/stats
async fn get_stats(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> impl IntoResponse {
    let Some(session) = authorize(&headers, &state) else {
        return unauthorized().into_response();
    };
    Json(StatsResponse {
        stats: session.stats().await,
    })
    .into_response()
}

#[derive(Serialize)]
struct EventsResponse {
    events: Vec<String>,
}

/// GET /api/events - Feed of recent game events, newest first
async fn get_events(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> impl IntoResponse {
    let Some(session) = authorize(&headers, &state) else {
        return unauthorized().into_response();
    };
    Json(EventsResponse {
        events: session.events().await,
    })
    .into_response()
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().timestamp_millis()
    }))
}

// ============================================================================
// Main
// ============================================================================

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/wallet/connect", post(connect_wallet))
        .route("/api/wallet/disconnect", post(disconnect_wallet))
        .route("/api/quests", get(get_quests))
        .route("/api/quests/reload", post(reload_quests))
        .route("/api/quests/complete", post(complete_quest))
        .route("/api/quests/:id/start", post(start_quest))
        .route("/api/nfts", get(get_nfts))
        .route("/api/nfts/mint", post(mint_nft))
        .route("/api/nfts/:id/evolve", post(evolve_nft))
        .route("/api/stats", get(get_stats))
        .route("/api/events", get(get_events))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ]),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("questforge_server=info".parse().unwrap()),
        )
        .init();

    let config = ServerConfig::load(Path::new("config.toml"));
    let state = AppState::new(&config);
    let app = build_router(state);

    info!("QuestForge server listening on http://{}", config.bind);

    let listener = tokio::net::TcpListener::bind(&config.bind).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
