use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use clap::Parser;
use log::{info, warn};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use stats_client::{StatKey, Stats};

type BoxErr = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "ventti-stats-server", about = "Ventti player stats backend")]
struct Cli {
    /// Listen address
    #[arg(long, env = "STATS_LISTEN", default_value = "127.0.0.1:8790")]
    listen: SocketAddr,

    /// JSON file the player table is loaded from at boot and rewritten to
    /// after every mutation. In-memory only when absent.
    #[arg(long, env = "STATS_STORE")]
    store: Option<PathBuf>,
}

/// Player table plus its optional file backing. Persistence is best-effort:
/// a failed write is logged and the in-memory table stays authoritative.
struct Store {
    table: HashMap<String, Stats>,
    path: Option<PathBuf>,
}

impl Store {
    fn new(path: Option<PathBuf>) -> Self {
        Self {
            table: HashMap::new(),
            path,
        }
    }

    fn load(path: Option<PathBuf>) -> Self {
        let mut store = Self::new(path);
        let Some(path) = store.path.clone() else {
            return store;
        };
        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(table) => {
                    store.table = table;
                    info!("loaded {} player records from {}", store.table.len(), path.display());
                }
                Err(e) => warn!("ignoring unreadable store file {}: {e}", path.display()),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("store file {} not found, starting empty", path.display());
            }
            Err(e) => warn!("ignoring unreadable store file {}: {e}", path.display()),
        }
        store
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        let raw = match serde_json::to_string_pretty(&self.table) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("failed to serialize player table: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(path, raw) {
            warn!("failed to write store file {}: {e}", path.display());
        }
    }

    fn fetch(&self, name: &str) -> Option<Stats> {
        self.table.get(name).copied()
    }

    /// Returns the record and whether it was created. An existing record is
    /// returned unchanged, never zeroed.
    fn create(&mut self, name: &str) -> (Stats, bool) {
        if let Some(stats) = self.table.get(name) {
            return (*stats, false);
        }
        let stats = Stats::default();
        self.table.insert(name.to_string(), stats);
        self.persist();
        (stats, true)
    }

    /// Bumps one counter, creating a zeroed record first when the player is
    /// unknown, and returns the updated record.
    fn increment(&mut self, name: &str, key: StatKey) -> Stats {
        let stats = self.table.entry(name.to_string()).or_default();
        match key {
            StatKey::Wins => stats.wins += 1,
            StatKey::Losses => stats.losses += 1,
            StatKey::Draws => stats.draws += 1,
        }
        let updated = *stats;
        self.persist();
        updated
    }

    fn delete(&mut self, name: &str) {
        if self.table.remove(name).is_some() {
            self.persist();
        }
    }
}

type AppState = Arc<Mutex<Store>>;

async fn fetch_player(State(store): State<AppState>, Path(name): Path<String>) -> impl IntoResponse {
    match store.lock().unwrap().fetch(&name) {
        Some(stats) => (StatusCode::OK, Json(stats)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_player(State(store): State<AppState>, Path(name): Path<String>) -> impl IntoResponse {
    let (stats, created) = store.lock().unwrap().create(&name);
    if created {
        info!("created record for {name:?}");
        (StatusCode::CREATED, Json(stats)).into_response()
    } else {
        (StatusCode::OK, Json(stats)).into_response()
    }
}

async fn increment_stat(
    State(store): State<AppState>,
    Path((name, stat)): Path<(String, String)>,
) -> impl IntoResponse {
    let key: StatKey = match stat.parse() {
        Ok(key) => key,
        Err(()) => {
            warn!("unknown stat key {stat:?}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    let stats = store.lock().unwrap().increment(&name, key);
    info!("{name:?} {stat}: {:?}", stats);
    (StatusCode::OK, Json(stats)).into_response()
}

async fn delete_player(State(store): State<AppState>, Path(name): Path<String>) -> impl IntoResponse {
    store.lock().unwrap().delete(&name);
    info!("deleted record for {name:?}");
    StatusCode::NO_CONTENT
}

async fn healthz() -> &'static str {
    "ok"
}

fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/players/:name",
            get(fetch_player).post(create_player).delete(delete_player),
        )
        .route("/players/:name/:stat", axum::routing::post(increment_stat))
        .route("/healthz", get(healthz))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), BoxErr> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let store = Store::load(cli.store);
    let state: AppState = Arc::new(Mutex::new(store));

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    info!("stats server listening on {}", cli.listen);
    axum::serve(listener, app).await?;
    Ok(())
}
