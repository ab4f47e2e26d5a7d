use monster_arena::archive::{InMemoryArchive, RecordingNotifier, RecordingQuestProgress};
use monster_arena::config::{BattleConfig, ServerConfig};
use monster_arena::context::BattleDeps;
use monster_arena::encounter::InMemoryMonsterStore;
use monster_arena::pvp::PvpCoordinator;
use monster_arena::roster::InMemoryRoster;
use monster_arena::server::{router, AppState};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        error!(error = %err, "server exited");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let server_config = ServerConfig::from_env();

    // Demo wiring: in-memory stores seeded with a small roster and bestiary.
    // A deployment substitutes its own store implementations here.
    let roster = Arc::new(InMemoryRoster::seed_demo());
    let deps = Arc::new(BattleDeps {
        characters: roster.clone(),
        opponents: roster,
        monsters: Arc::new(InMemoryMonsterStore::seed_demo()),
        archive: Arc::new(InMemoryArchive::new()),
        notifier: Arc::new(RecordingNotifier::new()),
        quests: Arc::new(RecordingQuestProgress::new()),
        config: BattleConfig::default(),
    });

    let coordinator = Arc::new(PvpCoordinator::new(deps.clone()));
    PvpCoordinator::spawn_sweeper(coordinator.clone());

    let app = router(AppState { deps, coordinator });
    let listener = tokio::net::TcpListener::bind(server_config.bind_addr).await?;
    info!(addr = %server_config.bind_addr, "monster-arena listening");
    axum::serve(listener, app).await?;
    Ok(())
}
