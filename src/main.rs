use kvserve::config::{AppState, Config};
use kvserve::logger;
use kvserve::server;
use kvserve::store::KvAssetStore;
use std::sync::Arc;
use tokio::sync::Notify;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // Build the Tokio runtime, sizing the thread pool from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // Snapshot the asset root into the key-value store before accepting
    // any traffic; a missing or unreadable root aborts startup
    let store = KvAssetStore::load(&cfg.assets.root, cfg.assets.manifest.as_deref()).await?;

    let listener = server::create_listener(addr)?;
    logger::log_server_start(&addr, &cfg, store.len());

    let state = Arc::new(AppState::new(cfg, store));
    let shutdown = Arc::new(Notify::new());
    server::signal::start_signal_handler(Arc::clone(&shutdown));

    server::run_server_loop(listener, state, shutdown).await
}
