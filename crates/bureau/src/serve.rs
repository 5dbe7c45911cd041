// SPDX-FileCopyrightText: 2026 Bureau Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bureau serve` command implementation.
//!
//! Wires the SQLite store, the Telegram transport, the flow engine, the
//! periodic sync scan, and (when enabled) the admin HTTP gateway, then
//! drains inbound events until the transport stops.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bureau_config::model::BureauConfig;
use bureau_core::types::ChatId;
use bureau_core::{BureauError, ChatTransport, Store};
use bureau_flow::dispatcher::Dispatcher;
use bureau_flow::tickets::TicketService;
use bureau_flow::{FlowEngine, SyncScan};
use bureau_gateway::{GatewayState, ServerConfig};
use bureau_storage::SqliteStore;
use bureau_telegram::TelegramTransport;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Interval between background sync scans. The gateway's POST /admin/sync
/// triggers the same scan on demand.
const SYNC_INTERVAL: Duration = Duration::from_secs(600);

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Runs the `bureau serve` command.
pub async fn run_serve(config: BureauConfig) -> Result<(), BureauError> {
    init_tracing(&config.bot.log_level);
    info!(bot = %config.bot.name, "starting bureau serve");

    let store: Arc<dyn Store> = {
        let store = SqliteStore::new(config.storage.clone());
        store.initialize().await?;
        Arc::new(store)
    };

    let transport = Arc::new(TelegramTransport::new(&config.telegram)?);
    let transport_dyn: Arc<dyn ChatTransport> = transport.clone();

    let dispatcher = Arc::new(Dispatcher::new(
        transport_dyn.clone(),
        store.clone(),
        config.limits.batch_delay_ms,
    ));
    let tickets = Arc::new(TicketService::new(store.clone(), dispatcher.clone()));

    let admin_chat = config.admin.chat_id.clone().map(ChatId);
    if admin_chat.is_none() {
        warn!("admin.chat_id not configured -- admin flows and alerts are disabled");
    }

    let engine = Arc::new(FlowEngine::new(
        store.clone(),
        transport_dyn,
        dispatcher.clone(),
        tickets.clone(),
        admin_chat,
        &config.limits,
    ));

    let sync = Arc::new(SyncScan::new(store.clone(), dispatcher, tickets));
    spawn_sync_loop(sync.clone());

    if config.gateway.enabled {
        let state = GatewayState {
            store: store.clone(),
            sync,
            auth: bureau_gateway::auth::AuthConfig {
                secret: config.admin.secret.clone(),
            },
            started_at: Instant::now(),
        };
        let server_config = ServerConfig {
            host: config.gateway.host.clone(),
            port: config.gateway.port,
        };
        tokio::spawn(async move {
            if let Err(err) = bureau_gateway::start_server(&server_config, state).await {
                error!(error = %err, "admin gateway exited");
            }
        });
    }

    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let _listener = transport.spawn_listener(tx);

    engine.run(rx).await;
    Ok(())
}

fn spawn_sync_loop(sync: Arc<SyncScan>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SYNC_INTERVAL);
        // The first tick fires immediately; skip it so startup stays quiet.
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(err) = sync.run().await {
                warn!(error = %err, "background sync scan failed");
            }
        }
    });
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bureau={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
