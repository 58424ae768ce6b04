// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pawtap run` implementation.
//!
//! Opens the shared wallet store, builds the messaging and HTTP clients of
//! every configured session, and runs one session loop per account until a
//! shutdown signal arrives. An invalid session ends only its own task.

use std::sync::Arc;

use pawtap_agent::pacing::jitter;
use pawtap_agent::{
    cancellable_sleep, install_signal_handler, AgentSettings, Pacing, PawsApiClient,
    SessionManager,
};
use pawtap_config::TapperConfig;
use pawtap_core::{SessionIdentity, TapperError, WalletGenerator, WalletStore};
use pawtap_messenger::GatewayMessenger;
use pawtap_wallet::{Ed25519WalletGenerator, SqliteWalletStore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Everything one session task owns.
struct SessionTask {
    identity: SessionIdentity,
    messenger: Arc<GatewayMessenger>,
    api: Arc<PawsApiClient>,
    store: Arc<dyn WalletStore>,
    generator: Arc<dyn WalletGenerator>,
    settings: AgentSettings,
    pacing: Pacing,
}

/// Runs all configured sessions until they stop or a signal is received.
pub async fn run_agent(config: TapperConfig) -> Result<(), TapperError> {
    let identities = config.session_identities();
    if identities.is_empty() {
        warn!("no sessions configured, nothing to do");
        return Ok(());
    }

    let store: Arc<dyn WalletStore> = Arc::new(open_wallet_store(&config).await?);
    let generator: Arc<dyn WalletGenerator> = Arc::new(Ed25519WalletGenerator);
    let settings = AgentSettings::from_config(&config);
    let pacing = Pacing::default();

    let mut tasks = Vec::with_capacity(identities.len());
    for identity in identities {
        let messenger = GatewayMessenger::new(&config.telegram.gateway_url, identity.clone())?;
        let api = PawsApiClient::new(&identity, &config.api, &pacing)?;
        tasks.push(SessionTask {
            identity,
            messenger: Arc::new(messenger),
            api: Arc::new(api),
            store: store.clone(),
            generator: generator.clone(),
            settings: settings.clone(),
            pacing: pacing.clone(),
        });
    }

    let cancel = install_signal_handler();
    info!(sessions = tasks.len(), "starting sessions");

    let mut set = JoinSet::new();
    for task in tasks {
        set.spawn(run_session(task, cancel.clone()));
    }
    while let Some(joined) = set.join_next().await {
        if let Err(e) = joined {
            error!(error = %e, "session task panicked");
        }
    }

    info!("all sessions stopped");
    Ok(())
}

/// The wallet database is only touched when the wallet quest can run;
/// otherwise sessions get a throwaway in-memory store.
async fn open_wallet_store(config: &TapperConfig) -> Result<SqliteWalletStore, TapperError> {
    if config.features.auto_task && config.features.auto_add_wallet {
        SqliteWalletStore::open(&config.storage.wallet_db_path).await
    } else {
        SqliteWalletStore::open_in_memory().await
    }
}

async fn run_session(task: SessionTask, cancel: CancellationToken) {
    let session = task.identity.name.clone();

    let delay = jitter(&task.settings.start_delay);
    info!(session = %session, seconds = delay.as_secs(), "starting after delay");
    if !cancellable_sleep(delay, &cancel).await {
        return;
    }

    if task.identity.proxy.is_some() {
        task.api.check_proxy().await;
    }

    let mut manager = SessionManager::new(
        session.clone(),
        task.messenger,
        task.api,
        task.store,
        task.generator,
        task.settings,
        task.pacing,
    );

    match manager.run(cancel).await {
        Ok(()) => info!(session = %session, "session stopped"),
        Err(TapperError::InvalidSession(reason)) => {
            error!(session = %session, reason = %reason, "invalid session");
        }
        Err(e) => error!(session = %session, error = %e, "session ended with error"),
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides `log_level`.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    // The `pawtap` directive prefix-matches every `pawtap_*` crate target.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pawtap={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
