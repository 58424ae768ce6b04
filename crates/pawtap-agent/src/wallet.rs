// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wallet side quest: one wallet per account, created once and reused.

use std::sync::Arc;

use pawtap_core::{
    AccountProfile, GameApi, MessengerClient, TapperError, WalletGenerator, WalletRecord,
    WalletStore,
};
use tracing::{debug, info, warn};

/// Links a wallet to the game account of one session.
pub struct WalletQuest {
    messenger: Arc<dyn MessengerClient>,
    game: Arc<dyn GameApi>,
    store: Arc<dyn WalletStore>,
    generator: Arc<dyn WalletGenerator>,
    session: String,
}

impl WalletQuest {
    pub fn new(
        messenger: Arc<dyn MessengerClient>,
        game: Arc<dyn GameApi>,
        store: Arc<dyn WalletStore>,
        generator: Arc<dyn WalletGenerator>,
        session: impl Into<String>,
    ) -> Self {
        Self {
            messenger,
            game,
            store,
            generator,
            session: session.into(),
        }
    }

    /// Returns the account's wallet address, generating and storing one on
    /// first use.
    pub async fn configure_wallet(&self) -> Result<String, TapperError> {
        let me = self.current_account().await?;

        if let Some(existing) = self.store.get(me.id).await? {
            debug!(session = %self.session, account_id = me.id, "reusing stored wallet");
            return Ok(existing.address);
        }

        let generated = self.generator.generate()?;
        let record = WalletRecord {
            account_id: me.id,
            address: generated.address,
            private_key: generated.private_key,
            public_key: generated.public_key,
            mnemonic: generated.mnemonic,
            session_name: self.session.clone(),
            username: me.username,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        let stored = self.store.insert_if_absent(record).await?;
        info!(session = %self.session, address = %stored.address, "wallet created");
        Ok(stored.address)
    }

    /// Links `address` to the game account.
    pub async fn submit(&self, address: &str) -> bool {
        let linked = self.game.submit_wallet(address).await;
        if !linked {
            warn!(session = %self.session, operation = "submit_wallet", address, "wallet was not accepted");
        }
        linked
    }

    /// Configures and submits the wallet. Submission success completes the quest.
    pub async fn complete(&self) -> Result<bool, TapperError> {
        let address = self.configure_wallet().await?;
        Ok(self.submit(&address).await)
    }

    async fn current_account(&self) -> Result<AccountProfile, TapperError> {
        let result = async {
            self.messenger.connect().await?;
            self.messenger.get_me().await
        }
        .await;

        if let Err(e) = self.messenger.disconnect().await {
            debug!(session = %self.session, error = %e, "disconnect failed");
        }
        Ok(result?)
    }
}
