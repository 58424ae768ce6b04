// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wallet store and wallet generator traits.

use async_trait::async_trait;

use crate::error::TapperError;
use crate::types::{GeneratedWallet, WalletRecord};

/// Keyed store of wallets, one per messaging account.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Looks up the wallet of an account.
    async fn get(&self, account_id: i64) -> Result<Option<WalletRecord>, TapperError>;

    /// Inserts `record` unless the account already has a wallet.
    ///
    /// Returns the record that is stored afterwards, which is the existing one
    /// when another writer got there first.
    async fn insert_if_absent(&self, record: WalletRecord) -> Result<WalletRecord, TapperError>;
}

/// Opaque capability that creates a fresh blockchain wallet.
pub trait WalletGenerator: Send + Sync {
    fn generate(&self) -> Result<GeneratedWallet, TapperError>;
}
