// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic wallet generator.

use std::sync::atomic::{AtomicUsize, Ordering};

use pawtap_core::{GeneratedWallet, TapperError, WalletGenerator};

/// A [`WalletGenerator`] producing `0:generated-<n>` addresses and counting calls.
#[derive(Debug, Default)]
pub struct CountingGenerator {
    generated: AtomicUsize,
}

impl CountingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many wallets have been generated.
    pub fn count(&self) -> usize {
        self.generated.load(Ordering::SeqCst)
    }
}

impl WalletGenerator for CountingGenerator {
    fn generate(&self) -> Result<GeneratedWallet, TapperError> {
        let n = self.generated.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(GeneratedWallet {
            address: format!("0:generated-{n}"),
            private_key: format!("private-{n}"),
            public_key: format!("public-{n}"),
            mnemonic: format!("mnemonic {n}"),
        })
    }
}
