// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wallet generation and persistence for the wallet side quest.
//!
//! [`Ed25519WalletGenerator`] derives an Ed25519 keypair from a fresh 24-word
//! BIP-39 mnemonic. [`SqliteWalletStore`] keeps at most one wallet per
//! messaging account and is shared by every account task in the process.

pub mod keypair;
pub mod migrations;
pub mod store;

pub use keypair::{Ed25519WalletGenerator, WalletKeypair};
pub use store::SqliteWalletStore;
