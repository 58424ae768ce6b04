// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the pawtap agent.
//!
//! This crate provides the shared domain types (quests, init-data, wallet
//! records), the error taxonomy, and the traits through which the agent talks
//! to its collaborators: the messaging client, the game HTTP API, the wallet
//! store, and the wallet generator.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{MessengerError, TapperError};
pub use types::{
    AccountProfile, AuthResponse, ChatInfo, GeneratedWallet, InitData, Peer, PeerRef, Quest,
    QuestKind, SessionIdentity, UserProfile, WalletRecord, WebViewRequest,
};

// Re-export all collaborator traits at crate root.
pub use traits::{GameApi, MessengerClient, WalletGenerator, WalletStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tapper_error_has_all_variants() {
        let _config = TapperError::Config("test".into());
        let _storage = TapperError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _messenger = TapperError::Messenger(MessengerError::Deactivated);
        let _http = TapperError::Http {
            message: "test".into(),
            source: None,
        };
        let _decode = TapperError::Decode {
            message: "test".into(),
            source: None,
        };
        let _invalid = TapperError::InvalidSession("acc-1".into());
        let _init = TapperError::InitData("test".into());
        let _wallet = TapperError::Wallet("test".into());
        let _internal = TapperError::Internal("test".into());
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_messenger<T: MessengerClient>() {}
        fn _assert_game_api<T: GameApi>() {}
        fn _assert_wallet_store<T: WalletStore>() {}
        fn _assert_wallet_generator<T: WalletGenerator>() {}
    }
}
