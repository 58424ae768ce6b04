// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ed25519 wallet generation from a fresh BIP-39 mnemonic.

use bip39::Mnemonic;
use ed25519_dalek::{SigningKey, VerifyingKey};
use pawtap_core::{GeneratedWallet, TapperError, WalletGenerator};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Entropy for a 24-word mnemonic.
const ENTROPY_BYTES: usize = 32;

/// A wallet keypair derived from a mnemonic.
pub struct WalletKeypair {
    mnemonic: Mnemonic,
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl WalletKeypair {
    /// Draws fresh entropy from the OS and derives a keypair from it.
    pub fn generate() -> Result<Self, TapperError> {
        let mut entropy = [0u8; ENTROPY_BYTES];
        OsRng.fill_bytes(&mut entropy);
        let mnemonic = Mnemonic::from_entropy(&entropy)
            .map_err(|e| TapperError::Wallet(format!("mnemonic generation failed: {e}")))?;
        Ok(Self::from_mnemonic(mnemonic))
    }

    /// Restores a keypair from its mnemonic phrase.
    pub fn from_phrase(phrase: &str) -> Result<Self, TapperError> {
        let mnemonic = Mnemonic::parse(phrase)
            .map_err(|e| TapperError::Wallet(format!("invalid mnemonic: {e}")))?;
        Ok(Self::from_mnemonic(mnemonic))
    }

    fn from_mnemonic(mnemonic: Mnemonic) -> Self {
        let seed = mnemonic.to_seed("");
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&seed[..32]);
        let signing_key = SigningKey::from_bytes(&secret);
        let verifying_key = VerifyingKey::from(&signing_key);
        Self {
            mnemonic,
            signing_key,
            verifying_key,
        }
    }

    pub fn private_hex(&self) -> String {
        hex::encode(self.signing_key.to_bytes())
    }

    pub fn public_hex(&self) -> String {
        hex::encode(self.verifying_key.to_bytes())
    }

    /// Workchain-0 style address: `0:` followed by the hex SHA-256 of the public key.
    pub fn address(&self) -> String {
        let digest = Sha256::digest(self.verifying_key.to_bytes());
        format!("0:{}", hex::encode(digest))
    }

    pub fn phrase(&self) -> String {
        self.mnemonic.to_string()
    }
}

/// Production [`WalletGenerator`] backed by [`WalletKeypair::generate`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519WalletGenerator;

impl WalletGenerator for Ed25519WalletGenerator {
    fn generate(&self) -> Result<GeneratedWallet, TapperError> {
        let keypair = WalletKeypair::generate()?;
        Ok(GeneratedWallet {
            address: keypair.address(),
            private_key: keypair.private_hex(),
            public_key: keypair.public_hex(),
            mnemonic: keypair.phrase(),
        })
    }
}
