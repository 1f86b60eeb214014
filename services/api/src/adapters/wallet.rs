//! services/api/src/adapters/wallet.rs
//!
//! The local crypto wallet used to sign payment requests. The wallet is
//! loaded once at startup from an ed25519 private key in the environment;
//! until that finishes, payment calls observe the `Loading` state.

use std::sync::Arc;

use ed25519_dalek::{Signature, Signer, SigningKey};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{error, info};

/// Domain separator prepended to every signed payment payload.
const SIGNING_PREFIX: &[u8] = b"ancient-eats:payment:v1:";

/// A connected wallet: a signing key plus its derived address.
pub struct Wallet {
    signing_key: SigningKey,
    address: String,
}

impl Wallet {
    /// Parses a wallet from a 64-character hex private key.
    pub fn from_hex(private_key_hex: &str) -> Result<Self, String> {
        let bytes = decode_hex(private_key_hex)?;
        let secret: [u8; 32] = bytes
            .try_into()
            .map_err(|_| "wallet private key must be 32 bytes".to_string())?;
        Ok(Self::from_secret_key_bytes(secret))
    }

    pub fn from_secret_key_bytes(secret: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&secret);
        let address = derive_address(&signing_key);
        Self {
            signing_key,
            address,
        }
    }

    /// Generates a throwaway wallet. Used by tests.
    pub fn generate() -> Self {
        let mut rng = rand::rngs::OsRng;
        let signing_key = SigningKey::generate(&mut rng);
        let address = derive_address(&signing_key);
        Self {
            signing_key,
            address,
        }
    }

    /// The `0x…` wallet address: first 20 bytes of the sha256 public key digest.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Signs a payment payload under the wallet's domain separator.
    pub fn sign(&self, payload: &[u8]) -> [u8; 64] {
        let mut signing_input = Vec::with_capacity(SIGNING_PREFIX.len() + payload.len());
        signing_input.extend_from_slice(SIGNING_PREFIX);
        signing_input.extend_from_slice(payload);
        let signature: Signature = self.signing_key.sign(&signing_input);
        signature.to_bytes()
    }
}

fn derive_address(signing_key: &SigningKey) -> String {
    let digest = Sha256::digest(signing_key.verifying_key().to_bytes());
    format!("0x{}", to_hex(&digest[..20]))
}

/// Connection lifecycle of the wallet layer.
pub enum WalletState {
    Disconnected,
    Loading,
    Ready(Arc<Wallet>),
    Failed(String),
}

pub type WalletHandle = Arc<RwLock<WalletState>>;

/// Starts loading the wallet in the background and returns its handle.
/// With no key configured the wallet settles into `Disconnected`.
pub fn connect(private_key_hex: Option<String>) -> WalletHandle {
    let handle: WalletHandle = Arc::new(RwLock::new(WalletState::Loading));
    let writer = handle.clone();
    tokio::spawn(async move {
        let next = match private_key_hex {
            None => WalletState::Disconnected,
            Some(hex) => match Wallet::from_hex(hex.trim()) {
                Ok(wallet) => {
                    info!(address = %wallet.address(), "wallet connected");
                    WalletState::Ready(Arc::new(wallet))
                }
                Err(e) => {
                    error!(error = %e, "failed to load wallet key");
                    WalletState::Failed(e)
                }
            },
        };
        *writer.write().await = next;
    });
    handle
}

fn to_hex(input: &[u8]) -> String {
    let mut output = String::with_capacity(input.len() * 2);
    for byte in input {
        output.push_str(&format!("{byte:02x}"));
    }
    output
}

fn decode_hex(input: &str) -> Result<Vec<u8>, String> {
    if input.len() % 2 != 0 {
        return Err("hex string has odd length".to_string());
    }
    (0..input.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&input[i..i + 2], 16)
                .map_err(|_| format!("invalid hex at offset {i}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::Verifier;

    #[test]
    fn hex_round_trip_restores_the_same_wallet() {
        let wallet = Wallet::generate();
        let hex = to_hex(&wallet.signing_key.to_bytes());
        let restored = Wallet::from_hex(&hex).unwrap();
        assert_eq!(wallet.address(), restored.address());
    }

    #[test]
    fn address_is_hex_with_prefix() {
        let wallet = Wallet::generate();
        let address = wallet.address();
        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 42);
    }

    #[test]
    fn signature_verifies_under_the_domain_prefix() {
        let wallet = Wallet::generate();
        let payload = b"$24.99|0xabc|nonce";
        let signature = wallet.sign(payload);

        let mut signing_input = SIGNING_PREFIX.to_vec();
        signing_input.extend_from_slice(payload);
        let verifying_key =
            ed25519_dalek::VerifyingKey::from_bytes(&wallet.public_key_bytes()).unwrap();
        let signature = ed25519_dalek::Signature::from_bytes(&signature);
        assert!(verifying_key.verify(&signing_input, &signature).is_ok());
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(Wallet::from_hex("abc").is_err());
        assert!(Wallet::from_hex("zz".repeat(32).as_str()).is_err());
        assert!(Wallet::from_hex(&"ab".repeat(16)).is_err());
    }
}
