//! services/api/src/adapters/payment.rs
//!
//! This module contains the payment bridge adapter, the concrete
//! implementation of the `PaymentService` port. One purchase or subscription
//! maps to exactly one wallet-signed POST against the external payment
//! endpoint. There is no retry, no timeout override and no idempotency key;
//! a caller retrying after a transient failure may create a duplicate charge.

use ancient_eats_core::ports::{PaymentError, PaymentService};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::wallet::{Wallet, WalletHandle, WalletState};

/// Request header carrying the signed payment payload.
const PAYMENT_HEADER: &str = "X-PAYMENT";
/// Response header carrying the settlement confirmation.
const PAYMENT_RESPONSE_HEADER: &str = "x-payment-response";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A payment adapter that signs requests with the local wallet and posts them
/// to the configured payment endpoint.
#[derive(Clone)]
pub struct HttpPaymentAdapter {
    http: reqwest::Client,
    base_url: String,
    wallet: WalletHandle,
}

impl HttpPaymentAdapter {
    /// Creates a new `HttpPaymentAdapter`.
    pub fn new(http: reqwest::Client, base_url: String, wallet: WalletHandle) -> Self {
        Self {
            http,
            base_url,
            wallet,
        }
    }

    /// Resolves the wallet or reports the precondition failure.
    async fn connected_wallet(&self) -> Result<Arc<Wallet>, PaymentError> {
        match &*self.wallet.read().await {
            WalletState::Disconnected => Err(PaymentError::WalletNotConnected),
            WalletState::Loading => Err(PaymentError::WalletLoading),
            WalletState::Failed(reason) => Err(PaymentError::WalletError(reason.clone())),
            WalletState::Ready(wallet) => Ok(wallet.clone()),
        }
    }
}

//=========================================================================================
// Wire Types
//=========================================================================================

/// The signed payload encoded into the `X-PAYMENT` request header.
#[derive(Debug, Serialize, Deserialize)]
struct PaymentPayload {
    amount: String,
    payer: String,
    nonce: Uuid,
    issued_at: DateTime<Utc>,
    /// Base64 ed25519 signature over `amount|payer|nonce|issued_at`.
    signature: String,
}

#[derive(Serialize)]
struct PaymentRequestBody<'a> {
    amount: &'a str,
}

/// Builds the base64 header value for one payment of `amount`.
fn build_payment_header(wallet: &Wallet, amount: &str) -> Result<String, PaymentError> {
    let nonce = Uuid::new_v4();
    let issued_at = Utc::now();
    let signing_input = format!(
        "{amount}|{payer}|{nonce}|{issued_at}",
        payer = wallet.address(),
        issued_at = issued_at.to_rfc3339()
    );
    let signature = BASE64.encode(wallet.sign(signing_input.as_bytes()));

    let payload = PaymentPayload {
        amount: amount.to_string(),
        payer: wallet.address().to_string(),
        nonce,
        issued_at,
        signature,
    };
    let json = serde_json::to_string(&payload)
        .map_err(|e| PaymentError::WalletError(e.to_string()))?;
    Ok(BASE64.encode(json))
}

//=========================================================================================
// `PaymentService` Trait Implementation
//=========================================================================================

#[async_trait]
impl PaymentService for HttpPaymentAdapter {
    /// Performs one signed payment request for the given display amount.
    async fn create_session(&self, amount: &str) -> Result<(), PaymentError> {
        let wallet = self.connected_wallet().await?;
        let header = build_payment_header(&wallet, amount)?;

        let response = self
            .http
            .post(format!("{}/api/payment", self.base_url))
            .header(PAYMENT_HEADER, header)
            .json(&PaymentRequestBody { amount })
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        let confirmation = response
            .headers()
            .get(PAYMENT_RESPONSE_HEADER)
            .ok_or(PaymentError::ResponseMissing)?;

        let decoded = BASE64
            .decode(confirmation.as_bytes())
            .map_err(|e| PaymentError::Transport(format!("malformed payment response: {e}")))?;
        let settlement: serde_json::Value = serde_json::from_slice(&decoded)
            .map_err(|e| PaymentError::Transport(format!("malformed payment response: {e}")))?;
        info!(settlement = %settlement, "decoded payment response");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::RwLock;

    fn adapter_with(state: WalletState) -> HttpPaymentAdapter {
        HttpPaymentAdapter::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9".to_string(),
            Arc::new(RwLock::new(state)),
        )
    }

    #[tokio::test]
    async fn disconnected_wallet_is_rejected_before_any_request() {
        let adapter = adapter_with(WalletState::Disconnected);
        let err = adapter.create_session("$24.99").await.unwrap_err();
        assert!(matches!(err, PaymentError::WalletNotConnected));
    }

    #[tokio::test]
    async fn loading_wallet_is_rejected_before_any_request() {
        let adapter = adapter_with(WalletState::Loading);
        let err = adapter.create_session("$24.99").await.unwrap_err();
        assert!(matches!(err, PaymentError::WalletLoading));
    }

    #[tokio::test]
    async fn failed_wallet_reports_its_reason() {
        let adapter = adapter_with(WalletState::Failed("bad key".to_string()));
        let err = adapter.create_session("$24.99").await.unwrap_err();
        match err {
            PaymentError::WalletError(reason) => assert_eq!(reason, "bad key"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn payment_header_decodes_back_to_the_signed_payload() {
        let wallet = Wallet::generate();
        let header = build_payment_header(&wallet, "$12.99").unwrap();

        let json = BASE64.decode(header).unwrap();
        let payload: PaymentPayload = serde_json::from_slice(&json).unwrap();
        assert_eq!(payload.amount, "$12.99");
        assert_eq!(payload.payer, wallet.address());
        assert!(!payload.signature.is_empty());
    }
}
