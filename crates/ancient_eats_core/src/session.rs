//! crates/ancient_eats_core/src/session.rs
//!
//! The process-wide holder of the current user identity and purchase history.
//! The session exclusively owns both for the lifetime of the process; the
//! durable state store is a passive mirror that is rehydrated at startup and
//! written back after every mutation.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::domain::{Purchase, SubscriptionPlan, SubscriptionStatus, User};
use crate::ports::{SessionError, StateStore};

/// Storage key holding the serialized current user.
pub const USER_KEY: &str = "ancientEatsUser";
/// Storage key holding the serialized purchase list.
pub const PURCHASES_KEY: &str = "ancientEatsPurchases";

/// Session state: an explicitly owned object with clear init (`load`) and
/// teardown (`logout`) rather than ambient shared context.
pub struct Session {
    store: Arc<dyn StateStore>,
    user: Option<User>,
    purchases: Vec<Purchase>,
}

impl Session {
    /// Rehydrates the session from the state store. A corrupt entry is logged
    /// and treated as absent rather than failing startup.
    pub async fn load(store: Arc<dyn StateStore>) -> Result<Self, SessionError> {
        let user = match store.get(USER_KEY).await? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(key = USER_KEY, error = %e, "discarding corrupt state entry");
                    None
                }
            },
            None => None,
        };

        let purchases = match store.get(PURCHASES_KEY).await? {
            Some(raw) => match serde_json::from_str::<Vec<Purchase>>(&raw) {
                Ok(purchases) => purchases,
                Err(e) => {
                    warn!(key = PURCHASES_KEY, error = %e, "discarding corrupt state entry");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(Self {
            store,
            user,
            purchases,
        })
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    /// Mock login: the user is constructed from the email alone and the
    /// password is not validated. Always succeeds.
    pub async fn login(&mut self, email: &str, _password: &str) -> Result<User, SessionError> {
        let name = email.split('@').next().unwrap_or(email).to_string();
        let user = User {
            id: "1".to_string(),
            name,
            email: email.to_string(),
            subscription_status: SubscriptionStatus::Active,
        };
        self.replace_user(user.clone()).await?;
        Ok(user)
    }

    /// Mock registration: assigns a fresh time-based id and an inactive
    /// subscription. Always succeeds.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        _password: &str,
    ) -> Result<User, SessionError> {
        let user = User {
            id: millis_id(),
            name: name.to_string(),
            email: email.to_string(),
            subscription_status: SubscriptionStatus::Inactive,
        };
        self.replace_user(user.clone()).await?;
        Ok(user)
    }

    /// Clears the user and purchase list both in memory and in storage.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        self.user = None;
        self.purchases.clear();
        self.store.remove(USER_KEY).await?;
        self.store.remove(PURCHASES_KEY).await?;
        Ok(())
    }

    /// Appends a purchase record for the current user. Duplicate purchases of
    /// the same product are not prevented.
    pub async fn purchase_product(&mut self, product_id: &str) -> Result<Purchase, SessionError> {
        let user = self.user.as_ref().ok_or(SessionError::NotAuthenticated)?;

        let purchase = Purchase {
            id: millis_id(),
            user_id: user.id.clone(),
            product_id: product_id.to_string(),
            purchase_date: Utc::now(),
            renewal_date: None,
        };
        self.purchases.push(purchase.clone());

        let raw = serde_json::to_string(&self.purchases)?;
        self.store.put(PURCHASES_KEY, &raw).await?;
        Ok(purchase)
    }

    /// Activates the current user's subscription. The plan tier itself is not
    /// recorded durably.
    pub async fn subscribe(&mut self, _plan: SubscriptionPlan) -> Result<User, SessionError> {
        let mut user = self
            .user
            .clone()
            .ok_or(SessionError::NotAuthenticated)?;
        user.subscription_status = SubscriptionStatus::Active;
        self.replace_user(user.clone()).await?;
        Ok(user)
    }

    async fn replace_user(&mut self, user: User) -> Result<(), SessionError> {
        let raw = serde_json::to_string(&user)?;
        self.store.put(USER_KEY, &raw).await?;
        self.user = Some(user);
        Ok(())
    }
}

/// Time-based id, Unix milliseconds as a decimal string.
fn millis_id() -> String {
    Utc::now().timestamp_millis().to_string()
}
