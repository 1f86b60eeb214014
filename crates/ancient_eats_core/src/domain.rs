//! crates/ancient_eats_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage backend or transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two kinds of products the storefront sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Ebook,
    Workshop,
}

impl ProductCategory {
    /// Human-readable label used in generated documents.
    pub fn label(&self) -> &'static str {
        match self {
            ProductCategory::Ebook => "E-book",
            ProductCategory::Workshop => "Workshop",
        }
    }
}

/// A single catalog entry. Prices are display strings (e.g. `"$12.99"`);
/// the payment endpoint consumes them as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: ProductCategory,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub techniques: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
}

/// The current authenticated identity. Created by login/register, replaced
/// wholesale on subscribe, cleared on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subscription_status: SubscriptionStatus,
}

/// One purchase record. The (user_id, product_id) pair is not required to be
/// unique; repeat purchases of the same product append a second record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub purchase_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_date: Option<DateTime<Utc>>,
}

/// The subscription tiers offered on the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Monthly,
    Yearly,
}

impl SubscriptionPlan {
    /// Display price charged for this plan.
    pub fn price(&self) -> &'static str {
        match self {
            SubscriptionPlan::Monthly => "$9.99",
            SubscriptionPlan::Yearly => "$99.99",
        }
    }
}
