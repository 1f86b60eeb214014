//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::pdf::{generate_promo_pdf, PdfOptions};
use crate::web::state::AppState;
use ancient_eats_core::domain::{Product, Purchase, SubscriptionPlan, SubscriptionStatus, User};
use ancient_eats_core::ports::{PaymentError, SessionError};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        storefront_handler,
        library_handler,
        purchase_handler,
        subscribe_handler,
        promo_pdf_handler,
        crate::web::auth::login_handler,
        crate::web::auth::register_handler,
        crate::web::auth::logout_handler,
    ),
    components(
        schemas(
            ProductDto,
            PlanDto,
            StorefrontResponse,
            PurchaseDto,
            UserDto,
            LibraryResponse,
            PurchaseResponse,
            SubscribeRequest,
            crate::web::auth::LoginRequest,
            crate::web::auth::RegisterRequest,
        )
    ),
    tags(
        (name = "Ancient Eats API", description = "Storefront, library, payment and promo-document endpoints.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Wire mirror of a catalog product.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
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

impl From<&Product> for ProductDto {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            price: p.price.clone(),
            category: match p.category {
                ancient_eats_core::domain::ProductCategory::Ebook => "ebook".to_string(),
                ancient_eats_core::domain::ProductCategory::Workshop => "workshop".to_string(),
            },
            icon: p.icon.clone(),
            detailed_description: p.detailed_description.clone(),
            sample_content: p.sample_content.clone(),
            historical_context: p.historical_context.clone(),
            ingredients: p.ingredients.clone(),
            techniques: p.techniques.clone(),
        }
    }
}

/// One subscription offer shown on the storefront.
#[derive(Serialize, ToSchema)]
pub struct PlanDto {
    pub plan: String,
    pub price: String,
}

#[derive(Serialize, ToSchema)]
pub struct StorefrontResponse {
    pub products: Vec<ProductDto>,
    pub plans: Vec<PlanDto>,
}

#[derive(Serialize, ToSchema)]
pub struct PurchaseDto {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub purchase_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_date: Option<String>,
}

impl From<&Purchase> for PurchaseDto {
    fn from(p: &Purchase) -> Self {
        Self {
            id: p.id.clone(),
            user_id: p.user_id.clone(),
            product_id: p.product_id.clone(),
            purchase_date: p.purchase_date.to_rfc3339(),
            renewal_date: p.renewal_date.map(|d| d.to_rfc3339()),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subscription_status: String,
}

impl From<&User> for UserDto {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            name: u.name.clone(),
            email: u.email.clone(),
            subscription_status: match u.subscription_status {
                SubscriptionStatus::Active => "active".to_string(),
                SubscriptionStatus::Inactive => "inactive".to_string(),
            },
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct LibraryResponse {
    pub products: Vec<ProductDto>,
    pub purchases: Vec<PurchaseDto>,
}

#[derive(Serialize, ToSchema)]
pub struct PurchaseResponse {
    pub purchase: PurchaseDto,
}

#[derive(Deserialize, ToSchema)]
pub struct SubscribeRequest {
    /// `monthly` or `yearly`.
    pub plan: String,
}

#[derive(Deserialize, IntoParams)]
pub struct PromoPdfQuery {
    /// Include detailed description and sample content.
    pub full_content: Option<bool>,
    /// Embed the AI promo illustration.
    pub ai_image: Option<bool>,
}

/// Maps payment bridge failures onto response codes. Wallet preconditions are
/// retryable service problems; a failed or unconfirmed charge is surfaced as
/// payment-required so the client can retry the whole flow.
fn payment_status(err: &PaymentError) -> StatusCode {
    match err {
        PaymentError::WalletNotConnected | PaymentError::WalletLoading => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        PaymentError::WalletError(_) => StatusCode::BAD_GATEWAY,
        PaymentError::ResponseMissing | PaymentError::Transport(_) => {
            StatusCode::PAYMENT_REQUIRED
        }
    }
}

fn parse_plan(raw: &str) -> Result<SubscriptionPlan, (StatusCode, String)> {
    match raw {
        "monthly" => Ok(SubscriptionPlan::Monthly),
        "yearly" => Ok(SubscriptionPlan::Yearly),
        other => Err((
            StatusCode::BAD_REQUEST,
            format!("Unknown subscription plan '{}'", other),
        )),
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// The storefront: the full catalog plus the subscription offers.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Catalog and subscription offers", body = StorefrontResponse)
    )
)]
pub async fn storefront_handler(State(state): State<Arc<AppState>>) -> Json<StorefrontResponse> {
    let products = state.catalog.all().iter().map(ProductDto::from).collect();
    let plans = [SubscriptionPlan::Monthly, SubscriptionPlan::Yearly]
        .iter()
        .map(|plan| PlanDto {
            plan: match plan {
                SubscriptionPlan::Monthly => "monthly".to_string(),
                SubscriptionPlan::Yearly => "yearly".to_string(),
            },
            price: plan.price().to_string(),
        })
        .collect();
    Json(StorefrontResponse { products, plans })
}

/// The current user's library: every product they have purchased.
#[utoipa::path(
    get,
    path = "/library",
    responses(
        (status = 200, description = "Owned products and purchase records", body = LibraryResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn library_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state.session.read().await;
    if session.user().is_none() {
        return Err((
            StatusCode::UNAUTHORIZED,
            "Please login to view your library".to_string(),
        ));
    }

    let purchases: Vec<PurchaseDto> = session.purchases().iter().map(PurchaseDto::from).collect();
    let products = session
        .purchases()
        .iter()
        .filter_map(|p| state.catalog.get(&p.product_id))
        .map(ProductDto::from)
        .collect();

    Ok(Json(LibraryResponse {
        products,
        purchases,
    }))
}

/// Pay for a product with the crypto wallet, then record the purchase.
///
/// The payment call is sequenced before the state mutation; on payment
/// failure nothing is recorded. Duplicate purchases of the same product are
/// not prevented.
#[utoipa::path(
    post,
    path = "/products/{id}/purchase",
    params(("id" = String, Path, description = "The product to purchase.")),
    responses(
        (status = 201, description = "Purchase recorded", body = PurchaseResponse),
        (status = 401, description = "Not logged in"),
        (status = 402, description = "Payment failed"),
        (status = 404, description = "Unknown product"),
        (status = 503, description = "Wallet unavailable")
    )
)]
pub async fn purchase_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let price = state
        .catalog
        .get(&id)
        .map(|p| p.price.clone())
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Unknown product '{}'", id)))?;

    if state.session.read().await.user().is_none() {
        return Err((
            StatusCode::UNAUTHORIZED,
            "Please login to purchase products".to_string(),
        ));
    }

    // The session lock is not held across the payment await, so a slow
    // gateway cannot stall unrelated session traffic. The session may change
    // in the meantime; recording re-checks authentication.
    state
        .payments
        .create_session(&price)
        .await
        .map_err(|e| (payment_status(&e), e.to_string()))?;

    let mut session = state.session.write().await;
    let purchase = session.purchase_product(&id).await.map_err(|e| match e {
        SessionError::NotAuthenticated => (
            StatusCode::UNAUTHORIZED,
            "Please login to purchase products".to_string(),
        ),
        other => {
            error!("Failed to record purchase: {:?}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to record purchase".to_string(),
            )
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(PurchaseResponse {
            purchase: PurchaseDto::from(&purchase),
        }),
    ))
}

/// Pay for a subscription plan, then activate the current user.
#[utoipa::path(
    post,
    path = "/subscribe",
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Subscription activated", body = UserDto),
        (status = 400, description = "Unknown plan"),
        (status = 401, description = "Not logged in"),
        (status = 402, description = "Payment failed"),
        (status = 503, description = "Wallet unavailable")
    )
)]
pub async fn subscribe_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let plan = parse_plan(&req.plan)?;

    if state.session.read().await.user().is_none() {
        return Err((
            StatusCode::UNAUTHORIZED,
            "Please login to subscribe".to_string(),
        ));
    }

    // Same lock discipline as the purchase flow: pay without the lock,
    // re-check authentication when recording.
    state
        .payments
        .create_session(plan.price())
        .await
        .map_err(|e| (payment_status(&e), e.to_string()))?;

    let mut session = state.session.write().await;
    let user = session.subscribe(plan).await.map_err(|e| match e {
        SessionError::NotAuthenticated => (
            StatusCode::UNAUTHORIZED,
            "Please login to subscribe".to_string(),
        ),
        other => {
            error!("Failed to activate subscription: {:?}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to activate subscription".to_string(),
            )
        }
    })?;

    Ok(Json(UserDto::from(&user)))
}

/// Generate the promo document for a product and return it as a download.
#[utoipa::path(
    get,
    path = "/products/{id}/promo-pdf",
    params(
        ("id" = String, Path, description = "The product to promote."),
        PromoPdfQuery
    ),
    responses(
        (status = 200, description = "The promo PDF", body = Vec<u8>, content_type = "application/pdf"),
        (status = 404, description = "Unknown product"),
        (status = 500, description = "Document generation failed")
    )
)]
pub async fn promo_pdf_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<PromoPdfQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let product = state
        .catalog
        .get(&id)
        .cloned()
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Unknown product '{}'", id)))?;

    let options = PdfOptions {
        include_full_content: query.full_content.unwrap_or(false),
        include_ai_image: query.ai_image.unwrap_or(true),
        image_size: state.config.image_size,
        image_quality: state.config.image_quality,
    };

    let pdf = generate_promo_pdf(&product, options, state.images.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to generate promo PDF: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", pdf.file_name),
            ),
        ],
        pdf.bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ancient_eats_core::catalog::Catalog;
    use ancient_eats_core::ports::{
        ImageError, ImageGenerator, ImageOrigin, ImageQuality, ImageRequest, ImageSize,
        PaymentService, PromoImage, StateStore, StorageError,
    };
    use ancient_eats_core::session::Session;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::{Notify, RwLock};
    use tracing::Level;

    #[derive(Default)]
    struct MemoryStore {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl StateStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.entries.lock().unwrap().remove(key);
            Ok(())
        }
    }

    /// A payment endpoint that parks every call until the test releases it.
    #[derive(Default)]
    struct GatedPayments {
        gate: Notify,
    }

    #[async_trait]
    impl PaymentService for GatedPayments {
        async fn create_session(&self, _amount: &str) -> Result<(), PaymentError> {
            self.gate.notified().await;
            Ok(())
        }
    }

    struct FailingPayments;

    #[async_trait]
    impl PaymentService for FailingPayments {
        async fn create_session(&self, _amount: &str) -> Result<(), PaymentError> {
            Err(PaymentError::Transport("connection refused".to_string()))
        }
    }

    struct IdleImages;

    #[async_trait]
    impl ImageGenerator for IdleImages {
        async fn generate_promo_image(
            &self,
            _request: ImageRequest,
        ) -> Result<PromoImage, ImageError> {
            Ok(PromoImage {
                png: Vec::new(),
                origin: ImageOrigin::Placeholder,
            })
        }
    }

    fn test_config() -> Config {
        Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            state_dir: PathBuf::from("."),
            log_level: Level::INFO,
            payment_base_url: "http://127.0.0.1:9".to_string(),
            wallet_private_key: None,
            openai_api_key: None,
            image_model: "dall-e-3".to_string(),
            image_size: ImageSize::default(),
            image_quality: ImageQuality::default(),
        }
    }

    async fn test_state(payments: Arc<dyn PaymentService>) -> Arc<AppState> {
        let store = Arc::new(MemoryStore::default());
        let session = Session::load(store).await.unwrap();
        Arc::new(AppState {
            catalog: Arc::new(Catalog::new()),
            session: Arc::new(RwLock::new(session)),
            payments,
            images: Arc::new(IdleImages),
            config: Arc::new(test_config()),
        })
    }

    #[tokio::test]
    async fn failed_payment_records_no_purchase() {
        let state = test_state(Arc::new(FailingPayments)).await;
        state
            .session
            .write()
            .await
            .login("buyer@example.com", "pw")
            .await
            .unwrap();

        let err = purchase_handler(State(state.clone()), Path("2".to_string()))
            .await
            .err()
            .unwrap();

        assert_eq!(err.0, StatusCode::PAYMENT_REQUIRED);
        assert!(state.session.read().await.purchases().is_empty());
    }

    #[tokio::test]
    async fn session_stays_readable_while_a_payment_is_in_flight() {
        let payments = Arc::new(GatedPayments::default());
        let state = test_state(payments.clone()).await;
        state
            .session
            .write()
            .await
            .login("buyer@example.com", "pw")
            .await
            .unwrap();

        let pending = tokio::spawn({
            let state = state.clone();
            async move {
                purchase_handler(State(state), Path("2".to_string()))
                    .await
                    .is_ok()
            }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        // A concurrent session read must not wait for the payment to settle.
        let read = tokio::time::timeout(Duration::from_millis(200), state.session.read()).await;
        assert!(read.is_ok(), "session read blocked by an in-flight payment");
        drop(read);

        payments.gate.notify_one();
        assert!(pending.await.unwrap());
        assert_eq!(state.session.read().await.purchases().len(), 1);
    }

    #[tokio::test]
    async fn logout_during_payment_aborts_the_purchase() {
        let payments = Arc::new(GatedPayments::default());
        let state = test_state(payments.clone()).await;
        state
            .session
            .write()
            .await
            .login("fickle@example.com", "pw")
            .await
            .unwrap();

        let pending = tokio::spawn({
            let state = state.clone();
            async move { purchase_handler(State(state), Path("2".to_string())).await.err() }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        state.session.write().await.logout().await.unwrap();
        payments.gate.notify_one();

        let err = pending.await.unwrap().unwrap();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
        assert!(state.session.read().await.purchases().is_empty());
    }

    #[tokio::test]
    async fn subscribe_without_login_is_unauthorized() {
        let state = test_state(Arc::new(FailingPayments)).await;
        let err = subscribe_handler(
            State(state),
            Json(SubscribeRequest {
                plan: "monthly".to_string(),
            }),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
    }
}
