pub mod catalog;
pub mod domain;
pub mod ports;
pub mod prompt;
pub mod session;

pub use catalog::Catalog;
pub use domain::{
    Product, ProductCategory, Purchase, SubscriptionPlan, SubscriptionStatus, User,
};
pub use ports::{
    ImageError, ImageGenerator, ImageOrigin, ImageQuality, ImageRequest, ImageSize, PaymentError,
    PaymentService, PromoImage, SessionError, StateStore, StorageError,
};
pub use prompt::generate_promo_prompt;
pub use session::Session;
