pub mod auth;
pub mod rest;
pub mod state;

// Re-export the handlers so the binary that builds the router can reach them
// without spelling out every module path.
pub use auth::{login_handler, logout_handler, register_handler};
pub use rest::{
    library_handler, promo_pdf_handler, purchase_handler, storefront_handler, subscribe_handler,
};
