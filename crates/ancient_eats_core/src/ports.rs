//! crates/ancient_eats_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like the local
//! state store, the payment gateway, or the image-generation API.

use async_trait::async_trait;

//=========================================================================================
// Port Error Types
//=========================================================================================

/// Failures from the durable key-value state store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("state store failure: {0}")]
    Backend(String),
}

/// Failures from session mutations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A mutating operation was attempted without a current identity.
    #[error("user must be logged in")]
    NotAuthenticated,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("state serialization failed: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Failures from the payment bridge. The wallet variants mirror the
/// precondition checks performed before any request leaves the process.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("please connect your wallet")]
    WalletNotConnected,
    #[error("wallet is loading")]
    WalletLoading,
    #[error("wallet error: {0}")]
    WalletError(String),
    /// The payment call succeeded transport-wise but the confirmation
    /// header was absent.
    #[error("payment response is absent")]
    ResponseMissing,
    #[error("payment transport failure: {0}")]
    Transport(String),
}

/// Unrecoverable local failures from image generation. Remote failures are
/// never surfaced through this type; adapters absorb them into a placeholder
/// result instead.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image rendering failed: {0}")]
    Render(String),
}

//=========================================================================================
// Image Request/Response Types
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    S256,
    S512,
    #[default]
    S1024,
}

impl std::str::FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "256x256" => Ok(ImageSize::S256),
            "512x512" => Ok(ImageSize::S512),
            "1024x1024" => Ok(ImageSize::S1024),
            other => Err(format!(
                "'{other}' is not a supported image size (256x256, 512x512, 1024x1024)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageQuality {
    #[default]
    Standard,
    Hd,
}

impl std::str::FromStr for ImageQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(ImageQuality::Standard),
            "hd" => Ok(ImageQuality::Hd),
            other => Err(format!(
                "'{other}' is not a supported image quality (standard, hd)"
            )),
        }
    }
}

/// Parameters for one promo-image generation call.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: ImageSize,
    pub quality: ImageQuality,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            size: ImageSize::default(),
            quality: ImageQuality::default(),
        }
    }

    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_quality(mut self, quality: ImageQuality) -> Self {
        self.quality = quality;
        self
    }
}

/// Whether the returned image came from the remote model or from the
/// deterministic local placeholder renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOrigin {
    Generated,
    Placeholder,
}

/// An embeddable in-memory image, always PNG-encoded.
#[derive(Debug, Clone)]
pub struct PromoImage {
    pub png: Vec<u8>,
    pub origin: ImageOrigin,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable key-value storage mirroring the in-memory session state.
/// Values are JSON text; writes are last-writer-wins with no merge logic.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Converts a display price string into a wallet-signed payment request
/// against the external payment endpoint. Success carries no receipt; the
/// caller is responsible for sequencing this before any state mutation.
#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn create_session(&self, amount: &str) -> Result<(), PaymentError>;
}

/// Produces a promo illustration for a text prompt. Implementations must
/// fall back to a deterministic local placeholder rather than propagate
/// remote failures.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_promo_image(&self, request: ImageRequest) -> Result<PromoImage, ImageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_sizes_parse_from_their_wire_strings() {
        assert_eq!("256x256".parse::<ImageSize>().unwrap(), ImageSize::S256);
        assert_eq!("512x512".parse::<ImageSize>().unwrap(), ImageSize::S512);
        assert_eq!("1024x1024".parse::<ImageSize>().unwrap(), ImageSize::S1024);
        assert!("640x480".parse::<ImageSize>().is_err());
    }

    #[test]
    fn image_qualities_parse_from_their_wire_strings() {
        assert_eq!("standard".parse::<ImageQuality>().unwrap(), ImageQuality::Standard);
        assert_eq!("hd".parse::<ImageQuality>().unwrap(), ImageQuality::Hd);
        assert!("ultra".parse::<ImageQuality>().is_err());
    }

    #[test]
    fn request_builder_overrides_the_defaults() {
        let request = ImageRequest::new("a feast")
            .with_size(ImageSize::S512)
            .with_quality(ImageQuality::Hd);
        assert_eq!(request.size, ImageSize::S512);
        assert_eq!(request.quality, ImageQuality::Hd);

        let default = ImageRequest::new("a feast");
        assert_eq!(default.size, ImageSize::S1024);
        assert_eq!(default.quality, ImageQuality::Standard);
    }
}
