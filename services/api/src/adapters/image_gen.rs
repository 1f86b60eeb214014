//! services/api/src/adapters/image_gen.rs
//!
//! This module contains the adapter for the remote image-generation API.
//! It implements the `ImageGenerator` port from the `core` crate. Without a
//! real credential it runs in demo mode and serves the local placeholder;
//! remote failures also degrade to the placeholder instead of propagating.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::images::{
        CreateImageRequestArgs, Image, ImageModel, ImageQuality as OpenAiImageQuality,
        ImageResponseFormat, ImageSize as OpenAiImageSize,
    },
    Client,
};
use async_trait::async_trait;
use image::ImageOutputFormat;
use std::io::Cursor;
use tracing::{info, warn};

use ancient_eats_core::ports::{
    ImageError, ImageGenerator, ImageOrigin, ImageQuality, ImageRequest, ImageSize, PromoImage,
};

use super::placeholder::render_placeholder;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `ImageGenerator` port using the OpenAI
/// images API, with the deterministic placeholder as its fallback.
#[derive(Clone)]
pub struct OpenAiImageAdapter {
    /// `None` means demo mode: no remote call is ever attempted.
    client: Option<Client<OpenAIConfig>>,
    http: reqwest::Client,
    model: ImageModel,
}

impl OpenAiImageAdapter {
    /// Creates a new `OpenAiImageAdapter`.
    pub fn new(
        client: Option<Client<OpenAIConfig>>,
        http: reqwest::Client,
        model: &str,
    ) -> Self {
        let model = match model {
            "dall-e-2" => ImageModel::DallE2,
            "dall-e-3" => ImageModel::DallE3,
            other => ImageModel::Other(other.to_string()),
        };
        Self {
            client,
            http,
            model,
        }
    }

    /// One remote generation attempt: create, download, re-encode to PNG.
    async fn remote(&self, request: &ImageRequest) -> Result<Vec<u8>, RemoteImageError> {
        let client = self
            .client
            .as_ref()
            .ok_or(RemoteImageError::NoCredential)?;

        let api_request = CreateImageRequestArgs::default()
            .prompt(request.prompt.clone())
            .model(self.model.clone())
            .n(1)
            .size(map_size(request.size))
            .quality(map_quality(request.quality))
            .response_format(ImageResponseFormat::Url)
            .build()?;

        let response = client.images().generate(api_request).await?;
        let first = response.data.first().ok_or(RemoteImageError::Empty)?;

        let bytes = match first.as_ref() {
            Image::Url { url, .. } => self
                .http
                .get(url)
                .send()
                .await
                .map_err(|e| RemoteImageError::Fetch(e.to_string()))?
                .error_for_status()
                .map_err(|e| RemoteImageError::Fetch(e.to_string()))?
                .bytes()
                .await
                .map_err(|e| RemoteImageError::Fetch(e.to_string()))?
                .to_vec(),
            Image::B64Json { b64_json, .. } => {
                use base64::{engine::general_purpose::STANDARD, Engine as _};
                STANDARD
                    .decode(b64_json.as_bytes())
                    .map_err(|e| RemoteImageError::Decode(e.to_string()))?
            }
        };

        // Normalize to PNG so the result is always embeddable as-is.
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| RemoteImageError::Decode(e.to_string()))?;
        let mut png = Vec::new();
        decoded
            .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
            .map_err(|e| RemoteImageError::Decode(e.to_string()))?;
        Ok(png)
    }
}

#[derive(Debug, thiserror::Error)]
enum RemoteImageError {
    #[error("no image-generation credential configured")]
    NoCredential,
    #[error(transparent)]
    Api(#[from] OpenAIError),
    #[error("no image returned from the API")]
    Empty,
    #[error("failed to fetch generated image: {0}")]
    Fetch(String),
    #[error("failed to decode generated image: {0}")]
    Decode(String),
}

fn map_size(size: ImageSize) -> OpenAiImageSize {
    match size {
        ImageSize::S256 => OpenAiImageSize::S256x256,
        ImageSize::S512 => OpenAiImageSize::S512x512,
        ImageSize::S1024 => OpenAiImageSize::S1024x1024,
    }
}

fn map_quality(quality: ImageQuality) -> OpenAiImageQuality {
    match quality {
        ImageQuality::Standard => OpenAiImageQuality::Standard,
        ImageQuality::Hd => OpenAiImageQuality::HD,
    }
}

//=========================================================================================
// `ImageGenerator` Trait Implementation
//=========================================================================================

#[async_trait]
impl ImageGenerator for OpenAiImageAdapter {
    async fn generate_promo_image(
        &self,
        request: ImageRequest,
    ) -> Result<PromoImage, ImageError> {
        if self.client.is_none() {
            info!(prompt = %request.prompt, "demo mode: using placeholder image");
            return Ok(PromoImage {
                png: render_placeholder(&request.prompt)?,
                origin: ImageOrigin::Placeholder,
            });
        }

        match self.remote(&request).await {
            Ok(png) => Ok(PromoImage {
                png,
                origin: ImageOrigin::Generated,
            }),
            Err(e) => {
                warn!(error = %e, "image generation failed, falling back to placeholder");
                Ok(PromoImage {
                    png: render_placeholder(&request.prompt)?,
                    origin: ImageOrigin::Placeholder,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_adapter() -> OpenAiImageAdapter {
        OpenAiImageAdapter::new(None, reqwest::Client::new(), "dall-e-3")
    }

    #[tokio::test]
    async fn demo_mode_serves_the_placeholder() {
        let adapter = demo_adapter();
        let image = adapter
            .generate_promo_image(ImageRequest::new("roman banquet"))
            .await
            .unwrap();
        assert_eq!(image.origin, ImageOrigin::Placeholder);
        assert!(!image.png.is_empty());
    }

    #[test]
    fn sizes_and_qualities_map_onto_api_variants() {
        assert!(matches!(map_size(ImageSize::S256), OpenAiImageSize::S256x256));
        assert!(matches!(map_size(ImageSize::S512), OpenAiImageSize::S512x512));
        assert!(matches!(map_size(ImageSize::S1024), OpenAiImageSize::S1024x1024));
        assert!(matches!(map_quality(ImageQuality::Standard), OpenAiImageQuality::Standard));
        assert!(matches!(map_quality(ImageQuality::Hd), OpenAiImageQuality::HD));
    }

    #[tokio::test]
    async fn demo_mode_is_deterministic_per_prompt() {
        let adapter = demo_adapter();
        let a = adapter
            .generate_promo_image(ImageRequest::new("egyptian bread"))
            .await
            .unwrap();
        let b = adapter
            .generate_promo_image(ImageRequest::new("egyptian bread"))
            .await
            .unwrap();
        assert_eq!(a.png, b.png);
    }
}
