use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("diffusion backend error: {0}")]
    Backend(String),
    #[error("invalid image payload: {0}")]
    Decode(String),
}

/// The external image-generation capability. One blocking call per request:
/// it either yields a full image or fails; no retry, no partial results.
/// Steps and guidance scale arrive pre-checked by the input surface and are
/// forwarded as-is.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        num_steps: u32,
        guidance_scale: f32,
    ) -> Result<Bytes, GenerationError>;
}

/// Client for an OpenAI-compatible diffusion sidecar
/// (`POST {base}/v1/images/generations`, `response_format: b64_json`).
pub struct DiffusionClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    b64_json: Option<String>,
}

impl DiffusionClient {
    pub fn new(base_url: String, model: String, api_key: Option<String>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        info!(%base_url, %model, "Diffusion client configured");
        Self {
            client: Client::new(),
            base_url,
            model,
            api_key,
        }
    }
}

#[async_trait]
impl ImageGenerator for DiffusionClient {
    async fn generate(
        &self,
        prompt: &str,
        num_steps: u32,
        guidance_scale: f32,
    ) -> Result<Bytes, GenerationError> {
        let url = format!("{}/v1/images/generations", self.base_url);

        // Fresh seed per request; the prompt is the only deterministic part.
        let seed: u64 = rand::random();

        let request_body = json!({
            "model": self.model,
            "prompt": prompt,
            "steps": num_steps,
            "guidance_scale": guidance_scale,
            "seed": seed,
            "n": 1,
            "response_format": "b64_json",
        });

        info!(steps = num_steps, guidance_scale, prompt_len = prompt.len(), "Dispatching generation request");

        let mut request = self.client.post(&url).json(&request_body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Diffusion backend returned an error");
            return Err(GenerationError::Http(format!("status={} body={}", status, body)));
        }

        let parsed: ImagesResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Backend(format!("parse error: {}", e)))?;

        let b64 = parsed
            .data
            .into_iter()
            .find_map(|d| d.b64_json)
            .ok_or_else(|| GenerationError::Backend("no image data in response".into()))?;

        let raw = base64::engine::general_purpose::STANDARD
            .decode(b64)
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        let image = ensure_png(raw)?;
        info!(size_bytes = image.len(), "Image generated");
        Ok(image)
    }
}

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// The artifact store only ever writes `.png` files, so payloads the backend
/// returns in another raster format are transcoded before they leave here.
fn ensure_png(data: Vec<u8>) -> Result<Bytes, GenerationError> {
    if data.starts_with(&PNG_MAGIC) {
        return Ok(Bytes::from(data));
    }
    let decoded = image::load_from_memory(&data)
        .map_err(|e| GenerationError::Decode(e.to_string()))?;
    let mut buf = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| GenerationError::Decode(e.to_string()))?;
    Ok(Bytes::from(buf))
}

/// Local stand-in used when no sidecar endpoint is configured: renders a
/// solid-colour PNG so the full submit/preview/download flow works offline.
pub struct PlaceholderGenerator;

const PLACEHOLDER_COLORS: [[u8; 3]; 5] = [
    [0x3B, 0x82, 0xF6],
    [0xEF, 0x44, 0x44],
    [0x10, 0xB9, 0x81],
    [0xF5, 0x9E, 0x0B],
    [0x8B, 0x5C, 0xF6],
];

#[async_trait]
impl ImageGenerator for PlaceholderGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _num_steps: u32,
        _guidance_scale: f32,
    ) -> Result<Bytes, GenerationError> {
        info!("No diffusion endpoint configured, rendering placeholder image");
        let [r, g, b] = PLACEHOLDER_COLORS[prompt.len() % PLACEHOLDER_COLORS.len()];
        let canvas = image::RgbImage::from_pixel(512, 512, image::Rgb([r, g, b]));
        let mut buf = Vec::new();
        canvas
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| GenerationError::Decode(e.to_string()))?;
        Ok(Bytes::from(buf))
    }
}
