use std::time::Duration;

use reqwest::blocking::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MultiviewError, Result};
use crate::frame::ColorFrame;
use crate::pipeline::config::{BackendConfig, ReconstructionParams};

use super::codec::{bytes_from_base64, image_from_base64, image_to_base64};
use super::{
    BackgroundRemover, BackgroundRequest, EditBackend, EditRequest, ReconstructionBackend,
    ReconstructionRequest, ReconstructionResult,
};

/// Longest slice of an error body echoed into an error message.
const MAX_ERROR_BODY: usize = 512;

fn build_client(timeout: Duration) -> Result<HttpClient> {
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| MultiviewError::Backend(format!("failed to build HTTP client: {e}")))
}

fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// POST a JSON body and parse a JSON reply. Timeouts, transport failures,
/// non-success statuses and malformed bodies all become `Backend` errors.
fn post_json<P, R>(http: &HttpClient, endpoint: &str, payload: &P, service: &str) -> Result<R>
where
    P: Serialize,
    R: DeserializeOwned,
{
    let response = http.post(endpoint).json(payload).send().map_err(|e| {
        if e.is_timeout() {
            MultiviewError::Backend(format!("{service} request timed out ({endpoint})"))
        } else {
            MultiviewError::Backend(format!("{service} request failed ({endpoint}): {e}"))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(MultiviewError::Backend(format!(
            "{service} request failed ({}): {}",
            status.as_u16(),
            truncate_text(&body, MAX_ERROR_BODY)
        )));
    }

    response
        .json()
        .map_err(|e| MultiviewError::Backend(format!("failed parsing {service} response: {e}")))
}

#[derive(Serialize)]
struct EditPayload<'a> {
    image: String,
    prompt: &'a str,
    negative_prompt: &'a str,
    seed: u64,
    num_inference_steps: u32,
    guidance_scale: f32,
}

#[derive(Deserialize)]
struct ImageReply {
    image: String,
}

/// Edit backend reached over HTTP with base64 PNG bodies.
pub struct HttpEditBackend {
    http: HttpClient,
    endpoint: String,
}

impl HttpEditBackend {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }
}

impl EditBackend for HttpEditBackend {
    fn name(&self) -> &str {
        "http-edit"
    }

    fn edit(&self, request: &EditRequest<'_>) -> Result<ColorFrame> {
        let payload = EditPayload {
            image: image_to_base64(request.image)?,
            prompt: request.prompt,
            negative_prompt: request.negative_prompt,
            seed: request.seed,
            num_inference_steps: request.num_inference_steps,
            guidance_scale: request.guidance_scale,
        };
        debug!(endpoint = %self.endpoint, seed = request.seed, "Sending edit request");
        let reply: ImageReply = post_json(&self.http, &self.endpoint, &payload, "edit")?;
        image_from_base64(&reply.image, "edit")
    }
}

#[derive(Serialize)]
struct BackgroundPayload {
    image: String,
    output_size: u32,
    padding: f32,
}

pub struct HttpBackgroundRemover {
    http: HttpClient,
    endpoint: String,
}

impl HttpBackgroundRemover {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }
}

impl BackgroundRemover for HttpBackgroundRemover {
    fn name(&self) -> &str {
        "http-background"
    }

    fn remove_background(&self, request: &BackgroundRequest<'_>) -> Result<ColorFrame> {
        let payload = BackgroundPayload {
            image: image_to_base64(request.image)?,
            output_size: request.output_size,
            padding: request.padding,
        };
        let reply: ImageReply =
            post_json(&self.http, &self.endpoint, &payload, "background removal")?;
        image_from_base64(&reply.image, "background removal")
    }
}

#[derive(Serialize)]
struct ReconstructionPayload<'a> {
    images: Vec<String>,
    seed: u64,
    params: &'a ReconstructionParams,
}

#[derive(Deserialize)]
struct ReconstructionReply {
    artifact: String,
    #[serde(default)]
    elapsed_seconds: Option<f64>,
}

pub struct HttpReconstructionBackend {
    http: HttpClient,
    endpoint: String,
}

impl HttpReconstructionBackend {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }
}

impl ReconstructionBackend for HttpReconstructionBackend {
    fn name(&self) -> &str {
        "http-reconstruction"
    }

    fn reconstruct(&self, request: &ReconstructionRequest<'_>) -> Result<ReconstructionResult> {
        let images = request
            .images
            .iter()
            .map(|img| image_to_base64(img))
            .collect::<Result<Vec<_>>>()?;
        let payload = ReconstructionPayload {
            images,
            seed: request.seed,
            params: &request.params,
        };
        debug!(
            endpoint = %self.endpoint,
            views = request.images.len(),
            "Sending reconstruction request"
        );
        let reply: ReconstructionReply =
            post_json(&self.http, &self.endpoint, &payload, "reconstruction")?;
        Ok(ReconstructionResult {
            artifact: bytes_from_base64(&reply.artifact, "reconstruction")?,
            elapsed: reply
                .elapsed_seconds
                .filter(|s| s.is_finite() && *s >= 0.0)
                .map(Duration::from_secs_f64),
        })
    }
}

/// All three HTTP adapters built from one backend section.
pub struct HttpBackends {
    pub edit: HttpEditBackend,
    pub background: HttpBackgroundRemover,
    pub reconstruction: HttpReconstructionBackend,
}

impl HttpBackends {
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            edit: HttpEditBackend::new(
                config.edit_url.clone(),
                Duration::from_secs(config.edit_timeout_secs),
            )?,
            background: HttpBackgroundRemover::new(
                config.background_url.clone(),
                Duration::from_secs(config.background_timeout_secs),
            )?,
            reconstruction: HttpReconstructionBackend::new(
                config.reconstruction_url.clone(),
                Duration::from_secs(config.reconstruction_timeout_secs),
            )?,
        })
    }
}
