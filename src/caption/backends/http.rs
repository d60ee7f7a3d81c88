#![cfg(feature = "caption-http")]

//! HTTP sidecar captioning backend.
//!
//! The vision-language model runs in a separate local inference server;
//! this backend ships each clip to it and reads back the generated text.
//! Weights never load in this process.

use anyhow::{anyhow, Context, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::caption::backend::{CaptionBackend, CaptionRequest};
use crate::caption::clip::Clip;

/// Captioning sidecar client.
pub struct HttpCaptioner {
    endpoint: String,
    agent: ureq::Agent,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    prompt: &'a str,
    max_new_tokens: usize,
    frames: Vec<WireFrame>,
}

#[derive(Serialize)]
struct WireFrame {
    width: u32,
    height: u32,
    /// Base64-encoded tightly packed RGB8.
    pixels: String,
}

#[derive(Deserialize)]
struct WireResponse {
    outputs: Vec<String>,
}

impl HttpCaptioner {
    pub fn new(endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint).context("parse caption endpoint url")?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(anyhow!(
                    "unsupported caption endpoint scheme '{}'; expected http(s)",
                    other
                ))
            }
        }
        Ok(Self {
            endpoint: endpoint.to_string(),
            agent: ureq::Agent::new(),
        })
    }

    fn encode_frames(clip: &Clip) -> Vec<WireFrame> {
        let engine = base64::engine::general_purpose::STANDARD;
        clip.frames
            .iter()
            .map(|frame| WireFrame {
                width: frame.width,
                height: frame.height,
                pixels: engine.encode(&frame.pixels),
            })
            .collect()
    }
}

impl CaptionBackend for HttpCaptioner {
    fn name(&self) -> &'static str {
        "http"
    }

    fn describe(&mut self, clip: &Clip, request: &CaptionRequest<'_>) -> Result<Vec<String>> {
        let body = serde_json::to_string(&WireRequest {
            prompt: request.prompt,
            max_new_tokens: request.max_new_tokens,
            frames: Self::encode_frames(clip),
        })?;

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .with_context(|| format!("caption request to {} failed", self.endpoint))?;

        let decoded: WireResponse = serde_json::from_reader(response.into_reader())
            .context("caption sidecar returned invalid JSON")?;
        if decoded.outputs.is_empty() {
            return Err(anyhow!("caption sidecar returned no sequences"));
        }
        Ok(decoded.outputs)
    }

    fn warm_up(&mut self) -> Result<()> {
        // Probe the endpoint so connection problems surface before the
        // first clip is decoded. Any HTTP status counts as reachable.
        match self.agent.head(&self.endpoint).call() {
            Ok(_) | Err(ureq::Error::Status(_, _)) => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("caption sidecar at {} unreachable", self.endpoint)),
        }
    }
}
