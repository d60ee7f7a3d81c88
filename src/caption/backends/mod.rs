//! Caption backend implementations and construction.

pub mod stub;

#[cfg(feature = "caption-http")]
pub mod http;

use anyhow::{anyhow, Result};

use crate::caption::backend::CaptionBackend;

pub use stub::StubCaptioner;

#[cfg(feature = "caption-http")]
pub use http::HttpCaptioner;

/// Construct a caption backend by name.
pub fn build_captioner(name: &str, endpoint: Option<&str>) -> Result<Box<dyn CaptionBackend>> {
    match name {
        "stub" => Ok(Box::new(StubCaptioner::new())),
        "http" => build_http(endpoint),
        other => Err(anyhow!(
            "unknown caption backend '{}'; expected stub or http",
            other
        )),
    }
}

#[cfg(feature = "caption-http")]
fn build_http(endpoint: Option<&str>) -> Result<Box<dyn CaptionBackend>> {
    let endpoint =
        endpoint.ok_or_else(|| anyhow!("the http backend requires an endpoint URL"))?;
    Ok(Box::new(http::HttpCaptioner::new(endpoint)?))
}

#[cfg(not(feature = "caption-http"))]
fn build_http(_endpoint: Option<&str>) -> Result<Box<dyn CaptionBackend>> {
    Err(anyhow!(
        "the http backend requires the caption-http feature"
    ))
}
