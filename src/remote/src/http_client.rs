use crate::config::DeviceConfig;
use agribot_core::{BASE_URL, IMAGE_URL};
use anyhow::{Context, Result};
use crux_http::{
    HttpError,
    protocol::{HttpRequest, HttpResponse, HttpResult},
};
use log::debug;
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use reqwest::{Client, Method};
use rustls::crypto::{CryptoProvider, ring::default_provider};
use trait_variant::make;

/// Executes the HTTP requests the core asks for.
#[make(Send)]
#[cfg_attr(any(test, feature = "mock"), automock)]
pub trait DeviceClient {
    async fn execute(&self, request: HttpRequest) -> HttpResult;
}

#[derive(Clone)]
pub struct RoverClient {
    client: Client,
    device: DeviceConfig,
}

impl RoverClient {
    pub fn new(device: DeviceConfig) -> Result<Self> {
        Ok(Self {
            client: device_client()?,
            device,
        })
    }
}

impl DeviceClient for RoverClient {
    async fn execute(&self, request: HttpRequest) -> HttpResult {
        let url = resolve_url(&request.url, &self.device);
        debug!("{} {url}", request.method);

        match send(&self.client, &url, request).await {
            Ok(response) => HttpResult::Ok(response),
            Err(e) => HttpResult::Err(HttpError::Io(format!("{e:#}"))),
        }
    }
}

/// Create the HTTP client used to talk to the rover
pub fn device_client() -> Result<Client> {
    // another component may have installed a provider already
    let _ = CryptoProvider::install_default(default_provider());

    Client::builder()
        .build()
        .context("failed to create rover HTTP client")
}

/// Map a URL produced by the core onto the configured device.
///
/// Command requests carry the core's placeholder base; the image endpoint is
/// absolute and only replaced when an override is configured.
///
/// # Examples
/// ```
/// use agribot_remote::{config::DeviceConfig, http_client::resolve_url};
///
/// let device = DeviceConfig::parse(Some("http://10.0.0.7:5000".to_string()), None).unwrap();
/// assert_eq!(resolve_url("https://relative/json", &device), "http://10.0.0.7:5000/json");
/// ```
pub fn resolve_url(url: &str, device: &DeviceConfig) -> String {
    if let Some(path) = url.strip_prefix(BASE_URL) {
        return format!("{}{path}", device.command_url);
    }

    match &device.image_url {
        Some(image_url) if url == IMAGE_URL => image_url.clone(),
        _ => url.to_string(),
    }
}

async fn send(client: &Client, url: &str, request: HttpRequest) -> Result<HttpResponse> {
    let method = Method::from_bytes(request.method.as_bytes())
        .with_context(|| format!("failed to parse http method {:?}", request.method))?;

    let mut builder = client.request(method, url);
    for header in &request.headers {
        builder = builder.header(header.name.as_str(), header.value.as_str());
    }
    if !request.body.is_empty() {
        builder = builder.body(request.body);
    }

    let res = builder
        .send()
        .await
        .with_context(|| format!("failed to send request to {url}"))?;

    let mut response = HttpResponse::status(res.status().as_u16());
    for (name, value) in res.headers() {
        if let Ok(value) = value.to_str() {
            response.header(name.as_str(), value);
        }
    }

    let body = res
        .bytes()
        .await
        .context("failed to read response body")?;

    Ok(response.body(body.to_vec()).build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(image_url: Option<&str>) -> DeviceConfig {
        DeviceConfig::parse(
            Some("http://192.168.4.1:5000".to_string()),
            image_url.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn resolve_url_rebases_command_endpoint() {
        assert_eq!(
            resolve_url("https://relative/json", &device(None)),
            "http://192.168.4.1:5000/json"
        );
    }

    #[test]
    fn resolve_url_keeps_image_endpoint_without_override() {
        assert_eq!(resolve_url(IMAGE_URL, &device(None)), IMAGE_URL);
    }

    #[test]
    fn resolve_url_applies_image_override() {
        assert_eq!(
            resolve_url(IMAGE_URL, &device(Some("http://127.0.0.1:8080/frame"))),
            "http://127.0.0.1:8080/frame"
        );
        // other absolute urls are untouched
        assert_eq!(
            resolve_url("http://example.com/x", &device(Some("http://127.0.0.1:8080/frame"))),
            "http://example.com/x"
        );
    }
}
