use std::env;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};

use super::effects::{FetchError, HttpClient};
use super::PYPX_VERSION;

const LISTING_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Decide whether pypx should honor standard proxy environment variables.
///
/// Behavior:
/// - `PYPX_KEEP_PROXIES=1/true/yes/on` forces proxies on.
/// - `PYPX_KEEP_PROXIES=0/false/no/off/""` forces proxies off.
/// - If unset, proxies are enabled only when at least one proxy env var is set.
pub(crate) fn keep_proxies() -> bool {
    match env::var("PYPX_KEEP_PROXIES") {
        Ok(raw) => {
            let value = raw.trim().to_ascii_lowercase();
            !matches!(value.as_str(), "" | "0" | "false" | "no" | "off")
        }
        Err(_) => {
            const PROXY_KEYS: &[&str] = &[
                "HTTP_PROXY",
                "http_proxy",
                "HTTPS_PROXY",
                "https_proxy",
                "ALL_PROXY",
                "all_proxy",
            ];
            PROXY_KEYS.iter().any(|key| {
                env::var(key)
                    .ok()
                    .is_some_and(|value| !value.trim().is_empty())
            })
        }
    }
}

fn client_builder() -> reqwest::blocking::ClientBuilder {
    let builder = Client::builder()
        .user_agent(format!("pypx/{PYPX_VERSION}"))
        .connect_timeout(CONNECT_TIMEOUT);
    if keep_proxies() {
        builder
    } else {
        builder.no_proxy()
    }
}

/// Blocking HTTP access backed by reqwest.
///
/// Listing fetches are bounded; artifact downloads only bound the connect
/// phase since installers can be large.
pub struct ReqwestHttpClient {
    listing: Client,
    download: Client,
}

impl ReqwestHttpClient {
    /// Builds the listing and download clients.
    ///
    /// # Errors
    /// Returns an error when the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> {
        let listing = client_builder()
            .timeout(LISTING_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        let download = client_builder()
            .timeout(None::<Duration>)
            .build()
            .context("failed to build HTTP download client")?;
        Ok(Self { listing, download })
    }
}

fn checked_send(request: reqwest::blocking::RequestBuilder) -> Result<Response, FetchError> {
    let response = request.send().map_err(|err| FetchError::Transfer {
        message: err.to_string(),
    })?;
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::Status {
            code: status.as_u16(),
        })
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        checked_send(self.listing.get(url))?
            .text()
            .map_err(|err| FetchError::Transfer {
                message: err.to_string(),
            })
    }

    fn download_to(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let mut response = checked_send(self.download.get(url))?;
        let mut file = File::create(dest).map_err(|err| FetchError::Transfer {
            message: format!("creating {}: {err}", dest.display()),
        })?;
        response
            .copy_to(&mut file)
            .map_err(|err| FetchError::Transfer {
                message: format!("writing {}: {err}", dest.display()),
            })
    }
}
