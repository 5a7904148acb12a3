// Server-bound HTTP client handles.
//
// A handle couples a reqwest client with the server's base URL and the
// default headers it was built with. Request paths are resolved against
// the base URL, so callers only ever pass `rest/...` style targets.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::debug;
use url::Url;

use crate::auth::BasicCredentials;
use crate::error::Error;
use crate::normalize::resolve_url;
use crate::transport::TransportConfig;

/// Build the default header set for a server connection.
///
/// The `Authorization` value is marked sensitive so it never shows up in
/// reqwest's debug output.
pub fn default_headers(credentials: Option<&BasicCredentials>) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    if let Some(creds) = credentials {
        let mut value = HeaderValue::from_str(&creds.header_value())
            .map_err(|_| Error::InvalidHeader { name: "Authorization" })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// Asynchronous HTTP handle bound to one server base URL.
#[derive(Debug, Clone)]
pub struct AsyncHttpClient {
    http: reqwest::Client,
    base_url: Url,
    headers: HeaderMap,
}

impl AsyncHttpClient {
    pub fn new(
        base_url: Url,
        credentials: Option<&BasicCredentials>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let headers = default_headers(credentials)?;
        let http = transport.build_async(headers.clone())?;
        Ok(Self {
            http,
            base_url,
            headers,
        })
    }

    /// The server base URL (always ends in `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Default headers attached to every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The underlying HTTP client, for request shapes not covered here.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Resolve a request target against the base URL.
    pub fn url(&self, target: &str) -> Result<Url, Error> {
        Ok(resolve_url(&self.base_url, target)?)
    }

    /// Send a GET request and return the response body as text.
    pub async fn get(&self, target: &str) -> Result<String, Error> {
        let url = self.url(target)?;
        debug!(%url, "GET");

        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.text().await?)
    }

    /// Send a POST request with a plain-text body (openHAB item commands).
    pub async fn post_text(&self, target: &str, body: impl Into<String>) -> Result<(), Error> {
        let url = self.url(target)?;
        debug!(%url, "POST");

        let resp = self
            .http
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body.into())
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(())
    }
}

/// Blocking HTTP handle bound to one server base URL.
///
/// Can be built anywhere; its requests block, so send them from worker
/// threads rather than async tasks.
#[derive(Debug, Clone)]
pub struct SyncHttpClient {
    http: reqwest::blocking::Client,
    base_url: Url,
    headers: HeaderMap,
}

impl SyncHttpClient {
    pub fn new(
        base_url: Url,
        credentials: Option<&BasicCredentials>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let headers = default_headers(credentials)?;
        let http = transport.build_blocking(headers.clone())?;
        Ok(Self {
            http,
            base_url,
            headers,
        })
    }

    /// The server base URL (always ends in `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Default headers attached to every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn http(&self) -> &reqwest::blocking::Client {
        &self.http
    }

    /// Resolve a request target against the base URL.
    pub fn url(&self, target: &str) -> Result<Url, Error> {
        Ok(resolve_url(&self.base_url, target)?)
    }

    /// Send a GET request and return the response body as text.
    pub fn get(&self, target: &str) -> Result<String, Error> {
        let url = self.url(target)?;
        debug!(%url, "GET (blocking)");

        let resp = self.http.get(url.clone()).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.text()?)
    }
}
