//! HTTP transport implementation using reqwest.

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::{
    RequestContext, TransportResponse,
    config::{HttpConfig, HttpVersion},
};
use crate::error::{PosError, Result};

/// Validates URL for security constraints.
///
/// Only HTTPS is accepted, except plain HTTP to a loopback host, which local
/// gateway simulators use.
fn validate_url(url: &Url) -> Result<()> {
    let host = url
        .host_str()
        .ok_or_else(|| PosError::InvalidEndpoint(format!("URL missing host: {url}")))?;

    match url.scheme() {
        "https" => Ok(()),
        "http" if is_loopback(host) => Ok(()),
        "http" => Err(PosError::InvalidEndpoint(format!(
            "plain HTTP is only allowed for loopback hosts: {url}"
        ))),
        scheme => Err(PosError::InvalidEndpoint(format!("unsupported URL scheme '{scheme}'"))),
    }
}

fn is_loopback(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "::1" | "[::1]")
}

/// Validates header name and value for CRLF injection prevention.
fn validate_header(name: &str, value: &str) -> Result<()> {
    if name.contains(['\r', '\n', '\0']) {
        return Err(PosError::InvalidInput(
            "invalid header name: control characters not allowed".to_owned(),
        ));
    }
    if value.contains(['\r', '\n', '\0']) {
        return Err(PosError::InvalidInput(
            "invalid header value: control characters not allowed".to_owned(),
        ));
    }
    Ok(())
}

/// HTTP/1.1 and HTTP/2 transport using reqwest.
///
/// Holds one pooled client; clone it freely, clones share the pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
}

impl HttpTransport {
    /// Creates a transport with [`HttpConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns [`PosError::HttpError`] if the HTTP client cannot be created.
    ///
    /// # Examples
    ///
    /// ```
    /// use akbank_pos::transport::HttpTransport;
    ///
    /// let transport = HttpTransport::new().unwrap();
    /// ```
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates a transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::InvalidConfig`] if the configuration is out of
    /// bounds, or [`PosError::HttpError`] if client creation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use akbank_pos::transport::{HttpConfig, HttpTransport, HttpVersion};
    ///
    /// let config = HttpConfig {
    ///     timeout_secs: 20,
    ///     http_version: HttpVersion::Http1,
    ///     ..HttpConfig::default()
    /// };
    ///
    /// let transport = HttpTransport::with_config(&config).unwrap();
    /// ```
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.as_str());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder.build().map_err(PosError::HttpError)?;

        Ok(Self { client, http_version: config.http_version })
    }

    /// Returns the protocol name for logging.
    #[must_use]
    pub const fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }

    /// Posts `body` and returns the raw answer, whatever its status.
    ///
    /// Dropping the returned future aborts the request.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::InvalidEndpoint`] for unusable URLs,
    /// [`PosError::InvalidInput`] for headers with control characters and
    /// [`PosError::HttpError`] for connection failures and timeouts.
    #[instrument(
        skip(self, ctx, body),
        fields(url = ctx.url, body_len = body.len(), protocol = self.protocol_name())
    )]
    pub async fn post(&self, ctx: RequestContext<'_>, body: &[u8]) -> Result<TransportResponse> {
        let url = Url::parse(ctx.url)
            .map_err(|e| PosError::InvalidEndpoint(format!("invalid URL '{}': {e}", ctx.url)))?;
        validate_url(&url)?;

        for (name, value) in &ctx.headers {
            validate_header(name, value)?;
        }

        let mut request = self.client.post(url);
        if let Some(content_type) = ctx.content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        for (name, value) in ctx.headers {
            request = request.header(name, value);
        }

        let response = request.body(body.to_vec()).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!(status, response_len = body.len(), "gateway answered");

        Ok(TransportResponse { status, body })
    }
}
