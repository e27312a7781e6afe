// src/api/mod.rs
pub mod encode;
pub mod error;

pub use encode::{encode_component, prepare_write, Encoding, PreparedWrite, WriteContent};
pub use error::{ApiError, ApiResult, FetchError};
pub use futures::future::{AbortHandle, AbortRegistration};

use futures::future::{Abortable, Aborted};
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde::de::DeserializeOwned;
use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::fs;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// What a demo-mode write resolves with.
pub const DEMO_OK: &str = "ok";

/// Logical endpoints served from static files in demo mode.
pub static DEFAULT_STATIC_FILES: &[(&str, &str)] = &[
    ("api/admin.php?req=accounts", "accounts.tsv"),
    ("api/admin.php?req=users", "users.tsv"),
];

pub fn default_static_files() -> BTreeMap<String, String> {
    DEFAULT_STATIC_FILES
        .iter()
        .map(|(endpoint, file)| (endpoint.to_string(), file.to_string()))
        .collect()
}

/// A fresh handle/registration pair. Pass the registration to
/// [`Api::read`]; calling `abort()` on the handle cancels it.
pub fn cancellation() -> (AbortHandle, AbortRegistration) {
    AbortHandle::new_pair()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Real network calls.
    Live,
    /// Mapped reads come from `data_path + file`; writes are no-ops.
    Demo { data_path: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Text(String),
    Json(serde_json::Value),
}

impl Body {
    pub fn into_text(self) -> String {
        match self {
            Body::Text(t) => t,
            Body::Json(v) => v.to_string(),
        }
    }
}

/// Single point of access for reads and writes, live or demo.
#[derive(Debug)]
pub struct Api {
    client: Client,
    origin: Url,
    mode: Mode,
    static_files: BTreeMap<String, String>,
}

impl Api {
    /// A live client resolving relative endpoints against `origin`. The
    /// cookie store keeps the session scoped to the hosts it came from.
    pub fn new(origin: &str) -> ApiResult<Self> {
        let origin = Url::parse(origin)?;
        let client = Client::builder()
            .user_agent(concat!("adminpanel/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            origin,
            mode: Mode::Live,
            static_files: default_static_files(),
        })
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_static_files(mut self, static_files: BTreeMap<String, String>) -> Self {
        self.static_files = static_files;
        self
    }

    pub fn set_demo_mode(&mut self, data_path: impl Into<String>) {
        let data_path = data_path.into();
        info!(data_path = %data_path, "Demo mode enabled - using static data");
        self.mode = Mode::Demo { data_path };
    }

    pub fn set_live_mode(&mut self) {
        info!("Demo mode disabled - using live API");
        self.mode = Mode::Live;
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_demo(&self) -> bool {
        matches!(self.mode, Mode::Demo { .. })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Resolve `endpoint` against the origin; absolute URLs pass through.
    pub fn resolve(&self, endpoint: &str) -> ApiResult<Url> {
        Ok(self.origin.join(endpoint)?)
    }

    /// The static file a read of `endpoint` is redirected to, if any.
    pub fn demo_file(&self, endpoint: &str) -> Option<PathBuf> {
        match &self.mode {
            Mode::Demo { data_path } => self
                .static_files
                .get(endpoint)
                .map(|file| PathBuf::from(format!("{}{}", data_path, file))),
            Mode::Live => None,
        }
    }

    /// Fetch `endpoint` and decode the body as `format`.
    ///
    /// Aborting `cancel` makes this fail with [`ApiError::Cancelled`]; a
    /// non-success status fails with [`ApiError::Fetch`].
    #[instrument(level = "debug", skip(self, cancel))]
    pub async fn read(
        &self,
        endpoint: &str,
        format: ResponseFormat,
        cancel: Option<AbortRegistration>,
    ) -> ApiResult<Body> {
        let fut = self.read_uncancellable(endpoint, format);
        match cancel {
            Some(registration) => Abortable::new(fut, registration)
                .await
                .map_err(|Aborted| {
                    debug!(endpoint, "read cancelled");
                    ApiError::Cancelled
                })?,
            None => fut.await,
        }
    }

    pub async fn read_text(
        &self,
        endpoint: &str,
        cancel: Option<AbortRegistration>,
    ) -> ApiResult<String> {
        Ok(self
            .read(endpoint, ResponseFormat::Text, cancel)
            .await?
            .into_text())
    }

    pub async fn read_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        cancel: Option<AbortRegistration>,
    ) -> ApiResult<T> {
        match self.read(endpoint, ResponseFormat::Json, cancel).await? {
            Body::Json(v) => Ok(serde_json::from_value(v)?),
            Body::Text(t) => Ok(serde_json::from_str(&t)?),
        }
    }

    async fn read_uncancellable(&self, endpoint: &str, format: ResponseFormat) -> ApiResult<Body> {
        let text = match self.demo_file(endpoint) {
            Some(path) => {
                debug!(path = %path.display(), "Demo mode: reading static file");
                read_static(&path).await?
            }
            None => {
                let url = self.resolve(endpoint)?;
                debug!(%url, "GET");
                let resp = self.client.get(url).send().await?;
                check_status(resp).await?.text().await?
            }
        };

        match format {
            ResponseFormat::Text => Ok(Body::Text(text)),
            ResponseFormat::Json => Ok(Body::Json(serde_json::from_str(&text)?)),
        }
    }

    /// POST `content` to `endpoint`. Demo mode resolves with [`DEMO_OK`]
    /// without touching the network.
    #[instrument(level = "debug", skip(self, content))]
    pub async fn write(
        &self,
        endpoint: &str,
        content: WriteContent,
        encoding: Encoding,
    ) -> ApiResult<String> {
        if self.is_demo() {
            info!(endpoint, "Demo mode: write ignored");
            return Ok(DEMO_OK.to_string());
        }

        let prepared = prepare_write(endpoint, content, encoding);
        let url = self.resolve(&prepared.endpoint)?;
        debug!(%url, body_len = prepared.body.len(), "POST");

        let mut req = self.client.post(url).body(prepared.body);
        if let Some(content_type) = prepared.content_type {
            req = req.header(CONTENT_TYPE, content_type);
        }

        let resp = check_status(req.send().await?).await?;
        Ok(resp.text().await?)
    }
}

async fn check_status(resp: Response) -> ApiResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await?;
    let err = FetchError::from_response(status, &body);
    warn!(code = err.code, message = %err.message, "request failed");
    Err(err.into())
}

async fn read_static(path: &Path) -> ApiResult<String> {
    match fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "static file missing");
            Err(FetchError::not_found().into())
        }
        Err(e) => Err(e.into()),
    }
}
