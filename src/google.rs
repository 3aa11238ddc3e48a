use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use serde::Deserialize;
use url::Url;

use crate::cli::FetchArgs;
use crate::formats::Document;

pub const DEFAULT_DOCS_BASE_URL: &str = "https://docs.googleapis.com/v1/";

#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error(
        "no access token: set DOCCHAPTERS_ACCESS_TOKEN or provide a token file ({token_file})"
    )]
    MissingCredentials { token_file: String },
    #[error("read token file {path}")]
    TokenFile {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("authorization failed ({status}): {message}")]
    AuthorizationFailed {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("document source unavailable ({status}): {message}")]
    SourceUnavailable {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("document id must not be empty")]
    EmptyDocumentId,
    #[error("docs base url cannot be a base: {url}")]
    InvalidBaseUrl { url: String },
    #[error("request document")]
    Transport(#[from] reqwest::Error),
    #[error("decode document")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct DocsConfig {
    pub base_url: Url,
    pub access_token: String,
}

/// The subset of a stored OAuth token that is needed to call the API.
#[derive(Debug, Deserialize)]
struct StoredToken {
    access_token: String,
}

impl DocsConfig {
    pub fn from_env(token_file: &Path) -> anyhow::Result<Self> {
        let base_url = std::env::var("DOCCHAPTERS_DOCS_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_DOCS_BASE_URL.to_owned());
        let base_url = parse_base_url(&base_url)?;

        let access_token = match std::env::var("DOCCHAPTERS_ACCESS_TOKEN") {
            Ok(token) if !token.trim().is_empty() => token,
            _ => read_token_file(token_file)?,
        };

        Ok(Self {
            base_url,
            access_token,
        })
    }
}

fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(raw).with_context(|| format!("parse docs base url: {raw}"))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("docs base url cannot be a base: {raw}");
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn read_token_file(path: &Path) -> Result<String, DocsError> {
    if !path.exists() {
        return Err(DocsError::MissingCredentials {
            token_file: path.display().to_string(),
        });
    }

    let token_error = |source: Box<dyn std::error::Error + Send + Sync>| DocsError::TokenFile {
        path: path.display().to_string(),
        source,
    };
    let json = std::fs::read_to_string(path).map_err(|err| token_error(err.into()))?;
    let token: StoredToken = serde_json::from_str(&json).map_err(|err| token_error(err.into()))?;
    if token.access_token.trim().is_empty() {
        return Err(token_error("access_token is empty".into()));
    }
    Ok(token.access_token)
}

pub fn document_url(base_url: &Url, document_id: &str) -> Result<Url, DocsError> {
    if document_id.trim().is_empty() {
        return Err(DocsError::EmptyDocumentId);
    }

    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| DocsError::InvalidBaseUrl {
            url: base_url.to_string(),
        })?
        .pop_if_empty()
        .push("documents")
        .push(document_id);
    Ok(url)
}

pub fn http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .context("build http client")
}

pub async fn fetch_document(
    client: &reqwest::Client,
    config: &DocsConfig,
    document_id: &str,
) -> Result<Document, DocsError> {
    let raw = fetch_document_json(client, config, document_id).await?;
    let document: Document = serde_json::from_value(raw)?;
    Ok(document)
}

/// Fetches the document as the API returned it, without dropping unmodelled fields.
pub async fn fetch_document_json(
    client: &reqwest::Client,
    config: &DocsConfig,
    document_id: &str,
) -> Result<serde_json::Value, DocsError> {
    let endpoint = document_url(&config.base_url, document_id)?;
    tracing::info!(document_id, endpoint = %endpoint, "fetch document");

    let raw = fetch_raw(client, config, &endpoint).await?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    Ok(value)
}

async fn fetch_raw(
    client: &reqwest::Client,
    config: &DocsConfig,
    endpoint: &Url,
) -> Result<String, DocsError> {
    let response = client
        .get(endpoint.clone())
        .bearer_auth(&config.access_token)
        .send()
        .await?;

    let status = response.status();
    let raw = response.text().await?;
    if status.is_success() {
        return Ok(raw);
    }

    let message = parse_error_message(&raw).unwrap_or(raw);
    match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            Err(DocsError::AuthorizationFailed { status, message })
        }
        _ => Err(DocsError::SourceUnavailable { status, message }),
    }
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(raw_json).ok()?;
    let message = value.get("error")?.get("message")?.as_str()?.to_owned();
    Some(message)
}

pub async fn run(args: FetchArgs) -> anyhow::Result<()> {
    let out_path = PathBuf::from(&args.out);
    if out_path.exists() && !args.force {
        anyhow::bail!("document output already exists: {}", out_path.display());
    }

    let config = DocsConfig::from_env(Path::new(&args.token_file)).context("load docs config")?;
    let client = http_client()?;
    let raw = fetch_document_json(&client, &config, &args.document_id)
        .await
        .with_context(|| format!("fetch document {}", args.document_id))?;
    let document: Document = serde_json::from_value(raw.clone()).map_err(DocsError::from)?;

    let mut json = serde_json::to_string_pretty(&raw).context("serialize document")?;
    json.push('\n');
    crate::text_store::write_atomic(&out_path, json.as_bytes(), args.force)
        .context("write document")?;

    tracing::info!(
        title = %document.title,
        out = %out_path.display(),
        "saved document"
    );
    Ok(())
}
