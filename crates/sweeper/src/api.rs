use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;

/// A single cast as the upstream API hands it to us. Fields the
/// upstream occasionally omits stay optional here; `logic::parse_cast`
/// turns this into a typed record.
#[derive(Debug, Deserialize, Clone)]
pub struct CastView {
    #[serde(default)]
    pub hash: Option<String>,
    pub author: AuthorRef,
    #[serde(rename = "parentAuthor", default)]
    pub parent_author: Option<ParentAuthorRef>,
    #[serde(default)]
    pub text: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthorRef {
    pub fid: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ParentAuthorRef {
    #[serde(default)]
    pub fid: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct CastsEnvelope {
    result: CastsPage,
}

#[derive(Debug, Deserialize)]
struct CastsPage {
    casts: Vec<CastView>,
    #[serde(default)]
    next: NextCursor,
}

#[derive(Debug, Deserialize, Default)]
struct NextCursor {
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PublishEnvelope {
    cast: PublishedCast,
}

#[derive(Debug, Deserialize)]
struct PublishedCast {
    hash: String,
}

/// Upstream API failure that carried an HTTP status and, when the
/// upstream sent one, a structured JSON body. Travels inside
/// `anyhow::Error` so the HTTP boundary can downcast and forward the
/// upstream payload verbatim.
#[derive(Debug)]
pub struct UpstreamApiError {
    pub status: u16,
    pub payload: Option<serde_json::Value>,
}

impl fmt::Display for UpstreamApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upstream API returned status {}", self.status)
    }
}

impl std::error::Error for UpstreamApiError {}

#[async_trait::async_trait]
pub trait CastGateway {
    /// One page of the author's casts, most recent first, plus the
    /// continuation cursor (`None` means no further pages).
    async fn casts_by_author(
        &self,
        fid: u64,
        limit: usize,
        cursor: Option<String>,
    ) -> Result<(Vec<CastView>, Option<String>)>;

    /// Publish a new cast on behalf of the signer; returns its hash.
    async fn publish_cast(&self, signer_uuid: &str, text: &str) -> Result<String>;

    async fn delete_cast(&self, signer_uuid: &str, hash: &str) -> Result<()>;
}

/// Gateway against a Neynar-compatible Farcaster API.
#[derive(Clone)]
pub struct NeynarGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NeynarGateway {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn upstream_error(res: reqwest::Response) -> anyhow::Error {
        let status = res.status().as_u16();
        let payload = res.json::<serde_json::Value>().await.ok();
        anyhow::Error::new(UpstreamApiError { status, payload })
    }
}

#[async_trait::async_trait]
impl CastGateway for NeynarGateway {
    async fn casts_by_author(
        &self,
        fid: u64,
        limit: usize,
        cursor: Option<String>,
    ) -> Result<(Vec<CastView>, Option<String>)> {
        let url = format!("{}/v1/farcaster/casts", self.base_url);
        let fid_str = fid.to_string();
        let limit_str = limit.to_string();

        let mut req = self
            .client
            .get(&url)
            .header("api_key", &self.api_key)
            .query(&[("fid", fid_str.as_str()), ("limit", limit_str.as_str())]);

        if let Some(c) = cursor {
            req = req.query(&[("cursor", c)]);
        }

        let res = req.send().await.context("Casts request failed")?;

        if !res.status().is_success() {
            return Err(Self::upstream_error(res).await);
        }

        let envelope: CastsEnvelope = res
            .json()
            .await
            .context("Failed to parse casts response")?;
        Ok((envelope.result.casts, envelope.result.next.cursor))
    }

    async fn publish_cast(&self, signer_uuid: &str, text: &str) -> Result<String> {
        let url = format!("{}/v2/farcaster/cast", self.base_url);
        let body = serde_json::json!({
            "signer_uuid": signer_uuid,
            "text": text,
        });

        let res = self
            .client
            .post(&url)
            .header("api_key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Publish request failed")?;

        if !res.status().is_success() {
            return Err(Self::upstream_error(res).await);
        }

        let envelope: PublishEnvelope = res
            .json()
            .await
            .context("Failed to parse publish response")?;
        Ok(envelope.cast.hash)
    }

    async fn delete_cast(&self, signer_uuid: &str, hash: &str) -> Result<()> {
        let url = format!("{}/v2/farcaster/cast", self.base_url);
        let body = serde_json::json!({
            "signer_uuid": signer_uuid,
            "target_hash": hash,
        });

        let res = self
            .client
            .delete(&url)
            .header("api_key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Delete request failed")?;

        if !res.status().is_success() {
            return Err(Self::upstream_error(res).await);
        }

        Ok(())
    }
}
