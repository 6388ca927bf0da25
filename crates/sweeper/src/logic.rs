use crate::api::{CastGateway, CastView};
use anyhow::{Context, Result};
use cast_core::{CastMatch, SearchResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

/// Page size requested from the upstream API per fetch. Tunable.
pub const DEFAULT_PAGE_SIZE: usize = 150;

/// Upper bound on pages walked in a single search, so an upstream
/// that keeps handing out cursors cannot keep us paging forever.
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Typed cast record produced from the loose upstream payload.
#[derive(Debug, Clone)]
pub struct ParsedCast {
    pub hash: Option<String>,
    pub fid: u64,
    pub parent_fid: Option<u64>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Parse an upstream timestamp. The API usually sends RFC 3339, but
/// date-only and naive datetime forms show up in older casts.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    anyhow::bail!("Malformed timestamp: {:?}", s)
}

/// Map a raw upstream cast into a typed record. A missing body is
/// coerced to an empty string (the pattern simply won't match); a
/// malformed timestamp is an error and fails the whole search.
pub fn parse_cast(raw: &CastView) -> Result<ParsedCast> {
    let timestamp = parse_timestamp(&raw.timestamp)
        .with_context(|| format!("Bad timestamp on cast {:?}", raw.hash))?;

    Ok(ParsedCast {
        hash: raw.hash.clone(),
        fid: raw.author.fid,
        parent_fid: raw.parent_author.as_ref().and_then(|p| p.fid),
        text: raw.text.clone().unwrap_or_default(),
        timestamp,
    })
}

/// Walk the author's cast history page by page, match each cast body
/// against `pattern`, and classify matches by `delete_before`.
///
/// The whole operation fails on an invalid pattern, a malformed
/// upstream record, a failed page fetch, or more than `max_pages`
/// pages; accumulated partial results are discarded in every failure
/// case so the counts always agree with the returned match list.
pub async fn search_casts<G: CastGateway>(
    gateway: &G,
    fid: u64,
    pattern: &str,
    delete_before: DateTime<Utc>,
    page_size: usize,
    max_pages: usize,
) -> Result<SearchResult> {
    let pattern = Regex::new(pattern).context("Invalid search pattern")?;

    let mut total_matches = 0;
    let mut deletable_matches = 0;
    let mut matches: Vec<CastMatch> = Vec::new();

    let mut cursor: Option<String> = None;
    let mut pages = 0;

    loop {
        if pages >= max_pages {
            anyhow::bail!(
                "Pagination for fid {} exceeded {} pages without finishing",
                fid,
                max_pages
            );
        }
        pages += 1;

        let (casts, next_cursor) = gateway
            .casts_by_author(fid, page_size, cursor)
            .await
            .context("Failed to fetch casts page")?;

        for raw in &casts {
            let cast = parse_cast(raw)?;
            if !pattern.is_match(&cast.text) {
                continue;
            }

            let Some(hash) = cast.hash else {
                // Nothing downstream can delete a cast without a hash,
                // so keep it out of the counts as well.
                tracing::warn!(
                    "Matched cast without hash (fid={}, timestamp={}), skipping",
                    fid,
                    cast.timestamp
                );
                continue;
            };

            total_matches += 1;
            if cast.timestamp < delete_before {
                deletable_matches += 1;
            }
            matches.push(CastMatch {
                hash,
                timestamp: cast.timestamp,
            });
        }

        match next_cursor {
            Some(c) => cursor = Some(c),
            None => break,
        }
    }

    Ok(SearchResult {
        total_matches,
        deletable_matches,
        matches,
    })
}

/// Delete the given casts one at a time, in order. Stops at the first
/// failing deletion and surfaces that single error; casts deleted
/// before the failure stay deleted and are not reported back. Callers
/// must treat a failed batch as possibly partially applied.
pub async fn delete_casts<G: CastGateway>(
    gateway: &G,
    signer_uuid: &str,
    hashes: &[String],
) -> Result<()> {
    for (done, hash) in hashes.iter().enumerate() {
        if let Err(e) = gateway.delete_cast(signer_uuid, hash).await {
            tracing::error!(
                "Delete batch aborted at {}/{} (hash={}): {:#}",
                done,
                hashes.len(),
                hash,
                e
            );
            return Err(e.context(format!("Failed to delete cast {}", hash)));
        }
    }
    Ok(())
}
