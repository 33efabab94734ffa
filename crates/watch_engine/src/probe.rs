use std::sync::Arc;

use watch_logging::watch_debug;

use crate::decode::{decode_html, DecodeError};
use crate::extract::{ExtractError, ExtractedPeriod, PeriodExtractor};
use crate::fetch::PageFetcher;
use crate::FetchError;

fn top_level_domain(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.domain()?;
    host.rsplit('.').next().map(str::to_ascii_lowercase)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("extract failed: {0}")]
    Extract(#[from] ExtractError),
}

/// One fetch-decode-extract pass over the period page.
#[derive(Clone)]
pub struct PageProbe {
    url: String,
    fetcher: Arc<dyn PageFetcher>,
    extractor: PeriodExtractor,
}

impl PageProbe {
    pub fn new(url: impl Into<String>, fetcher: Arc<dyn PageFetcher>, extractor: PeriodExtractor) -> Self {
        Self {
            url: url.into(),
            fetcher,
            extractor,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Every period option currently listed on the page.
    pub async fn observe(&self) -> Result<Vec<ExtractedPeriod>, ProbeError> {
        let output = self.fetcher.fetch(&self.url).await?;
        let tld = top_level_domain(&output.metadata.final_url);
        let decoded = decode_html(
            &output.bytes,
            output.metadata.content_type.as_deref(),
            tld.as_deref(),
        )?;
        watch_debug!(
            "Decoded {} as {} from {} ({} bytes)",
            output.metadata.final_url,
            decoded.encoding_label,
            decoded.source,
            output.metadata.byte_len
        );
        Ok(self.extractor.extract(&decoded.html)?)
    }

    /// Text of the top option; empty when the option carries no text.
    pub async fn current_label(&self) -> Result<String, ProbeError> {
        let options = self.observe().await?;
        Ok(options
            .into_iter()
            .next()
            .map(|option| option.label)
            .unwrap_or_default())
    }
}
