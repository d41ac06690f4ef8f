use url::Url;

use crate::error::StoreError;
use crate::models::RawRow;
use crate::store::{RowStore, RowUpdate};

/// Query parameter defeating intermediate caches
fn cache_buster() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

/// Append a cache-busting `t` parameter to `url`
pub fn with_cache_buster(mut url: Url) -> Url {
    url.query_pairs_mut().append_pair("t", &cache_buster());
    url
}

/// Spreadsheet storage API client
///
/// Each source is addressed as `<base>/<source>`; reads are `GET`, updates
/// are `PUT` with a JSON condition/set body. No retries and no timeout.
pub struct HttpStore {
    base: Url,
    agent: ureq::Agent,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let base = Url::parse(base_url)
            .map_err(|e| StoreError::Transport(format!("invalid API URL '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::Transport(format!("invalid API URL '{}'", base_url)));
        }
        Ok(Self {
            base,
            agent: ureq::AgentBuilder::new().build(),
        })
    }

    /// URL of one source, with the source name as a single encoded path segment
    pub fn sheet_url(&self, sheet: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(sheet);
        }
        url
    }
}

impl RowStore for HttpStore {
    fn fetch_rows(&self, sheet: &str) -> Result<Vec<RawRow>, StoreError> {
        let url = with_cache_buster(self.sheet_url(sheet));
        log::debug!("GET {}", url);

        match self.agent.request_url("GET", &url).call() {
            Ok(response) => {
                log::debug!("HTTP status: {}", response.status());
                response
                    .into_json::<Vec<RawRow>>()
                    .map_err(|e| StoreError::Decode(e.to_string()))
            }
            Err(ureq::Error::Status(status, _)) => Err(StoreError::NotFound {
                sheet: sheet.to_string(),
                status,
            }),
            Err(ureq::Error::Transport(transport)) => Err(StoreError::Transport(transport.to_string())),
        }
    }

    fn update_rows(&self, sheet: &str, update: &RowUpdate) -> Result<(), StoreError> {
        let url = with_cache_buster(self.sheet_url(sheet));
        log::debug!("PUT {}", url);

        match self.agent.request_url("PUT", &url).send_json(update) {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, _)) => Err(StoreError::Rejected { status }),
            Err(ureq::Error::Transport(transport)) => Err(StoreError::Transport(transport.to_string())),
        }
    }
}

/// Fetch an arbitrary JSON document (used for a remote source list)
pub fn fetch_document(url: &str) -> Result<serde_json::Value, StoreError> {
    let url = Url::parse(url).map_err(|e| StoreError::Transport(format!("invalid URL '{}': {}", url, e)))?;
    let url = with_cache_buster(url);

    match ureq::request_url("GET", &url).call() {
        Ok(response) => response
            .into_json::<serde_json::Value>()
            .map_err(|e| StoreError::Decode(e.to_string())),
        Err(ureq::Error::Status(status, _)) => Err(StoreError::NotFound {
            sheet: url.to_string(),
            status,
        }),
        Err(ureq::Error::Transport(transport)) => Err(StoreError::Transport(transport.to_string())),
    }
}
