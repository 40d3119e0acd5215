//! HTTP access to the device index.
//!
//! [`DeviceIndex`] is the seam every report runs against; [`EsClient`] is
//! the Elasticsearch implementation. Scans use the scroll API, pulled one
//! page at a time as the consumer drains records. The app/version
//! distribution is a single server-side nested terms aggregation.
//!
//! The wire format targets the 2.x-6.x generation: document types in the
//! URL path and `bool.filter` query wrappers.

use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::IndexConfig;
use crate::error::{QueryError, Result};
use crate::record::{DeviceRecord, FIELD_APP_NAME, FIELD_APP_VERSION};

/// Document type holding device appearance records.
pub const DEVICES_DOC_TYPE: &str = "Devices";

/// How long the server keeps a scroll cursor alive between pages.
const SCROLL_TTL: &str = "5m";

const APP_AGG: &str = "app_agg";
const VERSION_AGG: &str = "version_agg";

// ---------------------------------------------------------------------------
// Trait seam
// ---------------------------------------------------------------------------

/// The index operations reports depend on.
pub trait DeviceIndex {
    /// Stream every record matching `query`, in no particular order.
    /// Errors surface as stream items; the first one ends the stream.
    fn scan_devices(&self, query: Value) -> Box<dyn Iterator<Item = Result<DeviceRecord>> + '_>;

    /// Run the nested app/version terms aggregation on the server,
    /// optionally narrowed by a query clause.
    fn app_version_counts(&self, filter: Option<Value>) -> Result<Vec<AppBucket>>;
}

/// One application bucket from the server-side aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppBucket {
    pub key: String,
    pub doc_count: u64,
    pub versions: Vec<VersionBucket>,
}

/// One version bucket inside an application bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBucket {
    pub key: String,
    pub doc_count: u64,
}

// ---------------------------------------------------------------------------
// Elasticsearch client
// ---------------------------------------------------------------------------

/// Cluster info returned by `GET /`, trimmed to what the CLI prints.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterInfo {
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default)]
    pub version: ClusterVersion,
}

/// Version block inside [`ClusterInfo`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClusterVersion {
    #[serde(default)]
    pub number: String,
}

/// Blocking HTTP client for one index.
pub struct EsClient {
    agent: ureq::Agent,
    base_url: String,
    index: String,
    scroll_size: usize,
}

impl EsClient {
    pub fn new(config: &IndexConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self {
            agent,
            base_url: config.base_url(),
            index: config.index.clone(),
            scroll_size: config.scroll_size,
        }
    }

    /// Check connectivity and fetch basic cluster info.
    pub fn ping(&self) -> Result<ClusterInfo> {
        let resp = self.agent.get(&self.base_url).call()?;
        Ok(serde_json::from_reader(resp.into_reader())?)
    }

    /// Open a scroll cursor and fetch the first page.
    fn open_scroll(&self, query: &Value) -> Result<ScanPage> {
        let url = format!(
            "{}/{}/{}/_search?scroll={}",
            self.base_url, self.index, DEVICES_DOC_TYPE, SCROLL_TTL
        );
        let body = scan_body(query, self.scroll_size);
        debug!("scan {url}: {body}");
        let resp = self.agent.post(&url).send_json(&body)?;
        parse_scan_page(serde_json::from_reader(resp.into_reader())?)
    }

    /// Fetch the next page of an open scroll.
    fn continue_scroll(&self, scroll_id: &str) -> Result<ScanPage> {
        let url = format!("{}/_search/scroll", self.base_url);
        let body = json!({ "scroll": SCROLL_TTL, "scroll_id": scroll_id });
        let resp = self.agent.post(&url).send_json(&body)?;
        parse_scan_page(serde_json::from_reader(resp.into_reader())?)
    }

    /// Release a scroll cursor. Best-effort; the server also expires idle
    /// cursors on its own after `SCROLL_TTL`.
    fn clear_scroll(&self, scroll_id: &str) {
        let url = format!("{}/_search/scroll", self.base_url);
        let body = json!({ "scroll_id": [scroll_id] });
        if let Err(err) = self.agent.delete(&url).send_json(&body) {
            warn!("failed to clear scroll cursor: {err}");
        }
    }
}

impl DeviceIndex for EsClient {
    fn scan_devices(&self, query: Value) -> Box<dyn Iterator<Item = Result<DeviceRecord>> + '_> {
        Box::new(ScanStream::new(self, query))
    }

    fn app_version_counts(&self, filter: Option<Value>) -> Result<Vec<AppBucket>> {
        let url = format!(
            "{}/{}/{}/_search",
            self.base_url, self.index, DEVICES_DOC_TYPE
        );
        let body = aggregation_body(filter);
        debug!("aggregation {url}: {body}");
        let resp = self.agent.post(&url).send_json(&body)?;
        parse_app_buckets(serde_json::from_reader(resp.into_reader())?)
    }
}

// ---------------------------------------------------------------------------
// Scan stream
// ---------------------------------------------------------------------------

/// Pull-based scroll iterator. The first search happens lazily on the
/// first pull; the next page is fetched only once the current one is
/// drained, so memory holds a single page of records at a time.
struct ScanStream<'a> {
    client: &'a EsClient,
    query: Option<Value>,
    scroll_id: Option<String>,
    pending: VecDeque<DeviceRecord>,
    finished: bool,
}

impl<'a> ScanStream<'a> {
    fn new(client: &'a EsClient, query: Value) -> Self {
        Self {
            client,
            query: Some(query),
            scroll_id: None,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    fn next_page(&mut self) -> Result<ScanPage> {
        match self.query.take() {
            Some(query) => self.client.open_scroll(&query),
            None => match &self.scroll_id {
                Some(id) => self.client.continue_scroll(id),
                // Server sent no cursor; one page was the whole result.
                None => Ok(ScanPage {
                    scroll_id: None,
                    records: Vec::new(),
                }),
            },
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        if let Some(id) = self.scroll_id.take() {
            self.client.clear_scroll(&id);
        }
    }
}

impl Iterator for ScanStream<'_> {
    type Item = Result<DeviceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }
            if self.finished {
                return None;
            }
            match self.next_page() {
                Ok(page) => {
                    if let Some(id) = page.scroll_id {
                        self.scroll_id = Some(id);
                    }
                    if page.records.is_empty() {
                        self.finish();
                        return None;
                    }
                    debug!("scan page: {} records", page.records.len());
                    self.pending.extend(page.records);
                }
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Request bodies and response decoding
// ---------------------------------------------------------------------------

/// One decoded scan page.
#[derive(Debug)]
struct ScanPage {
    scroll_id: Option<String>,
    records: Vec<DeviceRecord>,
}

/// Body for the opening scan request: the caller's query document plus an
/// explicit page size and `_doc` ordering (index order, no scoring).
fn scan_body(query: &Value, size: usize) -> Value {
    let mut body = match query {
        Value::Object(map) => Value::Object(map.clone()),
        _ => json!({}),
    };
    body["size"] = json!(size);
    body["sort"] = json!(["_doc"]);
    body
}

/// Body for the app/version aggregation request. `size: 0` suppresses the
/// hit list; only buckets come back.
fn aggregation_body(filter: Option<Value>) -> Value {
    let mut body = json!({
        "size": 0,
        "aggs": {
            APP_AGG: {
                "terms": { "field": FIELD_APP_NAME },
                "aggs": {
                    VERSION_AGG: {
                        "terms": { "field": FIELD_APP_VERSION }
                    }
                }
            }
        }
    });
    if let Some(clause) = filter {
        body["query"] = clause;
    }
    body
}

fn parse_scan_page(value: Value) -> Result<ScanPage> {
    let scroll_id = value
        .get("_scroll_id")
        .and_then(Value::as_str)
        .map(str::to_string);
    let hits = value
        .get("hits")
        .and_then(|h| h.get("hits"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            QueryError::UnexpectedResponse("scan page has no hits array".to_string())
        })?;

    let mut records = Vec::with_capacity(hits.len());
    for hit in hits {
        let source = hit
            .get("_source")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                QueryError::UnexpectedResponse("scan hit has no _source object".to_string())
            })?;
        records.push(DeviceRecord::new(source.clone()));
    }
    Ok(ScanPage { scroll_id, records })
}

fn parse_app_buckets(value: Value) -> Result<Vec<AppBucket>> {
    let buckets = value
        .get("aggregations")
        .and_then(|a| a.get(APP_AGG))
        .and_then(|a| a.get("buckets"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            QueryError::UnexpectedResponse(
                "aggregation response has no app_agg buckets".to_string(),
            )
        })?;

    let mut apps = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        let key = bucket_key(bucket, "app")?;
        let raw_versions = bucket
            .get(VERSION_AGG)
            .and_then(|v| v.get("buckets"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                QueryError::UnexpectedResponse(format!(
                    "app bucket '{key}' has no version_agg buckets"
                ))
            })?;

        let mut versions = Vec::with_capacity(raw_versions.len());
        for vb in raw_versions {
            versions.push(VersionBucket {
                key: bucket_key(vb, "version")?,
                doc_count: bucket_count(vb, "version")?,
            });
        }
        apps.push(AppBucket {
            key,
            doc_count: bucket_count(bucket, "app")?,
            versions,
        });
    }
    Ok(apps)
}

fn bucket_key(bucket: &Value, what: &str) -> Result<String> {
    bucket
        .get("key")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| QueryError::UnexpectedResponse(format!("{what} bucket key is not a string")))
}

fn bucket_count(bucket: &Value, what: &str) -> Result<u64> {
    bucket.get("doc_count").and_then(Value::as_u64).ok_or_else(|| {
        QueryError::UnexpectedResponse(format!("{what} bucket doc_count is not an integer"))
    })
}
