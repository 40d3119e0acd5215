//! # mfpq-core
//!
//! Report engine for MobileFirst device telemetry stored in an
//! Elasticsearch index.
//!
//! The index holds one document per device appearance. This crate scans
//! those documents, collapses them to one record per device identity, and
//! folds the survivors into three reports: first-seen counts per UTC day,
//! the app/version distribution (aggregated server-side), and distinct
//! device counts per app and version.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mfpq_core::{EsClient, FilterParams, IndexConfig, run_report};
//!
//! let config = IndexConfig::default();
//! let client = EsClient::new(&config);
//!
//! let report = run_report("first-seen", &client, &FilterParams::default()).unwrap();
//! println!("{}", serde_json::to_string_pretty(&report).unwrap());
//! ```
//!
//! ## Architecture
//!
//! Scan (scroll API, one page in memory) → Dedupe (one record per
//! identity) → Fold (day buckets or version counts) → Report
//!
//! [`DeviceIndex`] is the seam between the reduction logic and the
//! network: reports run against the trait, [`EsClient`] implements it
//! over blocking HTTP, and tests substitute an in-memory index. Errors
//! abort a report as a whole; there are no retries and no partial
//! results.

pub mod client;
pub mod config;
pub mod dates;
pub mod dedupe;
pub mod error;
pub mod filter;
pub mod record;
pub mod reports;
pub mod versions;

pub use client::{AppBucket, ClusterInfo, DeviceIndex, EsClient, VersionBucket};
pub use config::IndexConfig;
pub use dedupe::{unique_devices, unique_devices_by_app};
pub use error::{QueryError, Result};
pub use filter::FilterParams;
pub use record::DeviceRecord;
pub use reports::{
    DayBucket, Report, ReportKind, VersionCounts, app_versions_report,
    distinct_app_versions_report, first_seen_report, run_report,
};
pub use versions::compare_versions;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
