//! Report catalog, aggregation folds, and the dispatcher.
//!
//! Scan → dedupe → fold. The two scan-backed reports collapse the record
//! stream before counting anything, so every device identity contributes
//! to the output exactly once per run. The third report reshapes buckets
//! the server already aggregated.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::client::{AppBucket, DeviceIndex};
use crate::dates;
use crate::dedupe::{unique_devices, unique_devices_by_app};
use crate::error::{QueryError, Result};
use crate::filter::FilterParams;
use crate::record::DeviceRecord;

// ---------------------------------------------------------------------------
// Report catalog
// ---------------------------------------------------------------------------

/// The reports this crate can produce. A closed set: adding one means
/// adding a variant and its dispatch arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// First-seen device counts per UTC day.
    FirstSeen,
    /// Document counts per app and version, aggregated server-side.
    AppVersions,
    /// Distinct device counts per app and version.
    DistinctAppVersions,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        ReportKind::FirstSeen,
        ReportKind::AppVersions,
        ReportKind::DistinctAppVersions,
    ];

    /// Canonical name as given on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ReportKind::FirstSeen => "first-seen",
            ReportKind::AppVersions => "app-versions",
            ReportKind::DistinctAppVersions => "distinct-app-versions",
        }
    }

    /// One-line description for listings.
    pub fn description(self) -> &'static str {
        match self {
            ReportKind::FirstSeen => "devices grouped by the UTC day they first appeared",
            ReportKind::AppVersions => "document counts per app and version, aggregated by the index",
            ReportKind::DistinctAppVersions => "distinct device counts per app and version",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| QueryError::UnknownReport(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Report output
// ---------------------------------------------------------------------------

/// Devices grouped under the UTC day they first appeared.
#[derive(Debug, Clone, Serialize)]
pub struct DayBucket {
    /// Day stamp: seconds at UTC midnight.
    pub date: i64,
    /// Number of devices first seen on this day.
    pub count: u64,
    /// The retained record of each such device.
    pub devices: Vec<DeviceRecord>,
}

/// App name → version → count. BTreeMaps keep serialized output sorted.
pub type VersionCounts = BTreeMap<String, BTreeMap<String, u64>>;

/// A computed report. Serializes untagged, as the bare payload.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Report {
    FirstSeen(Vec<DayBucket>),
    VersionCounts(VersionCounts),
}

// ---------------------------------------------------------------------------
// Folds
// ---------------------------------------------------------------------------

/// Collapse a record stream to one record per device (earliest first
/// access wins), then group the retained records by first-seen day.
///
/// Bucket order is unspecified; callers wanting chronology sort by `date`.
pub fn first_seen_report<I>(records: I) -> Result<Vec<DayBucket>>
where
    I: IntoIterator<Item = Result<DeviceRecord>>,
{
    let retained = unique_devices(records)?;

    let mut days: HashMap<i64, DayBucket> = HashMap::new();
    for record in retained.into_values() {
        let day = dates::day_start(record.first_access_ms()?);
        let bucket = days.entry(day).or_insert_with(|| DayBucket {
            date: day,
            count: 0,
            devices: Vec::new(),
        });
        bucket.count += 1;
        bucket.devices.push(record);
    }
    Ok(days.into_values().collect())
}

/// Reshape server-side aggregation buckets into the nested count table.
/// Counts for the same (app, version) pair sum if the server ever reports
/// it in more than one bucket.
pub fn app_versions_report(buckets: &[AppBucket]) -> VersionCounts {
    let mut counts = VersionCounts::new();
    for app in buckets {
        let versions = counts.entry(app.key.clone()).or_default();
        for vb in &app.versions {
            *versions.entry(vb.key.clone()).or_insert(0) += vb.doc_count;
        }
    }
    counts
}

/// Collapse a record stream to one record per (device, app) pair (highest
/// version wins), then count retained records per app and version.
pub fn distinct_app_versions_report<I>(records: I) -> Result<VersionCounts>
where
    I: IntoIterator<Item = Result<DeviceRecord>>,
{
    let retained = unique_devices_by_app(records)?;

    let mut counts = VersionCounts::new();
    for record in retained.values() {
        let app = record.app_name()?.to_string();
        let version = record.app_version()?.to_string();
        *counts.entry(app).or_default().entry(version).or_insert(0) += 1;
    }
    Ok(counts)
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Parse `name` and run the corresponding report against `index`.
///
/// An unknown name fails with [`QueryError::UnknownReport`] before any
/// index traffic happens.
pub fn run_report(name: &str, index: &dyn DeviceIndex, filters: &FilterParams) -> Result<Report> {
    let kind: ReportKind = name.parse()?;
    match kind {
        ReportKind::FirstSeen => {
            let records = index.scan_devices(filters.search_query());
            Ok(Report::FirstSeen(first_seen_report(records)?))
        }
        ReportKind::AppVersions => {
            let buckets = index.app_version_counts(filters.query_clause())?;
            Ok(Report::VersionCounts(app_versions_report(&buckets)))
        }
        ReportKind::DistinctAppVersions => {
            let records = index.scan_devices(filters.search_query());
            Ok(Report::VersionCounts(distinct_app_versions_report(records)?))
        }
    }
}
