//! Single-pass deduplication of scanned device records.
//!
//! The index holds one document per device *appearance*, so every report
//! that counts devices first collapses the stream to one retained record
//! per identity. Memory is bounded by the number of distinct identities,
//! never by the number of scanned records.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::Result;
use crate::record::DeviceRecord;
use crate::versions::compare_versions;

// Keeps composite keys collision-free whatever the identifiers contain:
// ("ab", "c") and ("a", "bc") must stay distinct.
const KEY_SEPARATOR: char = '\0';

/// Fold `records` into one retained record per identity key.
///
/// `key` derives a record's identity; `replace` decides whether a newly
/// scanned record (the candidate) displaces the currently retained one
/// (the incumbent) for the same key. The first error from the stream or
/// from either closure aborts the whole fold.
pub fn dedupe<I, K, R>(records: I, key: K, replace: R) -> Result<HashMap<String, DeviceRecord>>
where
    I: IntoIterator<Item = Result<DeviceRecord>>,
    K: Fn(&DeviceRecord) -> Result<String>,
    R: Fn(&DeviceRecord, &DeviceRecord) -> Result<bool>,
{
    let mut retained: HashMap<String, DeviceRecord> = HashMap::new();
    for record in records {
        let record = record?;
        let k = key(&record)?;
        match retained.get(&k) {
            Some(incumbent) => {
                if replace(incumbent, &record)? {
                    retained.insert(k, record);
                }
            }
            None => {
                retained.insert(k, record);
            }
        }
    }
    Ok(retained)
}

/// Identity for device-level reports: the device identifier alone.
pub fn device_key(record: &DeviceRecord) -> Result<String> {
    Ok(record.device_id()?.to_string())
}

/// Identity for per-app reports: device identifier plus app name.
pub fn device_app_key(record: &DeviceRecord) -> Result<String> {
    let id = record.device_id()?;
    let app = record.app_name()?;
    Ok(format!("{id}{KEY_SEPARATOR}{app}"))
}

/// Earliest first access wins. Ties keep the already-retained record.
pub fn earliest_access(incumbent: &DeviceRecord, candidate: &DeviceRecord) -> Result<bool> {
    Ok(candidate.first_access_ms()? < incumbent.first_access_ms()?)
}

/// Highest app version wins. Ties take the candidate.
pub fn highest_version(incumbent: &DeviceRecord, candidate: &DeviceRecord) -> Result<bool> {
    let ord = compare_versions(candidate.app_version()?, incumbent.app_version()?);
    Ok(ord != Ordering::Less)
}

/// One record per device, keeping the earliest first access.
pub fn unique_devices<I>(records: I) -> Result<HashMap<String, DeviceRecord>>
where
    I: IntoIterator<Item = Result<DeviceRecord>>,
{
    dedupe(records, device_key, earliest_access)
}

/// One record per (device, app) pair, keeping the highest app version.
pub fn unique_devices_by_app<I>(records: I) -> Result<HashMap<String, DeviceRecord>>
where
    I: IntoIterator<Item = Result<DeviceRecord>>,
{
    dedupe(records, device_app_key, highest_version)
}
