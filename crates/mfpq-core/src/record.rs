//! Device record model.
//!
//! A record is the `_source` object of one device document, kept as raw JSON
//! so that fields this crate never looks at survive untouched into report
//! output. The typed accessors cover the four fields reports depend on.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{QueryError, Result};

/// Field holding the stable device identifier.
pub const FIELD_DEVICE_ID: &str = "deviceID";
/// Field holding the application name.
pub const FIELD_APP_NAME: &str = "mfpAppName";
/// Field holding the application version string.
pub const FIELD_APP_VERSION: &str = "mfpAppVersion";
/// Field holding the first-access timestamp in epoch milliseconds.
pub const FIELD_FIRST_ACCESS: &str = "firstAccessTimestamp";

/// One device document from the index.
///
/// Immutable once read. Serializes back to exactly the object it was read
/// from, including fields the reports never touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceRecord {
    fields: Map<String, Value>,
}

impl DeviceRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Stable device identifier.
    pub fn device_id(&self) -> Result<&str> {
        self.str_field(FIELD_DEVICE_ID)
    }

    /// Application name.
    pub fn app_name(&self) -> Result<&str> {
        self.str_field(FIELD_APP_NAME)
    }

    /// Application version string (uninterpreted here; see
    /// [`crate::versions::compare_versions`] for ordering).
    pub fn app_version(&self) -> Result<&str> {
        self.str_field(FIELD_APP_VERSION)
    }

    /// First-access timestamp in epoch milliseconds.
    ///
    /// Indexed documents carry this as a JSON number or as a numeric string;
    /// both are accepted. Anything else is a [`QueryError::Parse`].
    pub fn first_access_ms(&self) -> Result<i64> {
        let value = self
            .fields
            .get(FIELD_FIRST_ACCESS)
            .ok_or(QueryError::MissingField(FIELD_FIRST_ACCESS))?;
        match value {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| parse_error(FIELD_FIRST_ACCESS, value)),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| parse_error(FIELD_FIRST_ACCESS, value)),
            _ => Err(parse_error(FIELD_FIRST_ACCESS, value)),
        }
    }

    /// Raw access to any field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    fn str_field(&self, field: &'static str) -> Result<&str> {
        let value = self
            .fields
            .get(field)
            .ok_or(QueryError::MissingField(field))?;
        value.as_str().ok_or_else(|| parse_error(field, value))
    }
}

fn parse_error(field: &'static str, value: &Value) -> QueryError {
    QueryError::Parse {
        field,
        value: value.to_string(),
    }
}
