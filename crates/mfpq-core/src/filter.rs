//! Filter parameters for index queries.
//!
//! Filters narrow the documents a report sees. They are rendered to query
//! documents here and passed through the client opaquely; the reduction
//! core never inspects them.

use serde_json::{Value, json};

use crate::record::{FIELD_APP_NAME, FIELD_APP_VERSION, FIELD_FIRST_ACCESS};

/// Optional narrowing applied to a report run.
#[derive(Debug, Clone, Default)]
pub struct FilterParams {
    /// Only devices reporting this application.
    pub app_name: Option<String>,
    /// Only devices reporting this application version.
    pub app_version: Option<String>,
    /// Lower bound on first access, inclusive, epoch milliseconds.
    pub since_ms: Option<i64>,
    /// Upper bound on first access, exclusive, epoch milliseconds.
    pub until_ms: Option<i64>,
}

impl FilterParams {
    pub fn is_empty(&self) -> bool {
        self.app_name.is_none()
            && self.app_version.is_none()
            && self.since_ms.is_none()
            && self.until_ms.is_none()
    }

    /// The query clause implementing this filter, or `None` when nothing is
    /// set. Individual conditions combine under `bool.filter`.
    pub fn query_clause(&self) -> Option<Value> {
        let mut clauses = Vec::new();
        if let Some(app) = &self.app_name {
            clauses.push(json!({"term": {FIELD_APP_NAME: app}}));
        }
        if let Some(version) = &self.app_version {
            clauses.push(json!({"term": {FIELD_APP_VERSION: version}}));
        }
        if self.since_ms.is_some() || self.until_ms.is_some() {
            let mut range = serde_json::Map::new();
            if let Some(since) = self.since_ms {
                range.insert("gte".to_string(), json!(since));
            }
            if let Some(until) = self.until_ms {
                range.insert("lt".to_string(), json!(until));
            }
            clauses.push(json!({"range": {FIELD_FIRST_ACCESS: range}}));
        }

        if clauses.is_empty() {
            None
        } else {
            Some(json!({"bool": {"filter": clauses}}))
        }
    }

    /// Complete query document for scans. Falls back to `match_all` when no
    /// filter is set.
    pub fn search_query(&self) -> Value {
        match self.query_clause() {
            Some(clause) => json!({"query": clause}),
            None => json!({"query": {"match_all": {}}}),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_params() {
        let params = FilterParams::default();
        assert!(params.is_empty());
        assert_eq!(params.query_clause(), None);
        assert_eq!(params.search_query(), json!({"query": {"match_all": {}}}));
    }

    #[test]
    fn test_app_name_term() {
        let params = FilterParams {
            app_name: Some("Bank".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.query_clause(),
            Some(json!({
                "bool": {"filter": [{"term": {"mfpAppName": "Bank"}}]}
            }))
        );
    }

    #[test]
    fn test_date_range_bounds() {
        let params = FilterParams {
            since_ms: Some(1_000),
            until_ms: Some(2_000),
            ..Default::default()
        };
        assert_eq!(
            params.query_clause(),
            Some(json!({
                "bool": {"filter": [
                    {"range": {"firstAccessTimestamp": {"gte": 1_000, "lt": 2_000}}}
                ]}
            }))
        );
    }

    #[test]
    fn test_since_only() {
        let params = FilterParams {
            since_ms: Some(5_000),
            ..Default::default()
        };
        assert_eq!(
            params.query_clause(),
            Some(json!({
                "bool": {"filter": [
                    {"range": {"firstAccessTimestamp": {"gte": 5_000}}}
                ]}
            }))
        );
    }

    #[test]
    fn test_all_conditions_combine() {
        let params = FilterParams {
            app_name: Some("Bank".to_string()),
            app_version: Some("2.1".to_string()),
            since_ms: Some(0),
            until_ms: Some(86_400_000),
        };
        let clause = params.query_clause().unwrap();
        let filters = clause["bool"]["filter"].as_array().unwrap();
        assert_eq!(filters.len(), 3);
        assert_eq!(
            params.search_query(),
            json!({"query": clause})
        );
    }
}
