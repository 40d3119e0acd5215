//! Connection settings for the device index.

/// Where and how to reach the index. Read-only once built.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Index host name.
    pub host: String,
    /// Index HTTP port.
    pub port: u16,
    /// Index name holding the device documents.
    pub index: String,
    /// Page size for scrolled scans. Every scan request carries this
    /// explicitly.
    pub scroll_size: usize,
    /// Timeout applied to each HTTP request, in seconds.
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9200,
            index: "worklight".to_string(),
            scroll_size: 1000,
            timeout_secs: 10,
        }
    }
}

impl IndexConfig {
    /// Base URL of the index host.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
