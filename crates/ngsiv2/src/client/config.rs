//! Configuration for the NGSIv2 client.
//!
//! | Option | Default | Header / effect |
//! |--------|---------|-----------------|
//! | `base_url` | `http://localhost:1026` | broker root, may include a path prefix |
//! | `service` | none | `Fiware-Service` |
//! | `service_path` | none | `Fiware-ServicePath` |
//! | `correlator` | false | fresh UUID v4 in `Fiware-Correlator` per request |
//!
//! ```
//! use ngsiv2::client::ClientConfig;
//!
//! let config = ClientConfig {
//!     service: Some("smartcity".to_string()),
//!     ..Default::default()
//! };
//! assert_eq!(config.base_url, "http://localhost:1026");
//! ```

/// Default broker address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:1026";

/// Settings applied to every request a client builds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Broker root URL. Resource paths such as `/v2/entities` are appended to it.
    pub base_url: String,

    /// Tenant, sent as `Fiware-Service`.
    pub service: Option<String>,

    /// Service path within the tenant, sent as `Fiware-ServicePath`.
    pub service_path: Option<String>,

    /// Stamp each request with a random `Fiware-Correlator`.
    pub correlator: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            service: None,
            service_path: None,
            correlator: false,
        }
    }
}
