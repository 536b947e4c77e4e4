//! The API entry point document served at `GET /v2`.

use serde::{Deserialize, Serialize};

/// Relative URLs of the broker's top-level resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResources {
    pub entities_url: String,
    pub types_url: String,
    pub subscriptions_url: String,
    pub registrations_url: String,
}

impl Default for ApiResources {
    /// The URLs every NGSIv2 broker serves.
    fn default() -> Self {
        ApiResources {
            entities_url: "/v2/entities".to_string(),
            types_url: "/v2/types".to_string(),
            subscriptions_url: "/v2/subscriptions".to_string(),
            registrations_url: "/v2/registrations".to_string(),
        }
    }
}
