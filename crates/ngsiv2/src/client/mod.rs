//! Blocking NGSIv2 client over a pluggable transport.
//!
//! The client builds [`http::Request`]s, hands them to a [`Transport`] and
//! decodes the responses. It owns no connection handling; any HTTP stack can
//! be plugged in, and a closure is enough for tests:
//!
//! ```
//! use http::{Request, Response, StatusCode};
//! use ngsiv2::client::Client;
//! use ngsiv2::error::TransportError;
//!
//! let client = Client::builder()
//!     .base_url("http://orion:1026")
//!     .build(|_request: Request<Vec<u8>>| -> Result<Response<Vec<u8>>, TransportError> {
//!         Ok(Response::builder()
//!             .status(StatusCode::OK)
//!             .body(br#"{"entities_url":"/v2/entities","types_url":"/v2/types","subscriptions_url":"/v2/subscriptions","registrations_url":"/v2/registrations"}"#.to_vec())?)
//!     })
//!     .unwrap();
//!
//! let resources = client.retrieve_api_resources().unwrap();
//! assert_eq!(resources.entities_url, "/v2/entities");
//! ```

pub mod config;
pub mod params;

pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use params::{ListEntitiesParams, RetrieveEntityParams};

use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, Request, Response, StatusCode};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use url::Url;

use crate::codec::{decode_api_resources, decode_entities, decode_entity, encode_batch_update};
use crate::error::{ClientError, TransportError, ValidationError};
use crate::model::{ApiResources, BatchUpdate, Entity};
use crate::validate::validate_entity;

const APPLICATION_JSON: &str = "application/json";

const SERVICE_HEADER: &str = "Fiware-Service";
const SERVICE_PATH_HEADER: &str = "Fiware-ServicePath";
const CORRELATOR_HEADER: &str = "Fiware-Correlator";

const API_ENTRY_POINT: &str = "/v2";
const BATCH_UPDATE_PATH: &str = "/v2/op/update";

/// Sends one HTTP request and returns the complete response.
pub trait Transport {
    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(Request<Vec<u8>>) -> Result<Response<Vec<u8>>, TransportError>,
{
    fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, TransportError> {
        self(request)
    }
}

/// Error document returned by brokers on 4xx/5xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    description: String,
}

/// Builder for [`Client`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.config.service = Some(service.into());
        self
    }

    pub fn service_path(mut self, service_path: impl Into<String>) -> Self {
        self.config.service_path = Some(service_path.into());
        self
    }

    pub fn correlator(mut self, enabled: bool) -> Self {
        self.config.correlator = enabled;
        self
    }

    /// Validates the base URL and creates the client.
    pub fn build<T: Transport>(self, transport: T) -> Result<Client<T>, ClientError> {
        let base_url = Url::parse(&self.config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::UnsupportedBaseUrl {
                url: self.config.base_url,
            });
        }
        Ok(Client {
            transport,
            base_url,
            config: self.config,
            resources: OnceCell::new(),
        })
    }
}

/// NGSIv2 client bound to one broker and tenant.
pub struct Client<T> {
    transport: T,
    base_url: Url,
    config: ClientConfig,
    resources: OnceCell<ApiResources>,
}

impl Client<()> {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl<T: Transport> Client<T> {
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches the API entry point (`GET /v2`).
    ///
    /// The first successful answer is cached for the lifetime of the client.
    pub fn retrieve_api_resources(&self) -> Result<&ApiResources, ClientError> {
        self.resources.get_or_try_init(|| {
            let url = self.endpoint(API_ENTRY_POINT);
            let response = self.execute(self.request(Method::GET, &url).body(Vec::new())?)?;
            let response = check_status(response, StatusCode::OK)?;
            Ok(decode_api_resources(response.body())?)
        })
    }

    /// Retrieves one entity by id.
    ///
    /// Fails with a [`ClientError::Server`] carrying 404 if the entity does not
    /// exist, and with 409 if the id is ambiguous and no type was given. An
    /// empty id is rejected without contacting the broker.
    pub fn retrieve_entity(
        &self,
        id: &str,
        params: &RetrieveEntityParams,
    ) -> Result<Entity, ClientError> {
        if id.is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        let entities_url = &self.retrieve_api_resources()?.entities_url;
        let mut url = self.endpoint(entities_url);
        url.path_segments_mut()
            .map_err(|_| ClientError::UnsupportedBaseUrl {
                url: self.config.base_url.clone(),
            })?
            .pop_if_empty()
            .push(id);
        append_query(&mut url, &params.query_pairs());

        let response = self.execute(self.request(Method::GET, &url).body(Vec::new())?)?;
        let response = check_status(response, StatusCode::OK)?;
        Ok(decode_entity(response.body())?)
    }

    /// Lists entities matching the given filters, in the broker's order.
    pub fn list_entities(&self, params: &ListEntitiesParams) -> Result<Vec<Entity>, ClientError> {
        let entities_url = &self.retrieve_api_resources()?.entities_url;
        let mut url = self.endpoint(entities_url);
        append_query(&mut url, &params.query_pairs());

        let response = self.execute(self.request(Method::GET, &url).body(Vec::new())?)?;
        let response = check_status(response, StatusCode::OK)?;
        Ok(decode_entities(response.body())?)
    }

    /// Applies a batch update (`POST /v2/op/update`).
    ///
    /// Every entity is validated before anything is sent. Only `204 No Content`
    /// counts as success.
    pub fn batch_update(&self, batch: &BatchUpdate) -> Result<(), ClientError> {
        for entity in &batch.entities {
            validate_entity(entity)?;
        }
        let body = encode_batch_update(batch)?;

        let url = self.endpoint(BATCH_UPDATE_PATH);
        let request = self
            .request(Method::POST, &url)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .body(body)?;
        let response = self.execute(request)?;
        check_status(response, StatusCode::NO_CONTENT)?;
        Ok(())
    }

    /// Appends an absolute resource path to the base URL, keeping any prefix.
    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!("{}{}", self.base_url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url.set_query(None);
        url.set_fragment(None);
        url
    }

    /// Starts a request with the headers every call carries.
    fn request(&self, method: Method, url: &Url) -> http::request::Builder {
        let mut builder = Request::builder()
            .method(method)
            .uri(url.as_str())
            .header(ACCEPT, APPLICATION_JSON);
        if let Some(service) = &self.config.service {
            builder = builder.header(SERVICE_HEADER, service.as_str());
        }
        if let Some(service_path) = &self.config.service_path {
            builder = builder.header(SERVICE_PATH_HEADER, service_path.as_str());
        }
        if self.config.correlator {
            builder = builder.header(CORRELATOR_HEADER, uuid::Uuid::new_v4().to_string());
        }
        builder
    }

    fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>, ClientError> {
        tracing::debug!(method = %request.method(), uri = %request.uri(), "sending request");
        let response = self.transport.send(request).map_err(ClientError::Transport)?;
        tracing::trace!(status = %response.status(), "received response");
        Ok(response)
    }
}

fn append_query(url: &mut Url, pairs: &[(&'static str, String)]) {
    if pairs.is_empty() {
        return;
    }
    url.query_pairs_mut()
        .extend_pairs(pairs.iter().map(|(key, value)| (*key, value.as_str())));
}

fn check_status(
    response: Response<Vec<u8>>,
    expected: StatusCode,
) -> Result<Response<Vec<u8>>, ClientError> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }
    if status.is_client_error() || status.is_server_error() {
        if let Ok(body) = serde_json::from_slice::<ErrorBody>(response.body()) {
            tracing::warn!(
                %status,
                error = %body.error,
                description = %body.description,
                "broker rejected request"
            );
            return Err(ClientError::Server {
                status,
                error: body.error,
                description: body.description,
            });
        }
    }
    Err(ClientError::UnexpectedStatus { status })
}
