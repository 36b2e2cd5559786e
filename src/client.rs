//! Space client and builder.
//!
//! The [`SpaceClientBuilder`] provides a fluent API for configuring the
//! client. The [`SpaceClient`] exposes the space's operations; every call is
//! one synchronous request through the configured [`Transport`]:
//! 1. Validate arguments and build the wire payload
//! 2. Send it (exactly once)
//! 3. Map the status: 404 to absence or failure, other non-2xx to
//!    [`SpaceError::ServerError`]
//! 4. Decode the body
//!
//! # Example
//!
//! ```ignore
//! use dxspaces_client::SpaceClient;
//! use ndarray::array;
//!
//! let client = SpaceClient::builder()
//!     .base_url("http://localhost:8080")
//!     .debug(true)
//!     .build()?;
//!
//! client.write_region(&array![[1i32, 2, 3], [4, 5, 6]], "A", 1, &[0, 0], None)?;
//! let region = client.read_region("A", 1, &[0, 0], &[1, 2], None)?;
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{EncodeArray, NdArrayCodec, TypedArray};
use crate::config::ClientConfig;
use crate::error::{Result, SpaceError};
use crate::protocol::{
    bounds_to_box, parse_dims, parse_tag, shape_to_box, Argument, ExecMarshaller, RegistryHandle,
    DIMS_HEADER, TAG_HEADER,
};
use crate::transport::{Body, FormPart, HttpRequest, HttpResponse, HttpTransport, Method, Transport};

/// Builder for configuring and creating a [`SpaceClient`].
#[derive(Debug, Clone, Default)]
pub struct SpaceClientBuilder {
    config: ClientConfig,
}

impl SpaceClientBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Set the server address.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the path prefix placed before every endpoint.
    ///
    /// Default: `dspaces`
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.api_prefix = prefix.into();
        self
    }

    /// Log every request URL at `info` level.
    ///
    /// Default: false
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Build a client on the default HTTP transport.
    pub fn build(self) -> Result<SpaceClient<HttpTransport>> {
        self.config.validate()?;
        let transport = HttpTransport::new()?;
        Ok(SpaceClient {
            config: self.config,
            transport,
        })
    }

    /// Build a client on a caller-supplied transport.
    pub fn build_with<T: Transport>(self, transport: T) -> Result<SpaceClient<T>> {
        SpaceClient::with_transport(self.config, transport)
    }
}

/// Client for one space server.
///
/// Holds only immutable configuration and the transport, so a shared
/// reference can be used from several threads at once.
#[derive(Debug, Clone)]
pub struct SpaceClient<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl SpaceClient<HttpTransport> {
    /// Create a new client builder.
    pub fn builder() -> SpaceClientBuilder {
        SpaceClientBuilder::new()
    }

    /// Client for `base_url` with default settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }
}

/// Error body returned with non-success statuses.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

impl<T: Transport> SpaceClient<T> {
    /// Create a client from configuration and a transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn is_debug(&self) -> bool {
        self.config.debug
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Read a region by inclusive bounds.
    ///
    /// Returns `Ok(None)` if the server has no such object, version or
    /// namespace.
    ///
    /// # Errors
    ///
    /// - box errors for bad bounds, raised before anything is sent
    /// - [`SpaceError::ServerError`] for non-404 failures
    /// - header and payload decode errors
    pub fn read_region(
        &self,
        name: &str,
        version: u32,
        lower_bound: &[i64],
        upper_bound: &[i64],
        namespace: Option<&str>,
    ) -> Result<Option<TypedArray>> {
        let region = bounds_to_box(lower_bound, upper_bound)?;

        let mut request = HttpRequest::new(
            Method::Post,
            self.config.endpoint(&format!("obj/{name}/{version}/")),
        )
        .body(Body::Json(region.to_json()?));
        if let Some(ns) = non_empty(namespace) {
            request = request.query("namespace", ns);
        }

        let Some(response) = self.send(request)? else {
            self.log_miss("read_region", name, version);
            return Ok(None);
        };

        let dims = parse_dims(required_header(&response, DIMS_HEADER)?)?;
        let tag = parse_tag(required_header(&response, TAG_HEADER)?)?;
        NdArrayCodec::decode(&dims, tag, response.body).map(Some)
    }

    /// Write an array into a region whose first corner is `offset`.
    ///
    /// # Errors
    ///
    /// - box errors for a bad offset, raised before anything is sent
    /// - [`SpaceError::WriteFailed`] if the server reports not-found
    /// - [`SpaceError::ServerError`] for other failures
    pub fn write_region<A: EncodeArray + ?Sized>(
        &self,
        array: &A,
        name: &str,
        version: u32,
        offset: &[i64],
        namespace: Option<&str>,
    ) -> Result<()> {
        let encoded = array.encode_array();
        let shape: Vec<i64> = encoded
            .dims
            .iter()
            .map(|&d| i64::try_from(d).unwrap_or(i64::MAX))
            .collect();
        let region = shape_to_box(&shape, offset)?;

        let mut request = HttpRequest::new(
            Method::Put,
            self.config.endpoint(&format!("obj/{name}/{version}")),
        )
        .query("element_size", encoded.element_size)
        .query("element_type", encoded.tag)
        .body(Body::Multipart(vec![
            FormPart::text("box", region.to_json()?),
            FormPart::file("data", encoded.data),
        ]));
        if let Some(ns) = non_empty(namespace) {
            request = request.query("namespace", ns);
        }

        match self.send(request)? {
            Some(_) => Ok(()),
            None => Err(SpaceError::WriteFailed {
                name: name.to_string(),
                version,
            }),
        }
    }

    /// Run `executable` on the server over the given argument regions.
    ///
    /// The executable and the result travel as MessagePack blobs; `E` and
    /// `R` must match what the server expects and produces. Only use this
    /// against a server you trust: the server acts on whatever it decodes.
    ///
    /// # Errors
    ///
    /// - box errors for any argument, raised before anything is sent
    /// - [`SpaceError::ExecutionFailed`] if the server reports not-found
    /// - [`SpaceError::ServerError`] for other failures
    /// - [`SpaceError::MsgPackDecode`] if the result is not an `R`
    pub fn execute<E, R>(&self, arguments: &[Argument], executable: &E) -> Result<R>
    where
        E: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let payload = ExecMarshaller::build_request(arguments, executable)?;

        let request = HttpRequest::new(Method::Post, self.config.endpoint("exec/")).body(
            Body::Multipart(vec![
                FormPart::text("requests", payload.metadata),
                FormPart::file("fn", payload.blob),
            ]),
        );

        let response = self.send(request)?.ok_or(SpaceError::ExecutionFailed)?;
        ExecMarshaller::decode_result(&response.body)
    }

    /// Names of all variables in the space.
    pub fn list_variables(&self) -> Result<Vec<String>> {
        self.get_json("var/")
    }

    /// Descriptors of every stored object of variable `name`.
    pub fn list_variable_objects(&self, name: &str) -> Result<Vec<Value>> {
        self.get_json(&format!("var/{name}/"))
    }

    /// Register a named entity of kind `kind`, with `data` as its JSON body.
    ///
    /// Returns `Ok(None)` if the server reports not-found.
    pub fn register<D: Serialize + ?Sized>(
        &self,
        kind: &str,
        name: &str,
        data: &D,
    ) -> Result<Option<RegistryHandle>> {
        let request = HttpRequest::new(
            Method::Post,
            self.config.endpoint(&format!("register/{kind}/{name}")),
        )
        .body(Body::Json(serde_json::to_string(data)?));

        let Some(response) = self.send(request)? else {
            if self.config.debug {
                tracing::debug!("could not find {kind}/{name} in register");
            }
            return Ok(None);
        };

        Ok(Some(serde_json::from_slice(&response.body)?))
    }

    fn get_json<V: DeserializeOwned>(&self, path: &str) -> Result<V> {
        let request = HttpRequest::new(Method::Get, self.config.endpoint(path));
        let url = request.url.clone();
        let response = self.send(request)?.ok_or(SpaceError::NotFound(url))?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Send one request and apply the shared status policy.
    ///
    /// `Ok(None)` means 404; the caller decides whether that is absence or
    /// failure.
    fn send(&self, request: HttpRequest) -> Result<Option<HttpResponse>> {
        if self.config.debug {
            tracing::info!("{} {}", request.method.as_str(), request.display_url());
        } else {
            tracing::trace!("{} {}", request.method.as_str(), request.display_url());
        }

        let response = self.transport.send(request)?;
        if response.is_not_found() {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(server_error(&response));
        }
        Ok(Some(response))
    }

    fn log_miss(&self, operation: &str, name: &str, version: u32) {
        if self.config.debug {
            tracing::debug!("could not find requested object {name}/{version} in {operation}");
        }
    }
}

fn non_empty(namespace: Option<&str>) -> Option<&str> {
    namespace.filter(|ns| !ns.is_empty())
}

fn required_header<'a>(response: &'a HttpResponse, name: &'static str) -> Result<&'a str> {
    response.header(name).ok_or(SpaceError::MissingHeader(name))
}

/// Build a [`SpaceError::ServerError`] from a failed response.
///
/// The detail comes from the body's `detail` field; a body that is not the
/// expected JSON is passed through as text.
fn server_error(response: &HttpResponse) -> SpaceError {
    let detail = match serde_json::from_slice::<ErrorBody>(&response.body) {
        Ok(ErrorBody {
            detail: Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => String::from_utf8_lossy(&response.body).into_owned(),
    };
    tracing::debug!(status = response.status, "server error: {}", detail);
    SpaceError::ServerError {
        status: response.status,
        detail,
    }
}
