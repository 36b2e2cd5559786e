//! Blocking HTTP transport on `reqwest`.

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;

use super::{Body, FormPart, HttpRequest, HttpResponse, Method, Transport};
use crate::error::Result;

/// Default transport: one blocking `reqwest` request per call.
///
/// Every call opens its own connection; idle connections are never kept
/// for reuse, so a request is never silently re-sent on a stale socket.
/// No timeout is configured, so a call blocks until the server answers or
/// the connection fails. Pass a preconfigured client to
/// [`HttpTransport::with_client`] to change either.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a fresh, non-pooling client.
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(None::<std::time::Duration>)
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self { client })
    }

    /// Use an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn attach_body(builder: RequestBuilder, body: Body) -> RequestBuilder {
        match body {
            Body::Empty => builder,
            Body::Json(text) => builder.header(CONTENT_TYPE, "application/json").body(text),
            Body::Multipart(parts) => {
                let form = parts.into_iter().fold(Form::new(), |form, part| match part {
                    FormPart::Text { name, value } => form.text(name, value),
                    FormPart::File { name, data } => {
                        let file = Part::bytes(data.to_vec()).file_name(name.clone());
                        form.part(name, file)
                    }
                });
                builder.multipart(form)
            }
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Put => self.client.put(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        let builder = if request.query.is_empty() {
            builder
        } else {
            builder.query(&request.query)
        };

        let response = Self::attach_body(builder, request.body).send()?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
