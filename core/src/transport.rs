//! The HTTP round-trip seam.
//!
//! # Design
//! The service layer never opens connections itself. A `Transport` takes a
//! plain `HttpRequest` and returns a fully buffered `HttpResponse`; non-2xx
//! statuses come back as data so the service layer can decode their error
//! bodies. Timeouts, TLS, retries and request signing belong to the
//! transport.
//!
//! `UreqTransport` (feature `ureq`, on by default) is a blocking
//! implementation over a `ureq::Agent`.

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP request.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "ureq")]
mod ureq_transport {
    use log::trace;

    use super::Transport;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by `ureq`.
    ///
    /// `default_headers` are sent with every request ahead of the request's
    /// own headers; an externally computed `Authorization` header goes here.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
        default_headers: Vec<(String, String)>,
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self::with_agent(agent)
        }

        /// Use a preconfigured agent. The agent must have
        /// `http_status_as_error(false)` so error bodies can be decoded.
        pub fn with_agent(agent: ureq::Agent) -> Self {
            Self {
                agent,
                default_headers: Vec::new(),
            }
        }

        pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
            self.default_headers.push((name.into(), value.into()));
            self
        }

        fn headers<'a>(&'a self, request: &'a HttpRequest) -> impl Iterator<Item = &'a (String, String)> {
            self.default_headers.iter().chain(request.headers.iter())
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            let url = request.url();
            trace!("{} {url}", request.method.as_str());

            let result = match request.method {
                HttpMethod::Get => {
                    let mut builder = self.agent.get(&url);
                    for (name, value) in self.headers(request) {
                        builder = builder.header(name.as_str(), value.as_str());
                    }
                    builder.call()
                }
                HttpMethod::Post => {
                    let mut builder = self.agent.post(&url);
                    for (name, value) in self.headers(request) {
                        builder = builder.header(name.as_str(), value.as_str());
                    }
                    builder.send_empty()
                }
            };
            let mut response = result.map_err(|e| TransportError::Send(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| TransportError::Send(e.to_string()))?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
