//! The `users/*` resource family.
//!
//! # Design
//! `UserService` holds only the resource path and carries no mutable state.
//! Each operation is split into a `build_*` method producing an
//! `HttpRequest` and a `parse_*` method consuming an `HttpResponse`, so a
//! caller can drive the round-trip itself. [`Users`] binds the service to a
//! `Transport` and runs both halves.
//!
//! Parsing decodes a 2xx body into the success shape and any other body into
//! [`ApiError`]; [`relevant_error`] then picks what the caller sees.

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::error::{relevant_error, ApiError, Error, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{encode_query, UserLookupParams, UserSearchParams, UserShowParams};
use crate::transport::Transport;
use crate::user::User;

/// A decoded result together with the raw response it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub data: T,
    pub response: HttpResponse,
}

/// Stateless request builder and response parser for `users/*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserService {
    path: String,
}

impl UserService {
    pub fn new(base_url: &str) -> Self {
        Self {
            path: format!("{}/users", base_url.trim_end_matches('/')),
        }
    }

    pub fn build_show(&self, params: &UserShowParams) -> Result<HttpRequest, Error> {
        self.get("show.json", params)
    }

    pub fn build_lookup(&self, params: &UserLookupParams) -> Result<HttpRequest, Error> {
        self.get("lookup.json", params)
    }

    /// `query` replaces any query already set in `params`; `None` params
    /// behave like `UserSearchParams::default()`.
    pub fn build_search(
        &self,
        query: &str,
        params: Option<UserSearchParams>,
    ) -> Result<HttpRequest, Error> {
        let mut params = params.unwrap_or_default();
        params.query = Some(query.to_string());
        self.get("search.json", &params)
    }

    pub fn parse_show(&self, response: &HttpResponse) -> Result<User, Error> {
        receive(response)
    }

    /// Users in the order the service returned them. Ids the service did
    /// not resolve are simply missing.
    pub fn parse_lookup(&self, response: &HttpResponse) -> Result<Vec<User>, Error> {
        receive(response)
    }

    pub fn parse_search(&self, response: &HttpResponse) -> Result<Vec<User>, Error> {
        receive(response)
    }

    fn get<P: serde::Serialize>(&self, endpoint: &str, params: &P) -> Result<HttpRequest, Error> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/{endpoint}", self.path),
            query: encode_query(params)?,
            headers: Vec::new(),
        })
    }
}

/// A `UserService` bound to a transport.
pub struct Users<'a, T> {
    service: &'a UserService,
    transport: &'a T,
}

impl<'a, T: Transport> Users<'a, T> {
    pub fn new(service: &'a UserService, transport: &'a T) -> Self {
        Self { service, transport }
    }

    /// Fetch one user by id or screen name.
    pub fn show(&self, params: &UserShowParams) -> Result<ApiResponse<User>, Error> {
        let request = self.service.build_show(params)?;
        self.call(&request, |response| self.service.parse_show(response))
    }

    /// Fetch several users by id and/or screen name in one request.
    pub fn lookup(&self, params: &UserLookupParams) -> Result<ApiResponse<Vec<User>>, Error> {
        let request = self.service.build_lookup(params)?;
        self.call(&request, |response| self.service.parse_lookup(response))
    }

    /// Search public accounts. The service rejects this without a user
    /// authentication context; that rejection arrives as `Error::Api`.
    pub fn search(
        &self,
        query: &str,
        params: Option<UserSearchParams>,
    ) -> Result<ApiResponse<Vec<User>>, Error> {
        let request = self.service.build_search(query, params)?;
        self.call(&request, |response| self.service.parse_search(response))
    }

    fn call<D>(
        &self,
        request: &HttpRequest,
        parse: impl FnOnce(&HttpResponse) -> Result<D, Error>,
    ) -> Result<ApiResponse<D>, Error> {
        debug!("{} {}", request.method.as_str(), request.url());
        let response = self.transport.execute(request)?;
        debug!("{} returned HTTP {}", request.path, response.status);
        let data = parse(&response)?;
        Ok(ApiResponse { data, response })
    }
}

/// Decode one buffered body into either `T` or an `ApiError` and unify.
fn receive<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, Error> {
    let (decoded, api_error) = if response.is_success() {
        let decoded = serde_json::from_str::<T>(&response.body)
            .map_err(|e| TransportError::Decode(e.to_string()));
        (decoded, ApiError::default())
    } else {
        let api_error = serde_json::from_str::<ApiError>(&response.body).unwrap_or_default();
        let failed = Err(TransportError::Status {
            status: response.status,
            response: Box::new(response.clone()),
        });
        (failed, api_error)
    };

    let transport_error = decoded.as_ref().err().cloned();
    if let Some(err) = relevant_error(transport_error, api_error, response) {
        if let Error::Api { error, .. } = &err {
            warn!("API rejected request with HTTP {}: {error}", response.status);
        }
        return Err(err);
    }
    decoded.map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Records every request and answers with a canned response.
    struct CannedTransport {
        response: Result<HttpResponse, TransportError>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl CannedTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: Ok(HttpResponse {
                    status,
                    headers: vec![("x-rate-limit-remaining".to_string(), "899".to_string())],
                    body: body.to_string(),
                }),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn with_header(mut self, name: &str, value: &str) -> Self {
            if let Ok(response) = self.response.as_mut() {
                response.headers.push((name.to_string(), value.to_string()));
            }
            self
        }

        fn failing(err: TransportError) -> Self {
            Self {
                response: Err(err),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn last_request(&self) -> HttpRequest {
            self.seen.borrow().last().cloned().unwrap()
        }
    }

    impl Transport for CannedTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.borrow_mut().push(request.clone());
            self.response.clone()
        }
    }

    fn service() -> UserService {
        UserService::new("https://api.twitter.com/1.1/")
    }

    fn query(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_show_targets_show_json() {
        let params = UserShowParams {
            screen_name: Some("alice".to_string()),
            include_entities: Some(true),
            ..Default::default()
        };
        let req = service().build_show(&params).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "https://api.twitter.com/1.1/users/show.json");
        assert_eq!(
            req.query,
            query(&[("screen_name", "alice"), ("include_entities", "true")])
        );
        assert_eq!(
            req.url(),
            "https://api.twitter.com/1.1/users/show.json?screen_name=alice&include_entities=true"
        );
    }

    #[test]
    fn build_lookup_joins_ids() {
        let params = UserLookupParams {
            user_id: vec![1, 2, 3],
            ..Default::default()
        };
        let req = service().build_lookup(&params).unwrap();
        assert_eq!(req.path, "https://api.twitter.com/1.1/users/lookup.json");
        assert_eq!(req.query_param("user_id"), Some("1,2,3"));
        assert_eq!(req.query_param("screen_name"), None);
    }

    #[test]
    fn build_search_without_params_matches_default_params() {
        let without = service().build_search("golang", None).unwrap();
        let with = service()
            .build_search("golang", Some(UserSearchParams::default()))
            .unwrap();
        assert_eq!(without, with);
        assert_eq!(without.query, query(&[("q", "golang")]));
    }

    #[test]
    fn build_search_query_argument_overrides_params() {
        let params = UserSearchParams {
            query: Some("python".to_string()),
            page: Some(2),
            count: Some(5),
            include_entities: Some(false),
        };
        let req = service().build_search("golang", Some(params)).unwrap();
        assert_eq!(
            req.query,
            query(&[
                ("q", "golang"),
                ("page", "2"),
                ("count", "5"),
                ("include_entities", "false")
            ])
        );
    }

    #[test]
    fn parse_show_success_leaves_unsent_fields_absent() {
        let user = service()
            .parse_show(&response(200, r#"{"id":123,"screen_name":"alice"}"#))
            .unwrap();
        assert_eq!(user.id, Some(123));
        assert_eq!(user.screen_name.as_deref(), Some("alice"));
        assert!(user.entities.is_none());
        assert!(user.status.is_none());
    }

    #[test]
    fn parse_lookup_keeps_service_order_without_reconciling() {
        let users = service()
            .parse_lookup(&response(200, r#"[{"id":1},{"id":3}]"#))
            .unwrap();
        let ids: Vec<_> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![Some(1), Some(3)]);
    }

    #[test]
    fn parse_error_body_becomes_api_error() {
        let body = r#"{"errors":[{"code":50,"message":"User not found."}]}"#;
        let err = service().parse_show(&response(404, body)).unwrap_err();
        match err {
            Error::Api {
                status,
                error,
                response,
            } => {
                assert_eq!(status, 404);
                assert_eq!(error.code(), Some(50));
                assert_eq!(response.body, body);
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn parse_unauthorized_search_is_api_error_not_transport_error() {
        let body = r#"{"errors":[{"code":215,"message":"Bad Authentication data."}]}"#;
        let err = service().parse_search(&response(401, body)).unwrap_err();
        assert!(matches!(err, Error::Api { status: 401, .. }));
    }

    #[test]
    fn parse_unstructured_error_body_is_status_error() {
        let err = service()
            .parse_show(&response(503, "<html>Over capacity</html>"))
            .unwrap_err();
        assert_eq!(
            err,
            Error::Transport(TransportError::Status {
                status: 503,
                response: Box::new(response(503, "<html>Over capacity</html>")),
            })
        );
    }

    #[test]
    fn parse_error_status_with_empty_errors_is_status_error() {
        let err = service()
            .parse_lookup(&response(500, r#"{"errors":[]}"#))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(TransportError::Status { status: 500, .. })
        ));
    }

    #[test]
    fn parse_malformed_success_body_is_decode_error() {
        let err = service().parse_lookup(&response(200, "not json")).unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Decode(_))));
        // An object where a list is expected fails the same way.
        let err = service()
            .parse_lookup(&response(200, r#"{"id":1}"#))
            .unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Decode(_))));
    }

    #[test]
    fn show_passes_raw_response_through() {
        let transport = CannedTransport::new(200, r#"{"id":123,"screen_name":"alice"}"#);
        let service = service();
        let users = Users::new(&service, &transport);
        let params = UserShowParams {
            screen_name: Some("alice".to_string()),
            ..Default::default()
        };
        let result = users.show(&params).unwrap();
        assert_eq!(result.data.id, Some(123));
        assert_eq!(result.response.status, 200);
        assert_eq!(result.response.header("X-Rate-Limit-Remaining"), Some("899"));
        assert_eq!(
            transport.last_request().url(),
            "https://api.twitter.com/1.1/users/show.json?screen_name=alice"
        );
    }

    #[test]
    fn rate_limited_show_keeps_reset_header() {
        let body = r#"{"errors":[{"code":88,"message":"Rate limit exceeded"}]}"#;
        let transport = CannedTransport::new(429, body).with_header("x-rate-limit-reset", "1700000000");
        let service = service();
        let users = Users::new(&service, &transport);
        let params = UserShowParams {
            user_id: Some(12),
            ..Default::default()
        };
        let err = users.show(&params).unwrap_err();
        assert!(matches!(err, Error::Api { status: 429, .. }), "got {err:?}");
        assert_eq!(err.api_error().and_then(ApiError::code), Some(88));
        let response = err.response().unwrap();
        assert_eq!(response.header("x-rate-limit-reset"), Some("1700000000"));
        assert_eq!(response.header("x-rate-limit-remaining"), Some("899"));
    }

    #[test]
    fn unstructured_failure_keeps_raw_response() {
        let transport = CannedTransport::new(503, "<html>Over capacity</html>");
        let service = service();
        let users = Users::new(&service, &transport);
        let err = users.lookup(&UserLookupParams::default()).unwrap_err();
        let response = err.response().unwrap();
        assert_eq!(response.status, 503);
        assert_eq!(response.header("X-Rate-Limit-Remaining"), Some("899"));
    }

    #[test]
    fn search_sends_query_over_transport() {
        let transport = CannedTransport::new(200, r#"[{"id":5,"screen_name":"gopher"}]"#);
        let service = service();
        let users = Users::new(&service, &transport);
        let result = users.search("golang", None).unwrap();
        assert_eq!(result.data.len(), 1);
        assert_eq!(transport.last_request().query_param("q"), Some("golang"));
    }

    #[test]
    fn transport_failure_surfaces_as_transport_error() {
        let transport = CannedTransport::failing(TransportError::Send("connection refused".to_string()));
        let service = service();
        let users = Users::new(&service, &transport);
        let err = users.lookup(&UserLookupParams::default()).unwrap_err();
        assert_eq!(
            err,
            Error::Transport(TransportError::Send("connection refused".to_string()))
        );
    }
}
