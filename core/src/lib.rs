//! Synchronous client binding for the Twitter REST API `users` endpoints.
//!
//! # Overview
//! Typed parameter structs are encoded into `HttpRequest` values, a
//! `Transport` performs the round-trip, and the buffered `HttpResponse` is
//! decoded into typed users or a structured API error.
//!
//! # Design
//! - `UserService` is stateless: it holds only the resource path and splits
//!   each operation into `build_*` (produces a request) and `parse_*`
//!   (consumes a response), so the I/O boundary is explicit.
//! - `Client` owns a `ClientConfig` and a `Transport` and exposes bound
//!   operations through `Client::users()`.
//! - Every optional wire field is an `Option` and is omitted when unset, so
//!   "absent" and "zero/false/empty" stay distinguishable.
//! - Errors from the service body take precedence over transport errors;
//!   see [`error::relevant_error`].

pub mod client;
pub mod config;
pub mod entities;
pub mod error;
pub mod http;
pub mod params;
pub mod transport;
pub mod tweet;
pub mod user;
pub mod users;

pub use client::Client;
pub use config::ClientConfig;
pub use entities::{
    Entities, ExtendedEntity, HashtagEntity, Indices, MediaEntity, MediaSize, MediaSizes,
    MentionEntity, SymbolEntity, UrlEntity, UserEntities, VideoInfo, VideoVariant,
};
pub use error::{ApiError, Error, ErrorDetail, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{UserLookupParams, UserSearchParams, UserShowParams};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use tweet::Tweet;
pub use user::User;
pub use users::{ApiResponse, UserService, Users};
