//! # cord-rest
//!
//! REST layer of the client:
//! - `api`: routes, request options, the HTTP transport seam, per-bucket
//!   rate limiting and the retrying dispatcher
//! - `client`: [`RestClient`] with typed endpoint methods
//! - `entities`: REST entities that wrap a model and a client handle
//! - `pagination`: lazy paged enumerators over list endpoints

pub mod api;
pub mod client;
pub mod entities;
pub mod pagination;

pub use api::{
    HttpRequest, HttpResponse, HttpTransport, JsonRequestContent, RateLimiter, RequestHook,
    RestDispatcher, RestRequestOptions, ReqwestTransport, Route, FormattedRoute,
};
pub use client::RestClient;
pub use entities::{
    RestChannel, RestGroupDmChannel, RestGuild, RestGuildChannel, RestMember, RestMessage,
    RestPrivateChannel, RestStageInstance, RestUser,
};
pub use pagination::{PageFetcher, PagedEnumerator, RetrievalDirection};
