//! Request plumbing: routes, options, bodies, transport, rate limiting and
//! the retrying dispatcher

pub mod content;
pub mod dispatcher;
pub mod options;
pub mod rate_limit;
pub mod route;
pub mod transport;

pub use content::{
    CreateBanContent, CreateCategoryChannelActionProperties, CreateDirectChannelContent,
    CreateGuildChannelContent, CreateTextChannelActionProperties,
    CreateVoiceChannelActionProperties, JsonRequestContent, ModifyChannelContent,
    ModifyMessageContent, ModifyStageInstanceContent, NestedChannelProperties,
};
pub use dispatcher::{RestDispatcher, AUDIT_LOG_REASON_HEADER};
pub use options::{RequestHook, RestRequestOptions};
pub use rate_limit::{BucketState, BucketTicket, RateLimitHeaders, RateLimiter};
pub use route::{routes, FormattedRoute, Route};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
