//! REST client
//!
//! Typed endpoint methods are grouped by resource in the submodules.

mod channels;
mod guilds;
mod interactions;
mod members;
mod messages;
mod users;

use std::sync::Arc;

use cord_common::{ClientConfig, ClientError, ClientResult, RestConfig, Token};
use serde::de::DeserializeOwned;

use crate::api::{
    FormattedRoute, HttpTransport, JsonRequestContent, ReqwestTransport, RestDispatcher,
    RestRequestOptions,
};
use crate::pagination::RetrievalDirection;

/// Handle to the REST API; cheap to clone
#[derive(Clone, Debug)]
pub struct RestClient {
    dispatcher: Arc<RestDispatcher>,
}

impl RestClient {
    /// Create a client from the loaded configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let token = Token::bot(config.token.as_str())?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(ClientError::transport)?;
        Self::with_transport(&token, &config.rest, Arc::new(ReqwestTransport::new(http)))
    }

    /// Create a client that sends requests through `transport`
    pub fn with_transport(
        token: &Token,
        config: &RestConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> ClientResult<Self> {
        Ok(Self::from_dispatcher(RestDispatcher::new(token, config, transport)?))
    }

    pub fn from_dispatcher(dispatcher: RestDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn dispatcher(&self) -> &RestDispatcher {
        &self.dispatcher
    }

    // ========================================================================
    // Raw execution
    // ========================================================================

    /// Send a bodiless request and decode the JSON response
    pub async fn execute<T: DeserializeOwned>(
        &self,
        route: FormattedRoute,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<T> {
        let response = self.dispatcher.execute(&route, None, options).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Validate and send a JSON body, then decode the JSON response
    pub async fn execute_with<C, T>(
        &self,
        route: FormattedRoute,
        content: &C,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<T>
    where
        C: JsonRequestContent,
        T: DeserializeOwned,
    {
        content.check()?;
        let body = content.to_json()?;
        let response = self.dispatcher.execute(&route, Some(body), options).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Send a bodiless request, ignoring the response body
    pub async fn execute_empty(
        &self,
        route: FormattedRoute,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        self.dispatcher.execute(&route, None, options).await?;
        Ok(())
    }

    /// Validate and send a JSON body, ignoring the response body
    pub async fn execute_with_empty<C: JsonRequestContent>(
        &self,
        route: FormattedRoute,
        content: &C,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        content.check()?;
        let body = content.to_json()?;
        self.dispatcher.execute(&route, Some(body), options).await?;
        Ok(())
    }
}

/// Add the `limit` and anchor query parameters of a page request
pub(crate) fn page_query(
    route: FormattedRoute,
    limit: usize,
    direction: RetrievalDirection,
    anchor: Option<cord_core::Snowflake>,
) -> FormattedRoute {
    route
        .with_query("limit", limit)
        .with_optional_query(direction.query_key(), anchor)
}

/// Percent-encode an emoji for use in a path segment
pub(crate) fn encode_emoji(emoji: &str) -> String {
    url::form_urlencoded::byte_serialize(emoji.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cord_core::Snowflake;

    #[test]
    fn test_page_query() {
        let route = crate::api::routes::GET_MESSAGES.format(&[&1_u64]);
        let route = page_query(route, 50, RetrievalDirection::Around, Some(Snowflake::new(9)));
        assert_eq!(route.path_and_query(), "/channels/1/messages?limit=50&around=9");
    }

    #[test]
    fn test_encode_emoji() {
        assert_eq!(encode_emoji("👍"), "%F0%9F%91%8D");
        assert_eq!(encode_emoji("party:123"), "party%3A123");
    }

    #[test]
    fn test_new_rejects_blank_token() {
        let config = ClientConfig::new(" ");
        assert!(matches!(RestClient::new(&config), Err(ClientError::Argument(_))));
    }
}
