//! Routes - an HTTP method plus a path template
//!
//! Templates use `{name}` placeholders, filled in order by
//! [`Route::format`]. The first parameter of a `/channels`, `/guilds` or
//! `/webhooks` route is the major parameter: the platform rate limits each
//! channel, guild and webhook separately even when they share a bucket hash.
//!
//! A formatted route displays as its template plus major parameter, so it can
//! be logged without leaking interaction tokens.

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use reqwest::Method;

/// An unformatted API route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    method: Method,
    template: &'static str,
}

impl Route {
    pub const fn new(method: Method, template: &'static str) -> Self {
        Self { method, template }
    }

    pub const fn get(template: &'static str) -> Self {
        Self::new(Method::GET, template)
    }

    pub const fn post(template: &'static str) -> Self {
        Self::new(Method::POST, template)
    }

    pub const fn put(template: &'static str) -> Self {
        Self::new(Method::PUT, template)
    }

    pub const fn patch(template: &'static str) -> Self {
        Self::new(Method::PATCH, template)
    }

    pub const fn delete(template: &'static str) -> Self {
        Self::new(Method::DELETE, template)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn template(&self) -> &'static str {
        self.template
    }

    /// Substitute placeholders in order
    ///
    /// Missing parameters leave the placeholder in place; surplus ones are
    /// ignored.
    pub fn format(&self, params: &[&dyn fmt::Display]) -> FormattedRoute {
        let mut path = String::with_capacity(self.template.len() + 32);
        let mut values = Vec::with_capacity(params.len());
        let mut params = params.iter();
        let mut rest = self.template;

        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            path.push_str(&rest[..start]);
            match params.next() {
                Some(param) => {
                    let value = param.to_string();
                    path.push_str(&value);
                    values.push(value);
                }
                None => path.push_str(&rest[start..=start + len]),
            }
            rest = &rest[start + len + 1..];
        }
        path.push_str(rest);

        let major_parameter = major_parameter(self.template, &values);
        FormattedRoute {
            route: self.clone(),
            path,
            query: None,
            major_parameter,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.template)
    }
}

fn major_parameter(template: &str, values: &[String]) -> Option<String> {
    let first = values.first()?;
    if template.starts_with("/webhooks/{") {
        // Webhook buckets are split per webhook id and token; only a digest
        // of the token goes into the key
        return Some(match values.get(1) {
            Some(token) if template.matches('{').count() >= 2 => {
                format!("{first}/{:016x}", token_digest(token))
            }
            _ => first.clone(),
        });
    }
    (template.starts_with("/channels/{") || template.starts_with("/guilds/{"))
        .then(|| first.clone())
}

fn token_digest(token: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    hasher.finish()
}

/// A route with its parameters filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedRoute {
    route: Route,
    path: String,
    query: Option<String>,
    major_parameter: Option<String>,
}

impl FormattedRoute {
    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn method(&self) -> &Method {
        self.route.method()
    }

    /// Path without the query string
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn major_parameter(&self) -> Option<&str> {
        self.major_parameter.as_deref()
    }

    /// Append a query parameter
    pub fn with_query(mut self, key: &str, value: impl fmt::Display) -> Self {
        let query = self.query.take().unwrap_or_default();
        let mut serializer = url::form_urlencoded::Serializer::new(query);
        serializer.append_pair(key, &value.to_string());
        self.query = Some(serializer.finish());
        self
    }

    /// Append a query parameter when the value is present
    pub fn with_optional_query(self, key: &str, value: Option<impl fmt::Display>) -> Self {
        match value {
            Some(value) => self.with_query(key, value),
            None => self,
        }
    }

    /// Path plus query string, relative to the API base
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(query) if !query.is_empty() => format!("{}?{query}", self.path),
            _ => self.path.clone(),
        }
    }

    /// Key identifying the route regardless of parameter values
    pub fn route_key(&self) -> String {
        self.route.to_string()
    }

    /// Bucket key for a learned (or assumed) bucket hash
    pub fn bucket_key(&self, hash: &str) -> String {
        match &self.major_parameter {
            Some(major) => format!("{hash}:{major}"),
            None => hash.to_string(),
        }
    }
}

impl fmt::Display for FormattedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.major_parameter {
            Some(major) => write!(f, "{} [{major}]", self.route),
            None => write!(f, "{}", self.route),
        }
    }
}

/// Routes used by [`RestClient`](crate::RestClient)
pub mod routes {
    use super::Route;

    // Users
    pub const GET_CURRENT_USER: Route = Route::get("/users/@me");
    pub const GET_USER: Route = Route::get("/users/{user.id}");
    pub const GET_CURRENT_USER_GUILDS: Route = Route::get("/users/@me/guilds");
    pub const LEAVE_GUILD: Route = Route::delete("/users/@me/guilds/{guild.id}");
    pub const CREATE_DM_CHANNEL: Route = Route::post("/users/@me/channels");

    // Channels
    pub const GET_CHANNEL: Route = Route::get("/channels/{channel.id}");
    pub const MODIFY_CHANNEL: Route = Route::patch("/channels/{channel.id}");
    pub const DELETE_CHANNEL: Route = Route::delete("/channels/{channel.id}");

    // Messages
    pub const GET_MESSAGES: Route = Route::get("/channels/{channel.id}/messages");
    pub const GET_MESSAGE: Route = Route::get("/channels/{channel.id}/messages/{message.id}");
    pub const CREATE_MESSAGE: Route = Route::post("/channels/{channel.id}/messages");
    pub const MODIFY_MESSAGE: Route =
        Route::patch("/channels/{channel.id}/messages/{message.id}");
    pub const DELETE_MESSAGE: Route =
        Route::delete("/channels/{channel.id}/messages/{message.id}");

    // Reactions
    pub const CREATE_REACTION: Route =
        Route::put("/channels/{channel.id}/messages/{message.id}/reactions/{emoji}/@me");
    pub const DELETE_OWN_REACTION: Route =
        Route::delete("/channels/{channel.id}/messages/{message.id}/reactions/{emoji}/@me");
    pub const GET_REACTIONS: Route =
        Route::get("/channels/{channel.id}/messages/{message.id}/reactions/{emoji}");

    // Guilds
    pub const GET_GUILD: Route = Route::get("/guilds/{guild.id}");
    pub const GET_GUILD_CHANNELS: Route = Route::get("/guilds/{guild.id}/channels");
    pub const CREATE_GUILD_CHANNEL: Route = Route::post("/guilds/{guild.id}/channels");
    pub const GET_GUILD_VOICE_REGIONS: Route = Route::get("/guilds/{guild.id}/regions");
    pub const GET_AUDIT_LOGS: Route = Route::get("/guilds/{guild.id}/audit-logs");

    // Members
    pub const GET_MEMBERS: Route = Route::get("/guilds/{guild.id}/members");
    pub const GET_MEMBER: Route = Route::get("/guilds/{guild.id}/members/{user.id}");
    pub const KICK_MEMBER: Route = Route::delete("/guilds/{guild.id}/members/{user.id}");
    pub const GRANT_ROLE: Route =
        Route::put("/guilds/{guild.id}/members/{user.id}/roles/{role.id}");
    pub const REVOKE_ROLE: Route =
        Route::delete("/guilds/{guild.id}/members/{user.id}/roles/{role.id}");

    // Bans
    pub const GET_BANS: Route = Route::get("/guilds/{guild.id}/bans");
    pub const CREATE_BAN: Route = Route::put("/guilds/{guild.id}/bans/{user.id}");
    pub const DELETE_BAN: Route = Route::delete("/guilds/{guild.id}/bans/{user.id}");

    // Voice regions
    pub const GET_VOICE_REGIONS: Route = Route::get("/voice/regions");

    // Stage instances
    pub const GET_STAGE_INSTANCE: Route = Route::get("/stage-instances/{channel.id}");
    pub const MODIFY_STAGE_INSTANCE: Route = Route::patch("/stage-instances/{channel.id}");
    pub const DELETE_STAGE_INSTANCE: Route = Route::delete("/stage-instances/{channel.id}");

    // Application commands
    pub const GET_GLOBAL_COMMANDS: Route = Route::get("/applications/{application.id}/commands");
    pub const CREATE_GLOBAL_COMMAND: Route =
        Route::post("/applications/{application.id}/commands");

    // Interactions
    pub const CREATE_FOLLOWUP_MESSAGE: Route =
        Route::post("/webhooks/{application.id}/{interaction.token}");

    // Gateway
    pub const GET_GATEWAY_BOT: Route = Route::get("/gateway/bot");
}
