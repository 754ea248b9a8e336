//! Member endpoints

use cord_common::{ClientError, ClientResult};
use cord_core::models::MemberModel;
use cord_core::Snowflake;

use super::{page_query, RestClient};
use crate::api::{routes, RestRequestOptions};
use crate::entities::RestMember;
use crate::pagination::{MemberPageFetcher, PagedEnumerator, RetrievalDirection};

/// Member payloads from guild endpoints always carry their user
fn missing_user() -> ClientError {
    ClientError::Decode(<serde_json::Error as serde::de::Error>::missing_field("user"))
}

impl RestClient {
    /// Get a guild member
    ///
    /// GET /guilds/{guild_id}/members/{user_id}
    pub async fn fetch_member(&self, guild_id: Snowflake, user_id: Snowflake) -> ClientResult<RestMember> {
        let model: MemberModel = self
            .execute(routes::GET_MEMBER.format(&[&guild_id, &user_id]), None)
            .await?;
        RestMember::from_model(self.clone(), guild_id, model).ok_or_else(missing_user)
    }

    /// One page of members in ascending user id order
    ///
    /// GET /guilds/{guild_id}/members
    pub async fn fetch_members_page(
        &self,
        guild_id: Snowflake,
        limit: usize,
        after: Option<Snowflake>,
    ) -> ClientResult<Vec<RestMember>> {
        let route = page_query(
            routes::GET_MEMBERS.format(&[&guild_id]),
            limit,
            RetrievalDirection::After,
            after,
        );
        let models: Vec<MemberModel> = self.execute(route, None).await?;
        models
            .into_iter()
            .map(|model| {
                RestMember::from_model(self.clone(), guild_id, model).ok_or_else(missing_user)
            })
            .collect()
    }

    /// Enumerate a guild's members, up to 1000 per page
    pub fn enumerate_members(
        &self,
        guild_id: Snowflake,
        limit: usize,
        start_after: Option<Snowflake>,
    ) -> ClientResult<PagedEnumerator<MemberPageFetcher>> {
        Ok(PagedEnumerator::new(
            MemberPageFetcher::new(self.clone(), guild_id),
            limit,
            RetrievalDirection::After,
            start_after,
        )?)
    }

    /// Remove a member from the guild
    ///
    /// DELETE /guilds/{guild_id}/members/{user_id}
    pub async fn kick_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        self.execute_empty(routes::KICK_MEMBER.format(&[&guild_id, &user_id]), options)
            .await
    }

    /// PUT /guilds/{guild_id}/members/{user_id}/roles/{role_id}
    pub async fn grant_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        self.execute_empty(
            routes::GRANT_ROLE.format(&[&guild_id, &user_id, &role_id]),
            options,
        )
        .await
    }

    /// DELETE /guilds/{guild_id}/members/{user_id}/roles/{role_id}
    pub async fn revoke_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        self.execute_empty(
            routes::REVOKE_ROLE.format(&[&guild_id, &user_id, &role_id]),
            options,
        )
        .await
    }
}
