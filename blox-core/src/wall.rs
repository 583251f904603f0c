//! Group wall posts.

use crate::client::Client;
use crate::endpoints::PageSize;
use crate::error::Result;
use crate::group::Group;
use crate::id::WallPostId;
use crate::lazy::Lazy;
use crate::member::GroupMember;
use crate::payload::{Page, PosterRecord, WallPostRecord};
use chrono::{DateTime, Utc};
use roblox_http::Request;
use std::sync::Arc;

/// A post on a group wall. The poster starts as the payload's `{ user, role }`
/// pair and resolves to the canonical [`GroupMember`].
#[derive(Debug, Clone)]
pub struct WallPost {
    pub id: WallPostId,
    pub group: Arc<Group>,
    pub poster: Lazy<PosterRecord, GroupMember>,
    pub body: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl WallPost {
    pub(crate) fn new(group: &Arc<Group>, record: WallPostRecord) -> Self {
        Self {
            id: record.id,
            group: Arc::clone(group),
            poster: Lazy::unresolved(record.poster),
            body: record.body,
            created: record.created,
            updated: record.updated,
        }
    }

    /// Resolve the poster through the group's member registry.
    ///
    /// The poster's role in the payload becomes the member's current role.
    /// A poster the API no longer knows is a not-found error and leaves the
    /// stub in place.
    pub async fn load_poster(&mut self, client: &Client) -> Result<Arc<GroupMember>> {
        let group = Arc::clone(&self.group);
        self.poster
            .resolve_with(|stub| {
                let stub = stub.clone();
                async move { client.member_from_poster(&group, &stub).await }
            })
            .await
    }
}

impl Client {
    /// One page of `group`'s wall, newest first. Posters are left unresolved.
    pub async fn group_wall(
        &self,
        group: &Arc<Group>,
        limit: PageSize,
        cursor: Option<&str>,
    ) -> Result<Page<WallPost>> {
        let url = self.endpoints().group_wall(group.id(), limit, cursor);
        let page: Page<WallPostRecord> = self.fetch(Request::get(url), "group wall").await?;
        page.try_map(|record| Ok(WallPost::new(group, record)))
    }
}
