//! Per-user profile lookups.
//!
//! Each operation merges what it learns into the canonical [`User`] and
//! returns the freshly learned value. A non-success answer leaves the user
//! untouched and yields `None`, except for [`Client::user_groups`], which
//! has no fallback.

use crate::client::Client;
use crate::endpoints::{AvatarSize, HeadshotSize, ThumbnailFormat};
use crate::error::Result;
use crate::id::GroupId;
use crate::member::GroupMember;
use crate::merge::UserPatch;
use crate::payload::{
    DataEnvelope, MembershipRecord, PresenceEnvelope, ProfileHeaderRecord, ThumbnailRecord,
    UserRecord,
};
use crate::user::{Presence, User};
use roblox_http::Request;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const THUMBNAIL_COMPLETED: &str = "Completed";

impl Client {
    pub async fn user_description(&self, user: &Arc<User>, allow_cache: bool) -> Result<Option<String>> {
        if allow_cache {
            if let Some(description) = user.description() {
                return Ok(Some(description));
            }
        }
        let record: Option<UserRecord> = self
            .fetch_optional(Request::get(self.endpoints().user(user.id())), "user description")
            .await?;
        Ok(record.map(|record| {
            user.merge(UserPatch::from(&record));
            record.description.unwrap_or_default()
        }))
    }

    pub async fn user_status(&self, user: &Arc<User>, allow_cache: bool) -> Result<Option<String>> {
        if allow_cache {
            if let Some(status) = user.status() {
                return Ok(Some(status));
            }
        }
        let record: Option<ProfileHeaderRecord> = self
            .fetch_optional(
                Request::get(self.endpoints().profile_header(user.id())),
                "profile header",
            )
            .await?;
        Ok(record.and_then(|record| {
            user.merge(UserPatch::from(&record));
            record.user_status
        }))
    }

    pub async fn has_premium(&self, user: &Arc<User>, allow_cache: bool) -> Result<Option<bool>> {
        if allow_cache {
            if let Some(premium) = user.premium() {
                return Ok(Some(premium));
            }
        }
        let premium: Option<bool> = self
            .fetch_optional(Request::get(self.endpoints().premium(user.id())), "premium")
            .await?;
        if let Some(premium) = premium {
            user.merge(UserPatch {
                premium: Some(premium),
                ..Default::default()
            });
        }
        Ok(premium)
    }

    /// Full-body avatar image URL. `None` until the thumbnail is rendered.
    pub async fn avatar_thumbnail(
        &self,
        user: &Arc<User>,
        size: AvatarSize,
        format: ThumbnailFormat,
        circular: bool,
    ) -> Result<Option<String>> {
        let url = self.endpoints().avatar_thumbnail(user.id(), size, format, circular);
        let url = self.thumbnail(user, url).await?;
        if let Some(url) = &url {
            user.set_avatar_thumbnail(url.clone());
        }
        Ok(url)
    }

    /// Headshot image URL. `None` until the thumbnail is rendered.
    pub async fn headshot_thumbnail(
        &self,
        user: &Arc<User>,
        size: HeadshotSize,
        format: ThumbnailFormat,
        circular: bool,
    ) -> Result<Option<String>> {
        let url = self.endpoints().headshot_thumbnail(user.id(), size, format, circular);
        let url = self.thumbnail(user, url).await?;
        if let Some(url) = &url {
            user.set_headshot_thumbnail(url.clone());
        }
        Ok(url)
    }

    async fn thumbnail(&self, user: &User, url: String) -> Result<Option<String>> {
        let envelope: Option<DataEnvelope<ThumbnailRecord>> =
            self.fetch_optional(Request::get(url), "thumbnail").await?;
        Ok(envelope.and_then(|envelope| {
            envelope
                .data
                .into_iter()
                .find(|t| t.target_id == user.id().get())
                .filter(|t| t.state == THUMBNAIL_COMPLETED)
                .and_then(|t| t.image_url)
        }))
    }

    pub async fn presence(&self, user: &Arc<User>, allow_cache: bool) -> Result<Option<Presence>> {
        if allow_cache {
            if let Some(presence) = user.presence() {
                return Ok(Some(presence));
            }
        }
        let request = Request::post(self.endpoints().presence())
            .with_json(json!({ "userIds": [user.id()] }));
        let envelope: Option<PresenceEnvelope> = self.fetch_optional(request, "presence").await?;

        let presence = envelope.and_then(|envelope| {
            envelope
                .user_presences
                .iter()
                .find(|p| p.user_id == user.id())
                .map(Presence::from)
        });
        if let Some(presence) = &presence {
            user.set_presence(presence.clone());
        }
        Ok(presence)
    }

    /// The user's group memberships.
    ///
    /// Every group, role and member in the answer goes through the registries,
    /// so the returned members are the canonical ones. A group the user was
    /// known to be in but that the answer leaves out drops their membership
    /// back to Guest. With `allow_cache` only what has already been observed
    /// is returned. A non-success answer is an error and changes nothing.
    pub async fn user_groups(
        &self,
        user: &Arc<User>,
        allow_cache: bool,
    ) -> Result<HashMap<GroupId, Arc<GroupMember>>> {
        if allow_cache {
            return Ok(user.groups());
        }
        let envelope: DataEnvelope<MembershipRecord> = self
            .fetch(
                Request::get(self.endpoints().user_group_roles(user.id())),
                "user groups",
            )
            .await?;

        let previous = user.groups();
        let mut current = HashMap::with_capacity(envelope.data.len());
        for record in &envelope.data {
            let member = self.absorb_membership(user, record)?;
            current.insert(member.group_id(), member);
        }
        for (group_id, member) in previous {
            if current.contains_key(&group_id) {
                continue;
            }
            debug!(user_id = %user.id(), group_id = %group_id, "Membership no longer listed");
            match member.group() {
                Some(group) => {
                    group.get_or_create_member(user, &group.guest_role())?;
                }
                None => user.forget_membership(group_id),
            }
        }
        Ok(current)
    }
}
