//! Group-level operations on the client.

use crate::client::Client;
use crate::error::{Error, Result};
use crate::group::Group;
use crate::id::{GroupId, UserId};
use crate::member::GroupMember;
use crate::merge::{GroupPatch, RolePatch, UserPatch};
use crate::payload::{GroupRecord, GroupRolesRecord, MembershipRecord, PosterRecord, RolePermissionsRecord};
use crate::role::{GroupRole, Permissions};
use crate::user::User;
use roblox_http::Request;
use std::sync::Arc;
use tracing::debug;

impl Client {
    // =========================================================================
    // Registry wiring
    // =========================================================================

    /// Fold a group record into the canonical group, including its owner.
    pub(crate) fn absorb_group_record(&self, record: &GroupRecord) -> Arc<Group> {
        let group = self.get_or_create_group(record.id);
        group.merge(GroupPatch::from(record));
        if let Some(owner) = &record.owner {
            let owner = self.registry().observe_user(owner.user_id, UserPatch::from(owner));
            group.set_owner(owner);
        }
        group
    }

    /// Fold one `{ group, role }` membership of `user` into the registries.
    pub(crate) fn absorb_membership(
        &self,
        user: &Arc<User>,
        record: &MembershipRecord,
    ) -> Result<Arc<GroupMember>> {
        let group = self.absorb_group_record(&record.group);
        let role = group.get_or_create_role(&record.role);
        group.get_or_create_member(user, &role)
    }

    /// Resolve a `{ user, role }` pair from a group payload to the canonical member.
    ///
    /// The user is looked up through [`Client::get_user`] with the cache
    /// allowed; a user the API does not know is an error.
    pub(crate) async fn member_from_poster(
        &self,
        group: &Arc<Group>,
        poster: &PosterRecord,
    ) -> Result<Arc<GroupMember>> {
        let user_id = poster.user.user_id;
        let user = self
            .get_user(user_id, true)
            .await?
            .ok_or_else(|| Error::not_found("user", user_id))?;
        let role = group.get_or_create_role(&poster.role);
        group.get_or_create_member(&user, &role)
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// Fetch a group's info and merge it into the canonical group.
    ///
    /// With `allow_cache`, a group whose info has already been loaded is
    /// returned as is. A non-success answer is `Ok(None)`.
    pub async fn get_group(&self, id: GroupId, allow_cache: bool) -> Result<Option<Arc<Group>>> {
        if allow_cache {
            if let Some(group) = self.registry().group(id).filter(|g| g.name().is_some()) {
                return Ok(Some(group));
            }
        }
        let record: Option<GroupRecord> = self
            .fetch_optional(Request::get(self.endpoints().group(id)), "group")
            .await?;
        Ok(record.map(|record| self.absorb_group_record(&record)))
    }

    /// Fetch every role of `group`, merging each into its role registry.
    ///
    /// Returns all registered roles, Guest included, lowest rank first.
    pub async fn group_roles(&self, group: &Arc<Group>) -> Result<Vec<Arc<GroupRole>>> {
        let record: GroupRolesRecord = self
            .fetch(Request::get(self.endpoints().group_roles(group.id())), "group roles")
            .await?;
        for role in &record.roles {
            group.get_or_create_role(role);
        }
        debug!(group_id = %group.id(), count = record.roles.len(), "Loaded roles");
        Ok(group.roles())
    }

    /// The member of `group` for `user_id`.
    ///
    /// With `allow_cache`, an already registered member is returned directly.
    /// Otherwise the user and their memberships are fetched; a user who is not
    /// in the group becomes a member holding the Guest role. A failed
    /// memberships fetch is an error and registers nothing.
    pub async fn get_member(
        &self,
        group: &Arc<Group>,
        user_id: UserId,
        allow_cache: bool,
    ) -> Result<Arc<GroupMember>> {
        if allow_cache {
            if let Some(member) = group.member(user_id) {
                return Ok(member);
            }
        }

        let user = self
            .get_user(user_id, allow_cache)
            .await?
            .ok_or_else(|| Error::not_found("user", user_id))?;
        let memberships = self.user_groups(&user, false).await?;
        match memberships.get(&group.id()) {
            Some(member) => Ok(Arc::clone(member)),
            None => group.get_or_create_member(&user, &group.guest_role()),
        }
    }

    /// Fetch a role's permissions, refreshing its name, rank and description.
    pub async fn role_permissions(&self, role: &Arc<GroupRole>, allow_cache: bool) -> Result<Permissions> {
        if allow_cache {
            if let Some(permissions) = role.permissions() {
                return Ok(permissions);
            }
        }
        let url = self.endpoints().role_permissions(role.group_id(), role.id());
        let record: RolePermissionsRecord = self.fetch(Request::get(url), "role permissions").await?;
        role.merge(RolePatch::from(&record.role));
        Ok(role.load_permissions(record.permissions))
    }
}
