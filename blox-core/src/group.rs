//! Groups and their per-group role and member registries.

use crate::error::{Error, Result};
use crate::id::{GroupId, RoleId, UserId};
use crate::member::GroupMember;
use crate::merge::{GroupPatch, Merge, RolePatch};
use crate::payload::RoleRecord;
use crate::role::GroupRole;
use crate::user::User;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupProfile {
    pub name: Option<String>,
    pub description: Option<String>,
    pub member_count: Option<u64>,
}

/// A group, owning one registry of roles and one of members.
///
/// Created only through [`Registry::get_or_create_group`](crate::Registry::get_or_create_group),
/// so each group id maps to one canonical instance.
#[derive(Debug)]
pub struct Group {
    id: GroupId,
    profile: RwLock<GroupProfile>,
    owner: RwLock<Option<Arc<User>>>,
    guest: Arc<GroupRole>,
    roles: RwLock<HashMap<RoleId, Arc<GroupRole>>>,
    members: RwLock<HashMap<UserId, Arc<GroupMember>>>,
}

impl Group {
    /// A fresh group holding only its Guest role.
    pub(crate) fn new(id: GroupId) -> Arc<Self> {
        let guest = Arc::new(GroupRole::guest(id));
        let mut roles = HashMap::new();
        roles.insert(RoleId::GUEST, Arc::clone(&guest));

        Arc::new(Self {
            id,
            profile: RwLock::new(GroupProfile::default()),
            owner: RwLock::new(None),
            guest,
            roles: RwLock::new(roles),
            members: RwLock::new(HashMap::new()),
        })
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> Option<String> {
        self.profile.read().name.clone()
    }

    pub fn description(&self) -> Option<String> {
        self.profile.read().description.clone()
    }

    pub fn profile(&self) -> GroupProfile {
        self.profile.read().clone()
    }

    pub fn owner(&self) -> Option<Arc<User>> {
        self.owner.read().clone()
    }

    pub(crate) fn set_owner(&self, owner: Arc<User>) {
        *self.owner.write() = Some(owner);
    }

    /// Apply a partial update to the group's own fields.
    pub fn merge(&self, patch: GroupPatch) {
        self.profile.write().merge(patch);
    }

    // =========================================================================
    // Roles
    // =========================================================================

    pub fn guest_role(&self) -> Arc<GroupRole> {
        Arc::clone(&self.guest)
    }

    pub fn role(&self, id: RoleId) -> Option<Arc<GroupRole>> {
        self.roles.read().get(&id).cloned()
    }

    /// All roles, lowest rank first.
    pub fn roles(&self) -> Vec<Arc<GroupRole>> {
        let mut roles: Vec<_> = self.roles.read().values().cloned().collect();
        roles.sort_by_key(|role| (role.rank(), role.id()));
        roles
    }

    /// Return the canonical role for `record.id`, creating it if needed.
    ///
    /// An existing role gets its name and rank overwritten; its cached member
    /// count only changes when the record carries one.
    pub fn get_or_create_role(&self, record: &RoleRecord) -> Arc<GroupRole> {
        let mut roles = self.roles.write();
        let role = roles.entry(record.id).or_insert_with(|| {
            debug!(group_id = %self.id, role_id = %record.id, "Registering role");
            Arc::new(GroupRole::new(self.id, record.id, &record.name, record.rank))
        });
        role.merge(RolePatch::from(record));
        Arc::clone(role)
    }

    /// Drop a role and move its members to the lowest-ranked remaining
    /// non-guest role, or to Guest when none is left.
    pub fn remove_role(&self, id: RoleId) -> Result<Option<Arc<GroupRole>>> {
        if id.is_guest() {
            return Err(Error::GuestRoleRemoval { group: self.id });
        }

        // Lock order is roles, then members, everywhere.
        let mut roles = self.roles.write();
        let Some(removed) = roles.remove(&id) else {
            return Ok(None);
        };
        let fallback = roles
            .values()
            .filter(|role| !role.is_guest())
            .min_by_key(|role| (role.rank(), role.id()))
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.guest));

        for member in self.members.read().values() {
            if member.role().id() == id {
                member.set_role(&fallback);
                if fallback.is_guest() {
                    member.user().forget_membership(self.id);
                }
            }
        }
        drop(roles);

        debug!(group_id = %self.id, role_id = %id, fallback = %fallback.id(), "Removed role");
        Ok(Some(removed))
    }

    // =========================================================================
    // Members
    // =========================================================================

    pub fn member(&self, user_id: UserId) -> Option<Arc<GroupMember>> {
        self.members.read().get(&user_id).cloned()
    }

    pub fn members(&self) -> Vec<Arc<GroupMember>> {
        self.members.read().values().cloned().collect()
    }

    /// Return the canonical member for `user`, creating it if needed.
    ///
    /// An existing member is reassigned to `role` in place. `role` must be the
    /// instance this group has registered for its id. Only members holding a
    /// non-guest role are listed in [`User::groups`].
    pub fn get_or_create_member(
        self: &Arc<Self>,
        user: &Arc<User>,
        role: &Arc<GroupRole>,
    ) -> Result<Arc<GroupMember>> {
        // Held until the member is bound, so a concurrent `remove_role`
        // cannot detach `role` in between.
        let roles = self.roles.read();
        let owned = role.group_id() == self.id
            && roles
                .get(&role.id())
                .is_some_and(|registered| Arc::ptr_eq(registered, role));
        if !owned {
            return Err(Error::ForeignRole {
                role: role.id(),
                group: self.id,
            });
        }

        let member = {
            let mut members = self.members.write();
            match members.get(&user.id()) {
                Some(member) => {
                    member.set_role(role);
                    Arc::clone(member)
                }
                None => {
                    debug!(group_id = %self.id, user_id = %user.id(), "Registering member");
                    let member = Arc::new(GroupMember::new(self, user, role));
                    members.insert(user.id(), Arc::clone(&member));
                    member
                }
            }
        };
        if role.is_guest() {
            user.forget_membership(self.id);
        } else {
            user.record_membership(self.id, &member);
        }
        drop(roles);
        Ok(member)
    }
}
