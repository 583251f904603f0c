//! Group memberships.

use crate::group::Group;
use crate::id::{GroupId, UserId};
use crate::role::GroupRole;
use crate::user::User;
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};

/// Binds one user to one role within one group, identified by `(group_id, user_id)`.
///
/// The role can change in place (promotion, demotion, role removal) so any
/// handle to the member stays valid.
pub struct GroupMember {
    group: Weak<Group>,
    group_id: GroupId,
    user: Arc<User>,
    role: RwLock<Arc<GroupRole>>,
    user_id: UserId,
    username: Option<String>,
}

impl GroupMember {
    pub(crate) fn new(group: &Arc<Group>, user: &Arc<User>, role: &Arc<GroupRole>) -> Self {
        Self {
            group: Arc::downgrade(group),
            group_id: group.id(),
            user: Arc::clone(user),
            role: RwLock::new(Arc::clone(role)),
            user_id: user.id(),
            username: user.username(),
        }
    }

    /// The owning group, while its registry is alive.
    pub fn group(&self) -> Option<Arc<Group>> {
        self.group.upgrade()
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn user(&self) -> &Arc<User> {
        &self.user
    }

    pub fn role(&self) -> Arc<GroupRole> {
        Arc::clone(&self.role.read())
    }

    pub(crate) fn set_role(&self, role: &Arc<GroupRole>) {
        *self.role.write() = Arc::clone(role);
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Username as known when the membership was first observed.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

impl fmt::Debug for GroupMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = self.role.read();
        f.debug_struct("GroupMember")
            .field("group_id", &self.group_id)
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("role", &role.id())
            .finish()
    }
}
