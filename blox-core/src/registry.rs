//! Root registry of users and groups.

use crate::group::Group;
use crate::id::{GroupId, UserId};
use crate::merge::UserPatch;
use crate::payload::{AuthenticatedUserRecord, UserRecord};
use crate::user::User;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Identity map for every user and group a client has observed.
///
/// Each check-and-insert runs under a single write lock with no suspension
/// point, so two callers can never both create an entity for the same id.
#[derive(Debug, Default)]
pub struct Registry {
    users: RwLock<HashMap<UserId, Arc<User>>>,
    groups: RwLock<HashMap<GroupId, Arc<Group>>>,
    current_user: RwLock<Option<Arc<User>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub fn user(&self, id: UserId) -> Option<Arc<User>> {
        self.users.read().get(&id).cloned()
    }

    pub fn users(&self) -> Vec<Arc<User>> {
        self.users.read().values().cloned().collect()
    }

    pub fn user_count(&self) -> usize {
        self.users.read().len()
    }

    /// Linear scan for a registered user with exactly this username.
    pub fn find_user_by_name(&self, username: &str) -> Option<Arc<User>> {
        self.users
            .read()
            .values()
            .find(|user| user.username().as_deref() == Some(username))
            .cloned()
    }

    pub fn get_or_create_user(&self, id: UserId) -> Arc<User> {
        let mut users = self.users.write();
        Arc::clone(users.entry(id).or_insert_with(|| {
            debug!(user_id = %id, "Registering user");
            Arc::new(User::new(id))
        }))
    }

    /// Record a partial sighting of a user (owner, audit actor, message party).
    pub fn observe_user(&self, id: UserId, patch: UserPatch) -> Arc<User> {
        let mut users = self.users.write();
        let user = users.entry(id).or_insert_with(|| {
            debug!(user_id = %id, "Registering user");
            Arc::new(User::new(id))
        });
        user.merge(patch);
        Arc::clone(user)
    }

    /// Construct-or-update a user from a full record.
    pub(crate) fn store_user_record(&self, record: &UserRecord) -> Arc<User> {
        let mut users = self.users.write();
        let user = users.entry(record.id).or_insert_with(|| {
            debug!(user_id = %record.id, "Registering user");
            Arc::new(User::new(record.id))
        });
        user.replace_profile(record);
        Arc::clone(user)
    }

    // =========================================================================
    // Current user
    // =========================================================================

    pub fn current_user(&self) -> Option<Arc<User>> {
        self.current_user.read().clone()
    }

    /// Fill the current-user slot and register the same instance under its id.
    pub(crate) fn set_current_user(&self, record: &AuthenticatedUserRecord) -> Arc<User> {
        let user = self.observe_user(record.id, UserPatch::from(record));
        *self.current_user.write() = Some(Arc::clone(&user));
        user
    }

    // =========================================================================
    // Groups
    // =========================================================================

    pub fn group(&self, id: GroupId) -> Option<Arc<Group>> {
        self.groups.read().get(&id).cloned()
    }

    pub fn groups(&self) -> Vec<Arc<Group>> {
        self.groups.read().values().cloned().collect()
    }

    pub fn group_count(&self) -> usize {
        self.groups.read().len()
    }

    /// Return the canonical group for `id`, creating it (with its Guest role) if needed.
    ///
    /// The group's own fields are not touched; merge fetched group data
    /// separately with [`Group::merge`].
    pub fn get_or_create_group(&self, id: GroupId) -> Arc<Group> {
        let mut groups = self.groups.write();
        Arc::clone(groups.entry(id).or_insert_with(|| {
            debug!(group_id = %id, "Registering group");
            Group::new(id)
        }))
    }
}
