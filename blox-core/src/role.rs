//! Group roles and their permissions.

use crate::id::{GroupId, RoleId};
use crate::merge::{Merge, RolePatch};
use crate::payload::{
    EconomyPermissions, ManagementPermissions, MembershipPermissions, PermissionsRecord,
    PostPermissions,
};
use parking_lot::RwLock;

/// Name and rank of the role every group grants to non-members.
pub const GUEST_ROLE_NAME: &str = "Guest";
pub const GUEST_ROLE_RANK: u8 = 0;

/// Permission data as returned by the API. Stored, never evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Permissions {
    pub post: PostPermissions,
    pub membership: MembershipPermissions,
    pub management: ManagementPermissions,
    pub economy: EconomyPermissions,
}

impl From<PermissionsRecord> for Permissions {
    fn from(record: PermissionsRecord) -> Self {
        Self {
            post: record.group_post_permissions,
            membership: record.group_membership_permissions,
            management: record.group_management_permissions,
            economy: record.group_economy_permissions,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleState {
    pub name: String,
    pub rank: u8,
    pub description: Option<String>,
    pub cached_member_count: Option<u64>,
    pub permissions: Option<Permissions>,
}

/// A role within one group, identified by `(group_id, id)`.
#[derive(Debug)]
pub struct GroupRole {
    group_id: GroupId,
    id: RoleId,
    state: RwLock<RoleState>,
}

impl GroupRole {
    pub(crate) fn new(group_id: GroupId, id: RoleId, name: impl Into<String>, rank: u8) -> Self {
        Self {
            group_id,
            id,
            state: RwLock::new(RoleState {
                name: name.into(),
                rank,
                ..Default::default()
            }),
        }
    }

    pub(crate) fn guest(group_id: GroupId) -> Self {
        Self::new(group_id, RoleId::GUEST, GUEST_ROLE_NAME, GUEST_ROLE_RANK)
    }

    pub fn id(&self) -> RoleId {
        self.id
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn is_guest(&self) -> bool {
        self.id.is_guest()
    }

    pub fn name(&self) -> String {
        self.state.read().name.clone()
    }

    pub fn rank(&self) -> u8 {
        self.state.read().rank
    }

    pub fn description(&self) -> Option<String> {
        self.state.read().description.clone()
    }

    pub fn cached_member_count(&self) -> Option<u64> {
        self.state.read().cached_member_count
    }

    pub fn permissions(&self) -> Option<Permissions> {
        self.state.read().permissions
    }

    /// A snapshot of the mutable fields.
    pub fn state(&self) -> RoleState {
        self.state.read().clone()
    }

    pub fn merge(&self, patch: RolePatch) {
        self.state.write().merge(patch);
    }

    pub(crate) fn load_permissions(&self, record: PermissionsRecord) -> Permissions {
        let permissions = Permissions::from(record);
        self.state.write().permissions = Some(permissions);
        permissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_role() {
        let guest = GroupRole::guest(GroupId::new(100));
        assert!(guest.is_guest());
        assert_eq!(guest.name(), "Guest");
        assert_eq!(guest.rank(), 0);
        assert_eq!(guest.group_id(), GroupId::new(100));
        assert!(guest.permissions().is_none());
    }

    #[test]
    fn test_load_permissions() {
        let role = GroupRole::new(GroupId::new(100), RoleId::new(5), "Officer", 10);
        let mut record = PermissionsRecord::default();
        record.group_post_permissions.view_wall = true;
        record.group_management_permissions.view_audit_logs = true;

        let permissions = role.load_permissions(record);
        assert!(permissions.post.view_wall);
        assert!(permissions.management.view_audit_logs);
        assert!(!permissions.economy.spend_group_funds);
        assert_eq!(role.permissions(), Some(permissions));
    }
}
