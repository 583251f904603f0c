//! Field-merge updater.
//!
//! Each entity exposes its mutable fields as a plain state struct, and each
//! state struct accepts a patch of all-`Option` fields. `None` leaves the
//! target field untouched. The `From<&Record>` impls below are the remapping
//! tables from an endpoint's field names onto entity fields; a new endpoint
//! supplies its own impl rather than relying on name matching.

use crate::group::GroupProfile;
use crate::payload::{
    AuthenticatedUserRecord, GroupRecord, MemberUserRecord, MessageUserRecord, OwnerRecord,
    ProfileHeaderRecord, RoleRecord, UserRecord,
};
use crate::role::RoleState;
use crate::user::UserProfile;
use chrono::{DateTime, Utc};

/// Apply a partial update in place.
pub trait Merge {
    /// The partial update this type accepts.
    type Patch;

    /// Overwrite every field the patch supplies; leave the rest alone.
    fn merge(&mut self, patch: Self::Patch);
}

fn assign<T>(slot: &mut Option<T>, value: Option<T>) {
    if let Some(value) = value {
        *slot = Some(value);
    }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub banned: Option<bool>,
    pub premium: Option<bool>,
}

impl UserPatch {
    pub fn username(name: impl Into<String>) -> Self {
        Self {
            username: Some(name.into()),
            ..Default::default()
        }
    }
}

impl Merge for UserProfile {
    type Patch = UserPatch;

    fn merge(&mut self, patch: UserPatch) {
        assign(&mut self.username, patch.username);
        assign(&mut self.display_name, patch.display_name);
        assign(&mut self.description, patch.description);
        assign(&mut self.status, patch.status);
        assign(&mut self.created, patch.created);
        assign(&mut self.banned, patch.banned);
        assign(&mut self.premium, patch.premium);
    }
}

/// `name → username`, `description → description`, `isBanned → banned`, `created → created`
impl From<&UserRecord> for UserPatch {
    fn from(record: &UserRecord) -> Self {
        Self {
            username: Some(record.name.clone()),
            display_name: record.display_name.clone(),
            description: record.description.clone(),
            created: record.created,
            banned: record.is_banned,
            ..Default::default()
        }
    }
}

/// `name → username`
impl From<&AuthenticatedUserRecord> for UserPatch {
    fn from(record: &AuthenticatedUserRecord) -> Self {
        Self {
            username: Some(record.name.clone()),
            display_name: record.display_name.clone(),
            ..Default::default()
        }
    }
}

/// `ProfileUserName → username`, `UserStatus → status`
impl From<&ProfileHeaderRecord> for UserPatch {
    fn from(record: &ProfileHeaderRecord) -> Self {
        Self {
            username: record.profile_user_name.clone(),
            status: record.user_status.clone(),
            ..Default::default()
        }
    }
}

impl From<&MemberUserRecord> for UserPatch {
    fn from(record: &MemberUserRecord) -> Self {
        Self {
            username: Some(record.username.clone()),
            display_name: record.display_name.clone(),
            ..Default::default()
        }
    }
}

impl From<&MessageUserRecord> for UserPatch {
    fn from(record: &MessageUserRecord) -> Self {
        Self {
            username: Some(record.name.clone()),
            display_name: record.display_name.clone(),
            ..Default::default()
        }
    }
}

impl From<&OwnerRecord> for UserPatch {
    fn from(record: &OwnerRecord) -> Self {
        Self {
            username: record.username.clone(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Groups
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub member_count: Option<u64>,
}

impl Merge for GroupProfile {
    type Patch = GroupPatch;

    fn merge(&mut self, patch: GroupPatch) {
        assign(&mut self.name, patch.name);
        assign(&mut self.description, patch.description);
        assign(&mut self.member_count, patch.member_count);
    }
}

/// `name → name`, `description → description`, `memberCount → member_count`
impl From<&GroupRecord> for GroupPatch {
    fn from(record: &GroupRecord) -> Self {
        Self {
            name: record.name.clone(),
            description: record.description.clone(),
            member_count: record.member_count,
        }
    }
}

// ============================================================================
// Roles
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RolePatch {
    pub name: Option<String>,
    pub rank: Option<u8>,
    pub description: Option<String>,
    pub member_count: Option<u64>,
}

impl Merge for RoleState {
    type Patch = RolePatch;

    fn merge(&mut self, patch: RolePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(rank) = patch.rank {
            self.rank = rank;
        }
        assign(&mut self.description, patch.description);
        assign(&mut self.cached_member_count, patch.member_count);
    }
}

/// `name`, `rank` always; `description` and `memberCount → cached_member_count` when supplied
impl From<&RoleRecord> for RolePatch {
    fn from(record: &RoleRecord) -> Self {
        Self {
            name: Some(record.name.clone()),
            rank: Some(record.rank),
            description: record.description.clone(),
            member_count: record.member_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::UserId;

    #[test]
    fn test_user_merge_preserves_untouched_fields() {
        let mut profile = UserProfile {
            username: Some("old".to_string()),
            status: Some("building".to_string()),
            premium: Some(true),
            ..Default::default()
        };

        profile.merge(UserPatch {
            username: Some("new".to_string()),
            banned: Some(false),
            ..Default::default()
        });

        assert_eq!(profile.username.as_deref(), Some("new"));
        assert_eq!(profile.banned, Some(false));
        assert_eq!(profile.status.as_deref(), Some("building"));
        assert_eq!(profile.premium, Some(true));
    }

    #[test]
    fn test_user_record_remapping() {
        let record = UserRecord {
            id: UserId::new(1),
            name: "Roblox".to_string(),
            display_name: None,
            description: Some("Welcome".to_string()),
            created: None,
            is_banned: Some(false),
        };

        let patch = UserPatch::from(&record);
        assert_eq!(patch.username.as_deref(), Some("Roblox"));
        assert_eq!(patch.description.as_deref(), Some("Welcome"));
        assert_eq!(patch.banned, Some(false));
        assert!(patch.status.is_none());
    }

    #[test]
    fn test_profile_header_remapping() {
        let record = ProfileHeaderRecord {
            profile_user_name: Some("builderman".to_string()),
            user_status: Some("online".to_string()),
        };
        let mut profile = UserProfile {
            description: Some("kept".to_string()),
            ..Default::default()
        };
        profile.merge(UserPatch::from(&record));

        assert_eq!(profile.username.as_deref(), Some("builderman"));
        assert_eq!(profile.status.as_deref(), Some("online"));
        assert_eq!(profile.description.as_deref(), Some("kept"));
    }

    #[test]
    fn test_role_merge_keeps_member_count_when_absent() {
        let mut state = RoleState {
            name: "Officer".to_string(),
            rank: 10,
            cached_member_count: Some(42),
            ..Default::default()
        };

        state.merge(RolePatch::from(&RoleRecord::new(5, "Officer", 20)));
        assert_eq!(state.rank, 20);
        assert_eq!(state.cached_member_count, Some(42));

        state.merge(RolePatch::from(
            &RoleRecord::new(5, "Officer", 20).with_member_count(50),
        ));
        assert_eq!(state.cached_member_count, Some(50));
    }

    #[test]
    fn test_group_merge() {
        let mut profile = GroupProfile {
            name: Some("Builders".to_string()),
            description: Some("We build".to_string()),
            ..Default::default()
        };
        profile.merge(GroupPatch {
            description: Some("We build things".to_string()),
            ..Default::default()
        });

        assert_eq!(profile.name.as_deref(), Some("Builders"));
        assert_eq!(profile.description.as_deref(), Some("We build things"));
    }
}
