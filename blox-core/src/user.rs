//! User entities.

use crate::id::{GroupId, UserId};
use crate::member::GroupMember;
use crate::merge::{Merge, UserPatch};
use crate::payload::{PresenceRecord, UserRecord};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// What a user is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceType {
    Offline,
    Online,
    InGame,
    InStudio,
}

impl PresenceType {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => PresenceType::Online,
            2 => PresenceType::InGame,
            3 => PresenceType::InStudio,
            _ => PresenceType::Offline,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Presence {
    pub kind: PresenceType,
    pub last_location: Option<String>,
    pub last_online: Option<DateTime<Utc>>,
}

impl From<&PresenceRecord> for Presence {
    fn from(record: &PresenceRecord) -> Self {
        Self {
            kind: PresenceType::from_code(record.user_presence_type),
            last_location: record.last_location.clone(),
            last_online: record.last_online,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Thumbnails {
    pub avatar: Option<String>,
    pub headshot: Option<String>,
}

/// Everything about a user that the API can tell us, as last observed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProfile {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub banned: Option<bool>,
    pub premium: Option<bool>,
    pub presence: Option<Presence>,
    pub thumbnails: Thumbnails,
    /// Only ever populated for the authenticated user.
    pub robux: Option<i64>,
}

/// A user account.
///
/// Exactly one `User` exists per id within a client's registry; every code
/// path that observes the same id hands out the same `Arc<User>`.
#[derive(Debug)]
pub struct User {
    id: UserId,
    profile: RwLock<UserProfile>,
    groups: RwLock<HashMap<GroupId, Weak<GroupMember>>>,
}

impl User {
    pub(crate) fn new(id: UserId) -> Self {
        Self {
            id,
            profile: RwLock::new(UserProfile::default()),
            groups: RwLock::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn profile_link(&self) -> String {
        format!("https://www.roblox.com/users/{}/profile", self.id)
    }

    /// A snapshot of the profile fields.
    pub fn profile(&self) -> UserProfile {
        self.profile.read().clone()
    }

    pub fn username(&self) -> Option<String> {
        self.profile.read().username.clone()
    }

    pub fn display_name(&self) -> Option<String> {
        self.profile.read().display_name.clone()
    }

    pub fn description(&self) -> Option<String> {
        self.profile.read().description.clone()
    }

    pub fn status(&self) -> Option<String> {
        self.profile.read().status.clone()
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.profile.read().created
    }

    pub fn banned(&self) -> Option<bool> {
        self.profile.read().banned
    }

    pub fn premium(&self) -> Option<bool> {
        self.profile.read().premium
    }

    pub fn presence(&self) -> Option<Presence> {
        self.profile.read().presence.clone()
    }

    pub fn thumbnails(&self) -> Thumbnails {
        self.profile.read().thumbnails.clone()
    }

    pub fn robux(&self) -> Option<i64> {
        self.profile.read().robux
    }

    /// Apply a partial update.
    pub fn merge(&self, patch: UserPatch) {
        self.profile.write().merge(patch);
    }

    /// Overwrite the fields a full user record carries, whether or not the
    /// record supplies a value for them.
    pub(crate) fn replace_profile(&self, record: &UserRecord) {
        let mut profile = self.profile.write();
        profile.username = Some(record.name.clone());
        profile.description = record.description.clone();
        profile.created = record.created;
        profile.banned = record.is_banned;
        if record.display_name.is_some() {
            profile.display_name = record.display_name.clone();
        }
    }

    pub(crate) fn set_presence(&self, presence: Presence) {
        self.profile.write().presence = Some(presence);
    }

    pub(crate) fn set_avatar_thumbnail(&self, url: String) {
        self.profile.write().thumbnails.avatar = Some(url);
    }

    pub(crate) fn set_headshot_thumbnail(&self, url: String) {
        self.profile.write().thumbnails.headshot = Some(url);
    }

    pub(crate) fn set_robux(&self, robux: i64) {
        self.profile.write().robux = Some(robux);
    }

    /// Groups the user holds a non-guest role in, as last observed.
    pub fn groups(&self) -> HashMap<GroupId, Arc<GroupMember>> {
        self.groups
            .read()
            .iter()
            .filter_map(|(id, member)| member.upgrade().map(|m| (*id, m)))
            .collect()
    }

    /// The membership in one group, if observed.
    pub fn membership(&self, group_id: GroupId) -> Option<Arc<GroupMember>> {
        self.groups.read().get(&group_id).and_then(Weak::upgrade)
    }

    pub(crate) fn record_membership(&self, group_id: GroupId, member: &Arc<GroupMember>) {
        self.groups.write().insert(group_id, Arc::downgrade(member));
    }

    pub(crate) fn forget_membership(&self, group_id: GroupId) {
        self.groups.write().remove(&group_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_blank() {
        let user = User::new(UserId::new(156));
        assert_eq!(user.id(), UserId::new(156));
        assert_eq!(user.profile(), UserProfile::default());
        assert_eq!(user.profile_link(), "https://www.roblox.com/users/156/profile");
        assert!(user.groups().is_empty());
    }

    #[test]
    fn test_replace_profile_overwrites_absent_fields() {
        let user = User::new(UserId::new(1));
        user.merge(UserPatch {
            username: Some("Roblox".to_string()),
            description: Some("old".to_string()),
            status: Some("kept".to_string()),
            ..Default::default()
        });

        user.replace_profile(&UserRecord {
            id: UserId::new(1),
            name: "Roblox".to_string(),
            display_name: None,
            description: None,
            created: None,
            is_banned: Some(true),
        });

        assert_eq!(user.description(), None);
        assert_eq!(user.banned(), Some(true));
        assert_eq!(user.status().as_deref(), Some("kept"));
    }

    #[test]
    fn test_presence_codes() {
        assert_eq!(PresenceType::from_code(0), PresenceType::Offline);
        assert_eq!(PresenceType::from_code(2), PresenceType::InGame);
        assert_eq!(PresenceType::from_code(3), PresenceType::InStudio);
        assert_eq!(PresenceType::from_code(9), PresenceType::Offline);
    }
}
