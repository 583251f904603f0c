//! Inbound record shapes.
//!
//! These mirror the JSON the web API returns. They are decoded in full before
//! any entity is touched, so a malformed payload never reaches the graph.

use crate::id::{GroupId, MessageId, RoleId, UserId, WallPostId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `users.roblox.com/v1/users/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_banned: Option<bool>,
}

/// `users.roblox.com/v1/users/authenticated`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUserRecord {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One entry of the batched username lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameMatch {
    pub requested_username: String,
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
}

/// `www.roblox.com/users/profile/profileheader-json`
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileHeaderRecord {
    #[serde(rename = "ProfileUserName", default)]
    pub profile_user_name: Option<String>,
    #[serde(rename = "UserStatus", default)]
    pub user_status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecord {
    pub user_id: UserId,
    pub user_presence_type: u8,
    #[serde(default)]
    pub last_location: Option<String>,
    #[serde(default)]
    pub last_online: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEnvelope {
    pub user_presences: Vec<PresenceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailRecord {
    pub target_id: i64,
    pub state: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Owner reference inside a group record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRecord {
    pub user_id: UserId,
    #[serde(default)]
    pub username: Option<String>,
}

/// A group as embedded in membership and group-info payloads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub id: GroupId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner: Option<OwnerRecord>,
    #[serde(default)]
    pub member_count: Option<u64>,
}

/// A role as embedded in membership, wall and permission payloads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    pub id: RoleId,
    pub name: String,
    pub rank: u8,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub member_count: Option<u64>,
}

impl RoleRecord {
    pub fn new(id: i64, name: impl Into<String>, rank: u8) -> Self {
        Self {
            id: RoleId::new(id),
            name: name.into(),
            rank,
            description: None,
            member_count: None,
        }
    }

    pub fn with_member_count(mut self, count: u64) -> Self {
        self.member_count = Some(count);
        self
    }
}

/// `groups.roblox.com/v1/users/{id}/groups/roles` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipRecord {
    pub group: GroupRecord,
    pub role: RoleRecord,
}

/// `groups.roblox.com/v1/groups/{id}/roles`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRolesRecord {
    pub group_id: GroupId,
    pub roles: Vec<RoleRecord>,
}

/// Wall-post and audit-log user reference.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUserRecord {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A user paired with their role in some group.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PosterRecord {
    pub user: MemberUserRecord,
    pub role: RoleRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WallPostRecord {
    pub id: WallPostId,
    pub poster: PosterRecord,
    pub body: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogRecord {
    pub actor: PosterRecord,
    pub action_type: String,
    #[serde(default)]
    pub description: serde_json::Value,
    pub created: DateTime<Utc>,
}

/// Sender/recipient reference inside a private message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageUserRecord {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: MessageId,
    pub sender: MessageUserRecord,
    pub recipient: MessageUserRecord,
    pub subject: String,
    pub body: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub is_read: bool,
    pub is_system_message: bool,
}

/// `privatemessages.roblox.com/v1/messages`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePageRecord {
    pub collection: Vec<MessageRecord>,
    pub total_collection_size: u64,
    pub total_pages: u64,
    pub page_number: u64,
}

/// `{ "data": [...] }` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: Vec<T>,
}

/// Cursor-paged `{ previousPageCursor, nextPageCursor, data }` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub previous_page_cursor: Option<String>,
    #[serde(default)]
    pub next_page_cursor: Option<String>,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// Convert every entry, keeping the cursors.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            previous_page_cursor: self.previous_page_cursor,
            next_page_cursor: self.next_page_cursor,
            data: self.data.into_iter().map(f).collect::<Result<_, _>>()?,
        })
    }
}

// ============================================================================
// Permissions
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostPermissions {
    pub view_wall: bool,
    pub post_to_wall: bool,
    pub delete_from_wall: bool,
    pub view_status: bool,
    pub post_to_status: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MembershipPermissions {
    pub change_rank: bool,
    pub invite_members: bool,
    pub remove_members: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagementPermissions {
    pub manage_relationships: bool,
    pub manage_clan: bool,
    pub view_audit_logs: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EconomyPermissions {
    pub spend_group_funds: bool,
    pub advertise_group: bool,
    pub create_items: bool,
    pub manage_items: bool,
    pub add_group_places: bool,
    pub manage_group_games: bool,
    pub view_group_payouts: bool,
}

/// The four permission groups as the API names them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionsRecord {
    pub group_post_permissions: PostPermissions,
    pub group_membership_permissions: MembershipPermissions,
    pub group_management_permissions: ManagementPermissions,
    pub group_economy_permissions: EconomyPermissions,
}

/// `groups.roblox.com/v1/groups/{id}/roles/{roleId}/permissions`
#[derive(Debug, Clone, Deserialize)]
pub struct RolePermissionsRecord {
    pub role: RoleRecord,
    pub permissions: PermissionsRecord,
}

// ============================================================================
// Economy
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyRecord {
    pub robux: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevenueSummaryRecord {
    pub recurring_robux_stipend: i64,
    pub item_sale_robux: i64,
    pub purchased_robux: i64,
    pub trade_system_robux: i64,
    pub pending_robux: i64,
    pub group_payout_robux: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionAgent {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCurrency {
    pub amount: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub created: DateTime<Utc>,
    pub is_pending: bool,
    pub agent: TransactionAgent,
    #[serde(default)]
    pub details: serde_json::Value,
    pub currency: TransactionCurrency,
}
