//! URL construction for every web API endpoint the client talks to.

use crate::id::{GroupId, RoleId, UserId};
use std::fmt;

pub const DEFAULT_DOMAIN: &str = "roblox.com";

// ============================================================================
// Query parameter enums
// ============================================================================

/// Avatar thumbnail dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AvatarSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl AvatarSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvatarSize::Small => "100x100",
            AvatarSize::Medium => "352x352",
            AvatarSize::Large => "720x720",
        }
    }
}

/// Headshot thumbnail dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeadshotSize {
    #[default]
    Small,
    Medium,
    Large,
}

impl HeadshotSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadshotSize::Small => "48x48",
            HeadshotSize::Medium => "60x60",
            HeadshotSize::Large => "150x150",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThumbnailFormat {
    #[default]
    Png,
    Jpeg,
}

impl ThumbnailFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThumbnailFormat::Png => "Png",
            ThumbnailFormat::Jpeg => "Jpeg",
        }
    }
}

/// Which private-message folder to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageTab {
    #[default]
    Inbox,
    Sent,
    Archive,
}

impl MessageTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageTab::Inbox => "inbox",
            MessageTab::Sent => "sent",
            MessageTab::Archive => "archive",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevenueTimeframe {
    Day,
    Week,
    Month,
    Year,
}

impl RevenueTimeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevenueTimeframe::Day => "Day",
            RevenueTimeframe::Week => "Week",
            RevenueTimeframe::Month => "Month",
            RevenueTimeframe::Year => "Year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Sale,
    Purchase,
    AffiliateSale,
    DevEx,
    GroupPayout,
    AdImpressionPayout,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "Sale",
            TransactionType::Purchase => "Purchase",
            TransactionType::AffiliateSale => "AffiliateSale",
            TransactionType::DevEx => "DevEx",
            TransactionType::GroupPayout => "GroupPayout",
            TransactionType::AdImpressionPayout => "AdImpressionPayout",
        }
    }
}

/// Page sizes accepted by the cursor-paged endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageSize {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    pub fn get(&self) -> u8 {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// Builds absolute URLs against one base domain.
#[derive(Debug, Clone)]
pub struct Endpoints {
    domain: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_DOMAIN)
    }
}

impl Endpoints {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    fn host(&self, subdomain: &str) -> String {
        format!("https://{subdomain}.{}", self.domain)
    }

    // Users

    pub fn user(&self, id: UserId) -> String {
        format!("{}/v1/users/{id}", self.host("users"))
    }

    pub fn authenticated_user(&self) -> String {
        format!("{}/v1/users/authenticated", self.host("users"))
    }

    pub fn usernames(&self) -> String {
        format!("{}/v1/usernames/users", self.host("users"))
    }

    pub fn profile_header(&self, id: UserId) -> String {
        format!(
            "{}/users/profile/profileheader-json?userid={id}",
            self.host("www")
        )
    }

    pub fn premium(&self, id: UserId) -> String {
        format!(
            "{}/v1/users/{id}/validate-membership",
            self.host("premiumfeatures")
        )
    }

    pub fn avatar_thumbnail(
        &self,
        id: UserId,
        size: AvatarSize,
        format: ThumbnailFormat,
        circular: bool,
    ) -> String {
        format!(
            "{}/v1/users/avatar?userIds={id}&size={}&format={}&isCircular={circular}",
            self.host("thumbnails"),
            size.as_str(),
            format.as_str()
        )
    }

    pub fn headshot_thumbnail(
        &self,
        id: UserId,
        size: HeadshotSize,
        format: ThumbnailFormat,
        circular: bool,
    ) -> String {
        format!(
            "{}/v1/users/avatar-headshot?userIds={id}&size={}&format={}&isCircular={circular}",
            self.host("thumbnails"),
            size.as_str(),
            format.as_str()
        )
    }

    pub fn presence(&self) -> String {
        format!("{}/v1/presence/users", self.host("presence"))
    }

    // Groups

    pub fn user_group_roles(&self, id: UserId) -> String {
        format!("{}/v1/users/{id}/groups/roles", self.host("groups"))
    }

    pub fn group(&self, id: GroupId) -> String {
        format!("{}/v1/groups/{id}", self.host("groups"))
    }

    pub fn group_roles(&self, id: GroupId) -> String {
        format!("{}/v1/groups/{id}/roles", self.host("groups"))
    }

    pub fn role_permissions(&self, group: GroupId, role: RoleId) -> String {
        let segment = if role.is_guest() {
            "guest".to_string()
        } else {
            role.to_string()
        };
        format!(
            "{}/v1/groups/{group}/roles/{segment}/permissions",
            self.host("groups")
        )
    }

    pub fn group_wall(&self, group: GroupId, limit: PageSize, cursor: Option<&str>) -> String {
        let url = format!(
            "{}/v2/groups/{group}/wall/posts?limit={limit}&sortOrder=Desc",
            self.host("groups")
        );
        with_cursor(url, cursor)
    }

    pub fn audit_log(&self, group: GroupId, limit: PageSize, cursor: Option<&str>) -> String {
        let url = format!(
            "{}/v1/groups/{group}/audit-log?limit={limit}&sortOrder=Desc",
            self.host("groups")
        );
        with_cursor(url, cursor)
    }

    // Messages

    pub fn messages(&self, tab: MessageTab, page_number: u32, page_size: u32) -> String {
        format!(
            "{}/v1/messages?messageTab={}&pageNumber={page_number}&pageSize={page_size}",
            self.host("privatemessages"),
            tab.as_str()
        )
    }

    // Economy

    pub fn currency(&self, id: UserId) -> String {
        format!("{}/v1/users/{id}/currency", self.host("economy"))
    }

    pub fn revenue_summary(&self, id: UserId, timeframe: RevenueTimeframe) -> String {
        format!(
            "{}/v1/users/{id}/revenue/summary/{}",
            self.host("economy"),
            timeframe.as_str()
        )
    }

    pub fn transactions(
        &self,
        id: UserId,
        kind: TransactionType,
        limit: PageSize,
        cursor: Option<&str>,
    ) -> String {
        let url = format!(
            "{}/v1/users/{id}/transactions?transactionType={}&limit={limit}",
            self.host("economy"),
            kind.as_str()
        );
        with_cursor(url, cursor)
    }
}

fn with_cursor(url: String, cursor: Option<&str>) -> String {
    match cursor {
        Some(cursor) if !cursor.is_empty() => {
            format!("{url}&cursor={}", urlencoding::encode(cursor))
        }
        _ => url,
    }
}
