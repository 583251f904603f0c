//! Deduplicated object graph over the Roblox web API.
//!
//! This crate provides:
//! - Canonical entities (users, groups, roles, members, messages, wall posts)
//! - Per-group role and member registries with get-or-create-and-merge semantics
//! - A root registry owned by the [`Client`], with the authenticated-user slot
//! - Lazy references that resolve payload stubs to canonical entities
//! - Single-flight de-duplication of concurrent user fetches
//!
//! # Quick Start
//!
//! ```ignore
//! use blox_core::{Client, ClientConfig, UserId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::connect(ClientConfig::from_env()).await?;
//!
//!     let user = client.get_user(UserId::new(1), true).await?;
//!     let again = client.get_user(UserId::new(1), true).await?;
//!     assert!(std::sync::Arc::ptr_eq(&user.unwrap(), &again.unwrap()));
//!     Ok(())
//! }
//! ```

pub mod audit;
pub mod client;
pub mod config;
pub mod economy;
pub mod endpoints;
pub mod error;
pub mod group;
mod groups;
pub mod id;
pub mod lazy;
pub mod member;
pub mod merge;
pub mod message;
pub mod payload;
mod profile;
pub mod registry;
pub mod role;
mod singleflight;
pub mod testing;
pub mod user;
pub mod wall;

// Primary public API
pub use audit::AuditLogAction;
pub use client::Client;
pub use config::ClientConfig;
pub use economy::RevenueSummary;
pub use endpoints::{
    AvatarSize, HeadshotSize, MessageTab, PageSize, RevenueTimeframe, ThumbnailFormat, TransactionType,
};
pub use error::{Error, Result};
pub use group::{Group, GroupProfile};
pub use id::{GroupId, MessageId, RoleId, UserId, WallPostId};
pub use lazy::Lazy;
pub use member::GroupMember;
pub use merge::{GroupPatch, Merge, RolePatch, UserPatch};
pub use message::{Message, MessagePage};
pub use payload::Page;
pub use registry::Registry;
pub use role::{GroupRole, Permissions};
pub use user::{Presence, PresenceType, Thumbnails, User, UserProfile};
pub use wall::WallPost;
