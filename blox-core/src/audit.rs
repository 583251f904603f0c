//! Group audit log.

use crate::client::Client;
use crate::endpoints::PageSize;
use crate::error::Result;
use crate::group::Group;
use crate::member::GroupMember;
use crate::merge::UserPatch;
use crate::payload::{AuditLogRecord, Page};
use chrono::{DateTime, Utc};
use roblox_http::Request;
use serde_json::Value;
use std::sync::Arc;

/// One audit-log entry. The actor is wired into the registries on arrival.
#[derive(Debug, Clone)]
pub struct AuditLogAction {
    pub group: Arc<Group>,
    pub actor: Arc<GroupMember>,
    pub action_type: String,
    /// Action-specific detail, kept as the API sent it.
    pub description: Value,
    pub created: DateTime<Utc>,
}

impl Client {
    /// One page of `group`'s audit log, newest first.
    ///
    /// Needs a logged-in user with audit-log access; the API refuses
    /// otherwise and the refusal surfaces as an upstream error.
    pub async fn audit_log(
        &self,
        group: &Arc<Group>,
        limit: PageSize,
        cursor: Option<&str>,
    ) -> Result<Page<AuditLogAction>> {
        let url = self.endpoints().audit_log(group.id(), limit, cursor);
        let page: Page<AuditLogRecord> = self.fetch(Request::get(url), "audit log").await?;
        page.try_map(|record| {
            let actor = &record.actor;
            let user = self
                .registry()
                .observe_user(actor.user.user_id, UserPatch::from(&actor.user));
            let role = group.get_or_create_role(&actor.role);
            let member = group.get_or_create_member(&user, &role)?;
            Ok(AuditLogAction {
                group: Arc::clone(group),
                actor: member,
                action_type: record.action_type,
                description: record.description,
                created: record.created,
            })
        })
    }
}
