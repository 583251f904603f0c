//! Economy endpoints for the authenticated user.

use crate::client::Client;
use crate::endpoints::{PageSize, RevenueTimeframe, TransactionType};
use crate::error::Result;
use crate::payload::{CurrencyRecord, Page, RevenueSummaryRecord, TransactionRecord};
use roblox_http::Request;
use tracing::debug;

/// Robux earned and spent over a timeframe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevenueSummary {
    pub stipend: i64,
    pub sales: i64,
    pub purchased: i64,
    pub trades: i64,
    pub pending: i64,
    pub payouts: i64,
}

impl From<RevenueSummaryRecord> for RevenueSummary {
    fn from(record: RevenueSummaryRecord) -> Self {
        Self {
            stipend: record.recurring_robux_stipend,
            sales: record.item_sale_robux,
            purchased: record.purchased_robux,
            trades: record.trade_system_robux,
            pending: record.pending_robux,
            payouts: record.group_payout_robux,
        }
    }
}

impl Client {
    /// The current user's Robux balance, also stored on the user.
    pub async fn robux(&self) -> Result<i64> {
        let user = self.require_current_user()?;
        let record: CurrencyRecord = self
            .fetch(Request::get(self.endpoints().currency(user.id())), "currency")
            .await?;
        user.set_robux(record.robux);
        debug!(user_id = %user.id(), robux = record.robux, "Loaded balance");
        Ok(record.robux)
    }

    pub async fn revenue_summary(&self, timeframe: RevenueTimeframe) -> Result<RevenueSummary> {
        let user = self.require_current_user()?;
        let url = self.endpoints().revenue_summary(user.id(), timeframe);
        let record: RevenueSummaryRecord = self.fetch(Request::get(url), "revenue summary").await?;
        Ok(record.into())
    }

    pub async fn transaction_history(
        &self,
        kind: TransactionType,
        limit: PageSize,
        cursor: Option<&str>,
    ) -> Result<Page<TransactionRecord>> {
        let user = self.require_current_user()?;
        let url = self.endpoints().transactions(user.id(), kind, limit, cursor);
        self.fetch(Request::get(url), "transaction history").await
    }
}
