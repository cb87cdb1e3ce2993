//! Movement history

use shared::{MovementFilter, MovementPage, SessionContext};

use crate::error::ConsoleResult;
use crate::external::LedgerApi;

pub struct MovementService<L> {
    ledger: L,
}

impl<L: LedgerApi> MovementService<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// One page of history; page numbers start at 1
    pub async fn history(
        &self,
        session: &SessionContext,
        filter: &MovementFilter,
    ) -> ConsoleResult<MovementPage> {
        let mut filter = filter.clone();
        filter.page = filter.page.max(1);
        filter.per_page = filter.per_page.max(1);

        let page = self.ledger.query_movements(session, &filter).await?;
        tracing::debug!(
            page = page.pagination.page,
            total_items = page.pagination.total_items,
            "movement history loaded"
        );
        Ok(page)
    }
}
