use crate::{Balance, LedgerStore, ResultEngine};

use super::Engine;

impl<S: LedgerStore> Engine<S> {
    /// Current ledger totals, computed from every persisted transaction.
    ///
    /// Read-only. The result is a snapshot: nothing stops another write from
    /// landing right after it is taken.
    pub async fn balance(&self) -> ResultEngine<Balance> {
        self.store.transaction_totals().await
    }
}
