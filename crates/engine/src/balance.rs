use serde::{Deserialize, Serialize};

use crate::Money;

/// Ledger totals partitioned by transaction kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub income: Money,
    pub outcome: Money,
    /// `income - outcome`; negative once imports have overdrawn the ledger.
    pub total: Money,
}

impl Balance {
    pub fn new(income: Money, outcome: Money) -> Self {
        Self {
            income,
            outcome,
            total: income - outcome,
        }
    }
}
