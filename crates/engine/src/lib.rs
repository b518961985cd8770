//! Ledger core: transactions grouped into categories, a net balance, and bulk
//! import from delimited files.
//!
//! Every operation lives on [`Engine`], which talks to storage only through
//! the [`LedgerStore`] it was built with.

pub use balance::Balance;
pub use categories::Category;
pub use delimited::{RawRow, RowReader, read_rows};
pub use error::EngineError;
pub use money::Money;
pub use ops::{CreateTransactionCmd, Engine, EngineBuilder};
pub use store::{LedgerStore, MemoryStore, SeaOrmStore};
pub use transactions::{NewTransaction, Transaction, TransactionKind};

mod balance;
mod categories;
pub mod delimited;
mod error;
mod money;
mod ops;
pub mod store;
mod transactions;

pub type ResultEngine<T> = Result<T, EngineError>;
