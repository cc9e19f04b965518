//! The transaction store: spending records and their CRUD endpoints.
//!
//! Every mutation here also applies a compensating update to the owning
//! month's budget via [crate::budget].

pub(crate) mod core;
mod create_endpoint;
mod delete_endpoint;
pub(crate) mod form;
mod list_endpoint;
mod update_endpoint;

pub use self::core::{
    NewTransaction, Transaction, TransactionUpdate, create_transaction, delete_transaction,
    get_transaction, list_transactions, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use form::AmountField;
pub use list_endpoint::list_transactions_endpoint;
pub use update_endpoint::update_transaction_endpoint;
