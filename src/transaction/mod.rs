//! The transactions page and the endpoints that create, change, delete,
//! export and import transactions.

mod create_endpoint;
mod csv_validation;
mod delete_endpoint;
mod edit_endpoint;
mod export_endpoint;
mod form;
mod import_endpoint;
mod query;
mod transactions_page;

pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use export_endpoint::export_transactions_endpoint;
pub use import_endpoint::import_transactions_endpoint;
pub use transactions_page::get_transactions_page;
