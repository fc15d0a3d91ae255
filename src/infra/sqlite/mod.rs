pub mod transaction_store;
