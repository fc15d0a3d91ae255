pub mod error;
pub mod gateway;
pub mod id;
pub mod money;
pub mod notify;
pub mod transaction;
