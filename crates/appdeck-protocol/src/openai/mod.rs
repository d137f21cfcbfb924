pub mod chat;
pub mod responses;
pub mod types;
