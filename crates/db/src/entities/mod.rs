pub mod account;
pub mod contact;
pub mod task;
pub mod ticket;
