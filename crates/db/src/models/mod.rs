pub mod account;
pub mod contact;
pub mod dashboard;
pub mod task;
pub mod ticket;
