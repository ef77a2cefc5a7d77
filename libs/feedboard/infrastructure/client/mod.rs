//! External API clients

pub mod blockchain;
