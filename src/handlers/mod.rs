//! Request handlers module

pub mod account;
pub mod config;
