//! Entity module - SeaORM entities
//!
//! One entity per backend table

pub mod account;
