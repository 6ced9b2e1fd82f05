//! Plano de Contas - chart of accounts service
//!
//! Builds ordered account trees from the flat list stored by the backend,
//! projects them into indented rows for the dashboard, and provides the
//! pt-BR display formatters used around them.

pub mod collation;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod filter;
pub mod format;
pub mod handlers;
pub mod render;
pub mod routes;
pub mod source;
pub mod state;
pub mod tree;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use tree::{organize, AccountNode, DuplicatePolicy, Forest, TreeBuilder};
