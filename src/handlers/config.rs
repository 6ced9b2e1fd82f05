//! Configuration handlers
//!
//! Returns public display settings to the frontend

use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::collation::OrderingKind;
use crate::format::NumberLocale;
use crate::state::AppState;
use crate::tree::DuplicatePolicy;

/// Public configuration response
#[derive(Debug, Serialize)]
pub struct PublicConfig {
    pub ordering: OrderingKind,
    pub duplicates: DuplicatePolicy,
    #[serde(rename = "indentWidth")]
    pub indent_width: usize,
    #[serde(rename = "currencySymbol")]
    pub currency_symbol: String,
    #[serde(rename = "decimalSeparator")]
    pub decimal_separator: char,
    #[serde(rename = "groupSeparator")]
    pub group_separator: char,
}

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Json<PublicConfig> {
    let locale = NumberLocale::default();
    Json(PublicConfig {
        ordering: state.config.tree.ordering,
        duplicates: state.config.tree.duplicates,
        indent_width: state.config.tree.indent_width,
        currency_symbol: locale.currency_symbol,
        decimal_separator: locale.decimal_separator,
        group_separator: locale.group_separator,
    })
}
