//! Chart of accounts handlers
//!
//! Read-only views over the account list: flat, tree, indented rows,
//! posting targets and an integrity report.

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::entity::account::{self, AccountKind};
use crate::error::{AppError, AppResult, OptionExt};
use crate::filter::{self, AccountFilter, PostingOption};
use crate::render::{self, TreeRow};
use crate::routes::ApiResponse;
use crate::state::AppState;
use crate::tree::{self, IntegrityReport};

/// Query parameters shared by the list views
#[derive(Debug, Default, Deserialize)]
pub struct AccountQuery {
    pub search: Option<String>,
    pub kind: Option<String>,
    #[serde(rename = "leafOnly", default)]
    pub leaf_only: bool,
}

impl AccountQuery {
    fn to_filter(&self) -> AppResult<AccountFilter> {
        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<AccountKind>().map_err(AppError::Validation)?),
        };
        Ok(AccountFilter {
            search: self.search.clone(),
            kind,
            leaf_only: self.leaf_only,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: String,
}

/// GET /api/contas/query
pub async fn query_accounts(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> AppResult<Json<ApiResponse<Vec<account::Model>>>> {
    let filter = query.to_filter()?;
    let accounts = state.source.list_accounts().await?;
    let kept: Vec<account::Model> = filter.apply(&accounts).into_iter().cloned().collect();
    tracing::debug!("Account query matched {} of {}", kept.len(), accounts.len());
    Ok(Json(ApiResponse::success(kept)))
}

/// GET /api/contas/tree
pub async fn get_tree(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let filter = query.to_filter()?;
    let accounts = state.source.list_accounts().await?;
    let forest = state.tree_builder().build(filter.apply(&accounts))?;
    Ok(Json(ApiResponse::success(serde_json::to_value(&forest)?)))
}

/// GET /api/contas/rows
pub async fn get_rows(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> AppResult<Json<ApiResponse<Vec<TreeRow>>>> {
    let filter = query.to_filter()?;
    let accounts = state.source.list_accounts().await?;
    let forest = state.tree_builder().build(filter.apply(&accounts))?;
    Ok(Json(ApiResponse::success(render::rows(
        &forest,
        state.config.tree.indent_width,
    ))))
}

/// GET /api/contas/subtree?id=
pub async fn get_subtree(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let accounts = state.source.list_accounts().await?;
    let forest = state.tree_builder().build(&accounts)?;
    let node = forest
        .find(&query.id)
        .ok_or_not_found(format!("Account {} not found", query.id))?;
    Ok(Json(ApiResponse::success(serde_json::to_value(node)?)))
}

/// GET /api/contas/options
pub async fn get_posting_options(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<PostingOption>>>> {
    let accounts = state.source.list_accounts().await?;
    Ok(Json(ApiResponse::success(filter::posting_targets(
        &accounts,
        state.ordering(),
    ))))
}

/// GET /api/contas/verify
pub async fn verify_accounts(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<IntegrityReport>>> {
    let accounts = state.source.list_accounts().await?;
    let report = tree::verify(&accounts);
    if !report.is_clean() {
        tracing::warn!(
            "Chart of accounts has {} duplicate ids, {} dangling parents, {} cycles",
            report.duplicate_ids.len(),
            report.dangling_parents.len(),
            report.cycles.len()
        );
    }
    Ok(Json(ApiResponse::success(report)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_to_filter() {
        let query = AccountQuery {
            search: Some("caixa".to_string()),
            kind: Some("receita".to_string()),
            leaf_only: true,
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.kind, Some(AccountKind::Revenue));
        assert!(filter.leaf_only);

        let blank = AccountQuery {
            kind: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.to_filter().unwrap().kind, None);
    }

    #[test]
    fn test_query_unknown_kind() {
        let query = AccountQuery {
            kind: Some("crypto".to_string()),
            ..Default::default()
        };
        assert!(matches!(query.to_filter(), Err(AppError::Validation(_))));
    }
}
