//! Account entity - plano de contas
//!
//! One row of the chart of accounts.
//! Tabela: contabil_plano_contas

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};

/// Account category. Informational only; the tree never looks at it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    #[sea_orm(string_value = "ativo")]
    Asset,
    #[sea_orm(string_value = "passivo")]
    Liability,
    #[sea_orm(string_value = "patrimonio")]
    Equity,
    #[sea_orm(string_value = "receita")]
    Revenue,
    #[sea_orm(string_value = "despesa")]
    Expense,
    #[sea_orm(string_value = "outro")]
    Other,
}

impl AccountKind {
    /// Stored (Portuguese) name of the kind
    pub fn stored_name(&self) -> &'static str {
        match self {
            AccountKind::Asset => "ativo",
            AccountKind::Liability => "passivo",
            AccountKind::Equity => "patrimonio",
            AccountKind::Revenue => "receita",
            AccountKind::Expense => "despesa",
            AccountKind::Other => "outro",
        }
    }

    /// JSON (English) name of the kind
    pub fn api_name(&self) -> &'static str {
        match self {
            AccountKind::Asset => "asset",
            AccountKind::Liability => "liability",
            AccountKind::Equity => "equity",
            AccountKind::Revenue => "revenue",
            AccountKind::Expense => "expense",
            AccountKind::Other => "other",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// Accepts both the API and the stored spelling, ignoring case
impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        AccountKind::iter()
            .find(|kind| kind.api_name() == wanted || kind.stored_name() == wanted)
            .ok_or_else(|| format!("unknown account kind: {}", s))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contabil_plano_contas")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Opaque identifier assigned by the backend
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Dotted hierarchical code, e.g. "1.1.01.001"
    #[sea_orm(column_type = "String(Some(32))", unique)]
    pub code: String,

    #[sea_orm(column_type = "String(Some(128))")]
    pub name: String,

    pub kind: AccountKind,

    /// Parent account id (None = root)
    #[sea_orm(nullable)]
    #[serde(default)]
    pub parent_id: Option<String>,

    /// Analytic account: can receive postings directly
    #[sea_orm(column_name = "analitica")]
    #[serde(default)]
    pub is_leaf: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

// The self reference through parent_id is resolved in memory by crate::tree

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
pub(crate) fn test_account(id: &str, code: &str, parent_id: Option<&str>) -> Model {
    Model {
        id: id.to_string(),
        code: code.to_string(),
        name: format!("Conta {}", code),
        kind: AccountKind::Asset,
        parent_id: parent_id.map(|p| p.to_string()),
        is_leaf: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("asset".parse::<AccountKind>(), Ok(AccountKind::Asset));
        assert_eq!("Despesa".parse::<AccountKind>(), Ok(AccountKind::Expense));
        assert_eq!(" patrimonio ".parse::<AccountKind>(), Ok(AccountKind::Equity));
        assert!("bogus".parse::<AccountKind>().is_err());
    }

    #[test]
    fn test_kind_from_str_every_kind() {
        for kind in AccountKind::iter() {
            assert_eq!(kind.api_name().parse::<AccountKind>(), Ok(kind));
            assert_eq!(kind.stored_name().to_uppercase().parse::<AccountKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_model_json_shape() {
        let json = r#"{"id":"7","code":"1.1","name":"Caixa","kind":"asset","parentId":"1","isLeaf":true}"#;
        let model: Model = serde_json::from_str(json).unwrap();
        assert_eq!(model.parent_id.as_deref(), Some("1"));
        assert!(model.is_leaf);

        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["parentId"], "1");
        assert_eq!(value["kind"], "asset");
    }

    #[test]
    fn test_model_json_defaults() {
        let json = r#"{"id":"1","code":"1","name":"Ativo","kind":"ativo"}"#;
        // stored spelling is not accepted by serde, only by FromStr
        assert!(serde_json::from_str::<Model>(json).is_err());

        let json = r#"{"id":"1","code":"1","name":"Ativo","kind":"asset"}"#;
        let model: Model = serde_json::from_str(json).unwrap();
        assert_eq!(model.parent_id, None);
        assert!(!model.is_leaf);
    }
}
