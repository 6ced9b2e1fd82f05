use std::sync::Arc;

use crate::collation::CodeOrdering;
use crate::config::Config;
use crate::source::AccountSource;
use crate::tree::TreeBuilder;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Account list provider (database or seed file)
    pub source: Arc<dyn AccountSource>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(source: Arc<dyn AccountSource>, config: Config) -> Self {
        Self {
            source,
            config: Arc::new(config),
        }
    }

    /// Sibling ordering selected in configuration
    pub fn ordering(&self) -> &'static dyn CodeOrdering {
        self.config.tree.ordering.comparator()
    }

    /// Tree builder with the configured ordering, duplicate policy and depth limit
    pub fn tree_builder(&self) -> TreeBuilder<'static> {
        TreeBuilder::new(self.ordering())
            .duplicates(self.config.tree.duplicates)
            .max_depth(self.config.tree.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collation::OrderingKind;
    use crate::entity::account::test_account;
    use crate::source::StaticAccountSource;
    use crate::tree::DuplicatePolicy;

    #[test]
    fn test_tree_builder_follows_config() {
        let mut config = Config::default();
        config.tree.ordering = OrderingKind::Segments;
        config.tree.duplicates = DuplicatePolicy::Reject;
        let state = AppState::new(Arc::new(StaticAccountSource::default()), config);

        let accounts = vec![
            test_account("a", "1.10", None),
            test_account("b", "1.2", None),
        ];
        let forest = state.tree_builder().build(&accounts).unwrap();
        assert_eq!(forest.roots()[0].account.id, "b");

        let dupes = vec![test_account("a", "1", None), test_account("a", "2", None)];
        assert!(state.tree_builder().build(&dupes).is_err());
    }
}
