// Action Catalog Port
// Read-only view of the configured attack groups (the core never writes them)

use crate::domain::{AttackAction, AttackGroup};
use crate::error::{CoreError, Result};

/// Configuration store interface
pub trait ActionCatalog: Send + Sync {
    /// All configured groups, in authoring order
    fn groups(&self) -> &[AttackGroup];

    /// Base URI prepended to relative web action URLs
    fn default_target_uri(&self) -> Option<&str>;

    /// Find an action by id, or by case-insensitive name
    ///
    /// # Arguments
    /// * `group` - Optional group id or name to narrow the search
    /// * `key` - Action id or name
    ///
    /// # Errors
    /// - CoreError::NotFound if nothing matches
    /// - CoreError::Precondition if a name matches more than one action
    fn find_action(&self, group: Option<&str>, key: &str) -> Result<&AttackAction> {
        let groups: Vec<&AttackGroup> = self
            .groups()
            .iter()
            .filter(|g| group.map_or(true, |sel| matches_key(&g.id, &g.name, sel)))
            .collect();

        if let Some(sel) = group {
            if groups.is_empty() {
                return Err(CoreError::NotFound(format!("Group '{}' not found", sel)));
            }
        }

        // Exact id match wins over name matches
        if let Some(action) = groups
            .iter()
            .copied()
            .flat_map(|g| g.actions.iter())
            .find(|a| a.id == key)
        {
            return Ok(action);
        }

        let by_name: Vec<&AttackAction> = groups
            .iter()
            .copied()
            .flat_map(|g| g.actions.iter())
            .filter(|a| a.name.eq_ignore_ascii_case(key))
            .collect();

        match by_name.as_slice() {
            [] => Err(CoreError::NotFound(format!("Action '{}' not found", key))),
            [action] => Ok(*action),
            many => Err(CoreError::Precondition(format!(
                "Action name '{}' is ambiguous ({} matches); use the action id or --group",
                key,
                many.len()
            ))),
        }
    }
}

fn matches_key(id: &str, name: &str, key: &str) -> bool {
    id == key || name.eq_ignore_ascii_case(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionDetails, ShellAction};

    struct StaticCatalog(Vec<AttackGroup>);

    impl ActionCatalog for StaticCatalog {
        fn groups(&self) -> &[AttackGroup] {
            &self.0
        }

        fn default_target_uri(&self) -> Option<&str> {
            None
        }
    }

    fn action(id: &str, name: &str) -> AttackAction {
        AttackAction {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            details: ActionDetails::Shell(ShellAction {
                script: "id".to_string(),
            }),
        }
    }

    fn catalog() -> StaticCatalog {
        StaticCatalog(vec![
            AttackGroup {
                id: "g1".to_string(),
                name: "Recon".to_string(),
                description: None,
                actions: vec![action("a1", "Whoami"), action("a2", "Dump Env")],
            },
            AttackGroup {
                id: "g2".to_string(),
                name: "Persistence".to_string(),
                description: None,
                actions: vec![action("a3", "whoami")],
            },
        ])
    }

    #[test]
    fn test_find_by_id() {
        let c = catalog();
        assert_eq!(c.find_action(None, "a2").unwrap().name, "Dump Env");
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let c = catalog();
        assert_eq!(c.find_action(None, "dump env").unwrap().id, "a2");
    }

    #[test]
    fn test_ambiguous_name_needs_group() {
        let c = catalog();
        let err = c.find_action(None, "WHOAMI").unwrap_err();
        assert!(matches!(err, CoreError::Precondition(_)));

        let found = c.find_action(Some("persistence"), "whoami").unwrap();
        assert_eq!(found.id, "a3");
    }

    #[test]
    fn test_not_found() {
        let c = catalog();
        assert!(matches!(
            c.find_action(None, "nope"),
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            c.find_action(Some("g9"), "a1"),
            Err(CoreError::NotFound(_))
        ));
    }
}
