//! Differ - Compare desired attributes with last known attributes
//!
//! Providers use this to decide which fields belong in an update request.

use std::collections::{BTreeSet, HashMap};

use crate::resource::Value;

/// Find changed attributes between desired and current state
///
/// An attribute present on only one side counts as changed. The result is
/// sorted so request construction and logging are deterministic.
pub fn changed_attributes(
    desired: &HashMap<String, Value>,
    current: &HashMap<String, Value>,
) -> Vec<String> {
    let keys: BTreeSet<&String> = desired.keys().chain(current.keys()).collect();

    keys.into_iter()
        // Skip internal attributes (starting with _)
        .filter(|key| !key.starts_with('_'))
        .filter(|key| desired.get(*key) != current.get(*key))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn no_change_when_same() {
        let a = attrs(&[("mfa_configuration", Value::String("off".to_string()))]);
        assert!(changed_attributes(&a, &a.clone()).is_empty());
    }

    #[test]
    fn update_when_different() {
        let desired = attrs(&[("mfa_configuration", Value::String("on".to_string()))]);
        let current = attrs(&[("mfa_configuration", Value::String("off".to_string()))]);
        assert_eq!(
            changed_attributes(&desired, &current),
            vec!["mfa_configuration".to_string()]
        );
    }

    #[test]
    fn removed_and_added_attributes_count_as_changed() {
        let desired = attrs(&[("tags", Value::Map(HashMap::new()))]);
        let current = attrs(&[("email_verification_subject", Value::String("Hi".to_string()))]);
        assert_eq!(
            changed_attributes(&desired, &current),
            vec!["email_verification_subject".to_string(), "tags".to_string()]
        );
    }

    #[test]
    fn internal_attributes_are_skipped() {
        let desired = attrs(&[("_binding", Value::String("a".to_string()))]);
        assert!(changed_attributes(&desired, &HashMap::new()).is_empty());
    }
}
