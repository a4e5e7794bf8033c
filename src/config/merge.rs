//! Deep merge functionality for configuration layers.
//!
//! Implements field-by-field merging where higher layer values override lower layer values.
//! Arrays are replaced entirely, not concatenated.

use super::definition::Definition;
use super::repository::Repository;
use crate::error::Result;
use serde_json::Value;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays, strings, numbers, booleans, nulls are replaced entirely
/// - If overlay is null, the base value is preserved (null means "not specified")
/// - Key order follows `base`; keys only in `overlay` are appended
///
/// # Example
/// ```
/// use serde_json::json;
/// use site_config::config::deep_merge;
///
/// let base = json!({
///     "server": { "port": 8080, "host": "localhost" },
///     "features": ["a", "b"]
/// });
/// let overlay = json!({
///     "server": { "port": 9000 },
///     "features": ["c"]
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(result, json!({
///     "server": { "port": 9000, "host": "localhost" },
///     "features": ["c"]
/// }));
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        // Both are objects: merge recursively
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => {
                        let taken = base_value.take();
                        *base_value = deep_merge(taken, overlay_value);
                    }
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
            Value::Object(base_map)
        }
        // Overlay is null: preserve base (null means "not specified")
        (base, Value::Null) => base,
        // Any other case: overlay replaces base entirely
        (_, overlay) => overlay,
    }
}

/// Merge multiple values in order, with later values taking precedence.
///
/// Equivalent to folding `deep_merge` over the list.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

/// Combine the three layers: environment over local over global.
///
/// Same result as `environment.union(&local.union(global))`.
pub fn merge_layers(
    environment: &Repository,
    local: &Repository,
    global: &Repository,
) -> Repository {
    let merged = deep_merge_all([
        global.to_value(),
        local.to_value(),
        environment.to_value(),
    ]);
    Repository::from_merged(merged)
}

/// Validate the keys of `repository` that also exist in `global`.
///
/// Keys introduced only by the local or environment layers are never
/// checked.
pub fn check_definitions(
    repository: &Repository,
    global: &Repository,
    definition: &dyn Definition,
) -> Result<()> {
    repository
        .intersection(global)
        .validate_with(definition)
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::definition::{Schema, Shape};
    use crate::error::ConfigError;
    use serde_json::json;

    fn repo(value: Value) -> Repository {
        Repository::from_value(value).unwrap()
    }

    #[test]
    fn test_merge_simple_objects() {
        let base = json!({"a": 1, "b": 2});
        let overlay = json!({"b": 3, "c": 4});
        let result = deep_merge(base, overlay);
        assert_eq!(result, json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn test_merge_nested_objects() {
        let base = json!({
            "server": {"host": "localhost", "port": 8080},
            "debug": true
        });
        let overlay = json!({
            "server": {"port": 9000}
        });
        let result = deep_merge(base, overlay);
        assert_eq!(
            result,
            json!({
                "server": {"host": "localhost", "port": 9000},
                "debug": true
            })
        );
    }

    #[test]
    fn test_arrays_replaced_not_merged() {
        let base = json!({"include": [".htaccess", "robots.txt"]});
        let overlay = json!({"include": ["humans.txt"]});
        let result = deep_merge(base, overlay);
        assert_eq!(result, json!({"include": ["humans.txt"]}));
    }

    #[test]
    fn test_null_preserves_base() {
        let base = json!({"a": 1, "b": {"c": 2}});
        let overlay = json!({"a": null, "b": {"c": null}});
        let result = deep_merge(base, overlay);
        assert_eq!(result, json!({"a": 1, "b": {"c": 2}}));
    }

    #[test]
    fn test_merge_keeps_base_key_order() {
        let base = json!({"z": 1, "a": 2, "m": 3});
        let overlay = json!({"new": 0, "a": 20});
        let result = deep_merge(base, overlay);
        let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m", "new"]);
    }

    #[test]
    fn test_merge_all() {
        let values = vec![json!({"a": 1}), json!({"b": 2}), json!({"a": 3, "c": 4})];
        let result = deep_merge_all(values);
        assert_eq!(result, json!({"a": 3, "b": 2, "c": 4}));
    }

    #[test]
    fn test_overlay_replaces_primitive_with_object() {
        let base = json!({"value": 42});
        let overlay = json!({"value": {"nested": true}});
        let result = deep_merge(base, overlay);
        assert_eq!(result, json!({"value": {"nested": true}}));
    }

    #[test]
    fn test_merge_layers_precedence() {
        let global = repo(json!({"theme": "a", "port": 80, "host": "0.0.0.0"}));
        let local = repo(json!({"port": 8080, "title": "Site"}));
        let env = repo(json!({"port": 9090}));

        let merged = merge_layers(&env, &local, &global);
        assert_eq!(
            merged.to_value(),
            json!({"theme": "a", "port": 9090, "host": "0.0.0.0", "title": "Site"})
        );
    }

    #[test]
    fn test_merge_layers_matches_union_chain() {
        let global = repo(json!({"k": "g", "only_g": 1, "nested": {"a": 1, "b": 1}}));
        let local = repo(json!({"k": "l", "only_l": 2, "nested": {"b": 2}}));
        let env = repo(json!({"only_e": 3, "nested": {"c": 3}}));

        let chained = env.union(&local.union(&global));
        let merged = merge_layers(&env, &local, &global);
        assert_eq!(chained.to_value(), merged.to_value());
        assert_eq!(merged.get("k"), Some(&json!("l")));
        assert_eq!(merged.get("nested"), Some(&json!({"a": 1, "b": 2, "c": 3})));
    }

    #[test]
    fn test_merge_layers_with_blank_environment() {
        let global = repo(json!({"port": 80}));
        let local = repo(json!({"title": "Site"}));
        let merged = merge_layers(&Repository::new(), &local, &global);
        assert_eq!(merged.to_value(), local.union(&global).to_value());
    }

    #[test]
    fn test_check_definitions_ignores_user_keys() {
        let schema = Schema::new().option("port", Shape::Integer);
        let global = repo(json!({"port": 80}));
        // "custom" is not in global, so its shape is never checked even if
        // the schema knows it.
        let schema = schema.option("custom", Shape::Boolean);
        let merged = repo(json!({"port": 8080, "custom": "anything"}));
        assert!(check_definitions(&merged, &global, &schema).is_ok());
    }

    #[test]
    fn test_check_definitions_rejects_bad_shared_key() {
        let schema = Schema::new().option("port", Shape::Integer);
        let global = repo(json!({"port": 80}));
        let merged = repo(json!({"port": "eighty"}));

        let err = check_definitions(&merged, &global, &schema).unwrap_err();
        match err {
            ConfigError::Validation(v) => assert_eq!(v.keys(), vec!["port"]),
            other => panic!("unexpected error: {other}"),
        }
    }
}
