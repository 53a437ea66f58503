//! Flattening of nested report mappings.

use serde_json::Map;

/// Flatten a nested mapping into a single level, joining nested keys with
/// `_` (e.g. `chi_squared.pvalue` becomes `chi_squared_pvalue`).
pub fn flatten_fields(data: &Map<String, serde_json::Value>) -> Map<String, serde_json::Value> {
    let mut out = Map::new();
    flatten_into(&mut out, data, "");
    out
}

fn flatten_into(
    out: &mut Map<String, serde_json::Value>,
    data: &Map<String, serde_json::Value>,
    parent: &str,
) {
    for (key, value) in data {
        let flat_key =
            if parent.is_empty() { key.clone() } else { format!("{parent}_{key}") };
        match value {
            serde_json::Value::Object(nested) => flatten_into(out, nested, &flat_key),
            other => {
                out.insert(flat_key, other.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joins_nested_keys_with_underscore() {
        let data = json!({
            "n": 3,
            "chi_squared": {"statistic": 1.5, "pvalue": 0.2},
            "gap_stats": {"n_gaps": 0},
        });
        let flat = flatten_fields(data.as_object().unwrap());
        assert_eq!(flat.get("n"), Some(&json!(3)));
        assert_eq!(flat.get("chi_squared_statistic"), Some(&json!(1.5)));
        assert_eq!(flat.get("chi_squared_pvalue"), Some(&json!(0.2)));
        assert_eq!(flat.get("gap_stats_n_gaps"), Some(&json!(0)));
        assert!(flat.get("chi_squared").is_none());
    }

    #[test]
    fn flat_input_is_unchanged() {
        let data = json!({"a": 1, "b": "x"});
        let flat = flatten_fields(data.as_object().unwrap());
        assert_eq!(serde_json::Value::Object(flat), data);
    }

    #[test]
    fn deep_nesting_flattens_recursively() {
        let data = json!({"a": {"b": {"c": 7}}});
        let flat = flatten_fields(data.as_object().unwrap());
        assert_eq!(flat.get("a_b_c"), Some(&json!(7)));
    }
}
