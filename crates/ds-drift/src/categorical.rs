//! New-value detection for categorical columns.

use std::collections::HashSet;

use ds_core::Value;
use serde::Serialize;

/// Drift fact for a categorical column.
///
/// `new_values` is `None` when the new snapshot introduced no values; the
/// report record then carries no `new_values` field at all, which downstream
/// merging treats differently from an empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewCategories {
    /// Distinct values present in the new snapshot but not the original.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_values: Option<Vec<Value>>,
}

/// Compute the distinct values present in `new` but absent from `original`.
///
/// Missing cells are not categories and are ignored on both sides. The
/// result is a set; the returned order (first appearance in `new`) carries
/// no meaning.
pub fn detect_new_categories(original: &[Value], new: &[Value]) -> NewCategories {
    let known: HashSet<&Value> = original.iter().filter(|v| !v.is_null()).collect();

    let mut emitted: HashSet<&Value> = HashSet::new();
    let mut values = Vec::new();
    for value in new.iter().filter(|v| !v.is_null()) {
        if !known.contains(value) && emitted.insert(value) {
            values.push(value.clone());
        }
    }

    NewCategories { new_values: if values.is_empty() { None } else { Some(values) } }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet as Set;

    fn strs(values: &[&str]) -> Vec<Value> {
        values.iter().map(|&v| Value::Str(v.to_string())).collect()
    }

    #[test]
    fn subset_yields_no_field() {
        let r = detect_new_categories(&strs(&["a", "b", "c"]), &strs(&["b", "a"]));
        assert_eq!(r.new_values, None);
    }

    #[test]
    fn difference_is_exact() {
        let r = detect_new_categories(&strs(&["a", "b"]), &strs(&["a", "c", "d", "c"]));
        let got: Set<Value> = r.new_values.unwrap().into_iter().collect();
        let want: Set<Value> = strs(&["c", "d"]).into_iter().collect();
        assert_eq!(got, want);
    }

    #[test]
    fn empty_original_makes_everything_new() {
        let r = detect_new_categories(&[], &strs(&["a"]));
        assert_eq!(r.new_values, Some(strs(&["a"])));
    }

    #[test]
    fn missing_cells_are_not_categories() {
        let original = strs(&["a"]);
        let new = vec![Value::Null, Value::Str("a".to_string()), Value::Null];
        let r = detect_new_categories(&original, &new);
        assert_eq!(r.new_values, None);
    }

    #[test]
    fn numeric_categories_compare_by_value_bits() {
        let original = vec![Value::Int(1), Value::Float(2.5)];
        let new = vec![Value::Int(1), Value::Float(2.5), Value::Int(3)];
        let r = detect_new_categories(&original, &new);
        assert_eq!(r.new_values, Some(vec![Value::Int(3)]));
    }
}
