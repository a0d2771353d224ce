//! Deep merge of configuration trees.

use toml::{Table, Value};

/// Merges `overrides` on top of `base`.
///
/// Keys are unioned. When both sides hold a table the two are merged
/// recursively; in every other case the override wins when present. Arrays
/// and datetimes are replaced wholesale, never merged element-wise.
pub fn merge_tables(base: &Table, overrides: &Table) -> Table {
    let mut merged = base.clone();

    for (key, override_value) in overrides {
        let value = match (merged.get(key), override_value) {
            (Some(Value::Table(base_table)), Value::Table(override_table)) => {
                Value::Table(merge_tables(base_table, override_table))
            }
            _ => override_value.clone(),
        };
        merged.insert(key.clone(), value);
    }

    merged
}
