//! `--config KEY=VALUE` parsing.

use miette::{Result, miette};
use nbruff_core::merge_tables;
use toml::Table;

/// Parses every override as a TOML document and merges them in order.
///
/// `line-length=100` and `lint.select = ["I"]` are both accepted; later
/// overrides win over earlier ones.
pub fn parse_overrides(overrides: &[String]) -> Result<Table> {
    overrides.iter().try_fold(Table::new(), |merged, item| {
        let table: Table = toml::from_str(item)
            .map_err(|e| miette!("Invalid --config value {:?}: {}", item, e.message()))?;
        Ok(merge_tables(&merged, &table))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dotted_keys_nest() {
        let overrides = parse_overrides(&[
            "line-length=100".to_string(),
            "lint.select = [\"I\"]".to_string(),
            "lint.isort.force-single-line = true".to_string(),
        ])
        .unwrap();

        let expected: Table = toml::from_str(
            "line-length = 100\n[lint]\nselect = [\"I\"]\n[lint.isort]\nforce-single-line = true",
        )
        .unwrap();
        assert_eq!(overrides, expected);
    }

    #[test]
    fn test_later_override_wins() {
        let overrides =
            parse_overrides(&["indent-width = 2".to_string(), "indent-width = 8".to_string()])
                .unwrap();

        assert_eq!(overrides.get("indent-width"), Some(&toml::Value::Integer(8)));
    }

    #[test]
    fn test_invalid_override() {
        assert!(parse_overrides(&["line-length".to_string()]).is_err());
    }

    #[test]
    fn test_no_overrides() {
        assert!(parse_overrides(&[]).unwrap().is_empty());
    }
}
