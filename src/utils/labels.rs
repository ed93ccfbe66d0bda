//! `key=value` parsing for labels and driver options

use crate::utils::errors::SecretError;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Parse a single `key=value` or bare `key` entry
pub fn parse_key_value(entry: &str) -> Result<(String, String), SecretError> {
    let (key, value) = entry.split_once('=').unwrap_or((entry, ""));
    let key = key.trim();
    if key.is_empty() {
        return Err(SecretError::InvalidKeyValue(entry.to_string()));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Collect entries into a map; later entries overwrite earlier ones
pub fn parse_key_values<S: AsRef<str>>(entries: &[S]) -> Result<BTreeMap<String, String>, SecretError> {
    let mut map = BTreeMap::new();
    for entry in entries {
        let (key, value) = parse_key_value(entry.as_ref())?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Read `key=value` lines from label files, skipping blanks and `#` comments
pub fn read_label_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read label file: {}", path.display()))?;

    let mut map = BTreeMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = parse_key_value(line)
            .with_context(|| format!("Invalid line in label file: {}", path.display()))?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Merge label files and command-line labels; command-line entries win
pub fn get_all_labels<S: AsRef<str>, P: AsRef<Path>>(
    label_files: &[P],
    inputs: &[S],
) -> Result<BTreeMap<String, String>> {
    let mut labels = BTreeMap::new();
    for file in label_files {
        labels.extend(read_label_file(file.as_ref())?);
    }
    labels.extend(parse_key_values(inputs)?);
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_key_value_forms() {
        assert_eq!(
            parse_key_value("env=prod").unwrap(),
            ("env".to_string(), "prod".to_string())
        );
        assert_eq!(
            parse_key_value("flag").unwrap(),
            ("flag".to_string(), String::new())
        );
        assert_eq!(
            parse_key_value("url=a=b").unwrap(),
            ("url".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(parse_key_value("=value").is_err());
        assert!(parse_key_value("").is_err());
    }

    #[test]
    fn test_last_occurrence_wins() {
        let map = parse_key_values(&["a=1", "b=2", "a=3"]).unwrap();
        assert_eq!(map.get("a").map(String::as_str), Some("3"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_label_file_then_flags() {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        writeln!(temp, "# team labels").unwrap();
        writeln!(temp, "team=infra").unwrap();
        writeln!(temp).unwrap();
        writeln!(temp, "env=dev").unwrap();

        let labels = get_all_labels(&[temp.path()], &["env=prod"]).unwrap();
        assert_eq!(labels.get("team").map(String::as_str), Some("infra"));
        assert_eq!(labels.get("env").map(String::as_str), Some("prod"));
    }

    #[test]
    fn test_missing_label_file() {
        let missing = PathBuf::from("/nonexistent/labels.env");
        let err = get_all_labels::<&str, _>(&[missing], &[]).unwrap_err();
        assert!(err.to_string().contains("Failed to read label file"));
    }
}
