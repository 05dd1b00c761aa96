//! Loading of ingestion documents and preference files.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value as Json};
use tracing::debug;

use crate::error::{describe, Error, Result};

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses an ingestion document: a top-level JSON array of objects. Key order
/// inside each object is preserved.
///
/// # Errors
///
/// Returns [`Error::Parse`] if `source` is not JSON or not an array.
pub fn parse_document(source: &str) -> Result<Vec<Json>> {
    match serde_json::from_str(source).map_err(|e| Error::Parse(e.to_string()))? {
        Json::Array(objects) => Ok(objects),
        other => Err(Error::Parse(format!(
            "expected a top-level array, found {}",
            describe(&other)
        ))),
    }
}

/// Reads and parses an ingestion document.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Parse`] if
/// it is malformed.
pub fn read_document(path: &Path) -> Result<Vec<Json>> {
    let objects = parse_document(&read(path)?)?;
    debug!(path = %path.display(), objects = objects.len(), "read ingestion document");
    Ok(objects)
}

/// Deep-merges `overlay` into `base`: maps merge key by key, recursively;
/// any other overlay value replaces the base value.
pub fn merge(base: &mut Json, overlay: Json) {
    match overlay {
        Json::Object(overlay) => {
            if !base.is_object() {
                *base = Json::Object(Map::new());
            }
            if let Json::Object(base) = base {
                for (key, value) in overlay {
                    merge(base.entry(key).or_insert(Json::Null), value);
                }
            }
        }
        other => *base = other,
    }
}

/// Reads YAML preferences, then deep-merges each override file onto them in
/// order.
///
/// # Errors
///
/// Returns [`Error::Io`] if a file cannot be read and
/// [`Error::Preferences`] if one is not valid YAML.
pub fn read_preferences(base: &Path, overrides: &[PathBuf]) -> Result<Json> {
    let parse = |path: &Path| -> Result<Json> {
        serde_yaml::from_str(&read(path)?)
            .map_err(|e| Error::Preferences(format!("{}: {e}", path.display())))
    };
    let mut preferences = parse(base)?;
    for path in overrides {
        merge(&mut preferences, parse(path)?);
        debug!(path = %path.display(), "applied preference override");
    }
    Ok(preferences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_must_be_an_array() {
        assert_eq!(parse_document("[]").expect("empty array").len(), 0);
        assert!(matches!(parse_document("{}"), Err(Error::Parse(_))));
        assert!(matches!(parse_document("[{"), Err(Error::Parse(_))));
    }

    #[test]
    fn document_keys_keep_their_order() {
        let objects = parse_document(r#"[{"$type": "Skill", "zeta": 1, "$id": "s", "alpha": 2}]"#)
            .expect("valid");
        let keys: Vec<&str> = objects[0]
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["$type", "zeta", "$id", "alpha"]);
    }

    #[test]
    fn merge_is_recursive_for_maps_only() {
        let mut base = json!({
            "name": "Ada",
            "order_overrides": { "Skill": "chron_A", "Degree": "chron_D" },
            "tags": ["a", "b"],
            "scalar": 1
        });
        merge(
            &mut base,
            json!({
                "order_overrides": { "Skill": "alphabetical_A" },
                "tags": ["c"],
                "scalar": { "now": "a map" },
                "new": true
            }),
        );
        assert_eq!(
            base,
            json!({
                "name": "Ada",
                "order_overrides": { "Skill": "alphabetical_A", "Degree": "chron_D" },
                "tags": ["c"],
                "scalar": { "now": "a map" },
                "new": true
            })
        );
    }

    #[test]
    fn preferences_merge_override_files_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let base = dir.path().join("prefs.yaml");
        let first = dir.path().join("first.yaml");
        let second = dir.path().join("second.yaml");
        std::fs::write(&base, "name: Ada\nemail: ada@example.org\n").expect("write");
        std::fs::write(&first, "email: first@example.org\n").expect("write");
        std::fs::write(&second, "email: second@example.org\n").expect("write");

        let prefs = read_preferences(&base, &[first, second]).expect("valid preferences");
        assert_eq!(prefs, json!({ "name": "Ada", "email": "second@example.org" }));
    }

    #[test]
    fn unreadable_and_malformed_files_are_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing.json");
        assert!(matches!(read_document(&missing), Err(Error::Io { .. })));

        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "name: [unclosed\n").expect("write");
        assert!(matches!(read_preferences(&bad, &[]), Err(Error::Preferences(_))));
    }
}
