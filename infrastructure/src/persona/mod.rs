//! Persona and pair-batch files
//!
//! A persona file is one JSON object with `id` (or legacy `name_id`),
//! `needs` and `personality`. A pairs file is a JSON array of
//! `{"persona_1": ..., "persona_2": ...}` where each side is either a path
//! to a persona file or an inline persona object. Relative paths resolve
//! against the pairs file's directory.

use matchmaker_application::RunMatchInput;
use matchmaker_domain::Persona;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading personas or pairs
#[derive(Error, Debug)]
pub enum PersonaLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid persona file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Pair {index} in {path}: {message}")]
    Pair {
        path: PathBuf,
        index: usize,
        message: String,
    },

    #[error("Pairs file {0} lists no pairs")]
    EmptyPairs(PathBuf),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PersonaRef {
    Path(PathBuf),
    Inline(Persona),
}

#[derive(Debug, Deserialize)]
struct RawPair {
    persona_1: PersonaRef,
    persona_2: PersonaRef,
}

fn read(path: &Path) -> Result<String, PersonaLoadError> {
    std::fs::read_to_string(path).map_err(|source| PersonaLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate one persona file
pub fn load_persona(path: impl AsRef<Path>) -> Result<Persona, PersonaLoadError> {
    let path = path.as_ref();
    serde_json::from_str(&read(path)?).map_err(|source| PersonaLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every pair listed in a pairs file, in file order
pub fn load_pairs(path: impl AsRef<Path>) -> Result<Vec<RunMatchInput>, PersonaLoadError> {
    let path = path.as_ref();
    let raw: Vec<RawPair> =
        serde_json::from_str(&read(path)?).map_err(|source| PersonaLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if raw.is_empty() {
        return Err(PersonaLoadError::EmptyPairs(path.to_path_buf()));
    }

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    raw.into_iter()
        .enumerate()
        .map(|(index, pair)| {
            let resolve = |side: PersonaRef| match side {
                PersonaRef::Inline(persona) => Ok(persona),
                PersonaRef::Path(p) => {
                    load_persona(base.join(p)).map_err(|e| PersonaLoadError::Pair {
                        path: path.to_path_buf(),
                        index,
                        message: e.to_string(),
                    })
                }
            };
            Ok(RunMatchInput::new(
                resolve(pair.persona_1)?,
                resolve(pair.persona_2)?,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_persona_accepts_name_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "wale.json",
            r#"{"name_id": "wale", "needs": "a co-founder", "personality": "calm", "age": 31}"#,
        );
        let persona = load_persona(&path).unwrap();
        assert_eq!(persona.id(), "wale");
        assert_eq!(persona.needs(), "a co-founder");
    }

    #[test]
    fn test_load_persona_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "bad.json", r#"{"id": "x", "needs": "y"}"#);
        let err = load_persona(&path).unwrap_err();
        assert!(matches!(err, PersonaLoadError::Parse { .. }));
        assert!(err.to_string().contains("personality"));
    }

    #[test]
    fn test_load_persona_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_persona(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PersonaLoadError::Io { .. }));
    }

    #[test]
    fn test_load_pairs_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("people")).unwrap();
        write(
            &dir.path().join("people"),
            "a.json",
            r#"{"id": "a", "needs": "n", "personality": "p"}"#,
        );
        write(
            &dir.path().join("people"),
            "b.json",
            r#"{"id": "b", "needs": "n", "personality": "p"}"#,
        );
        let pairs_path = write(
            dir.path(),
            "pairs.json",
            r#"[
                {"persona_1": "people/a.json", "persona_2": "people/b.json"},
                {"persona_1": {"id": "c", "needs": "n", "personality": "p"},
                 "persona_2": "people/a.json"}
            ]"#,
        );

        let pairs = load_pairs(&pairs_path).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].persona_1.id(), "a");
        assert_eq!(pairs[0].persona_2.id(), "b");
        assert_eq!(pairs[1].persona_1.id(), "c");
    }

    #[test]
    fn test_load_pairs_reports_failing_index() {
        let dir = tempfile::tempdir().unwrap();
        let pairs_path = write(
            dir.path(),
            "pairs.json",
            r#"[{"persona_1": "missing.json", "persona_2": "missing.json"}]"#,
        );
        let err = load_pairs(&pairs_path).unwrap_err();
        assert!(matches!(err, PersonaLoadError::Pair { index: 0, .. }));
    }

    #[test]
    fn test_load_pairs_empty() {
        let dir = tempfile::tempdir().unwrap();
        let pairs_path = write(dir.path(), "pairs.json", "[]");
        assert!(matches!(
            load_pairs(&pairs_path),
            Err(PersonaLoadError::EmptyPairs(_))
        ));
    }
}
