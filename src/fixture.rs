//! Fixture files: rendering records and rewriting a config document's ATM list.
//!
//! All disk access goes through the [`FileSystem`] port so the rewrite can be
//! exercised against an in-memory double.

use std::path::{Path, PathBuf};

use rand::Rng;
use thiserror::Error;

use crate::generator::{generate, GenerateError, GeneratorOptions};
use crate::ports::filesystem::FileSystem;
use crate::record::AtmRecord;

/// Errors from reading, rewriting, or writing a fixture file.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The file could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The file is not valid JSON (or not a valid template).
    #[error("failed to parse {}", path.display())]
    Parse {
        /// File that was being parsed.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// The top-level document is not a JSON object, so it has no fields.
    #[error("{} does not hold a JSON object at the top level", path.display())]
    NotAnObject {
        /// Offending file.
        path: PathBuf,
    },
    /// Record generation failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),
    /// The updated document could not be serialized.
    #[error("failed to serialize document for {}", path.display())]
    Serialize {
        /// File the document was destined for.
        path: PathBuf,
        /// Underlying serialization failure.
        #[source]
        source: serde_json::Error,
    },
    /// The updated document could not be written back.
    #[error("failed to write {}", path.display())]
    Write {
        /// File that was being written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Renders records as a compact JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn records_json(records: &[AtmRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

/// Loads a single record from `path` to use as a generation template.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold a record.
pub fn load_template(fs: &dyn FileSystem, path: &Path) -> Result<AtmRecord, FixtureError> {
    let text = read(fs, path)?;
    serde_json::from_str(&text)
        .map_err(|source| FixtureError::Parse { path: path.to_path_buf(), source })
}

/// Regenerates `count` records from `template` and stores them under `field`
/// in the JSON document at `path`, replacing whatever was there.
///
/// Every other field of the document is left as is. The write goes through
/// [`FileSystem::write_atomic`], so a failure never leaves a truncated file.
/// Returns the records that were written.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, is not a JSON
/// object, generation fails, or the write fails. The file is untouched in
/// every error case.
pub fn replace_field<R: Rng>(
    fs: &dyn FileSystem,
    path: &Path,
    field: &str,
    template: &AtmRecord,
    count: usize,
    rng: &mut R,
    options: &GeneratorOptions,
) -> Result<Vec<AtmRecord>, FixtureError> {
    let text = read(fs, path)?;
    let mut document: serde_json::Value = serde_json::from_str(&text)
        .map_err(|source| FixtureError::Parse { path: path.to_path_buf(), source })?;
    let Some(object) = document.as_object_mut() else {
        return Err(FixtureError::NotAnObject { path: path.to_path_buf() });
    };

    let records = generate(template, count, rng, options)?;
    let value = serde_json::to_value(&records)
        .map_err(|source| FixtureError::Serialize { path: path.to_path_buf(), source })?;
    if object.insert(field.to_string(), value).is_none() {
        tracing::debug!(field, "field was absent, adding it");
    }

    let updated = serde_json::to_string(&document)
        .map_err(|source| FixtureError::Serialize { path: path.to_path_buf(), source })?;
    fs.write_atomic(path, &updated)
        .map_err(|source| FixtureError::Write { path: path.to_path_buf(), source })?;

    tracing::info!(path = %path.display(), field, count = records.len(), "replaced records");
    Ok(records)
}

fn read(fs: &dyn FileSystem, path: &Path) -> Result<String, FixtureError> {
    fs.read_to_string(path)
        .map_err(|source| FixtureError::Read { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Location;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// In-memory filesystem; `fail_writes` simulates a full disk.
    #[derive(Default)]
    struct MemoryFileSystem {
        files: Mutex<HashMap<PathBuf, String>>,
        fail_writes: bool,
    }

    impl MemoryFileSystem {
        fn with_file(path: &str, contents: &str) -> Self {
            let fs = Self::default();
            fs.files.lock().unwrap().insert(PathBuf::from(path), contents.to_string());
            fs
        }

        fn contents(&self, path: &str) -> String {
            self.files.lock().unwrap()[Path::new(path)].clone()
        }
    }

    impl FileSystem for MemoryFileSystem {
        fn read_to_string(
            &self,
            path: &Path,
        ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
            self.files
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| format!("{} not found", path.display()).into())
        }

        fn write_atomic(
            &self,
            path: &Path,
            contents: &str,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            if self.fail_writes {
                return Err("disk full".into());
            }
            self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
            Ok(())
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    #[test]
    fn replaces_named_field_and_keeps_the_rest() {
        let fs = MemoryFileSystem::with_file(
            "/cfg.json",
            r#"{"atms":[{"name":1,"location":[0.0,0.0]}],"load":3,"banks":["a"]}"#,
        );

        let records = replace_field(
            &fs,
            Path::new("/cfg.json"),
            "atms",
            &AtmRecord::default(),
            4,
            &mut rng(),
            &GeneratorOptions::default(),
        )
        .unwrap();

        let written: serde_json::Value = serde_json::from_str(&fs.contents("/cfg.json")).unwrap();
        assert_eq!(written["load"], json!(3));
        assert_eq!(written["banks"], json!(["a"]));

        let atms: Vec<AtmRecord> = serde_json::from_value(written["atms"].clone()).unwrap();
        assert_eq!(atms, records);
        assert_eq!(atms.len(), 4);
        let ids: HashSet<u64> = atms.iter().map(|a| a.identifier).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn adds_missing_field() {
        let fs = MemoryFileSystem::with_file("/cfg.json", r#"{"load":1}"#);
        replace_field(
            &fs,
            Path::new("/cfg.json"),
            "atms",
            &AtmRecord::default(),
            0,
            &mut rng(),
            &GeneratorOptions::default(),
        )
        .unwrap();

        let written: serde_json::Value = serde_json::from_str(&fs.contents("/cfg.json")).unwrap();
        assert_eq!(written, json!({"load": 1, "atms": []}));
    }

    #[test]
    fn non_object_document_is_left_alone() {
        let fs = MemoryFileSystem::with_file("/cfg.json", "[1,2,3]");
        let err = replace_field(
            &fs,
            Path::new("/cfg.json"),
            "atms",
            &AtmRecord::default(),
            1,
            &mut rng(),
            &GeneratorOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, FixtureError::NotAnObject { .. }));
        assert_eq!(fs.contents("/cfg.json"), "[1,2,3]");
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let fs = MemoryFileSystem::with_file("/cfg.json", "{not json");
        let err = replace_field(
            &fs,
            Path::new("/cfg.json"),
            "atms",
            &AtmRecord::default(),
            1,
            &mut rng(),
            &GeneratorOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, FixtureError::Parse { .. }));
        assert!(err.to_string().contains("/cfg.json"));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let fs = MemoryFileSystem::default();
        let err = replace_field(
            &fs,
            Path::new("/missing.json"),
            "atms",
            &AtmRecord::default(),
            1,
            &mut rng(),
            &GeneratorOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, FixtureError::Read { .. }));
    }

    #[test]
    fn failed_write_keeps_original() {
        let mut fs = MemoryFileSystem::with_file("/cfg.json", r#"{"atms":[]}"#);
        fs.fail_writes = true;
        let err = replace_field(
            &fs,
            Path::new("/cfg.json"),
            "atms",
            &AtmRecord::default(),
            2,
            &mut rng(),
            &GeneratorOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, FixtureError::Write { .. }));
        assert_eq!(fs.contents("/cfg.json"), r#"{"atms":[]}"#);
    }

    #[test]
    fn generation_failure_is_propagated() {
        let fs = MemoryFileSystem::with_file("/cfg.json", r#"{"atms":[]}"#);
        let err = replace_field(
            &fs,
            Path::new("/cfg.json"),
            "atms",
            &AtmRecord::default(),
            1,
            &mut rng(),
            &GeneratorOptions { max_attempts: 0 },
        )
        .unwrap_err();

        assert!(matches!(err, FixtureError::Generate(GenerateError::PoolExhausted { .. })));
    }

    #[test]
    fn template_loads_with_extra_fields() {
        let fs = MemoryFileSystem::with_file(
            "/atm.json",
            r#"{"name":9,"location":[1.0,2.0],"refillAmount":250}"#,
        );
        let template = load_template(&fs, Path::new("/atm.json")).unwrap();
        assert_eq!(template.identifier, 9);
        assert_eq!(template.location, Location(1.0, 2.0));
        assert_eq!(template.extra["refillAmount"], json!(250));
    }

    #[test]
    fn records_json_is_compact_array() {
        let records = vec![AtmRecord::new(5, Location(1.5, 2.5))];
        assert_eq!(records_json(&records).unwrap(), r#"[{"name":5,"location":[1.5,2.5]}]"#);
        assert_eq!(records_json(&[]).unwrap(), "[]");
    }
}
