//! @ai:module:intent Enumerate benchmark units under the benchmarks root
//! @ai:module:layer infrastructure
//! @ai:module:public_api discover
//! @ai:module:stateless true

use crate::benchmark::manifest::UnitManifest;
use crate::benchmark::registry::BenchmarkRegistry;
use crate::benchmark::{BenchmarkUnit, UnitState};
use crate::error::{HarnessError, Result};
use std::path::Path;
use walkdir::WalkDir;

/// @ai:intent List every unit under `root`, sorted by name
/// @ai:pre root is a readable directory
/// @ai:post one BenchmarkUnit per non-hidden entry; malformed entries are kept, not dropped
/// @ai:effects fs:read
pub fn discover(root: &Path, registry: &BenchmarkRegistry) -> Result<Vec<BenchmarkUnit>> {
    let root_err = |source: std::io::Error| HarnessError::BenchmarksRoot {
        path: root.to_path_buf(),
        source,
    };

    let metadata = std::fs::metadata(root).map_err(root_err)?;

    if !metadata.is_dir() {
        return Err(root_err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a directory",
        )));
    }

    let mut units = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| root_err(e.into()))?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if name.starts_with('.') {
            continue;
        }

        let unit = load_unit(&name, entry.path(), registry);

        match &unit.state {
            UnitState::Ready(_) => tracing::debug!("Discovered benchmark {}", name),
            UnitState::Malformed(reason) => {
                tracing::warn!("Malformed benchmark unit {}: {}", name, reason)
            }
        }

        units.push(unit);
    }

    tracing::info!("Discovered {} benchmark units in {}", units.len(), root.display());
    Ok(units)
}

/// @ai:intent Resolve one entry into a unit, recording why it cannot run
/// @ai:effects fs:read
fn load_unit(name: &str, path: &Path, registry: &BenchmarkRegistry) -> BenchmarkUnit {
    if !path.is_dir() {
        return BenchmarkUnit::malformed(name, "not a benchmark directory");
    }

    let manifest = match UnitManifest::load(path) {
        Ok(manifest) => manifest,
        Err(e) => return BenchmarkUnit::malformed(name, format!("{:#}", e)),
    };

    let kind = manifest.kind_or(name).to_string();

    let state = match registry.build(&kind, &manifest, path) {
        Ok(benchmark) => UnitState::Ready(benchmark),
        Err(e) => UnitState::Malformed(format!("{:#}", e)),
    };

    BenchmarkUnit {
        name: name.to_string(),
        kind: Some(kind),
        description: manifest.benchmark.description,
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::MANIFEST_FILE;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_unit(root: &Path, name: &str, manifest: &str) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(MANIFEST_FILE), manifest).unwrap();
    }

    const EXACT: &str = "[benchmark]\nkind = \"exact_match\"\n\n[[cases]]\nprompt = \"1+1\"\nexpected = \"2\"\n";

    #[test]
    fn test_units_sorted_by_name() {
        let temp = TempDir::new().unwrap();
        for name in ["parsing", "addition", "Zeta", "math_2", "math_10"] {
            write_unit(temp.path(), name, EXACT);
        }

        let units = discover(temp.path(), &BenchmarkRegistry::with_builtins()).unwrap();
        let names: Vec<_> = units.iter().map(|u| u.name.as_str()).collect();

        assert_eq!(names, vec!["Zeta", "addition", "math_10", "math_2", "parsing"]);
        assert!(units.iter().all(BenchmarkUnit::is_ready));
    }

    #[test]
    fn test_malformed_entries_are_kept() {
        let temp = TempDir::new().unwrap();
        write_unit(temp.path(), "addition", EXACT);
        write_unit(temp.path(), "mystery", "[benchmark]\nkind = \"trivia\"\n");
        write_unit(temp.path(), "broken", "[benchmark\n");
        write_unit(temp.path(), "empty", "[benchmark]\nkind = \"contains\"\n");
        std::fs::create_dir_all(temp.path().join("no_manifest")).unwrap();
        std::fs::write(temp.path().join("notes.txt"), "not a unit").unwrap();
        std::fs::create_dir_all(temp.path().join(".cache")).unwrap();

        let units = discover(temp.path(), &BenchmarkRegistry::with_builtins()).unwrap();
        let summary: Vec<_> = units
            .iter()
            .map(|u| (u.name.as_str(), u.is_ready()))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("addition", true),
                ("broken", false),
                ("empty", false),
                ("mystery", false),
                ("no_manifest", false),
                ("notes.txt", false),
            ]
        );

        let mystery = units.iter().find(|u| u.name == "mystery").unwrap();
        assert_eq!(mystery.malformed_reason(), Some("unknown benchmark kind `trivia`"));

        let notes = units.iter().find(|u| u.name == "notes.txt").unwrap();
        assert_eq!(notes.malformed_reason(), Some("not a benchmark directory"));
    }

    #[test]
    fn test_kind_defaults_to_directory_name() {
        let temp = TempDir::new().unwrap();
        write_unit(temp.path(), "contains", "[[cases]]\nprompt = \"p\"\nexpected = \"e\"\n");

        let units = discover(temp.path(), &BenchmarkRegistry::with_builtins()).unwrap();
        assert_eq!(units[0].kind.as_deref(), Some("contains"));
        assert!(units[0].is_ready());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("benchmarks");

        let err = discover(&missing, &BenchmarkRegistry::with_builtins()).unwrap_err();
        assert!(matches!(err, HarnessError::BenchmarksRoot { .. }));
    }

    #[test]
    fn test_discovery_is_repeatable() {
        let temp = TempDir::new().unwrap();
        write_unit(temp.path(), "b", EXACT);
        write_unit(temp.path(), "a", EXACT);

        let registry = BenchmarkRegistry::with_builtins();
        let first: Vec<_> = discover(temp.path(), &registry).unwrap().into_iter().map(|u| u.name).collect();
        let second: Vec<_> = discover(temp.path(), &registry).unwrap().into_iter().map(|u| u.name).collect();

        assert_eq!(first, second);
    }
}
