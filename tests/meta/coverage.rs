//! Layout rules for the unit test tree
//!
//! `tests/unit` mirrors `src` file for file, is compiled through
//! `tests/unit/main.rs`, and every file in it holds at least one test.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    const SRC: &str = "src";
    const UNIT: &str = "tests/unit";

    /// Files that only wire modules together
    fn is_wiring(relative: &str) -> bool {
        relative == "main.rs" || relative == "lib.rs" || relative.ends_with("mod.rs")
    }

    /// Every `.rs` file under `root`, relative to it, with `/` separators
    fn rust_files(root: &Path) -> io::Result<BTreeSet<String>> {
        let mut found = BTreeSet::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.extension().is_some_and(|ext| ext == "rs")
                    && let Ok(relative) = path.strip_prefix(root)
                {
                    let parts: Vec<_> = relative
                        .components()
                        .map(|part| part.as_os_str().to_string_lossy().into_owned())
                        .collect();
                    found.insert(parts.join("/"));
                }
            }
        }
        Ok(found)
    }

    fn listing(paths: &[&String], prefix: &str) -> String {
        paths
            .iter()
            .map(|path| format!("  - {prefix}/{path}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // Verifies every source file has a unit test file at the mirrored path
    // Verified by deleting tests/unit/algorithm/wave.rs
    #[test]
    fn test_src_files_have_unit_tests() {
        let src = rust_files(Path::new(SRC)).expect("src is readable");
        let unit = rust_files(Path::new(UNIT)).expect("tests/unit is readable");

        let missing: Vec<_> = src
            .iter()
            .filter(|path| !is_wiring(path) && !unit.contains(*path))
            .collect();
        assert!(
            missing.is_empty(),
            "Source files without unit tests:\n{}",
            listing(&missing, SRC)
        );
    }

    // Tests unit test files do not outlive their source files
    // Verified by adding tests/unit/algorithm/cache.rs
    #[test]
    fn test_unit_tests_have_src_files() {
        let src = rust_files(Path::new(SRC)).expect("src is readable");
        let unit = rust_files(Path::new(UNIT)).expect("tests/unit is readable");

        let orphaned: Vec<_> = unit
            .iter()
            .filter(|path| !is_wiring(path) && !src.contains(*path))
            .collect();
        assert!(
            orphaned.is_empty(),
            "Unit test files without a source file:\n{}",
            listing(&orphaned, UNIT)
        );
    }

    // Tests every unit test file is declared by its parent module
    // Verified by removing `pub mod wave;` from tests/unit/algorithm/mod.rs
    #[test]
    fn test_unit_tests_are_compiled() {
        let unit = rust_files(Path::new(UNIT)).expect("tests/unit is readable");
        let mut undeclared = Vec::new();

        for path in unit.iter().filter(|path| !is_wiring(path)) {
            let file = PathBuf::from(path);
            let Some(name) = file.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let parent = file.parent().filter(|dir| !dir.as_os_str().is_empty());
            let declaring = parent.map_or_else(
                || Path::new(UNIT).join("main.rs"),
                |dir| Path::new(UNIT).join(dir).join("mod.rs"),
            );
            let declared = fs::read_to_string(&declaring).is_ok_and(|text| {
                text.lines()
                    .any(|line| line.trim() == format!("pub mod {name};"))
            });
            if !declared {
                undeclared.push(path);
            }
        }
        assert!(
            undeclared.is_empty(),
            "Unit test files no module declares:\n{}",
            listing(&undeclared, UNIT)
        );
    }

    // Tests every test file holds at least one test
    // Verified by emptying tests/unit/io/progress.rs
    #[test]
    fn test_test_files_contain_tests() {
        let tests = rust_files(Path::new("tests")).expect("tests is readable");
        let empty: Vec<_> = tests
            .iter()
            .filter(|path| !path.ends_with("main.rs") && !path.ends_with("mod.rs"))
            .filter(|path| {
                fs::read_to_string(Path::new("tests").join(path))
                    .map_or(true, |text| !text.contains("#[test]"))
            })
            .collect();
        assert!(
            empty.is_empty(),
            "Test files without tests:\n{}",
            listing(&empty, "tests")
        );
    }
}
