//! The isolate manifest structure

use super::pyrepr::{python_str, LINE_WIDTH};
use crate::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// `{"variables": {"files": [...]}}`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub variables: Variables,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variables {
    /// Runtime dependencies, in input order
    pub files: Vec<String>,
}

impl Manifest {
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Manifest {
            variables: Variables {
                files: paths.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// One entry per line, trailing whitespace stripped
    ///
    /// Paths are not validated and blank lines become empty entries.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut manifest = Manifest::default();
        manifest.extend_from_reader(reader)?;
        Ok(manifest)
    }

    /// Read lines from each input in turn; no inputs or `-` means stdin
    pub fn from_inputs<P: AsRef<Path>>(inputs: &[P]) -> Result<Self> {
        let mut manifest = Manifest::default();
        if inputs.is_empty() {
            manifest.extend_from_reader(io::stdin().lock())?;
        }
        for input in inputs {
            let input = input.as_ref();
            if input == Path::new("-") {
                manifest.extend_from_reader(io::stdin().lock())?;
            } else {
                debug!("reading runtime deps from {}", input.display());
                manifest.extend_from_reader(BufReader::new(File::open(input)?))?;
            }
        }
        Ok(manifest)
    }

    fn extend_from_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for line in reader.lines() {
            self.variables.files.push(line?.trim_end().to_string());
        }
        Ok(())
    }

    pub fn files(&self) -> &[String] {
        &self.variables.files
    }

    /// Render the way Python's `pprint.pformat` would
    ///
    /// Short manifests stay on one line. Longer ones put each file on its
    /// own line, aligned under the first.
    pub fn to_python_literal(&self) -> String {
        const OPEN: &str = "{'variables': {'files': [";
        const CLOSE: &str = "]}}";

        let items: Vec<String> = self.files().iter().map(|f| python_str(f)).collect();
        let one_line = format!("{OPEN}{}{CLOSE}", items.join(", "));
        if one_line.chars().count() <= LINE_WIDTH {
            return one_line;
        }

        let separator = format!(",\n{}", " ".repeat(OPEN.len()));
        format!("{OPEN}{}{CLOSE}", items.join(&separator))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_reader() {
        let manifest = Manifest::from_reader(Cursor::new("/a/b\n/c/d\n")).unwrap();
        assert_eq!(manifest, Manifest::from_paths(["/a/b", "/c/d"]));
    }

    #[test]
    fn test_json_shape() {
        let manifest = Manifest::from_paths(["/a/b", "/c/d"]);
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "variables": { "files": ["/a/b", "/c/d"] } })
        );
    }

    #[test]
    fn test_strips_trailing_whitespace_keeps_blank_lines() {
        let manifest = Manifest::from_reader(Cursor::new("bin/clang  \r\n\nlib/x.so\n")).unwrap();
        assert_eq!(manifest.files(), ["bin/clang", "", "lib/x.so"]);
    }

    #[test]
    fn test_python_literal_short() {
        let manifest = Manifest::from_paths(["/a/b", "/c/d"]);
        assert_eq!(
            manifest.to_python_literal(),
            "{'variables': {'files': ['/a/b', '/c/d']}}"
        );
    }

    #[test]
    fn test_python_literal_empty() {
        assert_eq!(
            Manifest::default().to_python_literal(),
            "{'variables': {'files': []}}"
        );
    }

    #[test]
    fn test_python_literal_wraps_long_lists() {
        let manifest = Manifest::from_paths([
            "../../bin/clang",
            "../../bin/llvm-lit",
            "../../clang/test/lit.cfg.py",
            "../../llvm/utils/lit/lit.py",
        ]);
        let expected = "\
{'variables': {'files': ['../../bin/clang',
                         '../../bin/llvm-lit',
                         '../../clang/test/lit.cfg.py',
                         '../../llvm/utils/lit/lit.py']}}";
        assert_eq!(manifest.to_python_literal(), expected);
    }

    #[test]
    fn test_python_literal_width_boundary() {
        // 25 + 2 + 50 + 3 = 80 columns exactly
        let fits = Manifest::from_paths(["x".repeat(50)]);
        assert!(!fits.to_python_literal().contains('\n'));

        let two = Manifest::from_paths(["x".repeat(24), "y".repeat(24)]);
        assert!(two.to_python_literal().contains('\n'));
    }

    #[test]
    fn test_from_inputs_concatenates_files() {
        let mut first = NamedTempFile::new().unwrap();
        writeln!(first, "a").unwrap();
        let mut second = NamedTempFile::new().unwrap();
        writeln!(second, "b").unwrap();
        writeln!(second, "c").unwrap();

        let manifest = Manifest::from_inputs(&[first.path(), second.path()]).unwrap();
        assert_eq!(manifest.files(), ["a", "b", "c"]);
    }

    #[test]
    fn test_json_pretty_roundtrips() {
        let manifest = Manifest::from_paths(["/a/b"]);
        let json = manifest.to_json_pretty().unwrap();
        let back: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, manifest);
    }
}
