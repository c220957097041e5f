//! Construction of a trie from line-oriented input

use super::HexTrie;
use crate::{Error, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

impl HexTrie {
    /// Build a trie from every line of `reader`
    ///
    /// Trailing whitespace is stripped from each line before insertion.
    /// The first unreadable line or non-hex character aborts the build.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut trie = HexTrie::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            trie.insert(line.trim_end()).map_err(|e| Error::Line {
                line: idx + 1,
                source: Box::new(e),
            })?;
        }
        Ok(trie)
    }

    /// Build a trie from the lines of a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("reading hex strings from {}", path.display());
        let file = File::open(path)?;
        let trie = Self::from_reader(BufReader::new(file))?;
        info!("built trie from {}: {} strings", path.display(), trie.len());
        Ok(trie)
    }

    /// Build a trie from raw digests, keyed by their hex encoding
    pub fn from_digests<I>(digests: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut trie = HexTrie::new();
        for digest in digests {
            trie.insert_bytes(digest.as_ref());
        }
        trie
    }
}
