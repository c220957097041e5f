//! # devscripts
//!
//! A handful of one-shot developer utilities.
//!
//! ## Tools
//!
//! - **Hex trie**: prefix frequency counts over hex strings such as SHA-1
//!   digests ([`HexTrie`])
//! - **Demangler benchmark**: time and peak memory of an external demangler
//!   on pathological mangled names ([`bench`])
//! - **Isolate converter**: `gn desc ... runtime_deps` output to an isolate
//!   manifest ([`Manifest`])
//!
//! ## Example
//!
//! ```
//! use devscripts::HexTrie;
//!
//! let trie = HexTrie::from_reader("1a\n1a\n1b\n".as_bytes())?;
//! assert_eq!(trie.count("1")?, 3);
//! assert_eq!(trie.count("1a")?, 2);
//! # Ok::<(), devscripts::Error>(())
//! ```

pub mod bench;
pub mod isolate;
pub mod trie;

mod error;

pub use bench::{BenchConfig, Pattern, Runner, Sample, TimeFormat, TimedCommand};
pub use error::{Error, Result};
pub use isolate::Manifest;
pub use trie::{HexTrie, LevelStats, TrieNode, UniquePrefixes};
