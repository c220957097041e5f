//! Hex prefix trie
//!
//! A fixed-fanout trie over the 16 hex digits where every node counts how
//! many inserted strings share its prefix. Nodes are allocated lazily and
//! never removed.

mod build;
mod node;
mod tree;

pub use node::{digit, symbol, TrieNode, FANOUT};
pub use tree::{HexTrie, LevelStats, UniquePrefixes};
