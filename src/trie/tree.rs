//! Hex trie with prefix-inclusive counts

use super::node::{digit, entries, symbol, Children, TrieNode};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// A 16-ary frequency trie over hex strings
///
/// The root carries no symbol and no count; counting starts at depth 1.
/// Every node on the path of an inserted string is incremented, so the
/// count of a node is the number of inserted strings starting with its
/// prefix.
#[derive(Debug, Default)]
pub struct HexTrie {
    children: Children,
    inserted: u64,
}

/// Node statistics for one depth of the trie
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    pub depth: usize,
    pub nodes: usize,
    pub max_count: u64,
}

/// Where inserted strings stop sharing a prefix with any other string
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UniquePrefixes {
    /// Unique prefix length -> number of strings that become unique there
    pub lengths: BTreeMap<usize, u64>,
    /// Unique prefixes at least `min_len` digits long, in digit order
    pub long_prefixes: Vec<String>,
}

impl HexTrie {
    /// Create an empty trie
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a hex string, bumping the count of every node on its path
    ///
    /// The whole string is checked before the trie is touched, so a string
    /// with a non-hex character leaves the trie unchanged.
    pub fn insert(&mut self, s: &str) -> Result<()> {
        let symbols = parse_symbols(s)?;
        self.insert_symbols(symbols);
        Ok(())
    }

    /// Insert the lowercase hex encoding of raw bytes
    pub fn insert_bytes(&mut self, bytes: &[u8]) {
        let encoded = hex::encode(bytes);
        self.insert_symbols(encoded.chars().filter_map(symbol));
    }

    fn insert_symbols(&mut self, symbols: impl IntoIterator<Item = u8>) {
        let mut slots = &mut self.children;
        for sym in symbols {
            let node = slots[sym as usize].get_or_insert_with(Box::default);
            node.count += 1;
            slots = &mut node.children;
        }
        self.inserted += 1;
    }

    /// Number of strings inserted so far
    pub fn len(&self) -> u64 {
        self.inserted
    }

    pub fn is_empty(&self) -> bool {
        self.inserted == 0
    }

    /// Depth-1 node for a symbol
    pub fn child(&self, symbol: u8) -> Option<&TrieNode> {
        self.children.get(symbol as usize)?.as_deref()
    }

    /// Present depth-1 nodes with their symbols
    pub fn entries(&self) -> impl Iterator<Item = (u8, &TrieNode)> {
        entries(&self.children)
    }

    /// Node reached by `prefix`
    ///
    /// The empty prefix names the root, which is not a node, so it yields
    /// `None`.
    pub fn get(&self, prefix: &str) -> Result<Option<&TrieNode>> {
        let symbols = parse_symbols(prefix)?;
        let mut slots = &self.children;
        let mut found = None;
        for sym in symbols {
            match slots[sym as usize].as_deref() {
                Some(node) => {
                    slots = &node.children;
                    found = Some(node);
                }
                None => return Ok(None),
            }
        }
        Ok(found)
    }

    /// Number of inserted strings starting with `prefix`
    pub fn count(&self, prefix: &str) -> Result<u64> {
        if prefix.is_empty() {
            return Ok(self.inserted);
        }
        Ok(self.get(prefix)?.map_or(0, TrieNode::count))
    }

    /// Per-depth node counts, shallowest first
    pub fn levels(&self) -> Vec<LevelStats> {
        let mut levels = Vec::new();
        let mut frontier: Vec<&TrieNode> = self.entries().map(|(_, node)| node).collect();
        while !frontier.is_empty() {
            levels.push(LevelStats {
                depth: levels.len() + 1,
                nodes: frontier.len(),
                max_count: frontier.iter().map(|n| n.count).max().unwrap_or(0),
            });
            frontier = frontier
                .iter()
                .flat_map(|n| n.entries().map(|(_, child)| child))
                .collect();
        }
        levels
    }

    /// Total number of allocated nodes (the root excluded)
    pub fn node_count(&self) -> usize {
        self.levels().iter().map(|l| l.nodes).sum()
    }

    /// Length of the longest path
    pub fn max_depth(&self) -> usize {
        self.levels().len()
    }

    /// Most frequent prefixes of exactly `depth` symbols
    ///
    /// Sorted by count descending, ties broken by prefix.
    pub fn top_prefixes(&self, depth: usize, limit: usize) -> Vec<(String, u64)> {
        let mut found = Vec::new();
        if depth == 0 {
            return found;
        }

        let mut stack: Vec<(String, &TrieNode)> = self
            .entries()
            .map(|(sym, node)| (digit(sym).to_string(), node))
            .collect();
        while let Some((prefix, node)) = stack.pop() {
            if prefix.len() == depth {
                found.push((prefix, node.count));
                continue;
            }
            for (sym, child) in node.entries() {
                let mut next = prefix.clone();
                next.push(digit(sym));
                stack.push((next, child));
            }
        }

        found.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        found.truncate(limit);
        found
    }

    /// Histogram of unique prefix lengths
    ///
    /// A string's unique prefix ends at the first node on its path with a
    /// count of 1 (its parent is the root or has a count above 1). Strings
    /// inserted more than once never become unique and are not counted.
    /// The longest prefix shared with another string is one digit shorter.
    ///
    /// Unique prefixes of at least `min_len` digits are also listed.
    pub fn unique_prefixes(&self, min_len: usize) -> UniquePrefixes {
        let mut result = UniquePrefixes::default();
        let mut path = String::new();
        let mut stack: Vec<(usize, u8, &TrieNode)> = Vec::new();
        push_children(&mut stack, 1, &self.children);

        while let Some((depth, sym, node)) = stack.pop() {
            path.truncate(depth - 1);
            path.push(digit(sym));
            if node.count == 1 {
                *result.lengths.entry(depth).or_default() += 1;
                if depth >= min_len {
                    result.long_prefixes.push(path.clone());
                }
            } else if node.count > 1 {
                push_children(&mut stack, depth + 1, &node.children);
            }
        }
        result
    }

    /// Write the whole trie as compact JSON
    ///
    /// `{"strings":N,"children":{"a":{"count":n,"children":{...}}}}`, listing
    /// only present children. Uses an explicit stack, so the nesting depth
    /// is bounded only by memory.
    pub fn write_json<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{{\"strings\":{},\"children\":{{", self.inserted)?;

        let mut stack: Vec<(&Children, usize)> = vec![(&self.children, 0)];
        let mut first = true;
        while let Some(frame) = stack.last_mut() {
            let (children, start) = *frame;
            let next = children[start..]
                .iter()
                .enumerate()
                .find_map(|(offset, slot)| slot.as_deref().map(|node| (start + offset, node)));
            match next {
                Some((idx, node)) => {
                    frame.1 = idx + 1;
                    if !first {
                        writer.write_all(b",")?;
                    }
                    write!(
                        writer,
                        "\"{}\":{{\"count\":{},\"children\":{{",
                        digit(idx as u8),
                        node.count
                    )?;
                    stack.push((&node.children, 0));
                    first = true;
                }
                None => {
                    // closes the children map and its owner
                    stack.pop();
                    writer.write_all(b"}}")?;
                    first = false;
                }
            }
        }
        writer.flush()
    }
}

// Reversed so the lowest symbol is popped first.
fn push_children<'a>(
    stack: &mut Vec<(usize, u8, &'a TrieNode)>,
    depth: usize,
    children: &'a Children,
) {
    let start = stack.len();
    stack.extend(entries(children).map(|(sym, node)| (depth, sym, node)));
    stack[start..].reverse();
}

fn parse_symbols(s: &str) -> Result<Vec<u8>> {
    s.chars()
        .enumerate()
        .map(|(position, ch)| symbol(ch).ok_or(Error::InvalidHexDigit { ch, position }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie_of(strings: &[&str]) -> HexTrie {
        let mut trie = HexTrie::new();
        for s in strings {
            trie.insert(s).unwrap();
        }
        trie
    }

    #[test]
    fn test_insert_prefix_inclusive() {
        let trie = trie_of(&["a", "ab"]);
        assert_eq!(trie.count("a").unwrap(), 2);
        assert_eq!(trie.count("ab").unwrap(), 1);
        assert_eq!(trie.count("b").unwrap(), 0);
    }

    #[test]
    fn test_duplicate_doubles_path() {
        let mut trie = trie_of(&["1f3"]);
        trie.insert("1f3").unwrap();

        assert_eq!(trie.count("1").unwrap(), 2);
        assert_eq!(trie.count("1f").unwrap(), 2);
        assert_eq!(trie.count("1f3").unwrap(), 2);
        assert_eq!(trie.node_count(), 3);
        assert_eq!(trie.entries().count(), 1);
    }

    #[test]
    fn test_all_sixteen_digits() {
        let digits: Vec<String> = (0..16u8).map(|s| digit(s).to_string()).collect();
        let refs: Vec<&str> = digits.iter().map(String::as_str).collect();
        let trie = trie_of(&refs);

        assert_eq!(trie.entries().count(), 16);
        for (_, node) in trie.entries() {
            assert_eq!(node.count(), 1);
            assert!(node.is_leaf());
        }
    }

    #[test]
    fn test_count_matches_prefix_frequency() {
        let strings = ["1a", "1a", "1b", "2", "1abc", "ff"];
        let trie = trie_of(&strings);

        for prefix in ["1", "1a", "1ab", "1abc", "1b", "2", "f", "ff", "3"] {
            let expected = strings.iter().filter(|s| s.starts_with(prefix)).count() as u64;
            assert_eq!(trie.count(prefix).unwrap(), expected, "prefix {prefix}");
        }
    }

    #[test]
    fn test_case_insensitive_symbols() {
        let trie = trie_of(&["aB", "Ab"]);
        assert_eq!(trie.count("ab").unwrap(), 2);
        assert_eq!(trie.node_count(), 2);
    }

    #[test]
    fn test_depth_equals_length() {
        let trie = trie_of(&["0123456789abcdef"]);
        assert_eq!(trie.max_depth(), 16);
        assert_eq!(trie.node_count(), 16);
    }

    #[test]
    fn test_invalid_digit_leaves_trie_untouched() {
        let mut trie = trie_of(&["12"]);
        let err = trie.insert("12g4").unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidHexDigit {
                ch: 'g',
                position: 2
            }
        ));
        assert_eq!(trie.count("1").unwrap(), 1);
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_empty_string_creates_no_nodes() {
        let trie = trie_of(&[""]);
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.node_count(), 0);
        assert!(trie.get("").unwrap().is_none());
    }

    #[test]
    fn test_insert_bytes() {
        let mut trie = HexTrie::new();
        trie.insert_bytes(&[0xde, 0xad]);
        trie.insert_bytes(&[0xde, 0x01]);

        assert_eq!(trie.count("de").unwrap(), 2);
        assert_eq!(trie.count("dead").unwrap(), 1);
        assert_eq!(trie.count("de01").unwrap(), 1);
    }

    #[test]
    fn test_levels() {
        let trie = trie_of(&["1a", "1b", "2a"]);
        assert_eq!(
            trie.levels(),
            vec![
                LevelStats {
                    depth: 1,
                    nodes: 2,
                    max_count: 2
                },
                LevelStats {
                    depth: 2,
                    nodes: 3,
                    max_count: 1
                },
            ]
        );
    }

    #[test]
    fn test_top_prefixes() {
        let trie = trie_of(&["1a", "1a", "1b", "2c", "2c", "3"]);

        assert_eq!(
            trie.top_prefixes(2, 2),
            vec![("1a".to_string(), 2), ("2c".to_string(), 2)]
        );
        assert_eq!(
            trie.top_prefixes(1, 10),
            vec![
                ("1".to_string(), 3),
                ("2".to_string(), 2),
                ("3".to_string(), 1)
            ]
        );
        assert!(trie.top_prefixes(0, 10).is_empty());
    }

    fn json_of(trie: &HexTrie) -> String {
        let mut buf = Vec::new();
        trie.write_json(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_json_nested() {
        let trie = trie_of(&["1a", "1", "2"]);
        let value: serde_json::Value = serde_json::from_str(&json_of(&trie)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "strings": 3,
                "children": {
                    "1": {
                        "count": 2,
                        "children": { "a": { "count": 1, "children": {} } }
                    },
                    "2": { "count": 1, "children": {} }
                }
            })
        );
    }

    #[test]
    fn test_write_json_empty() {
        assert_eq!(json_of(&HexTrie::new()), r#"{"strings":0,"children":{}}"#);
    }

    #[test]
    fn test_write_json_deep_line() {
        let depth = 200_000;
        let mut trie = HexTrie::new();
        trie.insert(&"a".repeat(depth)).unwrap();

        let json = json_of(&trie);
        assert!(json.starts_with(r#"{"strings":1,"children":{"a":{"count":1,"children":{"a":"#));
        assert!(json.ends_with(&"}".repeat(2 * depth + 2)));
        assert_eq!(json.matches(r#""count":1"#).count(), depth);
    }

    #[test]
    fn test_unique_prefixes_histogram() {
        // "12" and "13" split after one shared digit; "4" is alone from the start
        let trie = trie_of(&["12ab", "13cd", "4f"]);
        let unique = trie.unique_prefixes(usize::MAX);

        assert_eq!(unique.lengths, BTreeMap::from([(1, 1), (2, 2)]));
        assert!(unique.long_prefixes.is_empty());
    }

    #[test]
    fn test_unique_prefixes_skips_duplicates() {
        let trie = trie_of(&["ab", "ab", "ac"]);
        let unique = trie.unique_prefixes(1);

        assert_eq!(unique.lengths, BTreeMap::from([(2, 1)]));
        assert_eq!(unique.long_prefixes, vec!["ac".to_string()]);
    }

    #[test]
    fn test_unique_prefixes_long_shared() {
        let trie = trie_of(&["0123456789a0", "0123456789b0", "0123456789b1", "f0"]);
        let unique = trie.unique_prefixes(9);

        assert_eq!(unique.lengths, BTreeMap::from([(1, 1), (11, 1), (12, 2)]));
        assert_eq!(
            unique.long_prefixes,
            vec![
                "0123456789a".to_string(),
                "0123456789b0".to_string(),
                "0123456789b1".to_string()
            ]
        );
    }

    #[test]
    fn test_unique_prefixes_deep_shared_chain() {
        let line = "7".repeat(100_000);
        let trie = trie_of(&[line.as_str(), line.as_str(), "8"]);
        let unique = trie.unique_prefixes(2);

        assert_eq!(unique.lengths, BTreeMap::from([(1, 1)]));
        assert!(unique.long_prefixes.is_empty());
    }
}
