//! Trie node type and the hex symbol alphabet

/// Number of symbols in the alphabet (one per hex digit)
pub const FANOUT: usize = 16;

const DIGITS: &[u8; FANOUT] = b"0123456789abcdef";

/// Child slots indexed by symbol value
pub(crate) type Children = [Option<Box<TrieNode>>; FANOUT];

/// Map a hex digit to its symbol index (0-15)
///
/// Upper and lower case letters map to the same symbol.
pub fn symbol(c: char) -> Option<u8> {
    c.to_digit(16).map(|d| d as u8)
}

/// Lowercase hex digit for a symbol index
///
/// Panics if `symbol >= 16`.
pub fn digit(symbol: u8) -> char {
    DIGITS[symbol as usize] as char
}

/// A node in the hex trie
///
/// `count` is prefix-inclusive: every inserted string that passes through
/// this node bumps it, whether or not the string ends here.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TrieNode {
    pub(crate) count: u64,
    pub(crate) children: Children,
}

impl TrieNode {
    /// Number of inserted strings sharing the prefix that leads here
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Child for a symbol, if one has been allocated
    pub fn child(&self, symbol: u8) -> Option<&TrieNode> {
        self.children.get(symbol as usize)?.as_deref()
    }

    /// Present children with their symbols, in symbol order
    pub fn entries(&self) -> impl Iterator<Item = (u8, &TrieNode)> {
        entries(&self.children)
    }

    /// Whether no child has been allocated yet
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

pub(crate) fn entries(children: &Children) -> impl Iterator<Item = (u8, &TrieNode)> {
    children
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| slot.as_deref().map(|node| (i as u8, node)))
}

// Unlink children onto a heap stack so long chains don't recurse on drop.
impl Drop for TrieNode {
    fn drop(&mut self) {
        let mut stack: Vec<Box<TrieNode>> =
            self.children.iter_mut().filter_map(Option::take).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.children.iter_mut().filter_map(Option::take));
        }
    }
}
