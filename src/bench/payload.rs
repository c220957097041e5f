//! Pathological mangled names fed to the demangler

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Shape of the generated mangled name, parameterised by a repeat count `n`
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Pattern {
    /// `?i@` + n x `?1??foo@` + n x `@4HA` + `@4HA`
    ///
    /// Not produced by any compiler, but nests scopes n deep and costs
    /// quadratic memory in a naive demangler.
    #[default]
    NestedStatic,
    /// `?i@` + n x `?1??foo@@YAXXZ` + `@4HA`
    ///
    /// What clang-cl emits for a static local inside n nested blocks.
    BlockLocal,
}

impl Pattern {
    // (prefix, repeated, repeated, suffix)
    fn pieces(self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self {
            Pattern::NestedStatic => ("?i@", "?1??foo@", "@4HA", "@4HA"),
            Pattern::BlockLocal => ("?i@", "?1??foo@@YAXXZ", "", "@4HA"),
        }
    }

    /// Length in bytes of the payload for `n`, `None` if it overflows `usize`
    pub fn checked_len(self, n: usize) -> Option<usize> {
        let (prefix, a, b, suffix) = self.pieces();
        n.checked_mul(a.len() + b.len())?
            .checked_add(prefix.len() + suffix.len())
    }

    /// Build the payload for `n`
    pub fn generate(self, n: usize) -> String {
        let (prefix, a, b, suffix) = self.pieces();
        let mut s = String::with_capacity(self.checked_len(n).unwrap_or(0));
        s.push_str(prefix);
        for _ in 0..n {
            s.push_str(a);
        }
        for _ in 0..n {
            s.push_str(b);
        }
        s.push_str(suffix);
        s
    }

    /// Stream the payload for `n` without materialising it
    pub fn write_to<W: Write>(self, n: usize, mut writer: W) -> io::Result<()> {
        let (prefix, a, b, suffix) = self.pieces();
        writer.write_all(prefix.as_bytes())?;
        for _ in 0..n {
            writer.write_all(a.as_bytes())?;
        }
        for _ in 0..n {
            writer.write_all(b.as_bytes())?;
        }
        writer.write_all(suffix.as_bytes())?;
        writer.flush()
    }
}
