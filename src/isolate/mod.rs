//! Isolate manifests from `gn desc ... runtime_deps` output
//!
//! ```text
//! gn desc out/gn //clang/test:check-clang runtime_deps | \
//!     devscripts to-isolate > out/gn/check-clang.isolate
//! ```

mod manifest;
mod pyrepr;

pub use manifest::{Manifest, Variables};
pub use pyrepr::{python_str, LINE_WIDTH};
