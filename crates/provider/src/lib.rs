//! Source access layer for pymod.
//!
//! Everything that touches the world outside the process lives here:
//! discovering `.py` files, parsing them into the core definition model,
//! scaffolding new modules, moving modules (with import rewriting), and
//! probing the Python toolchain.

pub mod mover;
pub mod parser;
pub mod scaffold;
pub mod toolchain;
pub mod walker;

pub use parser::{parse_source, parse_source_lenient, ParsedModule};
