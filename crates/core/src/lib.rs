//! Domain models, shared types, and error definitions.
//!
//! Foundation crate -- no I/O dependencies.

pub mod error;
pub mod path;
pub mod types;

pub use error::{PymodError, PymodResult};
pub use path::ModulePath;
pub use types::{Class, DefKind, Function, ModuleKind, Param, ParamKind, Variable};
