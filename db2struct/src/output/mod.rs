//! Output handling
//!
//! Generated units go to stdout or to files; handler scaffolds are rendered
//! from user templates.

pub mod scaffold;
pub mod writer;

pub use scaffold::{render_scaffold, write_scaffold, ScaffoldContext};
pub use writer::{OutputWriter, CUSTOM_CODE_MARKER, GENERATED_HEADER};
