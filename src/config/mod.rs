//! Boot-time configuration schema.

pub mod settings;

pub use settings::*;
