//! Core data types for projects, references and analysis results.
//!
//! - [`ProjectDescriptor`] - A discovered project file
//! - [`ManifestPackage`] - A package pinned in a project's manifest
//! - [`ReferenceRecord`] - One declared reference, shared by every project naming it
//! - [`RegistryStatus`] - What the registry knows about a reference
//! - [`ReferenceTable`] / [`UsageMatrix`] / [`Analysis`] - Aggregated results
//!
//! # Example
//!
//! ```
//! use refscan::model::ReferenceName;
//!
//! let parsed = ReferenceName::parse("Newtonsoft.Json, Version=12.0.0.0, Culture=neutral");
//! assert_eq!(parsed.name, "Newtonsoft.Json");
//! assert_eq!(parsed.version, "12.0.0.0");
//! ```

mod analysis;
mod project;
mod reference;

pub use analysis::*;
pub use project::*;
pub use reference::*;
