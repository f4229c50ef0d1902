pub mod analyzer;
pub mod config;
pub mod model;
pub mod output;
pub mod platform;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use analyzer::Analyzer;
pub use config::Config;
pub use model::{Analysis, ProjectDescriptor, ReferenceRecord, RegistryStatus, UsageMatrix};
pub use registry::{NugetRegistry, PackageRegistry, RegistryError};
pub use resolver::ReferenceResolver;
