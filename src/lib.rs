#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod definition;
pub mod error;
pub mod invocation;
pub mod loader;
pub mod logging;
pub mod manifest;
pub mod project;
pub mod registry;
pub mod store;
pub mod template;

pub use definition::{Definition, Kind};
pub use error::{RegistryError, Result};
pub use invocation::{Invocation, Resolver};
pub use loader::RegistryLoader;
pub use registry::{Registry, RegistryHandle};
pub use template::TemplateRenderer;
