//! Flatwiki - a small file-backed wiki server
//!
//! Pages are plain text files named after their title. Clients view, edit and
//! save them over HTTP; pages are rendered through the `view` and `edit`
//! HTML templates.

pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod router;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use components::TemplateComponent;
pub use config::Config;
pub use errors::WikiError;
pub use logger::Logger;
pub use router::{build_router, Route, RouteTable};
pub use services::{validate_path, LogWriteFailures, PageStore, ValidPath, WriteFailureReporter};
pub use types::{AppState, Operation, Page};
