use std::sync::Arc;

use crate::components::TemplateComponent;
use crate::config::Config;
use crate::errors::WikiError;
use crate::router::RouteTable;
use crate::services::{LogWriteFailures, PageStore, WriteFailureReporter};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: PageStore,
    pub templates: Arc<TemplateComponent>,
    pub routes: Arc<RouteTable>,
    pub write_failures: Arc<dyn WriteFailureReporter>,
}

impl AppState {
    pub fn new(store: PageStore, templates: TemplateComponent) -> Self {
        Self {
            store,
            templates: Arc::new(templates),
            routes: Arc::new(RouteTable::standard()),
            write_failures: Arc::new(LogWriteFailures),
        }
    }

    /// Prepare the data directory and compile templates as configured
    pub async fn from_config(config: &Config) -> Result<Self, WikiError> {
        let store = PageStore::new(config.data_dir.clone());
        store.ensure_data_dir().await?;
        let templates = TemplateComponent::load(&config.template_dir)?;
        Ok(Self::new(store, templates))
    }

    /// Replace where failed saves are reported
    pub fn with_write_failures(mut self, reporter: Arc<dyn WriteFailureReporter>) -> Self {
        self.write_failures = reporter;
        self
    }
}

/// A wiki page as held for the duration of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self { title: title.into(), body: body.into() }
    }

    /// A page with no content yet, shown when editing a title that was never saved
    pub fn empty(title: impl Into<String>) -> Self {
        Self { title: title.into(), body: Vec::new() }
    }
}

/// The three things a client can do to a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    View,
    Edit,
    Save,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::View, Operation::Edit, Operation::Save];

    /// Path segment naming this operation, as in `/view/Home`
    pub fn name(self) -> &'static str {
        match self {
            Operation::View => "view",
            Operation::Edit => "edit",
            Operation::Save => "save",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Operation::ALL.into_iter().find(|op| op.name() == name)
    }
}
