use log::error;

use crate::errors::WikiError;

/// Receives save failures that are not shown to the client.
///
/// The save handler always redirects to the view page, even when the write
/// failed. Anything that should happen on a failed write goes through here.
pub trait WriteFailureReporter: Send + Sync {
    fn report(&self, title: &str, err: &WikiError);
}

/// Logs failed writes at error level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriteFailures;

impl WriteFailureReporter for LogWriteFailures {
    fn report(&self, title: &str, err: &WikiError) {
        error!("Failed to save page '{}': {}", title, err);
    }
}
