pub mod page_store;
pub mod title_validator;
pub mod write_failures;

pub use page_store::PageStore;
pub use title_validator::{validate_path, ValidPath};
pub use write_failures::{LogWriteFailures, WriteFailureReporter};
