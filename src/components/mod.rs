pub mod templates;

pub use templates::{CompiledTemplate, TemplateComponent};
