use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use axum::response::Html;
use log::{debug, info, warn};

use crate::errors::WikiError;
use crate::types::Page;
use crate::utils::{escape_bytes, escape_html};

/// Templates every server needs, with the copies shipped in the binary
const BUILTIN_TEMPLATES: [(&str, &str); 2] = [
    ("view", include_str!("../../templates/view.html")),
    ("edit", include_str!("../../templates/edit.html")),
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Title,
    Body,
}

/// A template split into literal text and `{{TITLE}}` / `{{BODY}}` slots
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    segments: Vec<Segment>,
}

impl CompiledTemplate {
    pub fn compile(name: &str, source: &str) -> Result<Self, WikiError> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| {
                WikiError::TemplateError(format!("{}: unterminated placeholder", name))
            })?;
            let slot = match after[..end].trim() {
                "TITLE" => Segment::Title,
                "BODY" => Segment::Body,
                other => {
                    return Err(WikiError::TemplateError(format!(
                        "{}: unknown placeholder {{{{{}}}}}",
                        name, other
                    )));
                }
            };
            segments.push(slot);
            rest = &after[end + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    fn execute(&self, page: &Page) -> String {
        let title = escape_html(&page.title);
        let body = escape_bytes(&page.body);
        let mut html = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => html.push_str(text),
                Segment::Title => html.push_str(&title),
                Segment::Body => html.push_str(&body),
            }
        }
        html
    }
}

/// Holds the compiled page templates and turns pages into HTML
#[derive(Debug, Default)]
pub struct TemplateComponent {
    templates: HashMap<String, CompiledTemplate>,
}

impl TemplateComponent {
    /// Create a template component with no templates registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the templates compiled into the binary
    pub fn builtin() -> Result<Self, WikiError> {
        let mut component = Self::new();
        for (name, source) in BUILTIN_TEMPLATES {
            component.register(name, source)?;
        }
        Ok(component)
    }

    /// Load `<name>.html` for every page template from `dir`.
    ///
    /// A missing file falls back to the built-in copy. A file that exists but
    /// cannot be read or compiled is an error.
    pub fn load(dir: &Path) -> Result<Self, WikiError> {
        let mut component = Self::new();
        for (name, builtin) in BUILTIN_TEMPLATES {
            let path = dir.join(format!("{}.html", name));
            let source = match fs::read_to_string(&path) {
                Ok(source) => {
                    info!("Loaded template '{}' from {:?}", name, path);
                    source
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!("Template {:?} not found, using built-in '{}' template", path, name);
                    builtin.to_string()
                }
                Err(e) => return Err(WikiError::Io(e)),
            };
            component.register(name, &source)?;
        }
        Ok(component)
    }

    /// Compile `source` and make it available under `name`
    pub fn register(&mut self, name: &str, source: &str) -> Result<(), WikiError> {
        let compiled = CompiledTemplate::compile(name, source)?;
        debug!("Registered template '{}' ({} segments)", name, compiled.segments.len());
        self.templates.insert(name.to_string(), compiled);
        Ok(())
    }

    #[cfg(test)]
    fn has(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Fill the named template with the page's title and body
    pub fn render(&self, page: &Page, name: &str) -> Result<Html<String>, WikiError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| WikiError::RenderError(format!("no template named \"{}\"", name)))?;
        Ok(Html(template.execute(page)))
    }
}
