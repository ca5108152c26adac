use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::errors::WikiError;
use crate::types::Operation;

/// A request path that passed validation: the title is safe to use as a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPath {
    pub operation: Operation,
    pub title: String,
}

fn valid_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^/(edit|save|view)/([a-zA-Z0-9]+)$").expect("valid page path regex")
    })
}

/// Split a request path into operation and title.
///
/// This is the only place a title is taken from a URL. Anything that does not
/// match exactly is rejected with [`WikiError::InvalidPath`].
pub fn validate_path(path: &str) -> Result<ValidPath, WikiError> {
    let caps = valid_path_regex().captures(path).ok_or_else(|| {
        debug!("Rejecting request path: '{}'", path);
        WikiError::InvalidPath
    })?;

    let operation = Operation::from_name(&caps[1]).ok_or(WikiError::InvalidPath)?;
    Ok(ValidPath { operation, title: caps[2].to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_each_operation() {
        for (path, op) in [
            ("/view/Home", Operation::View),
            ("/edit/Home", Operation::Edit),
            ("/save/Home", Operation::Save),
        ] {
            let valid = validate_path(path).unwrap();
            assert_eq!(valid.operation, op);
            assert_eq!(valid.title, "Home");
        }
    }

    #[test]
    fn accepts_alphanumeric_titles() {
        let valid = validate_path("/view/Page2024abc").unwrap();
        assert_eq!(valid.title, "Page2024abc");
    }

    #[test]
    fn rejects_malformed_paths() {
        for path in [
            "/",
            "/view/",
            "/view",
            "/view/bad title!",
            "/view/bad%20title",
            "/view/../secret",
            "/view/a/b",
            "/view/Home/",
            "/view/Home.txt",
            "/view/under_score",
            "/delete/Home",
            "/VIEW/Home",
            "view/Home",
            "/view/Home\n",
        ] {
            assert!(
                matches!(validate_path(path), Err(WikiError::InvalidPath)),
                "expected {path:?} to be rejected"
            );
        }
    }
}
