use std::io;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Custom error types for the wiki application
#[derive(Debug)]
pub enum WikiError {
    Io(io::Error),
    NotFound,
    InvalidPath,
    MethodNotAllowed { allow: &'static str },
    BadForm(String),
    TemplateError(String),
    RenderError(String),
}

impl From<io::Error> for WikiError {
    fn from(err: io::Error) -> Self {
        WikiError::Io(err)
    }
}

impl std::fmt::Display for WikiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WikiError::Io(e) => write!(f, "I/O error: {}", e),
            WikiError::NotFound => write!(f, "Not found"),
            WikiError::InvalidPath => write!(f, "Invalid page path"),
            WikiError::MethodNotAllowed { allow } => {
                write!(f, "Method not allowed (allow: {})", allow)
            }
            WikiError::BadForm(e) => write!(f, "Unreadable form: {}", e),
            WikiError::TemplateError(e) => write!(f, "Template error: {}", e),
            WikiError::RenderError(e) => write!(f, "Render error: {}", e),
        }
    }
}

impl std::error::Error for WikiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WikiError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Server-side failures only carry their detail to the client in debug builds.
fn internal_error(detail: String) -> Response {
    let body = if cfg!(debug_assertions) {
        detail
    } else {
        "Internal Server Error".to_string()
    };
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        match self {
            WikiError::NotFound | WikiError::InvalidPath => {
                (StatusCode::NOT_FOUND, "404 page not found").into_response()
            }
            WikiError::MethodNotAllowed { allow } => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, allow)],
                "Method not allowed",
            )
                .into_response(),
            WikiError::BadForm(e) => (StatusCode::BAD_REQUEST, e).into_response(),
            err @ (WikiError::Io(_)
            | WikiError::TemplateError(_)
            | WikiError::RenderError(_)) => internal_error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_path_is_not_found() {
        let resp = WikiError::InvalidPath.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn method_not_allowed_sets_allow_header() {
        let resp = WikiError::MethodNotAllowed { allow: "POST" }.into_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers().get(header::ALLOW).unwrap(), "POST");
    }

    #[test]
    fn bad_form_is_bad_request() {
        let resp = WikiError::BadForm("Failed to buffer the request body".into())
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn render_error_is_internal() {
        let resp = WikiError::RenderError("no template named \"x\"".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
