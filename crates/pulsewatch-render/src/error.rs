use thiserror::Error;

/// Errors a display sink can hit while presenting a frame.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("display write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("template render failed: {0}")]
    Template(#[from] askama::Error),
}
