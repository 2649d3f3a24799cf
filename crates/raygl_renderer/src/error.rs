//! Errors surfaced by scene construction, configuration and dispatch.

use raygl_core::ImageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot build a BVH over an empty primitive set")]
    EmptyScene,

    #[error("Unknown scene: {0}")]
    UnknownScene(String),

    #[error("Scene '{0}' needs an image texture but none was supplied")]
    MissingTexture(String),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid render config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Dispatch error: {0}")]
    Dispatch(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
