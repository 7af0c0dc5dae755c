// Crate error type. Every variant states *where* things went wrong.
// The scratch core itself never fails: erase/spawn/advance degrade to no-ops.
// Only the edges (window, image, config) report errors.

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Creating the window failed
    #[error("window init error: {0}")]
    WindowInit(String),

    /// Pushing the framebuffer to the window failed
    #[error("window update error: {0}")]
    WindowUpdate(String),

    /// Reading or decoding the decorative coating image failed
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// Config file could not be read, parsed, or failed validation
    #[error("config error: {0}")]
    Config(String),

    /// A surface was asked for a zero-sized buffer
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

impl Error {
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Self::ImageLoad(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
