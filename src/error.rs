//! Error types shared by the renderer and the host bridge

/// Errors surfaced by the backdrop renderer and its host bridge
#[derive(thiserror::Error, Debug)]
pub enum BackdropError {
    /// The render thread could not be started
    #[error("failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// A shared state mutex was poisoned by a panicking thread
    #[error("shared state poisoned: {0}")]
    Poisoned(&'static str),

    /// No frame has been published yet
    #[error("no frame yet (backdrop not mounted or still loading)")]
    FrameNotReady,

    /// The host reported a viewport with a zero dimension
    #[error("invalid viewport size {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    /// A published frame does not match its declared size
    #[error("frame buffer of {len} bytes does not match {width}x{height} RGBA")]
    InvalidFrame { width: u32, height: u32, len: usize },

    /// Image encoding failed
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    /// Statistics could not be serialized for the page
    #[cfg(feature = "desktop")]
    #[error("stats serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BackdropError>;
