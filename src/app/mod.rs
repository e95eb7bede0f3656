// Application layer - Use case interactors

pub mod container;
pub mod media_interactor;
pub mod thumbnail_interactor;

// Re-export interactors
pub use media_interactor::MediaInteractor;
pub use thumbnail_interactor::{ThumbnailFormats, ThumbnailInteractor};
