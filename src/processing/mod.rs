//! Embedding extraction and dimensionality reduction

pub mod batch;
pub mod pca;
pub mod preprocess;

pub use batch::BatchRunner;
pub use pca::Pca;
pub use preprocess::Preprocessor;
