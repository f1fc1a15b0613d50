pub mod annotator;
pub mod content;
pub mod overlay;
pub mod pipeline;
pub mod scanner;
pub mod screenshot;
pub mod traits;
pub mod types;
