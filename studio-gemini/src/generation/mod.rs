pub mod builder;
pub mod model;

pub use builder::ContentBuilder;
pub use model::{GenerateContentRequest, GenerationConfig, GenerationResponse};
