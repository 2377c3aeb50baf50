//! Prompt construction for every outbound call

pub mod template;

pub use template::PromptTemplate;
