//! Ollama HTTP clients for the embedding, scoring and answering collaborators

pub mod chat;
pub mod client;
pub mod embedding;
pub mod generate;

pub use chat::OllamaChat;
pub use embedding::OllamaEmbedder;
pub use generate::OllamaGenerator;
