pub mod models;
pub mod error;
pub mod config;
pub mod document_processor;
pub mod answer_service;
pub mod query_service;

pub use models::*;
pub use error::{AskError, ConfigError, ExtractError, GenerateError};
pub use config::{GeneratorConfig, SamplingParams};
pub use document_processor::{DocumentProcessor, Extraction};
pub use answer_service::AnswerGenerator;
pub use query_service::{answer_once, Answered, QaSession};
