use crate::answer_service::AnswerGenerator;
use crate::document_processor::{DocumentProcessor, Extraction};
use crate::error::{AskError, ExtractError};
use crate::models::DocumentContext;
use std::path::Path;
use std::sync::Arc;

/// A single user's interaction: at most one loaded document, any number of
/// independent questions against it.
pub struct QaSession {
    generator: Arc<AnswerGenerator>,
    processor: DocumentProcessor,
    document: Option<DocumentContext>,
}

impl QaSession {
    pub fn new(generator: Arc<AnswerGenerator>) -> Self {
        Self {
            generator,
            processor: DocumentProcessor::new(),
            document: None,
        }
    }

    /// Replaces the current document. The new context is kept even when
    /// extraction failed, so questions still go through (ungrounded).
    pub fn load_document(&mut self, bytes: &[u8]) -> Option<ExtractError> {
        let (context, error) = self.processor.extract_text(bytes).into_parts();
        self.document = Some(context);
        error
    }

    pub fn load_file(&mut self, path: &Path) -> Option<ExtractError> {
        let (context, error) = self.processor.process_file(path).into_parts();
        self.document = Some(context);
        error
    }

    pub fn document(&self) -> Option<&DocumentContext> {
        self.document.as_ref()
    }

    pub async fn ask(&self, question: &str) -> Result<String, AskError> {
        let context = self.document.as_ref().ok_or(AskError::NoDocument)?;
        ask_with_context(&self.generator, question, context).await
    }
}

/// Outcome of the one-shot upload-and-ask flow.
#[derive(Debug)]
pub struct Answered {
    pub answer: String,
    pub extraction_error: Option<ExtractError>,
    pub context_empty: bool,
}

/// Extracts `bytes` and answers `question` against them in one go.
///
/// PDF parsing runs on the blocking pool so large uploads don't stall the
/// async workers.
pub async fn answer_once(
    generator: &AnswerGenerator,
    processor: &DocumentProcessor,
    bytes: Vec<u8>,
    question: &str,
) -> Result<Answered, AskError> {
    if question.trim().is_empty() {
        return Err(AskError::EmptyQuestion);
    }

    let processor = *processor;
    let extraction = tokio::task::spawn_blocking(move || processor.extract_text(&bytes))
        .await
        .unwrap_or_else(|e| {
            log::error!("PDF extraction task failed: {}", e);
            Extraction::from(Err(ExtractError::Panicked))
        });

    let (context, extraction_error) = extraction.into_parts();
    let answer = ask_with_context(generator, question, &context).await?;

    Ok(Answered {
        answer,
        context_empty: context.is_empty(),
        extraction_error,
    })
}

async fn ask_with_context(
    generator: &AnswerGenerator,
    question: &str,
    context: &DocumentContext,
) -> Result<String, AskError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AskError::EmptyQuestion);
    }
    if context.is_empty() {
        log::warn!("Answering without document context");
    }

    let answer = generator.generate(question, context.as_str()).await?;
    log::info!("Generated answer ({} chars)", answer.chars().count());
    Ok(answer)
}
