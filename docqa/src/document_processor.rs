use crate::error::ExtractError;
use crate::models::DocumentContext;
use std::fs;
use std::panic;
use std::path::Path;

/// Result of reading one PDF: the context, plus the error that emptied it, if any.
#[derive(Debug, Default)]
pub struct Extraction {
    pub context: DocumentContext,
    pub error: Option<ExtractError>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.context.is_empty()
    }

    pub fn into_parts(self) -> (DocumentContext, Option<ExtractError>) {
        (self.context, self.error)
    }
}

impl From<Result<DocumentContext, ExtractError>> for Extraction {
    fn from(result: Result<DocumentContext, ExtractError>) -> Self {
        match result {
            Ok(context) => Self {
                context,
                error: None,
            },
            Err(error) => Self {
                context: DocumentContext::empty(),
                error: Some(error),
            },
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentProcessor;

impl DocumentProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts the text of every page, in order, without separators.
    ///
    /// Never fails: an unreadable PDF yields an empty context and the error
    /// is handed back alongside it.
    pub fn extract_text(&self, bytes: &[u8]) -> Extraction {
        let extraction = Extraction::from(self.try_extract_text(bytes));
        if let Some(err) = &extraction.error {
            log::warn!("Error while reading PDF: {}", err);
        }
        extraction
    }

    pub fn try_extract_text(&self, bytes: &[u8]) -> Result<DocumentContext, ExtractError> {
        log::info!("Extracting text from PDF ({} bytes)", bytes.len());

        // pdf-extract panics on some malformed inputs
        let pages = match panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes)) {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => return Err(ExtractError::Parse(e.to_string())),
            Err(_) => return Err(ExtractError::Panicked),
        };

        let text = join_pages(&pages);
        if text.is_empty() {
            log::info!("PDF has {} pages but no extractable text", pages.len());
        } else {
            log::info!("Extracted {} characters from {} pages", text.chars().count(), pages.len());
        }

        Ok(DocumentContext::new(text))
    }

    pub fn process_file(&self, file_path: &Path) -> Extraction {
        log::info!("Processing PDF: {}", file_path.display());

        match fs::read(file_path) {
            Ok(bytes) => self.extract_text(&bytes),
            Err(e) => {
                log::warn!("Could not read {}: {}", file_path.display(), e);
                Extraction::from(Err(ExtractError::Io(e)))
            }
        }
    }
}

/// Concatenates page texts in order and trims the whole result.
///
/// pdf-extract opens every page with a blank-line page break; that prefix is
/// dropped so pages butt up against each other.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let joined: String = pages
        .iter()
        .map(|p| p.as_ref().trim_start_matches(['\r', '\n']))
        .collect();
    joined.trim().to_string()
}
