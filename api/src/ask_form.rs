use axum::extract::multipart::{Multipart, MultipartError};

/// Fields of a `POST /ask` multipart upload.
#[derive(Debug, Default)]
pub struct AskForm {
    pub file: Option<Vec<u8>>,
    pub filename: Option<String>,
    pub question: String,
}

impl AskForm {
    /// Reads `file` and `question`; unknown fields are drained and ignored.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = AskForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("file") => {
                    form.filename = field.file_name().map(str::to_string);
                    let bytes = field.bytes().await?;
                    if !bytes.is_empty() {
                        form.file = Some(bytes.to_vec());
                    }
                }
                Some("question") => form.question = field.text().await?,
                other => {
                    log::debug!("Ignoring multipart field {:?}", other);
                    field.bytes().await?;
                }
            }
        }

        Ok(form)
    }
}
