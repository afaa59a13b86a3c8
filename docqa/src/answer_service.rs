use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::models::*;
use reqwest::Client;

/// Answers a question against a document context with one chat completion.
pub struct AnswerGenerator {
    client: Client,
    config: GeneratorConfig,
}

impl AnswerGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: GeneratorConfig) -> Self {
        Self { client, config }
    }

    pub async fn generate(&self, question: &str, context: &str) -> Result<String, GenerateError> {
        if question.trim().is_empty() {
            return Err(GenerateError::EmptyQuestion);
        }
        let (endpoint, api_key) = self.config.credentials()?;

        let request = self.build_request(question, context);
        let url = self.config.completions_url(endpoint);

        log::info!(
            "Requesting completion from deployment {} ({} context chars)",
            self.config.model,
            context.chars().count()
        );

        let response = self
            .client
            .post(&url)
            .query(&[("api-version", self.config.api_version.as_str())])
            .header("api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| match e.error.code {
                    Some(code) => format!("{} ({})", e.error.message, code),
                    None => e.error.message,
                })
                .unwrap_or(body);
            log::error!("Completion endpoint returned {}: {}", status, message);
            return Err(GenerateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerateError::EmptyCompletion)
    }

    pub fn build_request(&self, question: &str, context: &str) -> ChatCompletionRequest {
        let sampling = self.config.sampling;

        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(self.build_prompt(question, context))],
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            max_tokens: sampling.max_tokens,
            frequency_penalty: sampling.frequency_penalty,
        }
    }

    pub fn build_prompt(&self, question: &str, context: &str) -> String {
        format!(
            "\n{} document:\n{}\n\nQuestion: {}\nAnswer:",
            self.config.instruction, context, question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> AnswerGenerator {
        AnswerGenerator::new(GeneratorConfig::new("https://example.invalid", "key"))
    }

    #[test]
    fn prompt_embeds_context_then_question() {
        let prompt = generator().build_prompt("Who signed it?", "Signed by Ada.");
        assert_eq!(
            prompt,
            "\nyou are a bot that answers questions from the document document:\nSigned by Ada.\n\nQuestion: Who signed it?\nAnswer:"
        );
    }

    #[test]
    fn request_is_single_user_turn_with_default_sampling() {
        let request = generator().build_request("q", "ctx");
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, Role::User);
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.top_p, 0.6);
        assert_eq!(request.max_tokens, 256);
        assert_eq!(request.frequency_penalty, 0.7);
    }

    #[tokio::test]
    async fn missing_credentials_short_circuit() {
        let generator = AnswerGenerator::new(GeneratorConfig::default());
        let err = generator.generate("What is this?", "ctx").await.unwrap_err();
        assert!(matches!(err, GenerateError::MissingCredentials));
    }

    #[tokio::test]
    async fn blank_question_is_rejected() {
        let err = generator().generate("   ", "ctx").await.unwrap_err();
        assert!(matches!(err, GenerateError::EmptyQuestion));
    }
}
