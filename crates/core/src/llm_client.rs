use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse,
    },
};
use async_trait::async_trait;
use tracing::debug;

/// Sampling temperature used for every completion.
pub const TEMPERATURE: f32 = 0.7;
/// Output ceiling, in tokens, for every completion.
pub const MAX_TOKENS: u32 = 500;

/// Failure of a single completion exchange.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Transport failure or a non-success response from the provider.
    #[error("completion request failed: {0}")]
    Request(#[from] OpenAIError),
    #[error("completion response contained no choices")]
    NoChoice,
    #[error("completion response had no text content")]
    EmptyResponse,
}

/// A client that performs one system + user completion and returns the raw text.
///
/// Implementations make exactly one attempt per call; retries are the caller's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends one system + user exchange to the model.
    ///
    /// # Arguments
    ///
    /// * `system` - The instruction that frames the model's role.
    /// * `user` - The rendered user message, including the learner's text.
    ///
    /// # Returns
    ///
    /// The text of the first choice, or a `CompletionError` if the request failed
    /// or the reply was empty.
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError>;
}

/// An implementation of `CompletionClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The model identifier used for every completion (e.g., "gpt-4o-mini").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    /// Builds the chat request for one exchange: the system message first,
    /// then the user message, with the fixed sampling settings.
    #[allow(deprecated)]
    fn build_request(
        &self,
        system: &str,
        user: &str,
    ) -> Result<CreateChatCompletionRequest, CompletionError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user)
                    .build()?
                    .into(),
            ])
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS)
            .build()?;
        Ok(request)
    }
}

#[async_trait]
impl CompletionClient for OpenAICompatibleClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let request = self.build_request(system, user)?;

        debug!(model = %self.model, "Sending completion request");
        let response: CreateChatCompletionResponse = self.client.chat().create(request).await?;
        extract_text(response)
    }
}

fn extract_text(response: CreateChatCompletionResponse) -> Result<String, CompletionError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(CompletionError::NoChoice)?;

    match choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(CompletionError::EmptyResponse),
    }
}
