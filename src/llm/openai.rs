use super::{LLM, LLMBuilder};
use crate::config::BackendConfig;
use crate::result::{CompletionChoice, CompletionResult, Usage};
use crate::utils::substr_up_to_len;
use crate::LLMError;
use anyhow::anyhow;
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    CreateChatCompletionResponse, CreateModerationRequestArgs,
};
use std::error::Error;

const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Builder for OpenAI-compatible LLM APIs
pub struct OpenAiLLMBuilder;

impl LLMBuilder for OpenAiLLMBuilder {
    type Built = OpenAiLLM;

    fn build(&self, cfg: &BackendConfig) -> Result<Self::Built, LLMError> {
        let api_key = cfg
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_VAR).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LLMError::OtherError(anyhow!(
                    "No API key: set backend.api_key in the config or {API_KEY_VAR}"
                ))
            })?;

        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(api_base) = cfg.api_base.as_deref() {
            config = config.with_api_base(api_base);
        }

        Ok(OpenAiLLM {
            client: Client::with_config(config),
            task_model: cfg.task_model.clone(),
        })
    }
}

pub struct OpenAiLLM {
    client: Client<OpenAIConfig>,
    task_model: String,
}

impl OpenAiLLM {
    async fn chat(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> Result<CreateChatCompletionResponse, LLMError> {
        log::debug!(
            r#"Sending message to {model} "{}...""#,
            substr_up_to_len(user_prompt, 20)
        );

        let mut messages = Vec::<ChatCompletionRequestMessage>::with_capacity(2);
        if !system_prompt.trim().is_empty() {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()?
                    .into(),
            );
        }
        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()?
                .into(),
        );

        let mut req = CreateChatCompletionRequestArgs::default();
        req.model(model).messages(messages);
        if let Some(temperature) = temperature {
            req.temperature(temperature);
        }
        if let Some(max_tokens) = max_tokens {
            req.max_completion_tokens(max_tokens);
        }

        let response = self.client.chat().create(req.build()?).await?;
        log::debug!("Response from {} has {} choice(s)", response.model, response.choices.len());
        Ok(response)
    }

    /// Text of the first choice of a fixed-instruction task.
    async fn task(&self, instructions: &str, text: &str) -> Result<String, LLMError> {
        let response = self
            .chat(&self.task_model, instructions, text, Some(0.0), None)
            .await?;
        let Some(choice) = response.choices.into_iter().next() else {
            return Err(LLMError::InteractionError(anyhow!("No choices in response")));
        };
        match (choice.message.content, choice.message.refusal) {
            (Some(content), _) => Ok(content.trim().to_owned()),
            (None, Some(refusal)) => Err(LLMError::InteractionError(anyhow!(
                "Model refused: {refusal}"
            ))),
            (None, None) => Err(LLMError::InteractionError(anyhow!("Empty response"))),
        }
    }

    async fn is_flagged(&self, text: &str) -> Result<bool, LLMError> {
        let req = CreateModerationRequestArgs::default().input(text).build()?;
        let response = self.client.moderations().create(req).await?;
        Ok(response.results.iter().any(|r| r.flagged))
    }
}

/// Text of a returned choice. A refusal stands in for missing content.
fn reply_text(content: Option<String>, refusal: Option<String>) -> String {
    content.or(refusal).unwrap_or_default()
}

fn choice_messages(text: String, flagged: bool) -> String {
    if flagged {
        super::GUARDRAILS_FILTERED.to_owned()
    } else {
        text
    }
}

impl LLM for OpenAiLLM {
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
        guardrails: bool,
        system_prompt: &str,
    ) -> Result<CompletionResult, LLMError> {
        let response = self
            .chat(model, system_prompt, prompt, Some(temperature), Some(max_tokens))
            .await?;

        let mut choices = Vec::with_capacity(response.choices.len());
        for choice in response.choices {
            let text = reply_text(choice.message.content, choice.message.refusal);
            let flagged = guardrails && self.is_flagged(&text).await?;
            if flagged {
                log::warn!("Completion from {} flagged by guardrails", response.model);
            }
            choices.push(CompletionChoice {
                messages: choice_messages(text, flagged),
            });
        }

        Ok(CompletionResult {
            choices,
            created: i64::from(response.created),
            model: response.model,
            usage: response.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, LLMError> {
        self.task(&super::translate_prompt(source_lang, target_lang), text)
            .await
    }

    async fn summarize(&self, text: &str) -> Result<String, LLMError> {
        self.task(super::SUMMARIZE_PROMPT, text).await
    }

    async fn extract_answer(&self, text: &str, query: &str) -> Result<String, LLMError> {
        self.task(&super::extract_prompt(query), text).await
    }

    async fn sentiment(&self, text: &str) -> Result<f32, LLMError> {
        let reply = self.task(super::SENTIMENT_PROMPT, text).await?;
        super::parse_sentiment(&reply)
    }
}

impl From<OpenAIError> for LLMError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::Reqwest(e) => LLMError::ConnectionError(if let Some(e) = e.source() {
                anyhow!("{e}")
            } else {
                e.into()
            }),
            OpenAIError::ApiError(e) => LLMError::ApiError(anyhow!("{e}")),
            OpenAIError::JSONDeserialize(e) => LLMError::InteractionError(e.into()),
            OpenAIError::StreamError(e) => LLMError::ConnectionError(anyhow!("{e}")),
            OpenAIError::InvalidArgument(e) => LLMError::OtherError(anyhow!("{e}")),
            other => LLMError::OtherError(anyhow!("{other}")),
        }
    }
}
