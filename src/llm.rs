pub mod dummy;
pub mod openai;

use crate::LLMError;
use crate::config::BackendConfig;
use crate::result::CompletionResult;
use anyhow::anyhow;
use regex::Regex;

/// Message substituted for a completion the guardrails check flagged.
pub const GUARDRAILS_FILTERED: &str = "Response filtered by guardrails";

pub trait LLMBuilder {
    type Built: LLM;

    fn build(&self, cfg: &BackendConfig) -> Result<Self::Built, LLMError>;
}

/// Hosted language model session. One method per playground functionality.
pub trait LLM {
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
        guardrails: bool,
        system_prompt: &str,
    ) -> Result<CompletionResult, LLMError>;

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, LLMError>;

    async fn summarize(&self, text: &str) -> Result<String, LLMError>;

    async fn extract_answer(&self, text: &str, query: &str) -> Result<String, LLMError>;

    /// Score in `[-1, 1]`, negative to positive.
    async fn sentiment(&self, text: &str) -> Result<f32, LLMError>;
}

fn translate_prompt(source_lang: &str, target_lang: &str) -> String {
    format!(
        r#"
You are a professional translator from {} language to {}.
Translate the text of my message accurately and naturally.
If the text is already in {}, return it unchanged.
Output just the translation and nothing else.
"#,
        source_lang, target_lang, target_lang
    )
    .trim()
    .to_owned()
}

const SUMMARIZE_PROMPT: &str = "Summarize the text of my message in a few sentences. \
Output just the summary and nothing else.";

fn extract_prompt(query: &str) -> String {
    format!(
        r#"
Answer the question "{}" using only the text of my message.
Quote the answer from the text when possible.
If the text does not contain the answer, output an empty line.
Output just the answer and nothing else.
"#,
        query
    )
    .trim()
    .to_owned()
}

const SENTIMENT_PROMPT: &str = "Rate the sentiment of the text of my message with a single \
number between -1 (most negative) and 1 (most positive), 0 being neutral. \
Output just the number and nothing else.";

/// Reads the last decimal number in a model reply as a sentiment score.
///
/// Chatty replies put the verdict after any echoed scale or list numbering.
pub fn parse_sentiment(reply: &str) -> Result<f32, LLMError> {
    let number_regex = Regex::new(r"[-+]?(\d+\.?\d*|\.\d+)").expect("valid regex");
    let Some(m) = number_regex.find_iter(reply).last() else {
        return Err(LLMError::InteractionError(anyhow!(
            "No sentiment score in response: {:?}",
            reply
        )));
    };
    let score: f32 = m
        .as_str()
        .parse()
        .map_err(|e| LLMError::InteractionError(anyhow!("{e}")))?;
    if !(-1.0..=1.0).contains(&score) {
        return Err(LLMError::InteractionError(anyhow!(
            "Sentiment score {} is outside [-1, 1]",
            score
        )));
    }
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_score() {
        assert_eq!(parse_sentiment("0.85").unwrap(), 0.85);
        assert_eq!(parse_sentiment("-1").unwrap(), -1.0);
        assert_eq!(parse_sentiment("+.5").unwrap(), 0.5);
    }

    #[test]
    fn parse_score_wrapped_in_words() {
        assert_eq!(parse_sentiment("Score: -0.3.").unwrap(), -0.3);
    }

    #[test]
    fn parse_score_after_echoed_scale_or_numbering() {
        assert_eq!(
            parse_sentiment("On a scale from -1 to 1, I'd rate this 0.8.").unwrap(),
            0.8
        );
        assert_eq!(parse_sentiment("1. Score: 0.4").unwrap(), 0.4);
    }

    #[test]
    fn reject_missing_or_out_of_range_score() {
        assert!(matches!(
            parse_sentiment("quite positive"),
            Err(LLMError::InteractionError(_))
        ));
        assert!(matches!(
            parse_sentiment("7"),
            Err(LLMError::InteractionError(_))
        ));
    }

    #[test]
    fn prompts_mention_their_parameters() {
        let prompt = translate_prompt("German", "English");
        assert!(prompt.starts_with("You are a professional translator from German language to English."));
        assert!(extract_prompt("Who wrote it?").contains(r#""Who wrote it?""#));
    }
}
