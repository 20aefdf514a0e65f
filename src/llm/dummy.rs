use super::{LLM, LLMBuilder};
use crate::config::BackendConfig;
use crate::result::{CompletionChoice, CompletionResult, Usage};
use crate::LLMError;
use unicode_segmentation::UnicodeSegmentation;

/// Offline stand-in that answers deterministically, for running the playground without credentials.
pub struct DummyLLMBuilder;

impl LLMBuilder for DummyLLMBuilder {
    type Built = DummyLLM;

    fn build(&self, _cfg: &BackendConfig) -> Result<Self::Built, LLMError> {
        Ok(DummyLLM)
    }
}

pub struct DummyLLM;

const POSITIVE: &[&str] = &[
    "good", "great", "excellent", "love", "loved", "like", "happy", "nice", "wonderful", "amazing",
    "best", "fantastic", "pleasant", "enjoy", "enjoyed",
];
const NEGATIVE: &[&str] = &[
    "bad", "terrible", "awful", "hate", "hated", "dislike", "sad", "poor", "worst", "horrible",
    "boring", "angry", "disappointing", "broken", "ugly",
];

fn word_count(s: &str) -> u32 {
    u32::try_from(s.unicode_words().count()).unwrap_or(u32::MAX)
}

/// Balance of positive over negative lexicon words, in `[-1, 1]`. No hits read as neutral.
fn lexicon_score(text: &str) -> f32 {
    let (mut pos, mut neg) = (0u32, 0u32);
    for word in text.unicode_words().map(str::to_lowercase) {
        if POSITIVE.contains(&word.as_str()) {
            pos += 1;
        } else if NEGATIVE.contains(&word.as_str()) {
            neg += 1;
        }
    }
    if pos + neg == 0 {
        return 0.0;
    }
    (pos as f32 - neg as f32) / (pos + neg) as f32
}

impl LLM for DummyLLM {
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        _temperature: f32,
        max_tokens: u32,
        _guardrails: bool,
        system_prompt: &str,
    ) -> Result<CompletionResult, LLMError> {
        let messages = prompt
            .unicode_words()
            .take(max_tokens as usize)
            .collect::<Vec<_>>()
            .join(" ");
        let prompt_tokens = word_count(prompt).saturating_add(word_count(system_prompt));
        let completion_tokens = word_count(&messages);
        Ok(CompletionResult {
            choices: vec![CompletionChoice { messages }],
            created: chrono::Utc::now().timestamp(),
            model: model.to_owned(),
            usage: Some(Usage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens.saturating_add(completion_tokens),
            }),
        })
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, LLMError> {
        Ok(format!("[{source_lang} -> {target_lang}] {text}"))
    }

    async fn summarize(&self, text: &str) -> Result<String, LLMError> {
        Ok(text
            .unicode_sentences()
            .next()
            .unwrap_or_default()
            .trim()
            .to_owned())
    }

    async fn extract_answer(&self, text: &str, query: &str) -> Result<String, LLMError> {
        let query_words: Vec<String> = query.unicode_words().map(str::to_lowercase).collect();
        let answer = text.unicode_sentences().find(|sentence| {
            sentence
                .unicode_words()
                .any(|w| query_words.contains(&w.to_lowercase()))
        });
        Ok(answer.unwrap_or_default().trim().to_owned())
    }

    async fn sentiment(&self, text: &str) -> Result<f32, LLMError> {
        Ok(lexicon_score(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn complete_echoes_prompt_within_token_limit() {
        let result = DummyLLM
            .complete("m", "one two three", 0.5, 2, false, "")
            .await
            .unwrap();

        assert_eq!(result.model, "m");
        assert_eq!(result.choices[0].messages, "one two");
        assert_eq!(result.usage.map(|u| u.total_tokens), Some(5));
    }

    #[tokio::test]
    async fn summarize_keeps_first_sentence() {
        let summary = DummyLLM
            .summarize("The quick brown fox. It jumps.")
            .await
            .unwrap();

        assert_eq!(summary, "The quick brown fox.");
    }

    #[tokio::test]
    async fn extract_finds_sentence_mentioning_query() {
        let answer = DummyLLM
            .extract_answer("Rust is fast. Cargo builds it.", "what about cargo")
            .await
            .unwrap();

        assert_eq!(answer, "Cargo builds it.");
    }

    #[tokio::test]
    async fn translate_marks_language_pair() {
        let translated = DummyLLM.translate("hola", "es", "es").await.unwrap();

        assert_eq!(translated, "[es -> es] hola");
    }

    #[tokio::test]
    async fn sentiment_follows_the_wording() {
        assert_eq!(DummyLLM.sentiment("I love it, great stuff").await.unwrap(), 1.0);
        assert_eq!(DummyLLM.sentiment("Awful. Just bad.").await.unwrap(), -1.0);
        assert_eq!(DummyLLM.sentiment("Good food, terrible BAD service").await.unwrap(), -1.0 / 3.0);
    }

    #[tokio::test]
    async fn sentiment_without_cues_is_neutral() {
        assert_eq!(DummyLLM.sentiment("The meeting is at noon.").await.unwrap(), 0.0);
        assert_eq!(DummyLLM.sentiment("").await.unwrap(), 0.0);
    }
}
