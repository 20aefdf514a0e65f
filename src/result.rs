use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Structured result of a completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResult {
    pub choices: Vec<CompletionChoice>,
    /// Unix timestamp, seconds.
    pub created: i64,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionChoice {
    pub messages: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormattedCompletion {
    pub messages: String,
    pub model: String,
    pub created: Option<DateTime<Utc>>,
    pub usage: Option<Usage>,
}

impl FormattedCompletion {
    pub fn usage_line(&self) -> String {
        match self.usage {
            Some(usage) => format!("{} · {} tokens", self.model, usage.total_tokens),
            None => self.model.clone(),
        }
    }
}

pub fn format_result(result: &CompletionResult) -> FormattedCompletion {
    FormattedCompletion {
        messages: result.choices.iter().map(|c| c.messages.trim()).join("\n\n"),
        model: result.model.clone(),
        created: DateTime::from_timestamp(result.created, 0),
        usage: result.usage,
    }
}
