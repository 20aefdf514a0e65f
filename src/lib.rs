pub mod config;
pub mod dispatch;
pub mod input;
pub mod llm;
pub mod result;
pub mod settings;
pub mod utils;
pub mod widgets;

pub use crate::config::{AppConfig, BackendConfig, BackendKind, ConfigError, DefaultsTable};
pub use crate::dispatch::{
    DispatchError, DispatchStatus, Outcome, RunState, dispatch, try_dispatch,
};
pub use crate::input::{CompleteInput, ExtractInput, Input, TextInput, collect_input};
pub use crate::result::{CompletionResult, FormattedCompletion, format_result};
pub use crate::settings::{
    CompleteSettings, NoSettings, Settings, TranslateSettings, resolve_settings,
};
pub use crate::widgets::{FormState, Widgets};

use std::fmt::Display;

/// Text-processing operations offered by the playground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Functionality {
    Complete,
    Translate,
    Summarize,
    Extract,
    Sentiment,
}

impl Functionality {
    pub const ALL: [Functionality; 5] = [
        Functionality::Complete,
        Functionality::Translate,
        Functionality::Summarize,
        Functionality::Extract,
        Functionality::Sentiment,
    ];

    /// Placeholder shown by the selector while nothing is chosen.
    pub const UNSELECTED_LABEL: &'static str = "Select Functionality";

    pub fn label(self) -> &'static str {
        match self {
            Functionality::Complete => "Complete",
            Functionality::Translate => "Translate",
            Functionality::Summarize => "Summarize",
            Functionality::Extract => "Extract",
            Functionality::Sentiment => "Sentiment",
        }
    }

    pub fn run_label(self) -> String {
        format!("Run {}", self.label())
    }
}

impl Display for Functionality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Failure of a call to the hosted language model.
#[derive(Debug)]
pub enum LLMError {
    ConnectionError(anyhow::Error),
    ApiError(anyhow::Error),
    InteractionError(anyhow::Error),
    OtherError(anyhow::Error),
}

impl Display for LLMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMError::ConnectionError(e) => {
                write!(f, "Connection error: {}", e)
            }
            LLMError::ApiError(e) => {
                write!(f, "API error: {}", e)
            }
            LLMError::InteractionError(e) => {
                write!(f, "Unexpected model response: {}", e)
            }
            LLMError::OtherError(e) => {
                write!(f, "{}", e)
            }
        }
    }
}

impl std::error::Error for LLMError {}
