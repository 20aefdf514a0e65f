use crate::Functionality;
use crate::config::DefaultsTable;
use crate::widgets::Widgets;
use serde::Serialize;

pub const SHOW_PREVIEW_LABEL: &str = "Show private preview models";
pub const MODEL_LABEL: &str = "Change chatbot model:";
pub const TEMPERATURE_LABEL: &str = "Temperature:";
pub const MAX_TOKENS_LABEL: &str = "Max Tokens:";
pub const GUARDRAILS_LABEL: &str = "Enable Guardrails";
pub const SYSTEM_PROMPT_LABEL: &str = "System Prompt (optional):";
pub const SOURCE_LANG_LABEL: &str = "Source Language";
pub const TARGET_LANG_LABEL: &str = "Target Language";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub guardrails: bool,
    /// Empty when the user leaves it unset.
    pub system_prompt: String,
}

/// Source and target may be the same language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslateSettings {
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoSettings {}

/// Tunable parameters of one functionality.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Settings {
    Complete(CompleteSettings),
    Translate(TranslateSettings),
    Empty(NoSettings),
}

pub fn resolve_settings(
    functionality: Functionality,
    defaults: &DefaultsTable,
    widgets: &mut impl Widgets,
) -> Settings {
    match functionality {
        Functionality::Complete => {
            let show_preview = widgets.checkbox(SHOW_PREVIEW_LABEL, false);
            let models = if show_preview {
                &defaults.private_preview_models
            } else {
                &defaults.model
            };
            let model = widgets.select(MODEL_LABEL, models);
            let temperature = widgets.slider_f32(
                TEMPERATURE_LABEL,
                defaults.temperature_min..=defaults.temperature_max,
                defaults.temperature,
            );
            let max_tokens = widgets.slider_u32(
                MAX_TOKENS_LABEL,
                defaults.max_tokens_min..=defaults.max_tokens_max,
                defaults.max_tokens,
            );
            let guardrails = widgets.checkbox(GUARDRAILS_LABEL, defaults.guardrails);
            let system_prompt = widgets.text_area(SYSTEM_PROMPT_LABEL, "Enter a system prompt...");
            Settings::Complete(CompleteSettings {
                model,
                temperature,
                max_tokens,
                guardrails,
                system_prompt,
            })
        }
        Functionality::Translate => Settings::Translate(TranslateSettings {
            source_lang: widgets.select(SOURCE_LANG_LABEL, &defaults.languages),
            target_lang: widgets.select(TARGET_LANG_LABEL, &defaults.languages),
        }),
        Functionality::Summarize | Functionality::Extract | Functionality::Sentiment => {
            Settings::Empty(NoSettings::default())
        }
    }
}
