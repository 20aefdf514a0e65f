use crate::Functionality;
use crate::widgets::Widgets;
use serde::Serialize;

const TEXT_PLACEHOLDER: &str = "Type your text here...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompleteInput {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextInput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractInput {
    pub text: String,
    pub query: String,
}

/// Primary content entered for one functionality. Empty strings are passed through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Input {
    Complete(CompleteInput),
    Translate(TextInput),
    Summarize(TextInput),
    Extract(ExtractInput),
    Sentiment(TextInput),
}

impl Input {
    /// Main text of the input, for logging.
    pub fn primary_text(&self) -> &str {
        match self {
            Input::Complete(i) => &i.prompt,
            Input::Translate(i) | Input::Summarize(i) | Input::Sentiment(i) => &i.text,
            Input::Extract(i) => &i.text,
        }
    }
}

pub fn collect_input(functionality: Functionality, widgets: &mut impl Widgets) -> Input {
    match functionality {
        Functionality::Complete => Input::Complete(CompleteInput {
            prompt: widgets.text_area("Enter a prompt:", "Type your prompt here..."),
        }),
        Functionality::Translate => Input::Translate(TextInput {
            text: widgets.text_area("Enter text to translate:", TEXT_PLACEHOLDER),
        }),
        Functionality::Summarize => Input::Summarize(TextInput {
            text: widgets.text_area("Enter text to summarize:", TEXT_PLACEHOLDER),
        }),
        Functionality::Extract => Input::Extract(ExtractInput {
            text: widgets.text_area("Enter the text:", TEXT_PLACEHOLDER),
            query: widgets.text_input("Enter your query:", "Type your query here..."),
        }),
        Functionality::Sentiment => Input::Sentiment(TextInput {
            text: widgets.text_area("Enter text for sentiment analysis:", TEXT_PLACEHOLDER),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::testing::{Scripted, ScriptedWidgets};

    fn keys(input: &Input) -> Vec<String> {
        let value = serde_json::to_value(input).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn field_sets_match_functionality() {
        let expected: [(Functionality, &[&str]); 5] = [
            (Functionality::Complete, &["prompt"]),
            (Functionality::Translate, &["text"]),
            (Functionality::Summarize, &["text"]),
            (Functionality::Extract, &["query", "text"]),
            (Functionality::Sentiment, &["text"]),
        ];

        for (functionality, expected_keys) in expected {
            let mut widgets = ScriptedWidgets::default();
            let input = collect_input(functionality, &mut widgets);
            assert_eq!(keys(&input), expected_keys, "{functionality}");
        }
    }

    #[test]
    fn variant_matches_functionality() {
        let mut widgets = ScriptedWidgets::default();
        assert!(matches!(
            collect_input(Functionality::Translate, &mut widgets),
            Input::Translate(_)
        ));
        assert!(matches!(
            collect_input(Functionality::Sentiment, &mut widgets),
            Input::Sentiment(_)
        ));
    }

    #[test]
    fn extract_collects_text_and_query() {
        let mut widgets = ScriptedWidgets::default()
            .with("Enter the text:", Scripted::Text("A".to_owned()))
            .with("Enter your query:", Scripted::Text("B".to_owned()));

        let input = collect_input(Functionality::Extract, &mut widgets);

        assert_eq!(
            input,
            Input::Extract(ExtractInput {
                text: "A".to_owned(),
                query: "B".to_owned(),
            })
        );
        assert_eq!(widgets.labels(), vec!["Enter the text:", "Enter your query:"]);
    }

    #[test]
    fn empty_input_is_not_rejected() {
        let mut widgets = ScriptedWidgets::default();

        let input = collect_input(Functionality::Complete, &mut widgets);

        assert_eq!(
            input,
            Input::Complete(CompleteInput {
                prompt: String::new()
            })
        );
        assert_eq!(input.primary_text(), "");
    }
}
