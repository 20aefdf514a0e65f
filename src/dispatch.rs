use crate::input::Input;
use crate::llm::LLM;
use crate::result::{FormattedCompletion, format_result};
use crate::settings::Settings;
use crate::utils::substr_up_to_len;
use crate::{Functionality, LLMError};
use std::fmt::Display;

/// Displayable result of a successful dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completion(FormattedCompletion),
    Translation(String),
    Summary(String),
    Extraction(String),
    Sentiment(f32),
}

impl Outcome {
    pub fn title(&self) -> &'static str {
        match self {
            Outcome::Completion(_) => "Completion Result",
            Outcome::Translation(_) => "Translated Text:",
            Outcome::Summary(_) => "Summary:",
            Outcome::Extraction(_) => "Extracted Answer:",
            Outcome::Sentiment(_) => "Sentiment Analysis Result:",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Outcome::Completion(c) => c.messages.clone(),
            Outcome::Translation(s) | Outcome::Summary(s) | Outcome::Extraction(s) => s.clone(),
            Outcome::Sentiment(score) => score.to_string(),
        }
    }
}

/// Lifecycle of one run: `Idle -> Dispatching -> Displayed | ErrorDisplayed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DispatchStatus {
    #[default]
    Idle,
    Dispatching,
    Displayed(Outcome),
    ErrorDisplayed(String),
}

/// Selection and run status of the playground, with at most one run in flight.
#[derive(Debug, Default)]
pub struct RunState {
    selection: Option<Functionality>,
    status: DispatchStatus,
    in_flight: Option<Functionality>,
}

impl RunState {
    pub fn selection(&self) -> Option<Functionality> {
        self.selection
    }

    pub fn status(&self) -> &DispatchStatus {
        &self.status
    }

    /// A run started for another functionality still counts until it reports back.
    pub fn is_running(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Changing the functionality clears the output shown for the previous one.
    pub fn select(&mut self, selection: Option<Functionality>) {
        if self.selection != selection {
            self.selection = selection;
            self.status = DispatchStatus::Idle;
        }
    }

    /// Returns `false` and changes nothing while another run is outstanding.
    pub fn start(&mut self, functionality: Functionality) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.in_flight = Some(functionality);
        self.status = DispatchStatus::Dispatching;
        true
    }

    /// Ends the outstanding run. Its status is dropped if the selection moved on meanwhile.
    pub fn finish(&mut self, functionality: Functionality, status: DispatchStatus) {
        self.in_flight = None;
        if self.selection == Some(functionality) {
            self.status = status;
        } else {
            log::debug!("Dropping {} result after selection changed", functionality);
        }
    }
}

#[derive(Debug)]
pub enum DispatchError {
    Remote(LLMError),
    /// Input or settings were collected for a different functionality.
    Mismatch(Functionality),
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::Remote(e) => {
                write!(f, "{}", e)
            }
            DispatchError::Mismatch(functionality) => {
                write!(
                    f,
                    "Input and settings do not match the {} functionality",
                    functionality
                )
            }
        }
    }
}

impl std::error::Error for DispatchError {}

impl From<LLMError> for DispatchError {
    fn from(err: LLMError) -> Self {
        DispatchError::Remote(err)
    }
}

pub async fn try_dispatch<L: LLM>(
    llm: &L,
    functionality: Functionality,
    input: &Input,
    settings: &Settings,
) -> Result<Outcome, DispatchError> {
    log::info!(
        r#"Running {} on "{}...""#,
        functionality,
        substr_up_to_len(input.primary_text(), 40)
    );

    let outcome = match (functionality, input, settings) {
        (Functionality::Complete, Input::Complete(input), Settings::Complete(settings)) => {
            let result = llm
                .complete(
                    &settings.model,
                    &input.prompt,
                    settings.temperature,
                    settings.max_tokens,
                    settings.guardrails,
                    &settings.system_prompt,
                )
                .await?;
            Outcome::Completion(format_result(&result))
        }
        (Functionality::Translate, Input::Translate(input), Settings::Translate(settings)) => {
            Outcome::Translation(
                llm.translate(&input.text, &settings.source_lang, &settings.target_lang)
                    .await?,
            )
        }
        (Functionality::Summarize, Input::Summarize(input), Settings::Empty(_)) => {
            Outcome::Summary(llm.summarize(&input.text).await?)
        }
        (Functionality::Extract, Input::Extract(input), Settings::Empty(_)) => {
            Outcome::Extraction(llm.extract_answer(&input.text, &input.query).await?)
        }
        (Functionality::Sentiment, Input::Sentiment(input), Settings::Empty(_)) => {
            Outcome::Sentiment(llm.sentiment(&input.text).await?)
        }
        _ => return Err(DispatchError::Mismatch(functionality)),
    };
    Ok(outcome)
}

/// Runs one dispatch to its terminal state. Failures become `ErrorDisplayed`.
pub async fn dispatch<L: LLM>(
    llm: &L,
    functionality: Functionality,
    input: &Input,
    settings: &Settings,
) -> DispatchStatus {
    match try_dispatch(llm, functionality, input, settings).await {
        Ok(outcome) => DispatchStatus::Displayed(outcome),
        Err(err) => {
            match &err {
                DispatchError::Remote(_) => log::warn!("{} failed: {}", functionality, err),
                DispatchError::Mismatch(_) => log::error!("{}", err),
            }
            DispatchStatus::ErrorDisplayed(format!("Error: {}", err))
        }
    }
}
