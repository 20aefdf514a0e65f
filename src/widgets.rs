use std::collections::HashMap;
use std::ops::RangeInclusive;

/// Source of user-chosen values for settings and input controls.
///
/// Each call names a control by its label and describes its domain; the implementation returns
/// the value the user currently has in it. Rendering the result is not part of this interface.
pub trait Widgets {
    fn checkbox(&mut self, label: &str, default: bool) -> bool;

    /// Single choice out of `options`, the first one being the default.
    fn select(&mut self, label: &str, options: &[String]) -> String;

    fn slider_f32(&mut self, label: &str, range: RangeInclusive<f32>, default: f32) -> f32;

    fn slider_u32(&mut self, label: &str, range: RangeInclusive<u32>, default: u32) -> u32;

    fn text_area(&mut self, label: &str, placeholder: &str) -> String;

    fn text_input(&mut self, label: &str, placeholder: &str) -> String;
}

/// Control values that survive between frames, keyed by control label.
#[derive(Debug, Default)]
pub struct FormState {
    flags: HashMap<String, bool>,
    texts: HashMap<String, String>,
    floats: HashMap<String, f32>,
    ints: HashMap<String, u32>,
}

impl FormState {
    pub fn flag(&mut self, label: &str, default: bool) -> &mut bool {
        self.flags.entry(label.to_owned()).or_insert(default)
    }

    /// Stored choice for a select control, reset to the first option when the option list
    /// no longer contains it.
    pub fn choice(&mut self, label: &str, options: &[String]) -> &mut String {
        let value = self.texts.entry(label.to_owned()).or_default();
        if !options.contains(value) {
            *value = options.first().cloned().unwrap_or_default();
        }
        value
    }

    pub fn float(&mut self, label: &str, range: RangeInclusive<f32>, default: f32) -> &mut f32 {
        let value = self.floats.entry(label.to_owned()).or_insert(default);
        *value = (*value).clamp(*range.start(), *range.end());
        value
    }

    pub fn int(&mut self, label: &str, range: RangeInclusive<u32>, default: u32) -> &mut u32 {
        let value = self.ints.entry(label.to_owned()).or_insert(default);
        *value = (*value).clamp(*range.start(), *range.end());
        value
    }

    pub fn text(&mut self, label: &str) -> &mut String {
        self.texts.entry(label.to_owned()).or_default()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_owned()).collect()
    }

    #[test]
    fn choice_defaults_to_first_option() {
        let mut form = FormState::default();

        assert_eq!(form.choice("Model", &names(&["a", "b"])).as_str(), "a");
    }

    #[test]
    fn choice_is_kept_while_still_offered() {
        let mut form = FormState::default();
        *form.choice("Model", &names(&["a", "b"])) = "b".to_owned();

        assert_eq!(form.choice("Model", &names(&["b", "c"])).as_str(), "b");
    }

    #[test]
    fn choice_resets_when_options_change() {
        let mut form = FormState::default();
        *form.choice("Model", &names(&["a", "b"])) = "b".to_owned();

        let value = form.choice("Model", &names(&["preview-1", "preview-2"]));

        assert_eq!(value.as_str(), "preview-1");
    }

    #[test]
    fn choice_over_no_options_is_empty() {
        let mut form = FormState::default();

        assert_eq!(form.choice("Model", &[]).as_str(), "");
    }

    #[test]
    fn values_persist_per_label() {
        let mut form = FormState::default();
        *form.flag("Enable Guardrails", false) = true;
        form.text("Enter a prompt:").push_str("Hello");
        *form.int("Max Tokens:", 1..=10, 5) = 7;

        assert!(*form.flag("Enable Guardrails", false));
        assert_eq!(form.text("Enter a prompt:").as_str(), "Hello");
        assert_eq!(form.text("Enter the text:").as_str(), "");
        assert_eq!(*form.int("Max Tokens:", 1..=10, 5), 7);
    }

    #[test]
    fn numbers_are_kept_within_bounds() {
        let mut form = FormState::default();
        *form.float("Temperature:", 0.0..=1.0, 0.5) = 3.0;

        assert_eq!(*form.float("Temperature:", 0.0..=1.0, 0.5), 1.0);
        assert_eq!(*form.int("Max Tokens:", 10..=20, 1), 10);
    }
}
