use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::category::Category;
use crate::schema::directive::Directive;

/// One generation request: a seed, optional free text, and a directive per
/// category name.
///
/// Directive keys are category names (`"lighting"`, `"eye_colors"`, ...).
/// Keys outside the registry are ignored; missing keys mean "disabled".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub seed: u64,
    #[serde(default)]
    pub custom: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub directives: BTreeMap<String, String>,
}

impl PromptRequest {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// A request with every category set to the same directive.
    pub fn all(seed: u64, directive: &str) -> Self {
        let mut request = Self::new(seed);
        for category in Category::ALL {
            request
                .directives
                .insert(category.name().to_string(), directive.to_string());
        }
        request
    }

    pub fn with_custom(mut self, custom: &str) -> Self {
        self.custom = custom.to_string();
        self
    }

    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }

    /// Set a directive by raw key. Unknown keys are kept and ignored at
    /// generation time.
    pub fn set(mut self, key: &str, directive: &str) -> Self {
        self.directives
            .insert(key.to_string(), directive.to_string());
        self
    }

    pub fn set_category(self, category: Category, directive: &str) -> Self {
        self.set(category.name(), directive)
    }

    /// The raw directive for a category, if the request names it.
    pub fn directive(&self, category: Category) -> Option<&str> {
        self.directives.get(category.name()).map(String::as_str)
    }

    /// The raw directive for a category, defaulting to "disabled".
    pub fn directive_or_disabled(&self, category: Category) -> &str {
        self.directive(category)
            .unwrap_or(crate::schema::directive::DISABLED)
    }

    /// Directive keys that do not name a known category.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.directives
            .keys()
            .filter(|k| Category::from_name(k).is_none())
            .map(String::as_str)
            .collect()
    }

    /// The caller's subject phrase, when it is non-blank and not a reserved
    /// word. An active subject takes precedence over `default_tags`.
    pub fn active_subject(&self) -> Option<&str> {
        let subject = self.subject.trim();
        if subject.is_empty() || Directive::is_reserved(subject) {
            None
        } else {
            Some(subject)
        }
    }

    /// The custom lead text, when non-blank.
    pub fn custom_text(&self) -> Option<&str> {
        if self.custom.trim().is_empty() {
            None
        } else {
            Some(self.custom.as_str())
        }
    }
}
