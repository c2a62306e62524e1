//! Per-category selection instruction parsed from a request string.

/// Reserved directive selecting nothing.
pub const DISABLED: &str = "disabled";
/// Reserved directive selecting from the category pool.
pub const RANDOM: &str = "random";
/// Separator for a user-given subset of candidates.
pub const LIST_SEPARATOR: char = ',';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Contribute nothing.
    Disabled,
    /// Pick from the category pool.
    Random,
    /// Pick from this user-given subset, ignoring the pool.
    Choices(Vec<String>),
    /// Use this value verbatim.
    Literal(String),
}

impl Directive {
    /// Parse a raw directive string.
    ///
    /// `disabled` and `random` match case-insensitively. Anything holding a
    /// comma is a candidate list; blank input is treated as disabled. Any
    /// other text is a literal override, never an error.
    pub fn parse(raw: &str) -> Directive {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(DISABLED) {
            return Directive::Disabled;
        }
        if raw.contains(LIST_SEPARATOR) {
            let choices = raw
                .split(LIST_SEPARATOR)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            return Directive::Choices(choices);
        }
        if trimmed.eq_ignore_ascii_case(RANDOM) {
            return Directive::Random;
        }
        Directive::Literal(raw.to_string())
    }

    /// True for `disabled` and `random`, the words that never pass through
    /// as literal text.
    pub fn is_reserved(raw: &str) -> bool {
        let trimmed = raw.trim();
        trimmed.eq_ignore_ascii_case(DISABLED) || trimmed.eq_ignore_ascii_case(RANDOM)
    }
}
