/// Category usage classification and its text rendering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column width for category names in the rendered report.
const NAME_WIDTH: usize = 20;
const ELLIPSIS: &str = "...";

/// How a used category's value was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Random,
    FromList,
    Literal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedValue {
    pub selection: Selection,
    pub value: String,
}

impl UsedValue {
    fn display(&self) -> String {
        match self.selection {
            Selection::Random => format!("{} (random)", self.value),
            Selection::FromList => format!("{} (from list)", self.value),
            Selection::Literal => self.value.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotUsedReason {
    /// The request never named the category.
    NotProvided,
    Disabled,
    /// `default_tags` yields to an explicit subject.
    SubjectPrecedence,
    /// Resolved, but to nothing.
    NoValue,
    /// Its slot was skipped, so it was never resolved.
    NotReached,
    /// Free text equal to `random` or `disabled`.
    ReservedWord,
}

impl NotUsedReason {
    pub fn label(self) -> &'static str {
        match self {
            NotUsedReason::NotProvided => "empty (not provided)",
            NotUsedReason::Disabled => "disabled (explicitly set)",
            NotUsedReason::SubjectPrecedence => "ignored (subject takes precedence)",
            NotUsedReason::NoValue => "no value resolved",
            NotUsedReason::NotReached => "not reached (slot skipped)",
            NotUsedReason::ReservedWord => "ignored (reserved word)",
        }
    }
}

/// Which inputs contributed to a prompt, keyed by name and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReport {
    pub used: BTreeMap<String, UsedValue>,
    pub not_used: BTreeMap<String, NotUsedReason>,
}

impl UsageReport {
    pub fn mark_used(&mut self, name: &str, selection: Selection, value: &str) {
        self.not_used.remove(name);
        self.used.insert(
            name.to_string(),
            UsedValue {
                selection,
                value: value.to_string(),
            },
        );
    }

    pub fn mark_not_used(&mut self, name: &str, reason: NotUsedReason) {
        self.used.remove(name);
        self.not_used.insert(name.to_string(), reason);
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains_key(name)
    }

    pub fn reason(&self, name: &str) -> Option<NotUsedReason> {
        self.not_used.get(name).copied()
    }
}

/// Render a report as two labeled listings. Values wider than `width`
/// characters are cut and end in an ellipsis.
pub fn render(report: &UsageReport, width: usize) -> String {
    let mut lines = vec![
        "=== CATEGORY USAGE ===".to_string(),
        String::new(),
        format!("CATEGORIES USED ({})", report.used.len()),
    ];
    lines.extend(report.used.iter().map(|(name, used)| {
        format!(
            "  - {:<w$} = {}",
            name,
            truncate(&used.display(), width),
            w = NAME_WIDTH
        )
    }));

    lines.push(String::new());
    lines.push(format!("CATEGORIES NOT USED ({})", report.not_used.len()));
    lines.extend(report.not_used.iter().map(|(name, reason)| {
        format!("  - {:<w$} : {}", name, reason.label(), w = NAME_WIDTH)
    }));

    lines.join("\n").trim_end().to_string()
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(width).collect();
    cut.push_str(ELLIPSIS);
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UsageReport {
        let mut report = UsageReport::default();
        report.mark_used("pose", Selection::Literal, "standing");
        report.mark_used("lighting", Selection::Random, "rim light, haze");
        report.mark_not_used("artist", NotUsedReason::Disabled);
        report.mark_not_used("default_tags", NotUsedReason::SubjectPrecedence);
        report
    }

    #[test]
    fn listings_sorted_by_name() {
        let text = render(&sample(), 60);
        let lighting = text.find("lighting").unwrap();
        let pose = text.find("pose").unwrap();
        assert!(lighting < pose);
        let artist = text.find("artist").unwrap();
        let tags = text.find("default_tags").unwrap();
        assert!(artist < tags);
    }

    #[test]
    fn counts_and_labels() {
        let text = render(&sample(), 60);
        assert!(text.starts_with("=== CATEGORY USAGE ==="));
        assert!(text.contains("CATEGORIES USED (2)"));
        assert!(text.contains("CATEGORIES NOT USED (2)"));
        assert!(text.contains("rim light, haze (random)"));
        assert!(text.contains("ignored (subject takes precedence)"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn long_values_truncated() {
        let mut report = UsageReport::default();
        report.mark_used("custom", Selection::Literal, &"x".repeat(80));
        let text = render(&report, 60);
        let expected = format!("{}...", "x".repeat(60));
        assert!(text.contains(&expected));
        assert!(!text.contains(&"x".repeat(61)));
    }

    #[test]
    fn empty_report_layout() {
        let text = render(&UsageReport::default(), 60);
        assert_eq!(
            text,
            "=== CATEGORY USAGE ===\n\nCATEGORIES USED (0)\n\nCATEGORIES NOT USED (0)"
        );
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("ééééé", 3), "ééé...");
        assert_eq!(truncate("abc", 3), "abc");
    }

    #[test]
    fn marking_moves_between_listings() {
        let mut report = UsageReport::default();
        report.mark_used("default_tags", Selection::Random, "a dancer");
        report.mark_not_used("default_tags", NotUsedReason::SubjectPrecedence);
        assert!(!report.is_used("default_tags"));
        assert_eq!(
            report.reason("default_tags"),
            Some(NotUsedReason::SubjectPrecedence)
        );
    }
}
