/// Prompt assembly: resolves every slot of the fixed template in order.
///
/// The template is fixed because the resolver's random stream is consumed
/// slot by slot: for a given seed and request, reordering any two
/// resolutions changes the output.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::cleaner::clean;
use crate::core::config::EngineConfig;
use crate::core::report::{NotUsedReason, Selection, UsageReport};
use crate::core::resolver::{resolve_multiple, resolve_single, VALUE_SEPARATOR};
use crate::core::splitter::{contains_marker, strip_markers, Region};
use crate::core::vocabulary::VocabularySet;
use crate::schema::category::Category;
use crate::schema::directive::{Directive, DISABLED};
use crate::schema::request::PromptRequest;

/// Artform that switches the lead-in to a photography style.
const PHOTOGRAPHY: &str = "photography";
/// Artforms that read naturally without a trailing "of".
const DESCRIPTIVE_ARTFORMS: &[&str] = &["illustration", "painting", "drawing", "sketch"];
const CONNECTOR: &str = "of";
const INDEFINITE_ARTICLE: &str = "a";

/// Report keys for the two free-text inputs.
pub const CUSTOM_KEY: &str = "custom";
pub const SUBJECT_KEY: &str = "subject";

/// The combined prompt, still carrying region tokens, and how each input
/// was used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub seed: u64,
    pub combined: String,
    pub usage: UsageReport,
}

/// Assembles one prompt. Lives for a single generation call and owns the
/// random stream for that call.
pub struct Assembler<'a> {
    vocabulary: &'a VocabularySet,
    config: &'a EngineConfig,
    request: &'a PromptRequest,
    rng: StdRng,
    resolved: FxHashMap<Category, String>,
}

impl<'a> Assembler<'a> {
    pub fn new(
        vocabulary: &'a VocabularySet,
        config: &'a EngineConfig,
        request: &'a PromptRequest,
    ) -> Self {
        Self {
            vocabulary,
            config,
            request,
            rng: StdRng::seed_from_u64(request.seed),
            resolved: FxHashMap::default(),
        }
    }

    /// Resolve the whole template and classify category usage.
    pub fn compose(mut self) -> Composition {
        let mut components: Vec<String> = Vec::new();

        // 1. Custom text
        if let Some(custom) = self.request.custom_text() {
            components.push(sanitize(CUSTOM_KEY, custom));
        }

        // 2-3. Lead-in and subject; the connector depends on the subject
        let (lead, wants_connector) = self.lead_in();
        let subject = self.subject();
        if let Some(lead) = lead {
            components.push(lead);
            if wants_connector && !subject.is_empty() {
                components.push(CONNECTOR.to_string());
            }
        }
        components.push(subject);

        // 4. Core details
        let core = [
            self.single(Category::Roles),
            self.single(Category::Hairstyles),
            self.single(Category::AdditionalDetails),
        ];
        components.push(join_values(&core));

        // 5. Clothing
        let clothing = self.single(Category::Clothing);
        if !clothing.is_empty() {
            components.push(format!("dressed in {clothing}"));
        }

        // 6. Composition and pose
        let framing = [
            self.single(Category::Composition),
            self.single(Category::Pose),
        ];
        components.push(join_values(&framing));

        // 7-10. Environment and lighting
        components.push(Region::ClipG.token().to_string());
        let environment = [
            self.single(Category::Background),
            self.single(Category::Place),
        ];
        components.push(join_values(&environment));
        components.push(self.lighting());
        components.push(Region::ClipG.token().to_string());

        // 11. Physical features
        let features: Vec<String> = Category::FEATURES
            .into_iter()
            .map(|category| self.single(category))
            .collect();
        components.push(join_values(&features));

        // 12-14. Technical and artistic details
        components.push(Region::ClipL.token().to_string());
        let technical = self.technical();
        components.push(join_values(&technical));
        components.push(Region::ClipL.token().to_string());

        // 15. Final join
        let combined = components
            .iter()
            .filter(|c| !c.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        tracing::debug!(
            seed = self.request.seed,
            resolved = self.resolved.len(),
            length = combined.len(),
            "composed prompt"
        );

        Composition {
            seed: self.request.seed,
            usage: self.classify(),
            combined,
        }
    }

    fn single(&mut self, category: Category) -> String {
        let raw = self.request.directive_or_disabled(category);
        let value = resolve_single(raw, self.vocabulary.pool(category), &mut self.rng);
        self.record(category, value)
    }

    fn multiple(&mut self, category: Category, min_count: usize, max_count: usize) -> String {
        let raw = self.request.directive_or_disabled(category);
        let value = resolve_multiple(
            raw,
            self.vocabulary.pool(category),
            min_count,
            max_count,
            &mut self.rng,
        );
        self.record(category, value)
    }

    fn record(&mut self, category: Category, value: String) -> String {
        let value = sanitize(category.name(), &value);
        tracing::trace!(category = %category, value = %value, "resolved slot");
        self.resolved.insert(category, value.clone());
        value
    }

    /// The artform lead-in and whether it takes a connector before the
    /// subject.
    fn lead_in(&mut self) -> (Option<String>, bool) {
        let artform = self.single(Category::Artform);
        let trimmed = artform.trim();

        if trimmed.eq_ignore_ascii_case(PHOTOGRAPHY) {
            let style = self.single(Category::PhotographyStyles);
            let lead = if style.is_empty() {
                PHOTOGRAPHY.to_string()
            } else {
                style
            };
            return (Some(lead), true);
        }

        if trimmed.is_empty() {
            return (None, false);
        }

        let descriptive = DESCRIPTIVE_ARTFORMS
            .iter()
            .any(|form| trimmed.eq_ignore_ascii_case(form));
        (Some(artform), !descriptive)
    }

    /// The subject phrase. An explicit subject wins over `default_tags`,
    /// which is then never resolved.
    fn subject(&mut self) -> String {
        if let Some(subject) = self.request.active_subject() {
            let subject = sanitize(SUBJECT_KEY, subject);
            let body_type = self.single(Category::BodyTypes);
            return prefix_body_type(&subject, &body_type);
        }

        let tag = self.single(Category::DefaultTags);
        if tag.is_empty() {
            return String::new();
        }
        let body_type = self.single(Category::BodyTypes);
        splice_body_type(&tag, &body_type)
    }

    fn lighting(&mut self) -> String {
        let raw = self.request.directive_or_disabled(Category::Lighting);
        if Directive::parse(raw) == Directive::Random {
            let (min_count, max_count) = self.config.lighting_count;
            self.multiple(Category::Lighting, min_count, max_count)
        } else {
            self.single(Category::Lighting)
        }
    }

    fn technical(&mut self) -> Vec<String> {
        let mut details = Vec::new();

        let photo_type = self.single(Category::PhotoType);
        if !photo_type.is_empty() {
            let weight = self.photo_weight();
            details.push(format!("({photo_type}:{weight:.1})"));
        }

        let device = self.single(Category::Device);
        if !device.is_empty() {
            details.push(format!("shot on {device}"));
        }

        details.push(self.single(Category::DigitalArtform));

        let photographer = self.single(Category::Photographer);
        if !photographer.is_empty() {
            details.push(format!("photo by {photographer}"));
        }

        let artist = self.single(Category::Artist);
        if !artist.is_empty() {
            details.push(format!("by {artist}"));
        }

        details
    }

    /// Emphasis weight for a photo type, rounded to one decimal.
    fn photo_weight(&mut self) -> f64 {
        let (a, b) = self.config.photo_weight;
        let (low, high) = if a.is_finite() && b.is_finite() && (a - b).is_finite() {
            (a.min(b), a.max(b))
        } else {
            EngineConfig::default().photo_weight
        };
        let weight: f64 = self.rng.gen_range(low..=high);
        (weight * 10.0).round() / 10.0
    }

    fn classify(&self) -> UsageReport {
        let mut report = UsageReport::default();

        match self.request.custom_text() {
            Some(custom) => report.mark_used(CUSTOM_KEY, Selection::Literal, custom),
            None => report.mark_not_used(CUSTOM_KEY, NotUsedReason::NotProvided),
        }

        let subject = self.request.subject.trim();
        if subject.is_empty() {
            report.mark_not_used(SUBJECT_KEY, NotUsedReason::NotProvided);
        } else if let Some(active) = self.request.active_subject() {
            report.mark_used(SUBJECT_KEY, Selection::Literal, active);
        } else if subject.eq_ignore_ascii_case(DISABLED) {
            report.mark_not_used(SUBJECT_KEY, NotUsedReason::Disabled);
        } else {
            report.mark_not_used(SUBJECT_KEY, NotUsedReason::ReservedWord);
        }

        let subject_active = self.request.active_subject().is_some();
        for category in Category::ALL {
            let name = category.name();
            // Precedence holds whatever the tag's own directive says
            if category == Category::DefaultTags && subject_active {
                report.mark_not_used(name, NotUsedReason::SubjectPrecedence);
                continue;
            }
            let raw = match self.request.directive(category) {
                Some(raw) if !raw.trim().is_empty() => raw,
                _ => {
                    report.mark_not_used(name, NotUsedReason::NotProvided);
                    continue;
                }
            };

            let directive = Directive::parse(raw);
            if directive == Directive::Disabled {
                report.mark_not_used(name, NotUsedReason::Disabled);
                continue;
            }

            match self.resolved.get(&category) {
                None => report.mark_not_used(name, NotUsedReason::NotReached),
                Some(value) if value.is_empty() => {
                    report.mark_not_used(name, NotUsedReason::NoValue)
                }
                Some(value) => {
                    let selection = match directive {
                        Directive::Random => Selection::Random,
                        Directive::Choices(_) => Selection::FromList,
                        _ => Selection::Literal,
                    };
                    report.mark_used(name, selection, value);
                }
            }
        }

        report
    }
}

/// Place a body-type adjective into a default-tag phrase.
///
/// A leading indefinite article is kept as written and the adjective goes
/// right after it; otherwise the phrase is prefixed with "a" and the
/// adjective.
pub fn splice_body_type(phrase: &str, body_type: &str) -> String {
    if body_type.is_empty() {
        return phrase.to_string();
    }

    let lower = phrase.to_ascii_lowercase();
    if lower.starts_with("a ") || lower.starts_with("an ") {
        if let Some((article, rest)) = phrase.split_once(' ') {
            return format!("{article} {body_type} {rest}");
        }
    }

    prefix_body_type(phrase, body_type)
}

/// Put "a <body type>" in front of a phrase, or leave it alone when there
/// is no body type.
pub fn prefix_body_type(phrase: &str, body_type: &str) -> String {
    if body_type.is_empty() {
        return phrase.to_string();
    }
    format!("{INDEFINITE_ARTICLE} {body_type} {phrase}")
}

/// Comma-join the non-empty values of one slot.
fn join_values(values: &[String]) -> String {
    values
        .iter()
        .filter(|v| !v.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(VALUE_SEPARATOR)
}

/// Remove region tokens from text entering the prompt.
fn sanitize(source: &str, text: &str) -> String {
    if contains_marker(text) {
        tracing::warn!(source = %source, "stripping region token from prompt text");
        clean(&strip_markers(text))
    } else {
        text.to_string()
    }
}
