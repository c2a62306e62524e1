/// The prompt engine: Request → Output bundle orchestration.
///
/// Wires together vocabulary lookup, template assembly, marker splitting,
/// and usage reporting.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::assembler::{Assembler, Composition};
use crate::core::config::{ConfigError, EngineConfig};
use crate::core::report::{render, UsageReport};
use crate::core::resolver::VALUE_SEPARATOR;
use crate::core::splitter::split;
use crate::core::vocabulary::{VocabularyError, VocabularySet};
use crate::schema::request::PromptRequest;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("vocabulary error: {0}")]
    Vocabulary(#[from] VocabularyError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Everything one generation call hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptBundle {
    pub seed: u64,
    /// Prompt text outside both encoder regions.
    pub default_stream: String,
    /// Prompt text with region content kept and tokens removed.
    pub full_stream: String,
    pub clip_l: String,
    pub clip_g: String,
    pub usage: UsageReport,
    /// `usage` rendered for display.
    pub usage_report: String,
}

impl PromptBundle {
    /// The default stream followed by both region streams, comma-joined,
    /// with empty streams left out.
    pub fn joined(&self) -> String {
        [&self.default_stream, &self.clip_l, &self.clip_g]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(VALUE_SEPARATOR)
    }
}

/// The top-level prompt engine. Built via `PromptEngine::builder()`.
///
/// Generation takes `&self` and creates its random stream per call, so one
/// engine can serve many threads.
#[derive(Debug, Clone)]
pub struct PromptEngine {
    vocabulary: VocabularySet,
    config: EngineConfig,
}

/// Builder for constructing a `PromptEngine`.
#[derive(Debug, Default)]
pub struct PromptEngineBuilder {
    config: Option<EngineConfig>,
    config_path: Option<PathBuf>,
    vocabulary_dir: Option<PathBuf>,
    vocabulary_ron: Option<PathBuf>,
    /// Directly provided vocabulary (for testing without files).
    vocabulary: Option<VocabularySet>,
}

impl PromptEngine {
    pub fn builder() -> PromptEngineBuilder {
        PromptEngineBuilder::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &VocabularySet {
        &self.vocabulary
    }

    /// Resolve the template for a request, leaving region tokens in place.
    pub fn compose(&self, request: &PromptRequest) -> Composition {
        for key in request.unknown_keys() {
            tracing::warn!(key = %key, "ignoring directive for unknown category");
        }
        Assembler::new(&self.vocabulary, &self.config, request).compose()
    }

    /// Generate the full output bundle for a request.
    pub fn generate(&self, request: &PromptRequest) -> PromptBundle {
        let composition = self.compose(request);
        let streams = split(&composition.combined);
        let usage_report = render(&composition.usage, self.config.report_width);

        PromptBundle {
            seed: composition.seed,
            default_stream: streams.default_stream,
            full_stream: streams.full_stream,
            clip_l: streams.clip_l,
            clip_g: streams.clip_g,
            usage: composition.usage,
            usage_report,
        }
    }

    /// Generate `count` bundles with consecutive seeds starting at the
    /// request's seed.
    pub fn generate_variants(&self, request: &PromptRequest, count: usize) -> Vec<PromptBundle> {
        let mut variant = request.clone();
        (0..count)
            .map(|i| {
                variant.seed = request.seed.wrapping_add(i as u64);
                self.generate(&variant)
            })
            .collect()
    }
}

impl PromptEngineBuilder {
    /// Use this configuration. A config file, if also given, replaces it.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load `<category>.json` files from this directory, overriding any
    /// directory named in the config.
    pub fn vocabulary_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.vocabulary_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load a RON vocabulary bundle, merged over the directory tables.
    pub fn vocabulary_ron(mut self, path: impl AsRef<Path>) -> Self {
        self.vocabulary_ron = Some(path.as_ref().to_path_buf());
        self
    }

    /// Provide vocabulary directly (for testing without files). Merged
    /// last, so it overrides file-loaded tables.
    pub fn with_vocabulary(mut self, vocabulary: VocabularySet) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    pub fn build(self) -> Result<PromptEngine, EngineError> {
        let config = match self.config_path {
            Some(ref path) => EngineConfig::load_from_ron(path)?,
            None => self.config.unwrap_or_default(),
        };

        let mut vocabulary = VocabularySet::new();

        let dir = self
            .vocabulary_dir
            .as_ref()
            .or(config.vocabulary_dir.as_ref());
        if let Some(dir) = dir {
            vocabulary.merge(VocabularySet::load_from_dir(dir)?);
        }

        if let Some(ref path) = self.vocabulary_ron {
            vocabulary.merge(VocabularySet::load_from_ron(path)?);
        }

        if let Some(provided) = self.vocabulary {
            vocabulary.merge(provided);
        }

        tracing::info!(
            populated = vocabulary.populated(),
            "prompt engine ready"
        );

        Ok(PromptEngine { vocabulary, config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::category::Category;

    fn build_test_engine() -> PromptEngine {
        let vocabulary = VocabularySet::new()
            .with_table(Category::DefaultTags, ["a dancer", "an astronaut"])
            .with_table(Category::BodyTypes, ["muscular", "slender"])
            .with_table(Category::Roles, ["warrior", "scholar"])
            .with_table(Category::Background, ["forest", "city skyline"])
            .with_table(Category::Lighting, ["rim light", "soft light", "neon glow", "haze"])
            .with_table(Category::EyeColors, ["green eyes", "grey eyes"])
            .with_table(Category::Artist, ["Rembrandt", "Vermeer"]);
        PromptEngine::builder()
            .with_vocabulary(vocabulary)
            .build()
            .unwrap()
    }

    #[test]
    fn hello_world_end_to_end() {
        let engine = build_test_engine();
        let request = PromptRequest::new(42).with_custom("hello world");
        let bundle = engine.generate(&request);
        assert_eq!(bundle.default_stream, "hello world");
        assert_eq!(bundle.full_stream, "hello world");
        assert_eq!(bundle.clip_l, "");
        assert_eq!(bundle.clip_g, "");
        assert_eq!(bundle.joined(), "hello world");
        assert_eq!(bundle.seed, 42);
    }

    #[test]
    fn streams_route_to_regions() {
        let engine = build_test_engine();
        let request = PromptRequest::all(5, "random");
        let bundle = engine.generate(&request);

        assert!(!bundle.clip_g.is_empty());
        assert!(!bundle.clip_l.is_empty());
        assert!(bundle.clip_l.starts_with("by "));
        assert!(!bundle.default_stream.contains(&bundle.clip_l));
        assert!(bundle.full_stream.contains(&bundle.clip_l));
        assert!(!bundle.full_stream.contains("BREAK_CLIP"));
        assert!(!bundle.default_stream.contains("BREAK_CLIP"));
    }

    #[test]
    fn generate_deterministic_same_seed() {
        let request = PromptRequest::all(1234, "random");
        let a = build_test_engine().generate(&request);
        let b = build_test_engine().generate(&request);
        assert_eq!(a, b);
    }

    #[test]
    fn generate_different_with_different_seed() {
        let engine = build_test_engine();
        let first = engine.generate(&PromptRequest::all(1, "random"));
        let found_different = (2..50)
            .any(|seed| engine.generate(&PromptRequest::all(seed, "random")) != first);
        assert!(found_different, "Expected different output with different seeds");
    }

    #[test]
    fn variants_use_consecutive_seeds() {
        let engine = build_test_engine();
        let request = PromptRequest::all(10, "random");
        let variants = engine.generate_variants(&request, 3);
        assert_eq!(variants.len(), 3);
        assert_eq!(
            variants.iter().map(|b| b.seed).collect::<Vec<_>>(),
            vec![10, 11, 12]
        );
        assert_eq!(variants[1], engine.generate(&PromptRequest::all(11, "random")));
    }

    #[test]
    fn usage_report_rendered_with_config_width() {
        let engine = PromptEngine::builder()
            .config(EngineConfig {
                report_width: 5,
                ..EngineConfig::default()
            })
            .build()
            .unwrap();
        let bundle = engine.generate(&PromptRequest::new(1).with_custom("a long custom text"));
        assert!(bundle.usage_report.contains("a lon..."));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let engine = build_test_engine();
        let plain = engine.generate(&PromptRequest::new(3).with_custom("x"));
        let noisy = engine.generate(&PromptRequest::new(3).with_custom("x").set("hats", "random"));
        assert_eq!(plain, noisy);
    }

    #[test]
    fn builder_missing_vocabulary_dir_is_vocabulary_error() {
        let result = PromptEngine::builder()
            .vocabulary_dir("tests/fixtures/no_such_dir")
            .build();
        assert!(matches!(result, Err(EngineError::Vocabulary(_))));
    }

    #[test]
    fn builder_missing_config_file_is_error() {
        let result = PromptEngine::builder()
            .config_file("tests/fixtures/no_such_config.ron")
            .build();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PromptEngine>();
    }
}
