/// Vocabulary pools: loading, deduplication, and lookup by category.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::core::splitter::contains_marker;
use crate::schema::category::Category;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// The ordered candidates for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTable {
    entries: Vec<String>,
}

impl CategoryTable {
    /// Build a table, keeping the first occurrence of each entry.
    ///
    /// Blank entries and entries holding a region token are dropped.
    pub fn from_entries<I, S>(entries: I) -> CategoryTable
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = FxHashSet::default();
        let mut kept = Vec::new();
        for entry in entries {
            let entry: String = entry.into();
            if entry.trim().is_empty() {
                continue;
            }
            if contains_marker(&entry) {
                tracing::warn!(entry = %entry, "dropping vocabulary entry holding a region token");
                continue;
            }
            if seen.insert(entry.clone()) {
                kept.push(entry);
            }
        }
        CategoryTable { entries: kept }
    }

    /// Load a table from a JSON array of strings.
    pub fn load_json(path: &Path) -> Result<CategoryTable, VocabularyError> {
        Ok(Self::from_entries(read_json_entries(path)?))
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read a JSON array of strings as-is, without deduplication.
pub fn read_json_entries(path: &Path) -> Result<Vec<String>, VocabularyError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// All loaded pools, keyed by category. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct VocabularySet {
    tables: FxHashMap<Category, CategoryTable>,
}

impl VocabularySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, table: CategoryTable) {
        self.tables.insert(category, table);
    }

    /// Builder-style insert from plain strings.
    pub fn with_table<I, S>(mut self, category: Category, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(category, CategoryTable::from_entries(entries));
        self
    }

    /// The pool for a category. Categories without a table are empty.
    pub fn pool(&self, category: Category) -> &[String] {
        self.tables
            .get(&category)
            .map(CategoryTable::entries)
            .unwrap_or(&[])
    }

    /// Number of categories with at least one entry.
    pub fn populated(&self) -> usize {
        self.tables.values().filter(|t| !t.is_empty()).count()
    }

    /// Load `<category>.json` for every known category from `dir`.
    ///
    /// Only an unreadable directory is an error. A missing or malformed
    /// file leaves its category empty.
    pub fn load_from_dir(dir: &Path) -> Result<VocabularySet, VocabularyError> {
        std::fs::read_dir(dir)?;

        let mut set = VocabularySet::new();
        for category in Category::ALL {
            let path = dir.join(format!("{}.json", category.name()));
            if !path.exists() {
                tracing::warn!(category = %category, path = %path.display(), "vocabulary file not found, using empty pool");
                continue;
            }
            match CategoryTable::load_json(&path) {
                Ok(table) => {
                    tracing::trace!(category = %category, entries = table.len(), "loaded vocabulary");
                    set.insert(category, table);
                }
                Err(e) => {
                    tracing::warn!(category = %category, path = %path.display(), error = %e, "unreadable vocabulary file, using empty pool");
                }
            }
        }
        Ok(set)
    }

    /// Load a RON bundle mapping category names to lists of entries.
    pub fn load_from_ron(path: &Path) -> Result<VocabularySet, VocabularyError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a RON bundle. Names outside the registry are skipped.
    pub fn parse_ron(input: &str) -> Result<VocabularySet, VocabularyError> {
        let raw: HashMap<String, Vec<String>> = ron::from_str(input)?;
        let mut set = VocabularySet::new();
        for (name, entries) in raw {
            match Category::from_name(&name) {
                Some(category) => set.insert(category, CategoryTable::from_entries(entries)),
                None => tracing::warn!(name = %name, "skipping unknown vocabulary category"),
            }
        }
        Ok(set)
    }

    /// Merge another set into this one. Tables from `other` replace tables
    /// for the same category.
    pub fn merge(&mut self, other: VocabularySet) {
        for (category, table) in other.tables {
            self.tables.insert(category, table);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let table = CategoryTable::from_entries(["b", "a", "b", "c", "a"]);
        assert_eq!(table.entries(), &["b", "a", "c"]);
    }

    #[test]
    fn blank_and_marker_entries_dropped() {
        let table = CategoryTable::from_entries(["ok", "  ", "bad BREAK_CLIPG entry"]);
        assert_eq!(table.entries(), &["ok"]);
    }

    #[test]
    fn missing_category_is_empty_pool() {
        let set = VocabularySet::new();
        assert!(set.pool(Category::Lighting).is_empty());
    }

    #[test]
    fn parse_ron_bundle() {
        let set = VocabularySet::parse_ron(
            r#"{
                "lighting": ["rim light", "soft light", "rim light"],
                "pose": ["standing"],
                "hats": ["fedora"],
            }"#,
        )
        .unwrap();
        assert_eq!(set.pool(Category::Lighting), &["rim light", "soft light"]);
        assert_eq!(set.pool(Category::Pose), &["standing"]);
        assert_eq!(set.populated(), 2);
    }

    #[test]
    fn parse_ron_rejects_malformed() {
        assert!(VocabularySet::parse_ron("{ \"pose\": 3 }").is_err());
    }

    #[test]
    fn merge_replaces_tables() {
        let mut base = VocabularySet::new()
            .with_table(Category::Pose, ["sitting"])
            .with_table(Category::Place, ["park"]);
        let other = VocabularySet::new().with_table(Category::Pose, ["standing"]);
        base.merge(other);
        assert_eq!(base.pool(Category::Pose), &["standing"]);
        assert_eq!(base.pool(Category::Place), &["park"]);
    }

    #[test]
    fn load_fixture_directory() {
        let set = VocabularySet::load_from_dir(Path::new("tests/fixtures/vocabulary")).unwrap();
        assert_eq!(set.pool(Category::Artform), &["photography", "illustration", "portrait"]);
        // Duplicates in the file are removed
        assert_eq!(set.pool(Category::Lighting).len(), 5);
        // Malformed file degrades to empty
        assert!(set.pool(Category::Device).is_empty());
        // Missing file degrades to empty
        assert!(set.pool(Category::FacialHair).is_empty());
    }

    #[test]
    fn load_missing_directory_is_error() {
        assert!(VocabularySet::load_from_dir(Path::new("tests/fixtures/no_such_dir")).is_err());
    }

    #[test]
    fn strict_load_reports_malformed_file() {
        let err = CategoryTable::load_json(Path::new("tests/fixtures/vocabulary/device.json"));
        assert!(matches!(err, Err(VocabularyError::Json(_))));
    }
}
