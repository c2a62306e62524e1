/// Vocabulary Linter — checks vocabulary files for coverage and entries
/// that would misbehave inside a prompt.
///
/// Usage: vocab_linter <vocab_dir>

use prompt_weaver::core::splitter::contains_marker;
use prompt_weaver::core::vocabulary::read_json_entries;
use prompt_weaver::schema::category::Category;
use prompt_weaver::schema::directive::{Directive, LIST_SEPARATOR};
use std::collections::HashSet;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: vocab_linter <vocab_dir>");
        process::exit(0);
    }

    let vocab_dir = Path::new(&args[1]);
    if !vocab_dir.is_dir() {
        eprintln!("ERROR: Path '{}' is not a directory", vocab_dir.display());
        process::exit(1);
    }

    let (errors, warnings) = lint_dir(vocab_dir);

    println!("\n=== Vocabulary Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_dir(dir: &Path) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for category in Category::ALL {
        let file = format!("{}.json", category.name());
        let path = dir.join(&file);
        if !path.exists() {
            warnings.push(format!(
                "No '{}' found; category '{}' will have an empty pool",
                file, category
            ));
            continue;
        }

        match read_json_entries(&path) {
            Ok(entries) => {
                println!("  Loaded: {} ({} entries)", path.display(), entries.len());
                lint_entries(category, &entries, &mut warnings);
            }
            Err(e) => errors.push(format!("Failed to load '{}': {}", path.display(), e)),
        }
    }

    // Files that no category will ever read
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            if Category::from_name(&stem).is_none() {
                warnings.push(format!(
                    "'{}' does not match any category and will be ignored",
                    path.display()
                ));
            }
        }
    }

    (errors, warnings)
}

fn lint_entries(category: Category, entries: &[String], warnings: &mut Vec<String>) {
    if entries.is_empty() {
        warnings.push(format!("Category '{}' is empty", category));
        return;
    }

    let mut seen = HashSet::new();
    for entry in entries {
        if entry.trim().is_empty() {
            warnings.push(format!("Category '{}' has a blank entry", category));
            continue;
        }
        if !seen.insert(entry.as_str()) {
            warnings.push(format!(
                "Category '{}' lists '{}' more than once",
                category, entry
            ));
        }
        if contains_marker(entry) {
            warnings.push(format!(
                "Category '{}' entry '{}' holds a region token and will be dropped",
                category, entry
            ));
        }
        if entry.contains(LIST_SEPARATOR) {
            // Picked as a literal override, this entry would be read as a list
            warnings.push(format!(
                "Category '{}' entry '{}' contains a comma",
                category, entry
            ));
        }
        if Directive::is_reserved(entry) {
            warnings.push(format!(
                "Category '{}' entry '{}' is a reserved directive word",
                category, entry
            ));
        }
    }
}
