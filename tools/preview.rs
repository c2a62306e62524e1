/// Preview — generate prompts from the command line for testing vocabularies.
///
/// Usage: preview [--vocab <dir>] [--vocab-ron <file>] [--config <file.ron>]
///                [--request <file.ron>] [--seed <n>] [--set <category>=<directive>]...
///                [--custom <text>] [--subject <text>] [--all-random]
///                [--variants <n>] [--report] [--json]
///
/// Logging goes to stderr; set RUST_LOG (e.g. RUST_LOG=debug) for detail.

use prompt_weaver::core::engine::{PromptBundle, PromptEngine};
use prompt_weaver::schema::category::Category;
use prompt_weaver::schema::request::PromptRequest;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

struct Options {
    vocab_dir: Option<String>,
    vocab_ron: Option<String>,
    config: Option<String>,
    request: Option<String>,
    seed: Option<u64>,
    sets: Vec<(String, String)>,
    custom: Option<String>,
    subject: Option<String>,
    all_random: bool,
    variants: usize,
    report: bool,
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let options = parse_args(&args[1..]);

    let mut builder = PromptEngine::builder();
    if let Some(ref path) = options.config {
        builder = builder.config_file(path);
    }
    if let Some(ref dir) = options.vocab_dir {
        builder = builder.vocabulary_dir(dir);
    }
    if let Some(ref path) = options.vocab_ron {
        builder = builder.vocabulary_ron(path);
    }
    let engine = builder.build().unwrap_or_else(|e| {
        eprintln!("Error building engine: {}", e);
        process::exit(1);
    });

    let request = build_request(&options);
    let bundles = engine.generate_variants(&request, options.variants.max(1));

    if options.json {
        match serde_json::to_string_pretty(&bundles) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    for bundle in &bundles {
        print_bundle(bundle, options.report);
    }
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        vocab_dir: None,
        vocab_ron: None,
        config: None,
        request: None,
        seed: None,
        sets: Vec::new(),
        custom: None,
        subject: None,
        all_random: false,
        variants: 1,
        report: false,
        json: false,
    };

    let mut i = 0;
    while i < args.len() {
        let takes_value = i + 1 < args.len();
        match args[i].as_str() {
            "--vocab" if takes_value => {
                i += 1;
                options.vocab_dir = Some(args[i].clone());
            }
            "--vocab-ron" if takes_value => {
                i += 1;
                options.vocab_ron = Some(args[i].clone());
            }
            "--config" if takes_value => {
                i += 1;
                options.config = Some(args[i].clone());
            }
            "--request" if takes_value => {
                i += 1;
                options.request = Some(args[i].clone());
            }
            "--seed" if takes_value => {
                i += 1;
                options.seed = Some(args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --seed must be a non-negative integer");
                    process::exit(1);
                }));
            }
            "--set" if takes_value => {
                i += 1;
                match args[i].split_once('=') {
                    Some((key, directive)) => {
                        if Category::from_name(key.trim()).is_none() {
                            eprintln!("Warning: '{}' is not a known category", key);
                        }
                        options
                            .sets
                            .push((key.trim().to_string(), directive.to_string()));
                    }
                    None => {
                        eprintln!("Error: --set expects <category>=<directive>");
                        process::exit(1);
                    }
                }
            }
            "--custom" if takes_value => {
                i += 1;
                options.custom = Some(args[i].clone());
            }
            "--subject" if takes_value => {
                i += 1;
                options.subject = Some(args[i].clone());
            }
            "--variants" if takes_value => {
                i += 1;
                options.variants = args[i].parse().unwrap_or(1);
            }
            "--all-random" => options.all_random = true,
            "--report" => options.report = true,
            "--json" => options.json = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    options
}

/// Layer the request: file, then `--all-random`, then individual flags.
fn build_request(options: &Options) -> PromptRequest {
    let mut request = match options.request {
        Some(ref path) => load_request(Path::new(path)),
        None => PromptRequest::new(42),
    };

    if options.all_random {
        let seed = request.seed;
        let base = PromptRequest::all(seed, "random");
        for (key, directive) in base.directives {
            request.directives.entry(key).or_insert(directive);
        }
    }
    if let Some(seed) = options.seed {
        request.seed = seed;
    }
    if let Some(ref custom) = options.custom {
        request.custom = custom.clone();
    }
    if let Some(ref subject) = options.subject {
        request.subject = subject.clone();
    }
    for (key, directive) in &options.sets {
        request.directives.insert(key.clone(), directive.clone());
    }

    request
}

fn load_request(path: &Path) -> PromptRequest {
    let contents = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading request file '{}': {}", path.display(), e);
        process::exit(1);
    });
    ron::from_str(&contents).unwrap_or_else(|e| {
        eprintln!("Error parsing request file '{}': {}", path.display(), e);
        process::exit(1);
    })
}

fn print_bundle(bundle: &PromptBundle, report: bool) {
    println!("--- seed {} ---", bundle.seed);
    println!("prompt:  {}", bundle.joined());
    println!("default: {}", bundle.default_stream);
    println!("full:    {}", bundle.full_stream);
    println!("clip_l:  {}", bundle.clip_l);
    println!("clip_g:  {}", bundle.clip_g);
    if report {
        println!();
        println!("{}", bundle.usage_report);
    }
    println!();
}

fn print_usage() {
    println!("Usage: preview [options]");
    println!();
    println!("  --vocab <dir>             directory of <category>.json files");
    println!("  --vocab-ron <file>        RON vocabulary bundle merged over --vocab");
    println!("  --config <file.ron>       engine configuration");
    println!("  --request <file.ron>      base request");
    println!("  --seed <n>                seed (default 42)");
    println!("  --set <category>=<dir>    directive: disabled, random, a literal, or a,b,c");
    println!("  --custom <text>           custom lead text");
    println!("  --subject <text>          explicit subject");
    println!("  --all-random              every unset category becomes 'random'");
    println!("  --variants <n>            generate n prompts with consecutive seeds");
    println!("  --report                  print the category usage report");
    println!("  --json                    print bundles as JSON");
    println!();
    println!("Categories:");
    for chunk in Category::ALL.chunks(6) {
        let names: Vec<&str> = chunk.iter().map(|c| c.name()).collect();
        println!("  {}", names.join(", "));
    }
}
