/// Category resolution: turns one directive and one pool into text.
///
/// Randomness comes only from the caller's `StdRng`. The number and order
/// of draws per call is fixed for a given directive and pool, which keeps
/// whole prompts reproducible from a seed.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::schema::directive::Directive;

/// Separator used when several values fill one slot.
pub const VALUE_SEPARATOR: &str = ", ";

/// Resolve a directive to at most one value.
///
/// With an empty pool, `random` and `disabled` yield nothing and any other
/// directive passes through verbatim without touching the RNG.
pub fn resolve_single(raw: &str, pool: &[String], rng: &mut StdRng) -> String {
    let directive = Directive::parse(raw);
    if pool.is_empty() {
        return match directive {
            Directive::Disabled | Directive::Random => String::new(),
            Directive::Choices(_) | Directive::Literal(_) => raw.to_string(),
        };
    }

    match directive {
        Directive::Disabled => String::new(),
        Directive::Choices(choices) => choices.choose(rng).cloned().unwrap_or_default(),
        Directive::Random => pool.choose(rng).cloned().unwrap_or_default(),
        Directive::Literal(value) => value,
    }
}

/// Resolve a directive to several values joined with `", "`.
///
/// On `random`, a count is drawn from `[min_count, max_count]`, clipped to
/// the pool size, and that many distinct pool entries are sampled. A user
/// list is used whole.
pub fn resolve_multiple(
    raw: &str,
    pool: &[String],
    min_count: usize,
    max_count: usize,
    rng: &mut StdRng,
) -> String {
    match Directive::parse(raw) {
        Directive::Disabled => String::new(),
        Directive::Choices(choices) => choices.join(VALUE_SEPARATOR),
        Directive::Literal(value) => value,
        Directive::Random => {
            if pool.is_empty() {
                return String::new();
            }
            let (low, high) = if min_count <= max_count {
                (min_count, max_count)
            } else {
                (max_count, min_count)
            };
            let count = rng.gen_range(low..=high).min(pool.len());
            pool.choose_multiple(rng, count)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(VALUE_SEPARATOR)
        }
    }
}
