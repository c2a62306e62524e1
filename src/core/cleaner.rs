//! Prompt text normalization.

/// Phrase corrections for artifacts left when a slot contributes nothing.
/// Applied until none matches.
pub const PHRASE_FIXUPS: &[(&str, &str)] = &[(" of as ", " of "), (" a as ", " as ")];

/// Normalize punctuation and whitespace in prompt text.
///
/// Every comma becomes `", "`, runs of commas collapse to one, leading and
/// trailing commas and spaces go away, and whitespace runs become a single
/// space. Idempotent: `clean(&clean(x)) == clean(x)`.
pub fn clean(text: &str) -> String {
    let mut out = text
        .split(',')
        .map(collapse_whitespace)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    loop {
        let before = out.len();
        for (from, to) in PHRASE_FIXUPS {
            if out.contains(from) {
                out = out.replace(from, to);
            }
        }
        if out.len() == before {
            break;
        }
    }

    out
}

fn collapse_whitespace(piece: &str) -> String {
    piece.split_whitespace().collect::<Vec<_>>().join(" ")
}
