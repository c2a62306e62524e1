/// Marker splitting: derives per-encoder streams from a combined prompt.
///
/// The combined prompt is tokenized once into text chunks and region
/// markers, then folded with one membership flag per region.

use serde::{Deserialize, Serialize};

use crate::core::cleaner::clean;

/// An auxiliary output region, delimited by a pair of identical tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    ClipL,
    ClipG,
}

impl Region {
    pub const ALL: [Region; 2] = [Region::ClipL, Region::ClipG];

    /// The literal token that both opens and closes this region.
    pub fn token(self) -> &'static str {
        match self {
            Region::ClipL => "BREAK_CLIPL",
            Region::ClipG => "BREAK_CLIPG",
        }
    }

    fn index(self) -> usize {
        match self {
            Region::ClipL => 0,
            Region::ClipG => 1,
        }
    }
}

/// One piece of a tokenized prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Marker(Region),
}

/// The cleaned streams derived from one combined prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPrompt {
    /// Text outside every region.
    pub default_stream: String,
    /// All text with markers removed and region content kept.
    pub full_stream: String,
    pub clip_l: String,
    pub clip_g: String,
}

/// Tokenize a combined prompt in a single left-to-right pass.
pub fn tokenize(input: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut chunk_start = 0;
    let mut i = 0;

    while i < input.len() {
        let rest = &input[i..];
        if let Some(region) = Region::ALL
            .into_iter()
            .find(|r| rest.starts_with(r.token()))
        {
            if chunk_start < i {
                segments.push(Segment::Text(&input[chunk_start..i]));
            }
            segments.push(Segment::Marker(region));
            i += region.token().len();
            chunk_start = i;
            continue;
        }
        // Advance by one whole character to stay on a char boundary
        i += rest.chars().next().map_or(1, char::len_utf8);
    }

    if chunk_start < input.len() {
        segments.push(Segment::Text(&input[chunk_start..]));
    }

    segments
}

/// Split a combined prompt into its cleaned streams.
///
/// The first two occurrences of a region's token bound that region. A token
/// that appears only once extracts nothing, and occurrences past the second
/// are ignored; in both cases the surrounding text stays in the default
/// stream.
pub fn split(combined: &str) -> SplitPrompt {
    let segments = tokenize(combined);

    let mut occurrences = [0usize; 2];
    for segment in &segments {
        if let Segment::Marker(region) = segment {
            occurrences[region.index()] += 1;
        }
    }
    let paired = occurrences.map(|n| n >= 2);

    let mut seen = [0usize; 2];
    let mut inside = [false; 2];
    let mut default_stream = String::new();
    let mut full_stream = String::new();
    let mut clip_l = String::new();
    let mut clip_g = String::new();

    for segment in segments {
        match segment {
            Segment::Marker(region) => {
                let idx = region.index();
                if paired[idx] {
                    match seen[idx] {
                        0 => inside[idx] = true,
                        1 => inside[idx] = false,
                        _ => {}
                    }
                }
                seen[idx] += 1;
                // Keep words on either side of a dropped marker apart
                full_stream.push(' ');
                default_stream.push(' ');
            }
            Segment::Text(text) => {
                full_stream.push_str(text);
                let in_l = inside[Region::ClipL.index()];
                let in_g = inside[Region::ClipG.index()];
                if in_l {
                    clip_l.push_str(text);
                }
                if in_g {
                    clip_g.push_str(text);
                }
                if !in_l && !in_g {
                    default_stream.push_str(text);
                }
            }
        }
    }

    tracing::debug!(
        clip_l_paired = paired[Region::ClipL.index()],
        clip_g_paired = paired[Region::ClipG.index()],
        "split combined prompt"
    );

    SplitPrompt {
        default_stream: clean(&default_stream),
        full_stream: clean(&full_stream),
        clip_l: clean(&clip_l),
        clip_g: clean(&clip_g),
    }
}

/// Remove every region token from `text`.
///
/// Generated values pass through this before assembly so that the only
/// tokens in a combined prompt are the ones the assembler placed.
pub fn strip_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in tokenize(text) {
        match segment {
            Segment::Text(t) => out.push_str(t),
            Segment::Marker(_) => out.push(' '),
        }
    }
    out
}

/// True if `text` holds any region token.
pub fn contains_marker(text: &str) -> bool {
    Region::ALL.iter().any(|r| text.contains(r.token()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_plain_text() {
        assert_eq!(tokenize("a cat"), vec![Segment::Text("a cat")]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn tokenize_markers_and_text() {
        let segments = tokenize("A BREAK_CLIPL B BREAK_CLIPGBREAK_CLIPG");
        assert_eq!(
            segments,
            vec![
                Segment::Text("A "),
                Segment::Marker(Region::ClipL),
                Segment::Text(" B "),
                Segment::Marker(Region::ClipG),
                Segment::Marker(Region::ClipG),
            ]
        );
    }

    #[test]
    fn tokenize_handles_multibyte_text() {
        let segments = tokenize("café BREAK_CLIPL ñ");
        assert_eq!(
            segments,
            vec![
                Segment::Text("café "),
                Segment::Marker(Region::ClipL),
                Segment::Text(" ñ"),
            ]
        );
    }

    #[test]
    fn region_round_trip() {
        let split = split("A BREAK_CLIPL B BREAK_CLIPL C");
        assert_eq!(split.clip_l, "B");
        assert_eq!(split.clip_g, "");
        assert_eq!(split.default_stream, "A C");
        assert_eq!(split.full_stream, "A B C");
    }

    #[test]
    fn both_regions() {
        let split = split(
            "portrait of a knight BREAK_CLIPG forest, dusk BREAK_CLIPG green eyes BREAK_CLIPL by someone BREAK_CLIPL",
        );
        assert_eq!(split.clip_g, "forest, dusk");
        assert_eq!(split.clip_l, "by someone");
        assert_eq!(split.default_stream, "portrait of a knight green eyes");
        assert_eq!(
            split.full_stream,
            "portrait of a knight forest, dusk green eyes by someone"
        );
    }

    #[test]
    fn unclosed_region_extracts_nothing() {
        let split = split("A BREAK_CLIPL B C");
        assert_eq!(split.clip_l, "");
        assert_eq!(split.default_stream, "A B C");
        assert_eq!(split.full_stream, "A B C");
    }

    #[test]
    fn occurrences_past_second_are_ignored() {
        let split = split("A BREAK_CLIPG B BREAK_CLIPG C BREAK_CLIPG D");
        assert_eq!(split.clip_g, "B");
        assert_eq!(split.default_stream, "A C D");
    }

    #[test]
    fn empty_regions_leave_no_residue() {
        let split = split("hello world BREAK_CLIPG BREAK_CLIPG BREAK_CLIPL BREAK_CLIPL");
        assert_eq!(split.default_stream, "hello world");
        assert_eq!(split.full_stream, "hello world");
        assert_eq!(split.clip_l, "");
        assert_eq!(split.clip_g, "");
    }

    #[test]
    fn adjacent_marker_does_not_glue_words() {
        let split = split("aBREAK_CLIPLbBREAK_CLIPLc");
        assert_eq!(split.clip_l, "b");
        assert_eq!(split.default_stream, "a c");
    }

    #[test]
    fn strip_markers_removes_tokens() {
        let stripped = strip_markers("neon BREAK_CLIPLglow");
        assert!(!contains_marker(&stripped));
        assert_eq!(clean(&stripped), "neon glow");
    }
}
