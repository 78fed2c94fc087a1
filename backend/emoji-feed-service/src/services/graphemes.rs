//! Grapheme segmentation and emoji classification.
//!
//! Post content is measured and ranked in extended grapheme clusters (UAX #29),
//! so a flag, a ZWJ family or a skin-toned hand counts as one symbol.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use unicode_segmentation::{Graphemes, UnicodeSegmentation};
use validator::ValidationError;

/// Upper bound on post length, in grapheme clusters
pub const MAX_POST_GRAPHEMES: usize = 250;

// Every code point may only be pictographic or an emoji joiner/modifier/selector
static EMOJI_CLUSTER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{Extended_Pictographic}\p{Emoji_Component}]+$")
        .expect("hardcoded emoji cluster regex is invalid - fix source code")
});

static PICTOGRAPHIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\p{Extended_Pictographic}")
        .expect("hardcoded pictographic regex is invalid - fix source code")
});

const REGIONAL_INDICATORS: std::ops::RangeInclusive<char> = '\u{1F1E6}'..='\u{1F1FF}';
const SKIN_TONE_MODIFIERS: std::ops::RangeInclusive<char> = '\u{1F3FB}'..='\u{1F3FF}';
const COMBINING_KEYCAP: char = '\u{20E3}';

/// Lazily split `text` into extended grapheme clusters.
///
/// The returned iterator is `Clone`, so callers can restart it cheaply.
pub fn graphemes(text: &str) -> Graphemes<'_> {
    text.graphemes(true)
}

/// Number of user-perceived characters in `text`
pub fn grapheme_count(text: &str) -> usize {
    graphemes(text).count()
}

/// True when a single grapheme cluster renders as an emoji.
///
/// Digits, `#` and `*` are emoji components but only count when they form a
/// keycap sequence.
pub fn is_emoji_grapheme(cluster: &str) -> bool {
    if !EMOJI_CLUSTER_REGEX.is_match(cluster) {
        return false;
    }

    PICTOGRAPHIC_REGEX.is_match(cluster)
        || cluster.chars().any(|c| {
            REGIONAL_INDICATORS.contains(&c)
                || SKIN_TONE_MODIFIERS.contains(&c)
                || c == COMBINING_KEYCAP
        })
}

/// Emoji clusters of `text`, in order of appearance
pub fn emoji_graphemes(text: &str) -> impl Iterator<Item = &str> + Clone {
    graphemes(text).filter(|g| is_emoji_grapheme(g))
}

/// validator crate compatible check for post content
pub fn validate_emoji_content(content: &str) -> Result<(), ValidationError> {
    let mut count = 0usize;
    for cluster in graphemes(content) {
        if !is_emoji_grapheme(cluster) {
            return Err(content_error("emoji", "Only emojis are allowed"));
        }
        count += 1;
    }

    if count == 0 {
        return Err(content_error("length", "Post must contain at least 1 emoji"));
    }
    if count > MAX_POST_GRAPHEMES {
        return Err(content_error(
            "length",
            "Post must contain at most 250 emojis",
        ));
    }

    Ok(())
}

fn content_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}
