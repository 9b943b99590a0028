//! Rich-text cleanup for outline names and notes

use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<mention[^>]*>[^<]*</mention>").expect("valid mention regex"));
static RE_ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<a[^>]+>.*?</a>").expect("valid anchor regex"));
static RE_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href=["'](.*?)["']"#).expect("valid href regex"));
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static RE_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[xX]([0-9a-fA-F]+)|#([0-9]+)|([a-zA-Z][a-zA-Z0-9]*));")
        .expect("valid entity regex")
});

/// Turn outline rich text into plain text
///
/// Mentions are dropped, links become `[text](href)`, remaining tags are
/// stripped and HTML entities decoded. The result is trimmed.
pub fn clean_text(content: &str) -> String {
    let content = RE_MENTION.replace_all(content, "");
    let content = RE_ANCHOR.replace_all(&content, |caps: &Captures| {
        let anchor = &caps[0];
        let text = RE_TAG.replace_all(anchor, "");
        match RE_HREF.captures(anchor) {
            Some(href) => format!("[{}]({})", text.trim(), &href[1]),
            None => text.trim().to_string(),
        }
    });
    let content = RE_TAG.replace_all(&content, "");
    decode_entities(&content).trim().to_string()
}

/// Decode numeric character references and common named entities
///
/// Named entities cover markup escapes and the typographic characters
/// rich-text editors tend to emit. Unknown names and
/// invalid code points are left as written. Decoding is a single pass, so
/// `&amp;lt;` becomes `&lt;`.
pub fn decode_entities(text: &str) -> String {
    RE_ENTITY
        .replace_all(text, |caps: &Captures| {
            let decoded = match (caps.get(1), caps.get(2), caps.get(3)) {
                (Some(hex), _, _) => u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32),
                (_, Some(dec), _) => dec.as_str().parse::<u32>().ok().and_then(char::from_u32),
                (_, _, Some(name)) => named_entity(name.as_str()),
                _ => None,
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ensp" => '\u{2002}',
        "emsp" => '\u{2003}',
        "thinsp" => '\u{2009}',
        "shy" => '\u{ad}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "sbquo" => '\u{201a}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "bdquo" => '\u{201e}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        "hellip" => '\u{2026}',
        "bull" => '\u{2022}',
        "middot" => '\u{b7}',
        "prime" => '\u{2032}',
        "Prime" => '\u{2033}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        "deg" => '\u{b0}',
        "plusmn" => '\u{b1}',
        "times" => '\u{d7}',
        "divide" => '\u{f7}',
        "minus" => '\u{2212}',
        "ne" => '\u{2260}',
        "le" => '\u{2264}',
        "ge" => '\u{2265}',
        "larr" => '\u{2190}',
        "rarr" => '\u{2192}',
        "harr" => '\u{2194}',
        "rArr" => '\u{21d2}',
        "sect" => '\u{a7}',
        "para" => '\u{b6}',
        "dagger" => '\u{2020}',
        "euro" => '\u{20ac}',
        "pound" => '\u{a3}',
        "yen" => '\u{a5}',
        "cent" => '\u{a2}',
        "frac12" => '\u{bd}',
        "frac14" => '\u{bc}',
        "frac34" => '\u{be}',
        _ => return None,
    };
    Some(decoded)
}
