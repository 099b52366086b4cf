use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

pub const EMPTY_RESPONSE_MESSAGE: &str = "⚠️ Empty response.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Hi,
    En,
}

/// Cleaned answer returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub message: String,
    pub lang: Lang,
}

impl Advice {
    pub fn new(message: impl Into<String>, lang: Lang) -> Self {
        Self {
            message: message.into(),
            lang,
        }
    }
}

fn lang_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"(?i)(?:\r?\n)?LANG:[\s\x1c-\x1f]*(hi|en)[\s\x1c-\x1f]*$")
            .expect("language marker pattern is valid")
    })
}

/// Strips a trailing `LANG: hi|en` line, returning the remaining text and the tag.
/// Without a marker the text comes back untouched and the tag is `en`.
pub fn split_lang_tag(raw: &str) -> (&str, Lang) {
    let Some(caps) = lang_marker().captures(raw) else {
        return (raw, Lang::En);
    };
    let lang = if caps[1].eq_ignore_ascii_case("hi") {
        Lang::Hi
    } else {
        Lang::En
    };
    let marker_start = caps.get(0).map_or(raw.len(), |m| m.start());
    (&raw[..marker_start], lang)
}

/// Unicode whitespace plus the ASCII file/group/record/unit separators.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Trims every line and drops the ones left empty.
pub fn clean_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| line.trim_matches(is_blank))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn finalize(raw: &str) -> Advice {
    let (body, lang) = split_lang_tag(raw);
    let message = clean_lines(body);
    if message.is_empty() {
        Advice::new(EMPTY_RESPONSE_MESSAGE, lang)
    } else {
        Advice::new(message, lang)
    }
}
