//! Key phrase and page reference extraction from tutor responses

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Two-word windows must be longer than this many characters
const MIN_WINDOW_CHARS: usize = 6;

fn quoted_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([^"\n]+)"|“([^”\n]+)”"#).expect("valid quote regex"))
}

fn emphasis_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*([^*\n]+)\*\*").expect("valid emphasis regex"))
}

fn page_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bpage\s+(\d+)").expect("valid page regex"))
}

/// Ordered, case-insensitively deduplicated phrase list with a cap
struct PhraseList {
    phrases: Vec<String>,
    seen: HashSet<String>,
    max: usize,
}

impl PhraseList {
    fn new(max: usize) -> Self {
        Self {
            phrases: Vec::new(),
            seen: HashSet::new(),
            max,
        }
    }

    fn is_full(&self) -> bool {
        self.phrases.len() >= self.max
    }

    fn push(&mut self, phrase: &str) {
        let phrase = phrase.trim();
        if phrase.is_empty() || self.is_full() {
            return;
        }
        if self.seen.insert(phrase.to_lowercase()) {
            self.phrases.push(phrase.to_string());
        }
    }
}

/// Candidate phrases from an AI response, most specific first
///
/// Priority: quoted substrings, then `**emphasized**` substrings, then
/// consecutive two-word windows longer than six characters. Duplicates
/// (ignoring case) keep their first position; at most `max` are returned.
pub fn extract_key_phrases(text: &str, max: usize) -> Vec<String> {
    let mut list = PhraseList::new(max);

    for caps in quoted_re().captures_iter(text) {
        if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            list.push(m.as_str());
        }
    }

    for caps in emphasis_re().captures_iter(text) {
        list.push(&caps[1]);
    }

    let words: Vec<&str> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();

    for pair in words.windows(2) {
        if list.is_full() {
            break;
        }
        let window = format!("{} {}", pair[0], pair[1]);
        if window.chars().count() > MIN_WINDOW_CHARS {
            list.push(&window);
        }
    }

    list.phrases
}

/// Page numbers mentioned as "page N", in order of first mention
pub fn page_references(text: &str) -> Vec<u32> {
    let mut seen = HashSet::new();
    page_re()
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .filter(|page| *page > 0 && seen.insert(*page))
        .collect()
}
