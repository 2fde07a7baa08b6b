/// Free-text fabric composition parsing with keyword validation.
use crate::presets::vocabulary;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Ordered mapping from matched material phrase to percentage weight.
/// Insertion order is preserved so dominance ties break deterministically
/// on the first-seen phrase. Immutable once returned by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialComposition {
    entries: Vec<(String, u32)>,
}

impl MaterialComposition {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Percentage for a phrase, if it was matched.
    pub fn get(&self, phrase: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(p, _)| p == phrase)
            .map(|&(_, pct)| pct)
    }

    /// Iterate phrases and percentages in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(p, pct)| (p.as_str(), *pct))
    }

    /// Entry with the largest percentage; ties keep the earliest insertion.
    pub fn dominant(&self) -> Option<(&str, u32)> {
        let mut best: Option<(&str, u32)> = None;
        for (phrase, pct) in self.iter() {
            match best {
                Some((_, best_pct)) if pct <= best_pct => {}
                _ => best = Some((phrase, pct)),
            }
        }
        best
    }

    /// Accumulate a percentage. A phrase captured by both scan patterns
    /// sums its percentages rather than deduplicating.
    fn add(&mut self, phrase: String, percent: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| *p == phrase) {
            entry.1 = entry.1.saturating_add(percent);
        } else {
            self.entries.push((phrase, percent));
        }
    }
}

impl Serialize for MaterialComposition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (phrase, pct) in self.iter() {
            map.serialize_entry(phrase, &pct)?;
        }
        map.end()
    }
}

/// Extract percentage/material pairs from a free-text composition string.
///
/// Runs two independent scans over the lowercased input: "N% phrase" and
/// "phrase N%". A captured phrase is accepted only if it contains at least
/// one keyword from the preset vocabulary; anything else ("100% Free
/// Returns") is silently dropped as noise, not treated as an error.
pub fn parse_composition(text: &str) -> MaterialComposition {
    let mut composition = MaterialComposition::default();
    if text.is_empty() {
        return composition;
    }

    let lowered: Vec<char> = text.to_lowercase().chars().collect();

    scan_percent_then_phrase(&lowered, &mut composition);
    scan_phrase_then_percent(&lowered, &mut composition);

    composition
}

fn is_phrase_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_whitespace()
}

/// Read a digit run starting at `i`, returning the saturated value and the
/// index one past the run.
fn read_percent(chars: &[char], mut i: usize) -> (u32, usize) {
    let mut value: u32 = 0;
    while i < chars.len() && chars[i].is_ascii_digit() {
        let digit = chars[i] as u32 - '0' as u32;
        value = value.saturating_mul(10).saturating_add(digit);
        i += 1;
    }
    (value, i)
}

fn skip_spaces(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}

/// Validate and record one captured phrase.
fn accept(composition: &mut MaterialComposition, raw: &str, percent: u32) {
    let phrase = raw.trim();
    if phrase.is_empty() {
        return;
    }
    if vocabulary().any(|keyword| phrase.contains(keyword)) {
        composition.add(phrase.to_string(), percent);
    }
}

/// Scan for "90% wool" shaped matches: digit run, '%', then a run of
/// letters and spaces forming the phrase.
fn scan_percent_then_phrase(chars: &[char], composition: &mut MaterialComposition) {
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let (percent, after_digits) = read_percent(chars, i);
        let at_sign = skip_spaces(chars, after_digits);
        if at_sign >= chars.len() || chars[at_sign] != '%' {
            i = after_digits;
            continue;
        }
        let mut end = at_sign + 1;
        while end < chars.len() && is_phrase_char(chars[end]) {
            end += 1;
        }
        let raw: String = chars[at_sign + 1..end].iter().collect();
        accept(composition, &raw, percent);
        i = end.max(at_sign + 1);
    }
}

/// Scan for "wool 90%" shaped matches: for every digit run followed by
/// '%', the phrase is the letter/space run immediately preceding it.
fn scan_phrase_then_percent(chars: &[char], composition: &mut MaterialComposition) {
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let digits_start = i;
        let (percent, after_digits) = read_percent(chars, i);
        let at_sign = skip_spaces(chars, after_digits);
        if at_sign >= chars.len() || chars[at_sign] != '%' {
            i = after_digits;
            continue;
        }
        let mut start = digits_start;
        while start > 0 && is_phrase_char(chars[start - 1]) {
            start -= 1;
        }
        let raw: String = chars[start..digits_start].iter().collect();
        accept(composition, &raw, percent);
        i = at_sign + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(text: &str) -> Vec<(String, u32)> {
        parse_composition(text)
            .iter()
            .map(|(p, pct)| (p.to_string(), pct))
            .collect()
    }

    #[test]
    fn single_material() {
        assert_eq!(entries("100% Cotton"), vec![("cotton".to_string(), 100)]);
    }

    #[test]
    fn material_before_percent() {
        assert_eq!(
            entries("Wool 90%, Cashmere 10%"),
            vec![("wool".to_string(), 90), ("cashmere".to_string(), 10)]
        );
    }

    #[test]
    fn blend_preserves_scan_order() {
        assert_eq!(
            entries("50% Polyester, 50% Cotton"),
            vec![("polyester".to_string(), 50), ("cotton".to_string(), 50)]
        );
    }

    #[test]
    fn unknown_phrase_is_dropped() {
        assert!(parse_composition("100% Free Returns").is_empty());
    }

    #[test]
    fn mixed_valid_and_invalid_keeps_the_valid_entry() {
        assert_eq!(
            entries("100% Cotton, 100% Love"),
            vec![("cotton".to_string(), 100)]
        );
    }

    #[test]
    fn empty_input_yields_empty_composition() {
        assert!(parse_composition("").is_empty());
    }

    #[test]
    fn double_captured_phrase_sums_percentages() {
        // "cotton 50%" matches both scan patterns when a stray percent
        // figure precedes it; summation is the documented choice here,
        // not deduplication.
        let composition = parse_composition("50% cotton 50%");
        assert_eq!(composition.get("cotton"), Some(100));
    }

    #[test]
    fn dominant_breaks_ties_on_first_insertion() {
        let composition = parse_composition("50% Silk, 50% Cotton");
        assert_eq!(composition.dominant(), Some(("silk", 50)));
    }

    #[test]
    fn noisy_multilingual_text_keeps_known_keywords() {
        let composition = parse_composition("소재: 95% cotton, 5% elastane 快適");
        assert_eq!(composition.get("cotton"), Some(95));
        assert_eq!(composition.get("elastane"), Some(5));
    }

    #[test]
    fn oversized_percent_saturates_instead_of_panicking() {
        let composition = parse_composition("99999999999999999999% cotton");
        assert_eq!(composition.get("cotton"), Some(u32::MAX));
    }
}
