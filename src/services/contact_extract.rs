use std::collections::BTreeSet;

use regex::Regex;

use crate::domain::{truncate_chars, ContactDetails};

/// Contact-name labels are only searched this deep into the page text.
const NAME_SEARCH_WINDOW: usize = 2000;
const SNIPPET_BEFORE: usize = 200;
const SNIPPET_AFTER: usize = 400;
const SNIPPET_FALLBACK: usize = 400;

pub struct ContactExtractor {
    email: Regex,
    phone: Regex,
    address: Regex,
    name_labels: Vec<Regex>,
    snippet_primary: Regex,
    snippet_secondary: Regex,
    whitespace: Regex,
}

impl ContactExtractor {
    pub fn new() -> Self {
        // Ordered: the more specific labels first so "Contact person: Jane
        // Doe" is not clipped by the bare "contact" label.
        let labels = [
            "contact person",
            "point of contact",
            "project manager",
            "attention",
            "attn",
            "contact",
        ];
        let name_labels = labels
            .iter()
            .map(|label| {
                Regex::new(&format!(
                    r"(?i)\b{label}\s*[:\-]\s*([A-Za-z][A-Za-z.'-]*(?:[ \t]+[A-Za-z][A-Za-z.'-]*){{0,5}})"
                ))
                .unwrap()
            })
            .collect();

        ContactExtractor {
            email: Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap(),
            phone: Regex::new(r"\(?[2-9]\d{2}\)?[\s.-]{1,3}\d{3}[\s.-]{1,3}\d{4}\b").unwrap(),
            address: Regex::new(
                r"(?i)\b\d{1,5}\s+(?:[A-Za-z0-9'.-]+\s+){1,4}(?:street|st|avenue|ave|road|rd|boulevard|blvd|drive|dr|lane|ln|place|pl|court|ct|plaza|broadway)\b\.?(?:,?\s*(?:suite|ste|floor|fl|unit|#)\s*[A-Za-z0-9-]+)?",
            )
            .unwrap(),
            name_labels,
            snippet_primary: Regex::new(r"(?i)contact").unwrap(),
            snippet_secondary: Regex::new(r"(?i)phone|tel|call|email").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    pub fn extract(&self, text: &str) -> ContactDetails {
        ContactDetails {
            emails: self.emails(text),
            phones: self.phones(text),
            addresses: self.addresses(text),
            contact_name: self.contact_name(text),
            contact_snippet: self.contact_snippet(text),
        }
    }

    pub fn emails(&self, text: &str) -> Vec<String> {
        self.email
            .find_iter(text)
            .map(|hit| hit.as_str().to_string())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }

    fn phones(&self, text: &str) -> Vec<String> {
        self.phone
            .find_iter(text)
            .map(|hit| self.whitespace.replace_all(hit.as_str(), " ").to_string())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }

    fn addresses(&self, text: &str) -> Vec<String> {
        self.address
            .find_iter(text)
            .map(|hit| self.whitespace.replace_all(hit.as_str(), " ").to_string())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }

    /// Best effort: the first label pattern whose capture tokenizes to 2-5
    /// words wins. Only the head of the page is searched.
    fn contact_name(&self, text: &str) -> Option<String> {
        let head = truncate_chars(text, NAME_SEARCH_WINDOW);

        for label in &self.name_labels {
            if let Some(captures) = label.captures(&head) {
                let candidate = captures.get(1)?.as_str().trim();
                let words = candidate.split_whitespace().count();
                if (2..=5).contains(&words) {
                    return Some(candidate.to_string());
                }
            }
        }
        None
    }

    /// A window of text around the first contact-ish keyword, kept for human
    /// review: 200 characters before the keyword, 400 after. Falls back to
    /// the head of the page when nothing matches.
    fn contact_snippet(&self, text: &str) -> String {
        let position = self
            .snippet_primary
            .find(text)
            .or_else(|| self.snippet_secondary.find(text))
            .map(|hit| hit.start());

        match position {
            Some(index) => {
                let start = chars_before(text, index, SNIPPET_BEFORE);
                let end = chars_after(text, index, SNIPPET_AFTER);
                text[start..end].trim().to_string()
            }
            None => truncate_chars(text, SNIPPET_FALLBACK),
        }
    }
}

impl Default for ContactExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte index of the character `count` characters before `index`, clamped to
/// the start of `text`. `index` must sit on a char boundary.
fn chars_before(text: &str, index: usize, count: usize) -> usize {
    text[..index]
        .char_indices()
        .rev()
        .take(count)
        .last()
        .map(|(offset, _)| offset)
        .unwrap_or(index)
}

/// Byte index `count` characters after `index`, clamped to the end of `text`.
fn chars_after(text: &str, index: usize, count: usize) -> usize {
    text[index..]
        .char_indices()
        .nth(count)
        .map(|(offset, _)| index + offset)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_deduplicated_and_sorted() {
        let extractor = ContactExtractor::new();
        let text = "Reach zoe@example.com or amy@example.com; again: zoe@example.com";

        assert_eq!(
            extractor.emails(text),
            vec!["amy@example.com".to_string(), "zoe@example.com".to_string()]
        );
    }

    #[test]
    fn email_extraction_is_idempotent() {
        let extractor = ContactExtractor::new();
        let text = "bids@agency.ny.gov, facilities@foo.k12.ny.us, bids@agency.ny.gov";

        let first = extractor.emails(text);
        let second = extractor.emails(&first.join(" "));
        assert_eq!(first, second);
    }

    #[test]
    fn phones_are_normalized_and_deduplicated() {
        let extractor = ContactExtractor::new();
        let text = "Call (212) 555-0188 or 718-555-0199. Fax: (212)  555-0188";

        let details = extractor.extract(text);
        assert_eq!(
            details.phones,
            vec!["(212) 555-0188".to_string(), "718-555-0199".to_string()]
        );
    }

    #[test]
    fn street_addresses_are_found() {
        let extractor = ContactExtractor::new();
        let text = "Visit us at 350 Fifth Avenue, Suite 2100 or mail 1 Centre Street.";

        let details = extractor.extract(text);
        assert_eq!(details.addresses.len(), 2);
        assert!(details
            .addresses
            .iter()
            .any(|address| address.starts_with("350 Fifth Avenue")));
    }

    #[test]
    fn contact_name_accepts_two_to_five_words() {
        let extractor = ContactExtractor::new();

        let details = extractor.extract("Contact: Jane Doe\nPhone: (212) 555-0188");
        assert_eq!(details.contact_name.as_deref(), Some("Jane Doe"));

        let attn = extractor.extract("Attn: Robert J. Van Der Berg, Purchasing");
        assert_eq!(attn.contact_name.as_deref(), Some("Robert J. Van Der Berg"));
    }

    #[test]
    fn contact_name_rejects_single_words_and_long_runs() {
        let extractor = ContactExtractor::new();

        assert!(extractor.extract("Contact: Purchasing").contact_name.is_none());
        assert!(extractor
            .extract("Contact: the office of the deputy commissioner for school facilities")
            .contact_name
            .is_none());
    }

    #[test]
    fn contact_name_label_beyond_window_is_ignored() {
        let extractor = ContactExtractor::new();
        let mut text = "x".repeat(NAME_SEARCH_WINDOW + 10);
        text.push_str(" Contact: Jane Doe");

        assert!(extractor.extract(&text).contact_name.is_none());
    }

    #[test]
    fn snippet_windows_around_the_first_contact_keyword() {
        let extractor = ContactExtractor::new();
        let prefix = "a".repeat(300);
        let suffix = "b".repeat(500);
        let text = format!("{prefix} Contact our office {suffix}");

        let snippet = extractor.extract(&text).contact_snippet;
        assert!(snippet.contains("Contact our office"));
        // 200 before + the keyword + 400 after.
        assert!(snippet.len() <= SNIPPET_BEFORE + SNIPPET_AFTER + 1);
        assert!(snippet.starts_with('a'));
        assert!(snippet.ends_with('b'));
    }

    #[test]
    fn snippet_falls_back_to_first_400_chars() {
        let extractor = ContactExtractor::new();
        let text = "z".repeat(1000);

        let snippet = extractor.extract(&text).contact_snippet;
        assert_eq!(snippet, "z".repeat(400));
    }

    #[test]
    fn snippet_window_counts_chars_not_bytes() {
        let extractor = ContactExtractor::new();
        // Multi-byte characters on both sides: the window must still span
        // 200 chars before the keyword and 400 after it.
        let text = format!("{}Contact{}", "é".repeat(300), "ü".repeat(500));

        let snippet = extractor.extract(&text).contact_snippet;
        assert_eq!(snippet.chars().count(), SNIPPET_BEFORE + SNIPPET_AFTER);
        assert!(snippet.starts_with('é'));
        assert!(snippet.ends_with('ü'));
    }

    #[test]
    fn snippet_slicing_is_char_boundary_safe() {
        let extractor = ContactExtractor::new();
        let text = format!("{}Contact: Büro für Straßenbau{}", "é".repeat(150), "ü".repeat(300));

        // Must not panic on multi-byte boundaries.
        let snippet = extractor.extract(&text).contact_snippet;
        assert!(snippet.contains("Contact"));
    }
}
