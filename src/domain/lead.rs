use chrono::Utc;
use sha2::{Digest, Sha256};

use super::{Classification, ContactDetails, SearchResult};

pub const AGENT_NAME: &str = "voltlead-agent-v2";

// Per-field ceilings keep every record comfortably under the backing store's
// per-item size limit.
pub const MAX_URL_CHARS: usize = 500;
pub const MAX_TITLE_CHARS: usize = 300;
pub const MAX_SNIPPET_CHARS: usize = 500;
pub const MAX_CONTACT_SNIPPET_CHARS: usize = 600;
pub const MAX_LIST_ITEM_CHARS: usize = 120;
pub const MAX_EMAILS: usize = 10;
pub const MAX_PHONES: usize = 10;
pub const MAX_ADDRESSES: usize = 5;

#[derive(Debug, Clone)]
pub struct Lead {
    pub id: String,
    pub url: String,
    pub title: String,
    pub snippet: String,
    pub domain: String,
    pub source_query: String,
    pub agent_name: String,
    /// The email this record was fanned out for, when any were found.
    pub primary_email: Option<String>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub addresses: Vec<String>,
    pub contact_name: Option<String>,
    pub contact_snippet: String,
    pub has_location_signal: bool,
    pub has_opportunity_signal: bool,
    pub is_important_domain: bool,
    pub created_at: i64,
}

/// Content-derived identity: the same `(url, primary email)` pair always maps
/// to the same id, so a later run overwrites instead of duplicating.
pub fn lead_id(url: &str, primary_email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(primary_email.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Truncate to at most `max` characters without splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn cap_list(items: &[String], max_items: usize) -> Vec<String> {
    items
        .iter()
        .take(max_items)
        .map(|item| truncate_chars(item, MAX_LIST_ITEM_CHARS))
        .collect()
}

/// Build the records to persist for one qualifying search result. Gate first:
/// no contact channel means no leads. When emails were found, one record is
/// emitted per email so each can later be filtered by its primary contact;
/// otherwise a single record rides on the phones/addresses that were found.
pub fn assemble_leads(
    result: &SearchResult,
    domain: &str,
    query: &str,
    classification: &Classification,
    contacts: &ContactDetails,
) -> Vec<Lead> {
    if !contacts.has_contact_channel() {
        return vec![];
    }

    let created_at = Utc::now().timestamp();

    if contacts.emails.is_empty() {
        return vec![build_lead(
            result,
            domain,
            query,
            classification,
            contacts,
            None,
            created_at,
        )];
    }

    contacts
        .emails
        .iter()
        .take(MAX_EMAILS)
        .map(|email| {
            build_lead(
                result,
                domain,
                query,
                classification,
                contacts,
                Some(email.clone()),
                created_at,
            )
        })
        .collect()
}

fn build_lead(
    result: &SearchResult,
    domain: &str,
    query: &str,
    classification: &Classification,
    contacts: &ContactDetails,
    primary_email: Option<String>,
    created_at: i64,
) -> Lead {
    let discriminator = primary_email.as_deref().unwrap_or_default();

    Lead {
        id: lead_id(&result.link, discriminator),
        url: truncate_chars(&result.link, MAX_URL_CHARS),
        title: truncate_chars(&result.title, MAX_TITLE_CHARS),
        snippet: truncate_chars(&result.snippet, MAX_SNIPPET_CHARS),
        domain: domain.to_string(),
        source_query: query.to_string(),
        agent_name: AGENT_NAME.to_string(),
        primary_email: primary_email.map(|email| truncate_chars(&email, MAX_LIST_ITEM_CHARS)),
        emails: cap_list(&contacts.emails, MAX_EMAILS),
        phones: cap_list(&contacts.phones, MAX_PHONES),
        addresses: cap_list(&contacts.addresses, MAX_ADDRESSES),
        contact_name: contacts
            .contact_name
            .as_deref()
            .map(|name| truncate_chars(name, MAX_LIST_ITEM_CHARS)),
        contact_snippet: truncate_chars(&contacts.contact_snippet, MAX_CONTACT_SNIPPET_CHARS),
        has_location_signal: classification.has_location_signal,
        has_opportunity_signal: classification.has_opportunity_signal,
        is_important_domain: classification.is_important_domain,
        created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> SearchResult {
        SearchResult {
            title: "Security Camera RFP".to_string(),
            link: "https://foo.k12.ny.us/rfp".to_string(),
            snippet: "New York schools seek a low voltage contractor".to_string(),
        }
    }

    fn sample_classification() -> Classification {
        Classification {
            is_important_domain: true,
            has_location_signal: true,
            has_opportunity_signal: true,
        }
    }

    #[test]
    fn no_contact_channel_means_no_leads() {
        let contacts = ContactDetails {
            contact_snippet: "call us for details".to_string(),
            ..Default::default()
        };

        let leads = assemble_leads(
            &sample_result(),
            "foo.k12.ny.us",
            "\"low voltage RFP\" \"New York City\"",
            &sample_classification(),
            &contacts,
        );

        assert!(leads.is_empty());
    }

    #[test]
    fn one_lead_per_discovered_email() {
        let contacts = ContactDetails {
            emails: vec![
                "facilities@foo.k12.ny.us".to_string(),
                "purchasing@foo.k12.ny.us".to_string(),
            ],
            phones: vec!["(212) 555-0188".to_string()],
            ..Default::default()
        };

        let leads = assemble_leads(
            &sample_result(),
            "foo.k12.ny.us",
            "query",
            &sample_classification(),
            &contacts,
        );

        assert_eq!(leads.len(), 2);
        assert_ne!(leads[0].id, leads[1].id);
        assert_eq!(
            leads[0].primary_email.as_deref(),
            Some("facilities@foo.k12.ny.us")
        );
        // Page-derived data is shared across the fan-out.
        assert_eq!(leads[0].phones, leads[1].phones);
        assert_eq!(leads[0].emails, leads[1].emails);
    }

    #[test]
    fn phone_only_result_yields_single_lead_without_primary_email() {
        let contacts = ContactDetails {
            phones: vec!["(212) 555-0188".to_string()],
            ..Default::default()
        };

        let leads = assemble_leads(
            &sample_result(),
            "foo.k12.ny.us",
            "query",
            &sample_classification(),
            &contacts,
        );

        assert_eq!(leads.len(), 1);
        assert!(leads[0].primary_email.is_none());
    }

    #[test]
    fn lead_id_is_deterministic_per_url_and_email() {
        let a = lead_id("https://example.com/rfp", "buyer@example.com");
        let b = lead_id("https://example.com/rfp", "buyer@example.com");
        let c = lead_id("https://example.com/rfp", "other@example.com");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn fields_are_capped_before_persistence() {
        let result = SearchResult {
            title: "t".repeat(1000),
            link: format!("https://example.com/{}", "p".repeat(1000)),
            snippet: "s".repeat(1000),
        };
        let contacts = ContactDetails {
            emails: (0..25).map(|i| format!("person{i}@example.com")).collect(),
            phones: vec![format!("(212) 555-{}", "0".repeat(200))],
            contact_snippet: "c".repeat(2000),
            ..Default::default()
        };

        let leads = assemble_leads(
            &result,
            "example.com",
            "query",
            &sample_classification(),
            &contacts,
        );

        assert_eq!(leads.len(), MAX_EMAILS);
        let lead = &leads[0];
        assert_eq!(lead.title.chars().count(), MAX_TITLE_CHARS);
        assert_eq!(lead.snippet.chars().count(), MAX_SNIPPET_CHARS);
        assert_eq!(lead.url.chars().count(), MAX_URL_CHARS);
        assert_eq!(lead.emails.len(), MAX_EMAILS);
        assert_eq!(lead.phones[0].chars().count(), MAX_LIST_ITEM_CHARS);
        assert_eq!(
            lead.contact_snippet.chars().count(),
            MAX_CONTACT_SNIPPET_CHARS
        );
    }

    #[test]
    fn truncate_chars_respects_code_points() {
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
