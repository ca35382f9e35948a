use url::Url;

use crate::domain::Classification;

/// Domains we never want: social networks, job boards, video platforms.
/// Matching covers the domain itself and every subdomain of it.
pub const DENIED_DOMAINS: [&str; 10] = [
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "tiktok.com",
    "pinterest.com",
    "youtube.com",
    "linkedin.com",
    "indeed.com",
    "glassdoor.com",
];

/// Gov/school/official-ish suffixes we always care about, even when the text
/// is weaker.
pub const IMPORTANT_DOMAIN_SUFFIXES: [&str; 6] = [
    ".nyc.gov",
    ".ny.gov",
    ".gov",
    ".k12.ny.us",
    ".edu",
    "schools.nyc.gov",
];

pub const LOCATION_KEYWORDS: [&str; 8] = [
    "new york",
    "nyc",
    "new york city",
    "manhattan",
    "brooklyn",
    "queens",
    "bronx",
    "staten island",
];

pub const OPPORTUNITY_KEYWORDS: [&str; 19] = [
    "rfp",
    "request for proposals",
    "request for proposal",
    "invitation to bid",
    "invitation for bid",
    "ifb",
    "bid",
    "bids",
    "bidding",
    "solicitation",
    "tender",
    "scope of work",
    "statement of work",
    "sow",
    "proposal due",
    "proposals due",
    "vendor",
    "contractor",
    "procurement",
];

/// Lowercased host with any leading `www.` stripped. `None` when the url does
/// not parse or has no host.
pub fn normalize_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    if host.is_empty() {
        return None;
    }
    match host.strip_prefix("www.") {
        Some(stripped) => Some(stripped.to_string()),
        None => Some(host),
    }
}

pub fn is_denied_domain(domain: &str) -> bool {
    DENIED_DOMAINS
        .iter()
        .any(|denied| domain == *denied || domain.ends_with(&format!(".{denied}")))
}

pub fn is_important_domain(domain: &str) -> bool {
    IMPORTANT_DOMAIN_SUFFIXES
        .iter()
        .any(|suffix| domain.ends_with(suffix))
}

pub fn mentions_target_location(text: &str) -> bool {
    let lowered = text.to_lowercase();
    LOCATION_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

pub fn looks_like_opportunity(text: &str) -> bool {
    let lowered = text.to_lowercase();
    OPPORTUNITY_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

pub fn classify(domain: &str, text: &str) -> Classification {
    Classification {
        is_important_domain: is_important_domain(domain),
        has_location_signal: mentions_target_location(text),
        has_opportunity_signal: looks_like_opportunity(text),
    }
}
