use std::time::Duration;

use regex::Regex;
use scraper::Html;
use url::Url;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Guessed sub-paths that often carry contact details.
pub const CONTACT_PATHS: [&str; 2] = ["/contact", "/contact-us"];

/// Outcome of one page fetch. `Empty` covers skipped content kinds and pages
/// with no extractable text; `Failed` covers network errors and bad statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageText {
    Text(String),
    Empty,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Markup,
    Pdf,
    Tabular,
}

/// Content-Type header wins; the url extension is the fallback. Anything
/// unrecognized is treated as markup.
pub fn classify_content(content_type: Option<&str>, url: &str) -> ContentKind {
    if let Some(content_type) = content_type {
        let content_type = content_type.to_lowercase();
        if content_type.contains("csv")
            || content_type.contains("excel")
            || content_type.contains("spreadsheet")
        {
            return ContentKind::Tabular;
        }
        if content_type.contains("pdf") {
            return ContentKind::Pdf;
        }
        if content_type.contains("html") || content_type.contains("text/plain") {
            return ContentKind::Markup;
        }
    }

    let extension = Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path()
                .rsplit('/')
                .next()
                .and_then(|segment| segment.rsplit_once('.'))
                .map(|(_, extension)| extension.to_lowercase())
        })
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "xls" | "xlsx" => ContentKind::Tabular,
        "pdf" => ContentKind::Pdf,
        _ => ContentKind::Markup,
    }
}

/// Strategy seam: text fidelity is best-effort, so a better PDF or HTML
/// extractor can drop in without touching the pipeline.
pub trait TextExtractor: Send + Sync {
    /// `None` means the content kind is skipped on purpose.
    fn extract(&self, kind: ContentKind, body: &[u8]) -> Option<String>;
}

pub struct MarkupTextExtractor {
    script_style: Regex,
    whitespace: Regex,
}

impl MarkupTextExtractor {
    pub fn new() -> Self {
        MarkupTextExtractor {
            script_style: Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    fn markup_to_text(&self, body: &[u8]) -> String {
        let raw = String::from_utf8_lossy(body);
        let stripped = self.script_style.replace_all(&raw, " ");
        let document = Html::parse_document(&stripped);
        let text = document.root_element().text().collect::<Vec<_>>().join(" ");
        self.collapse(&text)
    }

    /// No real PDF parsing: a permissive single-byte decode of the raw stream
    /// is garbled but still regex-matchable for many simple PDFs.
    fn pdf_to_text(&self, body: &[u8]) -> String {
        let decoded: String = body.iter().map(|&byte| byte as char).collect();
        self.collapse(&decoded)
    }

    fn collapse(&self, text: &str) -> String {
        self.whitespace.replace_all(text, " ").trim().to_string()
    }
}

impl Default for MarkupTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for MarkupTextExtractor {
    fn extract(&self, kind: ContentKind, body: &[u8]) -> Option<String> {
        match kind {
            // Tabular exports can be huge and rarely carry a reachable
            // contact, so they are skipped outright.
            ContentKind::Tabular => None,
            ContentKind::Pdf => Some(self.pdf_to_text(body)),
            ContentKind::Markup => Some(self.markup_to_text(body)),
        }
    }
}

pub struct PageFetcher {
    client: reqwest::Client,
    extractor: Box<dyn TextExtractor>,
}

impl PageFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        PageFetcher {
            client,
            extractor: Box::new(MarkupTextExtractor::new()),
        }
    }

    pub async fn fetch_text(&self, url: &str) -> PageText {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Fetch failed for {}: {:?}", url, e);
                return PageText::Failed;
            }
        };

        if !response.status().is_success() {
            log::warn!("Fetch for {} returned status {}", url, response.status());
            return PageText::Failed;
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let kind = classify_content(content_type.as_deref(), url);

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Failed to read body from {}: {:?}", url, e);
                return PageText::Failed;
            }
        };

        match self.extractor.extract(kind, &body) {
            None => {
                log::info!("Skipping tabular content at {}", url);
                PageText::Empty
            }
            Some(text) if text.is_empty() => PageText::Empty,
            Some(text) => PageText::Text(text),
        }
    }

    /// The page itself plus its guessed contact sub-paths, concatenated.
    /// `Failed` only when the main page failed and nothing else was found.
    pub async fn fetch_with_contact_pages(&self, url: &str) -> PageText {
        let mut combined = String::new();
        let mut main_page_failed = false;

        match self.fetch_text(url).await {
            PageText::Text(text) => combined.push_str(&text),
            PageText::Empty => {}
            PageText::Failed => main_page_failed = true,
        }

        for candidate in contact_page_candidates(url) {
            if candidate == url {
                continue;
            }
            if let PageText::Text(text) = self.fetch_text(&candidate).await {
                if !combined.is_empty() {
                    combined.push('\n');
                }
                combined.push_str(&text);
            }
        }

        if combined.is_empty() {
            if main_page_failed {
                PageText::Failed
            } else {
                PageText::Empty
            }
        } else {
            PageText::Text(combined)
        }
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

pub fn contact_page_candidates(url: &str) -> Vec<String> {
    let Ok(parsed) = Url::parse(url) else {
        return vec![];
    };
    if parsed.host_str().is_none() {
        return vec![];
    }

    let origin = parsed.origin().ascii_serialization();
    CONTACT_PATHS
        .iter()
        .map(|path| format!("{origin}{path}"))
        .collect()
}
