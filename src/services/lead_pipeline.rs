use std::collections::HashSet;

use sqlx::PgPool;

use crate::{
    configuration::Settings,
    dal::lead_db,
    domain::{assemble_leads, RunReport, SearchResult},
    services::{
        classify, is_denied_domain, normalize_domain, ContactExtractor, GoogleSearchClient,
        PageFetcher, PageText, ReportMailer,
    },
};

/// New-York-focused query list. `-filetype:pdf` keeps random PDFs out of the
/// result set; PDFs reached through a page are still handled by the fetcher.
pub const LOW_VOLTAGE_QUERIES: [&str; 16] = [
    r#""commercial low voltage contractor" "New York" -filetype:pdf"#,
    r#""property management" "Wi-Fi" "intercom" "CCTV" "NYC" -filetype:pdf"#,
    r#""general contractor" "network cabling" "New York City" -filetype:pdf"#,
    r#""IT service company" "structured cabling" "New York City" -filetype:pdf"#,
    r#""school" "Wi-Fi" "CCTV" "Structured Cabling" "Fiber Optics" "Access Control" "security camera contractor" "New York City" -filetype:pdf"#,
    r#""low voltage RFP" "New York City" -filetype:pdf"#,
    r#""access control bid" "New York City" -filetype:pdf"#,
    r#""security camera bid" "New York" -filetype:pdf"#,
    r#""security camera" "request for proposals" "New York" -filetype:pdf"#,
    r#""access control" "request for proposals" "New York" -filetype:pdf"#,
    r#""structured cabling" "RFP" "NYC" -filetype:pdf"#,
    r#""low voltage" "invitation to bid" "New York" -filetype:pdf"#,
    r#""CCTV" "bid notice" "New York City" -filetype:pdf"#,
    r#""campus security" "RFP" "New York" -filetype:pdf"#,
    r#""college campus" "structured cabling" "New York" -filetype:pdf"#,
    r#""municipal" "security camera RFP" "NYC" -filetype:pdf"#,
];

pub struct LeadAgent {
    search: Option<GoogleSearchClient>,
    fetcher: PageFetcher,
    contacts: ContactExtractor,
    mailer: Option<ReportMailer>,
    pool: PgPool,
    max_queries_per_run: usize,
}

impl LeadAgent {
    pub fn new(settings: &Settings, pool: PgPool) -> Self {
        let search = GoogleSearchClient::from_settings(&settings.search);
        if search.is_none() {
            log::warn!("Search API key or engine id missing; scans will save nothing");
        }

        let mailer = ReportMailer::from_settings(&settings.report);
        if mailer.is_none() {
            log::warn!("Report sender or recipients missing; run summaries are disabled");
        }

        LeadAgent {
            search,
            fetcher: PageFetcher::new(),
            contacts: ContactExtractor::new(),
            mailer,
            pool,
            max_queries_per_run: settings.search.max_queries_per_run,
        }
    }

    /// One full sequential scan: search, filter, fetch, extract, persist,
    /// then the summary email. Every stage failure is contained to the query
    /// or record it belongs to.
    pub async fn run_scan(&self) -> RunReport {
        let mut report = RunReport::new();
        log::info!("Low voltage lead scan {} started", report.run_id);

        if let Some(search) = self.search.as_ref() {
            // De-duplicate urls within this run only; cross-run identity is
            // handled by the content-derived id on write.
            let mut seen_urls: HashSet<String> = HashSet::new();

            for query in LOW_VOLTAGE_QUERIES.iter().take(self.max_queries_per_run) {
                let results = match search.search(query).await {
                    Ok(results) => results,
                    Err(e) => {
                        log::error!("Search failed for \"{}\": {:?}", query, e);
                        continue;
                    }
                };
                log::info!("Search for \"{}\" returned {} results", query, results.len());
                report.queries_run += 1;

                for result in results {
                    if skip_result(&result.link, &mut seen_urls) {
                        continue;
                    }
                    self.process_result(&result, query, &mut report).await;
                }
            }
        }

        log::info!(
            "Low voltage lead scan {} completed, saved {} records",
            report.run_id,
            report.total_saved
        );

        if let Some(mailer) = self.mailer.as_ref() {
            mailer.send_run_summary(&report).await;
        }

        report
    }

    async fn process_result(&self, result: &SearchResult, query: &str, report: &mut RunReport) {
        let Some(domain) = normalize_domain(&result.link) else {
            log::info!("Skipping result with invalid domain: {}", result.link);
            return;
        };

        if is_denied_domain(&domain) {
            log::info!("Skipping denied domain: {} (url={})", domain, result.link);
            return;
        }

        let result_text = format!("{}\n{}", result.title, result.snippet);
        let classification = classify(&domain, &result_text);
        if !classification.qualifies() {
            log::info!(
                "Skipping {} without enough signal (important={}, ny={}, opp={})",
                domain,
                classification.is_important_domain,
                classification.has_location_signal,
                classification.has_opportunity_signal
            );
            return;
        }

        // Extract from the fetched page when it yielded text; otherwise fall
        // back to whatever the search result itself carried.
        let contacts = match self.fetcher.fetch_with_contact_pages(&result.link).await {
            PageText::Text(text) => self.contacts.extract(&text),
            PageText::Empty | PageText::Failed => self.contacts.extract(&result_text),
        };

        let leads = assemble_leads(result, &domain, query, &classification, &contacts);
        if leads.is_empty() {
            log::info!("No contact channel found for {}; dropping", result.link);
            return;
        }

        for lead in leads {
            match lead_db::upsert_lead(&self.pool, &lead).await {
                Ok(()) => {
                    log::info!(
                        "Upserted lead {} for url={} (important={}, ny={}, opp={})",
                        lead.id,
                        lead.url,
                        lead.is_important_domain,
                        lead.has_location_signal,
                        lead.has_opportunity_signal
                    );
                    report.total_saved += 1;
                    report.leads.push(lead);
                }
                Err(e) if lead_db::is_validation_error(&e) => {
                    log::warn!("Lead {} rejected by the store, skipping: {:?}", lead.id, e);
                }
                Err(e) => {
                    log::error!("Failed to write lead {}: {:?}", lead.id, e);
                }
            }
        }
    }
}

/// A result without a link is unusable, and a url already handled this run is
/// only processed once. Cross-run identity is left to the content-derived id
/// on write.
fn skip_result(link: &str, seen_urls: &mut HashSet<String>) -> bool {
    if link.is_empty() {
        return true;
    }
    if !seen_urls.insert(link.to_string()) {
        log::info!("Skipping duplicate url in this run: {}", link);
        return true;
    }
    false
}
