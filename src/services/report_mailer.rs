use std::collections::BTreeSet;

use async_smtp::{Envelope, SendableEmail, SmtpClient, SmtpTransport};
use tokio::{io::BufStream, net::TcpStream};

use crate::{
    configuration::ReportSettings,
    domain::{truncate_chars, Lead, RunReport},
};

/// Cap the sample so the email stays small.
const MAX_REPORT_LEADS: usize = 30;
const REPORT_SUBJECT: &str = "Low Voltage Agent Report - NYC RFP / Bid Leads";
const TITLE_CHARS_IN_REPORT: usize = 80;

pub struct ReportMailer {
    smtp_host: String,
    smtp_port: u16,
    sender: String,
    recipients: Vec<String>,
}

impl ReportMailer {
    /// `None` unless a sender and at least one recipient are configured.
    /// Recipients are deduplicated with empties dropped.
    pub fn from_settings(settings: &ReportSettings) -> Option<Self> {
        let sender = settings.sender.clone()?;

        let recipients: Vec<String> = settings
            .recipients
            .iter()
            .filter(|recipient| !recipient.is_empty())
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        if recipients.is_empty() {
            return None;
        }

        Some(ReportMailer {
            smtp_host: settings.smtp_host.clone(),
            smtp_port: settings.smtp_port,
            sender,
            recipients,
        })
    }

    /// Fire and forget: delivery problems are logged, never raised.
    pub async fn send_run_summary(&self, report: &RunReport) {
        if report.leads.is_empty() {
            log::info!("No leads collected; skipping summary email");
            return;
        }

        let body = compose_summary(report);
        match self.send(REPORT_SUBJECT, &body).await {
            Ok(()) => log::info!(
                "Summary email for run {} sent to {} recipients",
                report.run_id,
                self.recipients.len()
            ),
            Err(e) => log::error!("Failed to send summary email: {:?}", e),
        }
    }

    async fn send(&self, subject: &str, body: &str) -> anyhow::Result<()> {
        let message = format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\n\r\n{}",
            self.sender,
            self.recipients.join(", "),
            subject,
            body
        );

        let recipients = self
            .recipients
            .iter()
            .map(|recipient| recipient.parse())
            .collect::<Result<Vec<_>, _>>()?;
        let envelope = Envelope::new(Some(self.sender.parse()?), recipients)?;
        let email = SendableEmail::new(envelope, message);

        let stream = TcpStream::connect((self.smtp_host.as_str(), self.smtp_port)).await?;
        let stream = BufStream::new(stream);
        let client = SmtpClient::new();
        let mut transport = SmtpTransport::new(client, stream).await?;
        transport.send(email).await?;

        Ok(())
    }
}

pub fn compose_summary(report: &RunReport) -> String {
    let mut lines = vec![
        "Low Voltage Agent (NYC) just completed a run.".to_string(),
        format!("Total records saved this run: {}", report.total_saved),
        String::new(),
        "Sample URLs from this run:".to_string(),
        "(Flags: [NY?] [Opportunity?] [Important domain?])".to_string(),
        String::new(),
    ];

    for lead in report.leads.iter().take(MAX_REPORT_LEADS) {
        lines.push(format!(
            "- [{}] {} ({})",
            flag_string(lead),
            truncate_chars(lead.title.trim(), TITLE_CHARS_IN_REPORT),
            lead.url
        ));
    }

    lines.join("\n")
}

fn flag_string(lead: &Lead) -> String {
    let flags = [
        if lead.has_location_signal { "NY" } else { "no-NY" },
        if lead.has_opportunity_signal {
            "RFP"
        } else {
            "no-RFP"
        },
        if lead.is_important_domain {
            "official"
        } else {
            "regular"
        },
    ];
    flags.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{lead_id, Lead, RunReport, AGENT_NAME};

    fn sample_lead(index: usize) -> Lead {
        let url = format!("https://agency{index}.ny.gov/rfp");
        Lead {
            id: lead_id(&url, ""),
            url,
            title: format!("  Security Camera RFP #{index}  "),
            snippet: "New York schools".to_string(),
            domain: format!("agency{index}.ny.gov"),
            source_query: "\"low voltage RFP\" \"New York City\"".to_string(),
            agent_name: AGENT_NAME.to_string(),
            primary_email: None,
            emails: vec![],
            phones: vec!["(212) 555-0188".to_string()],
            addresses: vec![],
            contact_name: None,
            contact_snippet: "Contact our procurement office".to_string(),
            has_location_signal: true,
            has_opportunity_signal: index % 2 == 0,
            is_important_domain: true,
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn summary_lists_flags_and_urls() {
        let mut report = RunReport::new();
        report.total_saved = 2;
        report.leads = vec![sample_lead(0), sample_lead(1)];

        let body = compose_summary(&report);
        assert!(body.contains("Total records saved this run: 2"));
        assert!(body.contains("- [NY, RFP, official] Security Camera RFP #0 (https://agency0.ny.gov/rfp)"));
        assert!(body.contains("- [NY, no-RFP, official] Security Camera RFP #1 (https://agency1.ny.gov/rfp)"));
    }

    #[test]
    fn summary_caps_the_sample_at_thirty_leads() {
        let mut report = RunReport::new();
        report.total_saved = 45;
        report.leads = (0..45).map(sample_lead).collect();

        let body = compose_summary(&report);
        let sample_lines = body.lines().filter(|line| line.starts_with("- [")).count();
        assert_eq!(sample_lines, MAX_REPORT_LEADS);
    }

    #[test]
    fn mailer_requires_sender_and_recipients() {
        use crate::configuration::ReportSettings;

        let base = ReportSettings {
            sender: Some("agent@example.com".to_string()),
            recipients: vec![
                "ops@example.com".to_string(),
                String::new(),
                "ops@example.com".to_string(),
            ],
            smtp_host: "localhost".to_string(),
            smtp_port: 25,
        };

        let mailer = ReportMailer::from_settings(&base).unwrap();
        assert_eq!(mailer.recipients, vec!["ops@example.com".to_string()]);

        let no_sender = ReportSettings {
            sender: None,
            ..base.clone()
        };
        assert!(ReportMailer::from_settings(&no_sender).is_none());

        let no_recipients = ReportSettings {
            recipients: vec![String::new()],
            ..base
        };
        assert!(ReportMailer::from_settings(&no_recipients).is_none());
    }
}
