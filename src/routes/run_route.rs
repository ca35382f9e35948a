use actix_web::{post, web, HttpResponse};
use serde::Serialize;

use crate::services::LeadAgent;

#[derive(Serialize)]
struct RunResponse {
    message: String,
    saved: usize,
}

/// Trigger endpoint for the external scheduler. Runs a full scan inline and
/// answers once everything (including the summary email) is done.
#[post("/run")]
async fn trigger_run(agent: web::Data<LeadAgent>) -> HttpResponse {
    let report = agent.run_scan().await;

    HttpResponse::Ok().json(RunResponse {
        message: format!("Low voltage lead scan {} completed.", report.run_id),
        saved: report.total_saved,
    })
}
