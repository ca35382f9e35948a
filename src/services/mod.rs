pub mod contact_extract;
pub mod google_search;
pub mod heuristics;
pub mod lead_pipeline;
pub mod page_text;
pub mod report_mailer;

pub use contact_extract::*;
pub use google_search::*;
pub use heuristics::*;
pub use lead_pipeline::*;
pub use page_text::*;
pub use report_mailer::*;
