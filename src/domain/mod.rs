pub mod classification;
pub mod contact;
pub mod lead;
pub mod run_report;
pub mod search_result;

pub use classification::*;
pub use contact::*;
pub use lead::*;
pub use run_report::*;
pub use search_result::*;
