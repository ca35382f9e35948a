use uuid::Uuid;

use super::Lead;

/// Transient per-run aggregate, only used to answer the trigger request and to
/// compose the summary email.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub queries_run: usize,
    pub total_saved: usize,
    pub leads: Vec<Lead>,
}

impl RunReport {
    pub fn new() -> Self {
        RunReport {
            run_id: Uuid::new_v4(),
            queries_run: 0,
            total_saved: 0,
            leads: vec![],
        }
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
