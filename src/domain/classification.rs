/// Boolean signals computed from a result's host plus title + snippet.
/// Pure gating, no scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_important_domain: bool,
    pub has_location_signal: bool,
    pub has_opportunity_signal: bool,
}

impl Classification {
    /// Official-ish domains (gov, schools) pass on either signal; everything
    /// else needs both the location and the procurement signal.
    pub fn qualifies(&self) -> bool {
        if self.is_important_domain {
            self.has_location_signal || self.has_opportunity_signal
        } else {
            self.has_location_signal && self.has_opportunity_signal
        }
    }
}
