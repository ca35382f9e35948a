/// Everything the contact extractor could pull from a page's text. All lists
/// are deduplicated and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub addresses: Vec<String>,
    pub contact_name: Option<String>,
    pub contact_snippet: String,
}

impl ContactDetails {
    /// A lead is only worth saving if there is at least one way to reach somebody.
    pub fn has_contact_channel(&self) -> bool {
        !self.emails.is_empty() || !self.phones.is_empty() || !self.addresses.is_empty()
    }
}
