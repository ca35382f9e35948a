/// One organic result from the search API. Never persisted directly; leads
/// carry whatever survives filtering and extraction.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}
