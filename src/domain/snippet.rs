/// One web-search hit, as fed into the insight prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSnippet {
    pub title: String,
    pub snippet: String,
    pub url: Option<String>,
}
