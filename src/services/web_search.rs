use std::time::Duration;

use fake_user_agent::get_rua;
use reqwest::header::USER_AGENT;
use scraper::{Html, Selector};
use serde::Serialize;
use url::Url;

use crate::{
    domain::snippet::SearchSnippet,
    services::{fixtures, SearchError},
};

pub const SNIPPET_LIMIT: usize = 5;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Web-search backend for the owner lookup, selected once at startup.
pub enum SearchClient {
    Live(DuckDuckGoClient),
    Fixture,
}

impl SearchClient {
    pub async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>, SearchError> {
        match self {
            SearchClient::Live(client) => client.search(query).await,
            SearchClient::Fixture => Ok(fixtures::sample_snippets(query)),
        }
    }
}

pub struct DuckDuckGoClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct SearchQuery {
    q: String,
}

impl Default for DuckDuckGoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGoClient {
    pub fn new() -> Self {
        Self::with_base_url("https://html.duckduckgo.com".to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest client");

        DuckDuckGoClient { client, base_url }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchSnippet>, SearchError> {
        let url = format!("{}/html/", self.base_url);
        let res = self
            .client
            .get(url)
            .query(&SearchQuery {
                q: query.to_string(),
            })
            .header(USER_AGENT, get_rua())
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(SearchError::UpstreamStatus(res.status().to_string()));
        }

        let html = res.text().await?;
        let snippets = parse_search_results(&html);
        log::info!("Web search \"{}\" returned {} snippets", query, snippets.len());
        Ok(snippets)
    }
}

/// Search query for owner/decision-maker discovery. The locality narrows
/// the results to the right business when the name is generic.
pub fn build_owner_query(name: &str, address: &str) -> String {
    let locality = locality_from_address(address);
    match locality.is_empty() {
        true => format!(r#""{}" owner OR founder OR CEO"#, name),
        false => format!(r#""{}" {} owner OR founder OR CEO"#, name, locality),
    }
}

fn locality_from_address(address: &str) -> &str {
    let pieces: Vec<&str> = address.split(',').collect();
    match pieces.len() {
        0 | 1 => "",
        n => pieces[n - 2].trim(),
    }
}

pub fn parse_search_results(html: &str) -> Vec<SearchSnippet> {
    let result_selector = Selector::parse(".result__body").unwrap();
    let title_selector = Selector::parse(".result__title").unwrap();
    let snippet_selector = Selector::parse(".result__snippet").unwrap();
    let url_selector = Selector::parse(".result__url").unwrap();

    let document = Html::parse_document(html);

    document
        .select(&result_selector)
        .filter_map(|result| {
            let title: String = result
                .select(&title_selector)
                .next()
                .map(|tag| tag.text().collect::<String>().trim().to_string())?;
            let snippet: String = result
                .select(&snippet_selector)
                .next()
                .map(|tag| tag.text().collect::<String>().trim().to_string())?;
            let url = result
                .select(&url_selector)
                .next()
                .and_then(|tag| tag.value().attr("href"))
                .and_then(clean_result_url);

            match title.is_empty() || snippet.is_empty() {
                true => None,
                false => Some(SearchSnippet {
                    title,
                    snippet,
                    url,
                }),
            }
        })
        .take(SNIPPET_LIMIT)
        .collect()
}

/// DuckDuckGo wraps result links in a redirect with the target in the
/// `uddg` query param. Unwrap it; pass plain absolute links through.
pub fn clean_result_url(href: &str) -> Option<String> {
    let absolute = match href.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => href.to_string(),
    };
    let parsed = Url::parse(&absolute).ok()?;

    match parsed.host_str() {
        Some("duckduckgo.com") => parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.to_string()),
        Some(_) => Some(parsed.to_string()),
        None => None,
    }
}
