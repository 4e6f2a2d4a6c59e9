use async_openai::{
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use itertools::Itertools;

use crate::{
    domain::{
        lead::{Lead, LeadInsight},
        snippet::SearchSnippet,
    },
    services::{fixtures, EnrichmentError},
};

const MODEL: &str = "gpt-4o-mini";
const MAX_COMPLETION_TOKENS: u32 = 600;

// Replies the model uses when it has no signal. Treated as absent.
const UNKNOWN_MARKERS: [&str; 5] = ["unknown", "not found", "n/a", "none", "not available"];

/// Insight backend, selected once at startup.
pub enum InsightClient {
    Live(OpenaiClient),
    Fixture,
}

impl InsightClient {
    pub async fn synthesize(&self, prompt: &str) -> Result<String, EnrichmentError> {
        match self {
            InsightClient::Live(client) => client.synthesize_insight(prompt).await,
            InsightClient::Fixture => Ok(fixtures::sample_insight_reply(prompt)),
        }
    }
}

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
}

impl Default for OpenaiClient {
    fn default() -> Self {
        OpenaiClient {
            client: Client::new(),
        }
    }
}

impl OpenaiClient {
    pub fn new(api_key: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        OpenaiClient {
            client: Client::with_config(config),
        }
    }

    pub fn with_api_base(api_key: String, api_base: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        OpenaiClient {
            client: Client::with_config(config),
        }
    }

    pub async fn synthesize_insight(&self, prompt: &str) -> Result<String, EnrichmentError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(MODEL)
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| EnrichmentError::Model(e.to_string()))?
                .into()])
            .max_tokens(MAX_COMPLETION_TOKENS)
            .build()
            .map_err(|e| EnrichmentError::Model(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| EnrichmentError::Model(e.to_string()))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| EnrichmentError::Model("no content in completion".to_string()))
    }
}

pub fn build_insight_prompt(lead: &Lead, snippets: &[SearchSnippet]) -> String {
    let findings = match snippets.is_empty() {
        true => "No additional information was found online.".to_string(),
        false => snippets
            .iter()
            .enumerate()
            .map(|(i, s)| {
                format!(
                    "--- Result {} ---\nTitle: {}\nSnippet: {}\nURL: {}",
                    i + 1,
                    s.title,
                    s.snippet,
                    s.url.as_deref().unwrap_or("n/a")
                )
            })
            .join("\n"),
    };

    format!(
        r#"You are a lead-generation research assistant. Analyze this business and infer sales-relevant facts. Do not invent information; if you cannot determine a field, use the string "unknown".

Business information:
- Name: {}
- Address: {}
- Category: {}
- Phone: {}
- Website: {}
- Rating: {}

Information found online:
{}

Based on this information, determine:
1. Estimated company size (small, medium or large)
2. The most likely owner or decision-maker name
3. Any recent news about the business (1-2 sentences)
4. Likely pain points a sales outreach could address (1-2 sentences)

Respond with only a JSON object with exactly these keys: company_size, owner_name, recent_news, pain_points. Only return the JSON object, nothing else."#,
        lead.name,
        lead.address,
        lead.category,
        lead.phone.as_deref().unwrap_or("Not available"),
        lead.website.as_deref().unwrap_or("Not available"),
        lead.rating_display(),
        findings,
    )
}

/// Parse the model reply into insight fields, tolerating markdown code
/// fences and prose around the JSON object. Missing or unknown-marked
/// fields stay `None`.
pub fn parse_insight_reply(reply: &str) -> Result<LeadInsight, EnrichmentError> {
    let json_block = extract_json_block(reply)
        .ok_or_else(|| EnrichmentError::MalformedResponse("no JSON object in reply".to_string()))?;

    let value: serde_json::Value = serde_json::from_str(json_block)
        .map_err(|e| EnrichmentError::MalformedResponse(e.to_string()))?;

    Ok(LeadInsight {
        owner_name: clean_field(&value, "owner_name"),
        company_size_estimate: clean_field(&value, "company_size"),
        recent_news: clean_field(&value, "recent_news"),
        pain_points: clean_field(&value, "pain_points"),
    })
}

fn extract_json_block(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

fn clean_field(value: &serde_json::Value, key: &str) -> Option<String> {
    let text = match value.get(key)? {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .join("; "),
        _ => return None,
    };

    let lowered = text.to_lowercase();
    match text.is_empty() || UNKNOWN_MARKERS.contains(&lowered.as_str()) {
        true => None,
        false => Some(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead::{Coordinates, EnrichmentStatus};

    fn lead() -> Lead {
        Lead {
            id: "p1".to_string(),
            name: "Caffe Medici".to_string(),
            address: "1101 West Lynn St, Austin, TX 78703".to_string(),
            coordinates: Coordinates {
                lat: 30.2755,
                lon: -97.7609,
            },
            phone: Some("(512) 524-5049".to_string()),
            website: None,
            rating: Some(4.5),
            reviews: Some(640),
            category: "coffee shop".to_string(),
            lead_score: 80,
            owner_name: None,
            company_size_estimate: None,
            recent_news: None,
            pain_points: None,
            enrichment_status: EnrichmentStatus::Pending,
        }
    }

    #[test]
    fn parse_insight_reply_reads_bare_json() {
        let reply = r#"{"company_size": "small", "owner_name": "Michael Vaclav", "recent_news": "Opened a second downtown location in March.", "pain_points": "Staffing and bean cost volatility."}"#;
        let insight = parse_insight_reply(reply).unwrap();

        assert_eq!(insight.company_size_estimate.as_deref(), Some("small"));
        assert_eq!(insight.owner_name.as_deref(), Some("Michael Vaclav"));
        assert!(insight.recent_news.unwrap().contains("second downtown"));
    }

    #[test]
    fn parse_insight_reply_strips_code_fences() {
        let reply = "```json\n{\"company_size\": \"medium\", \"owner_name\": \"unknown\", \"recent_news\": \"unknown\", \"pain_points\": \"Customer acquisition.\"}\n```";
        let insight = parse_insight_reply(reply).unwrap();

        assert_eq!(insight.company_size_estimate.as_deref(), Some("medium"));
        assert_eq!(insight.owner_name, None);
        assert_eq!(insight.recent_news, None);
        assert_eq!(insight.pain_points.as_deref(), Some("Customer acquisition."));
    }

    #[test]
    fn parse_insight_reply_leaves_missing_and_unknown_fields_absent() {
        let reply = r#"{"company_size": "Not Found", "pain_points": ""}"#;
        let insight = parse_insight_reply(reply).unwrap();

        assert_eq!(insight, LeadInsight::default());
    }

    #[test]
    fn parse_insight_reply_joins_array_fields() {
        let reply = r#"{"pain_points": ["Seasonal demand", "Online visibility"]}"#;
        let insight = parse_insight_reply(reply).unwrap();

        assert_eq!(
            insight.pain_points.as_deref(),
            Some("Seasonal demand; Online visibility")
        );
    }

    #[test]
    fn parse_insight_reply_rejects_replies_without_json() {
        let result = parse_insight_reply("I could not find anything about this business.");
        assert!(matches!(
            result,
            Err(EnrichmentError::MalformedResponse(_))
        ));
    }

    #[test]
    fn build_insight_prompt_embeds_fields_and_snippets() {
        let snippets = vec![SearchSnippet {
            title: "Caffe Medici - Our Story".to_string(),
            snippet: "Founded by Michael Vaclav in 2006.".to_string(),
            url: Some("https://caffemedici.com/story".to_string()),
        }];
        let prompt = build_insight_prompt(&lead(), &snippets);

        assert!(prompt.contains("Caffe Medici"));
        assert!(prompt.contains("1101 West Lynn St"));
        assert!(prompt.contains("--- Result 1 ---"));
        assert!(prompt.contains("Founded by Michael Vaclav"));
        assert!(prompt.contains("company_size, owner_name, recent_news, pain_points"));
    }

    #[test]
    fn build_insight_prompt_notes_empty_findings() {
        let prompt = build_insight_prompt(&lead(), &[]);
        assert!(prompt.contains("No additional information was found online."));
    }
}
