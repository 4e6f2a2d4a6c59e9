//! Canned data for demo mode. Deterministic, zero network I/O, shaped
//! exactly like live responses so the rest of the pipeline is exercised
//! unchanged.

use crate::domain::{
    lead::{Coordinates, EnrichmentStatus, Lead, LeadSearch, ResolvedLocation},
    snippet::SearchSnippet,
};
use crate::services::maps_client::{compute_lead_score, MAX_LEADS};

const AUSTIN: Coordinates = Coordinates {
    lat: 30.2672,
    lon: -97.7431,
};

pub fn sample_location(location: &str) -> ResolvedLocation {
    ResolvedLocation {
        coordinates: AUSTIN,
        formatted_address: format!("{} (demo: Austin, TX, USA)", location.trim()),
    }
}

struct SampleBusiness {
    id: &'static str,
    name: &'static str,
    address: &'static str,
    lat: f64,
    lon: f64,
    phone: Option<&'static str>,
    website: Option<&'static str>,
    rating: f64,
    reviews: u32,
}

const SAMPLE_BUSINESSES: [SampleBusiness; 6] = [
    SampleBusiness {
        id: "demo-mozarts",
        name: "Mozart's Coffee Roasters",
        address: "3825 Lake Austin Blvd, Austin, TX 78703",
        lat: 30.2937,
        lon: -97.784,
        phone: Some("(512) 477-2900"),
        website: Some("https://mozartscoffee.com"),
        rating: 4.6,
        reviews: 8213,
    },
    SampleBusiness {
        id: "demo-medici",
        name: "Caffe Medici",
        address: "1101 West Lynn St, Austin, TX 78703",
        lat: 30.2755,
        lon: -97.7609,
        phone: Some("(512) 524-5049"),
        website: Some("https://caffemedici.com"),
        rating: 4.5,
        reviews: 1497,
    },
    SampleBusiness {
        id: "demo-houndstooth",
        name: "Houndstooth Coffee",
        address: "401 Congress Ave, Austin, TX 78701",
        lat: 30.2661,
        lon: -97.7432,
        phone: Some("(512) 394-6051"),
        website: Some("https://houndstoothcoffee.com"),
        rating: 4.5,
        reviews: 1102,
    },
    SampleBusiness {
        id: "demo-flightpath",
        name: "Flightpath Coffeehouse",
        address: "5011 Duval St, Austin, TX 78751",
        lat: 30.3116,
        lon: -97.7267,
        phone: Some("(512) 458-4472"),
        website: None,
        rating: 4.4,
        reviews: 689,
    },
    SampleBusiness {
        id: "demo-cosmic",
        name: "Cosmic Coffee + Beer Garden",
        address: "121 Pickle Rd, Austin, TX 78704",
        lat: 30.2226,
        lon: -97.7568,
        phone: None,
        website: Some("https://cosmiccoffeebeergarden.com"),
        rating: 4.7,
        reviews: 3910,
    },
    SampleBusiness {
        id: "demo-epoch",
        name: "Epoch Coffee",
        address: "221 W North Loop Blvd, Austin, TX 78751",
        lat: 30.3189,
        lon: -97.7237,
        phone: Some("(512) 454-3762"),
        website: None,
        rating: 4.3,
        reviews: 2144,
    },
];

pub fn sample_leads(search: &LeadSearch) -> Vec<Lead> {
    let category = match search.category.trim().is_empty() {
        true => "coffee shop".to_string(),
        false => search.category.trim().to_string(),
    };

    SAMPLE_BUSINESSES
        .iter()
        .filter(|b| search.min_rating.map_or(true, |min| b.rating >= min))
        .filter(|b| search.min_reviews.map_or(true, |min| b.reviews >= min))
        .take(MAX_LEADS)
        .map(|b| Lead {
            id: b.id.to_string(),
            name: b.name.to_string(),
            address: b.address.to_string(),
            coordinates: Coordinates {
                lat: b.lat,
                lon: b.lon,
            },
            phone: b.phone.map(str::to_string),
            website: b.website.map(str::to_string),
            rating: Some(b.rating),
            reviews: Some(b.reviews),
            category: category.clone(),
            lead_score: compute_lead_score(
                Some(b.rating),
                Some(b.reviews),
                b.website.is_some(),
                b.phone.is_some(),
            ),
            owner_name: None,
            company_size_estimate: None,
            recent_news: None,
            pain_points: None,
            enrichment_status: EnrichmentStatus::Pending,
        })
        .collect()
}

pub fn sample_snippets(query: &str) -> Vec<SearchSnippet> {
    vec![
        SearchSnippet {
            title: "About Us".to_string(),
            snippet: format!(
                "Family-owned and operated since 2008. Search context: {}",
                query
            ),
            url: Some("https://example.com/about".to_string()),
        },
        SearchSnippet {
            title: "Company profile | LinkedIn".to_string(),
            snippet: "11-50 employees. Founded by Jordan Avery.".to_string(),
            url: Some("https://www.linkedin.com/company/example".to_string()),
        },
    ]
}

// Rotated by prompt length so a demo batch doesn't show eight identical
// profiles. Goes through the same reply parser as live completions.
const SAMPLE_REPLIES: [&str; 3] = [
    r#"{"company_size": "small", "owner_name": "Jordan Avery", "recent_news": "Recently celebrated a local best-coffee award.", "pain_points": "Single-location foot traffic and rising lease costs."}"#,
    r#"{"company_size": "medium", "owner_name": "Sam Delgado", "recent_news": "unknown", "pain_points": "Hiring baristas and weekend queue times."}"#,
    r#"{"company_size": "small", "owner_name": "unknown", "recent_news": "Announced a second location on its website.", "pain_points": "Online ordering and customer retention."}"#,
];

pub fn sample_insight_reply(prompt: &str) -> String {
    SAMPLE_REPLIES[prompt.len() % SAMPLE_REPLIES.len()].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search() -> LeadSearch {
        LeadSearch {
            coordinates: AUSTIN,
            radius_km: 5,
            category: String::new(),
            min_rating: None,
            min_reviews: None,
        }
    }

    #[test]
    fn sample_leads_are_pending_and_capped() {
        let leads = sample_leads(&search());

        assert!(!leads.is_empty());
        assert!(leads.len() <= MAX_LEADS);
        assert!(leads.iter().all(|l| l.is_pending()));
        assert!(leads.iter().all(|l| l.category == "coffee shop"));
    }

    #[test]
    fn sample_leads_honor_filters() {
        let mut filtered = search();
        filtered.min_rating = Some(4.5);
        filtered.min_reviews = Some(2000);

        let leads = sample_leads(&filtered);
        assert!(leads
            .iter()
            .all(|l| l.rating.unwrap() >= 4.5 && l.reviews.unwrap() >= 2000));
        assert!(!leads.is_empty());
    }

    #[test]
    fn sample_insight_reply_is_deterministic() {
        assert_eq!(sample_insight_reply("abc"), sample_insight_reply("abc"));
    }
}
