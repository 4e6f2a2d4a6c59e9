use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    domain::lead::{Coordinates, EnrichmentStatus, Lead, LeadSearch, ResolvedLocation},
    services::{fixtures, GeocodeError, SearchError},
};

pub const MAX_LEADS: usize = 8;
pub const MAX_RADIUS_KM: u32 = 50;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
// Google asks for pacing between detail lookups.
const DETAILS_PAUSE: Duration = Duration::from_millis(500);

/// Maps backend, selected once at startup. `Fixture` serves canned data and
/// never touches the network.
pub enum MapsClient {
    Live(GoogleMapsClient),
    Fixture,
}

impl MapsClient {
    pub async fn resolve_location(&self, location: &str) -> Result<ResolvedLocation, GeocodeError> {
        match self {
            MapsClient::Live(client) => client.geocode(location).await,
            MapsClient::Fixture => Ok(fixtures::sample_location(location)),
        }
    }

    pub async fn find_businesses(&self, search: &LeadSearch) -> Result<Vec<Lead>, SearchError> {
        match self {
            MapsClient::Live(client) => client.find_businesses(search).await,
            MapsClient::Fixture => Ok(fixtures::sample_leads(search)),
        }
    }
}

pub struct GoogleMapsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct GeocodeQuery {
    address: String,
    key: String,
}

#[derive(Serialize)]
struct NearbySearchQuery {
    location: String,
    radius: u32,
    rankby: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    keyword: Option<String>,
    key: String,
}

#[derive(Serialize)]
struct PlaceDetailsQuery {
    place_id: String,
    fields: &'static str,
    key: String,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
    formatted_address: String,
}

#[derive(Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    #[serde(default)]
    vicinity: String,
    geometry: Geometry,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
}

#[derive(Deserialize)]
struct PlaceDetailsResponse {
    status: String,
    result: Option<PlaceDetails>,
}

#[derive(Deserialize, Default)]
struct PlaceDetails {
    formatted_address: Option<String>,
    formatted_phone_number: Option<String>,
    website: Option<String>,
}

impl GoogleMapsClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://maps.googleapis.com".to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest client");

        GoogleMapsClient {
            client,
            api_key,
            base_url,
        }
    }

    pub async fn geocode(&self, location: &str) -> Result<ResolvedLocation, GeocodeError> {
        let url = format!("{}/maps/api/geocode/json", self.base_url);
        let res = self
            .client
            .get(url)
            .query(&GeocodeQuery {
                address: location.to_string(),
                key: self.api_key.clone(),
            })
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(GeocodeError::UpstreamStatus(res.status().to_string()));
        }

        let body: GeocodeResponse = res.json().await?;
        match body.status.as_str() {
            "OK" => {
                let first = body
                    .results
                    .into_iter()
                    .next()
                    .ok_or_else(|| GeocodeError::NoMatch(location.to_string()))?;
                Ok(ResolvedLocation {
                    coordinates: Coordinates {
                        lat: first.geometry.location.lat,
                        lon: first.geometry.location.lng,
                    },
                    formatted_address: first.formatted_address,
                })
            }
            "ZERO_RESULTS" => Err(GeocodeError::NoMatch(location.to_string())),
            other => Err(GeocodeError::UpstreamStatus(other.to_string())),
        }
    }

    /// Nearby search in upstream relevance order, capped at [`MAX_LEADS`],
    /// then a best-effort details lookup per place. A failed details call
    /// degrades to the nearby-search fields, never the whole batch.
    pub async fn find_businesses(&self, search: &LeadSearch) -> Result<Vec<Lead>, SearchError> {
        let url = format!("{}/maps/api/place/nearbysearch/json", self.base_url);
        let keyword = match search.category.trim().is_empty() {
            true => None,
            false => Some(search.category.trim().to_string()),
        };
        let res = self
            .client
            .get(url)
            .query(&NearbySearchQuery {
                location: format!("{},{}", search.coordinates.lat, search.coordinates.lon),
                radius: search.radius_km.min(MAX_RADIUS_KM) * 1000,
                rankby: "prominence",
                keyword,
                key: self.api_key.clone(),
            })
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(SearchError::UpstreamStatus(res.status().to_string()));
        }

        let body: NearbySearchResponse = res.json().await?;
        let places = match body.status.as_str() {
            "OK" => body.results,
            "ZERO_RESULTS" => return Ok(vec![]),
            other => return Err(SearchError::UpstreamStatus(other.to_string())),
        };

        let mut leads = Vec::new();
        let capped: Vec<PlaceResult> = places.into_iter().take(MAX_LEADS).collect();
        let total = capped.len();

        for (index, place) in capped.into_iter().enumerate() {
            let details = self.place_details(&place.place_id).await;
            let lead = build_lead(place, details, &search.category);

            if passes_filters(&lead, search.min_rating, search.min_reviews) {
                leads.push(lead);
            }

            if index + 1 < total {
                tokio::time::sleep(DETAILS_PAUSE).await;
            }
        }

        log::info!("Nearby search produced {} leads after filters", leads.len());
        Ok(leads)
    }

    async fn place_details(&self, place_id: &str) -> PlaceDetails {
        let url = format!("{}/maps/api/place/details/json", self.base_url);
        let res = self
            .client
            .get(url)
            .query(&PlaceDetailsQuery {
                place_id: place_id.to_string(),
                fields: "name,formatted_address,formatted_phone_number,website",
                key: self.api_key.clone(),
            })
            .send()
            .await;

        match res {
            Ok(res) => match res.json::<PlaceDetailsResponse>().await {
                Ok(body) if body.status == "OK" => body.result.unwrap_or_default(),
                Ok(body) => {
                    log::error!(
                        "Place details returned status {} for {}",
                        body.status,
                        place_id
                    );
                    PlaceDetails::default()
                }
                Err(e) => {
                    log::error!("Failed to parse place details for {}: {:?}", place_id, e);
                    PlaceDetails::default()
                }
            },
            Err(e) => {
                log::error!("Place details request failed for {}: {:?}", place_id, e);
                PlaceDetails::default()
            }
        }
    }
}

fn build_lead(place: PlaceResult, details: PlaceDetails, category: &str) -> Lead {
    let address = details
        .formatted_address
        .unwrap_or_else(|| place.vicinity.clone());
    let lead_score = compute_lead_score(
        place.rating,
        place.user_ratings_total,
        details.website.is_some(),
        details.formatted_phone_number.is_some(),
    );

    Lead {
        id: place.place_id,
        name: place.name,
        address,
        coordinates: Coordinates {
            lat: place.geometry.location.lat,
            lon: place.geometry.location.lng,
        },
        phone: details.formatted_phone_number,
        website: details.website,
        rating: place.rating,
        reviews: place.user_ratings_total,
        category: category.to_string(),
        lead_score,
        owner_name: None,
        company_size_estimate: None,
        recent_news: None,
        pain_points: None,
        enrichment_status: EnrichmentStatus::Pending,
    }
}

fn passes_filters(lead: &Lead, min_rating: Option<f64>, min_reviews: Option<u32>) -> bool {
    if let Some(min_rating) = min_rating {
        if lead.rating.unwrap_or(0.0) < min_rating {
            return false;
        }
    }
    if let Some(min_reviews) = min_reviews {
        if lead.reviews.unwrap_or(0) < min_reviews {
            return false;
        }
    }
    true
}

/// Base 50, +10 each for a strong rating, a large review count, a website
/// and a phone number.
pub fn compute_lead_score(
    rating: Option<f64>,
    reviews: Option<u32>,
    has_website: bool,
    has_phone: bool,
) -> u8 {
    let mut score = 50;
    if rating.unwrap_or(0.0) >= 4.5 {
        score += 10;
    }
    if reviews.unwrap_or(0) >= 200 {
        score += 10;
    }
    if has_website {
        score += 10;
    }
    if has_phone {
        score += 10;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(place_id: &str, name: &str, rating: Option<f64>, reviews: Option<u32>) -> PlaceResult {
        PlaceResult {
            place_id: place_id.to_string(),
            name: name.to_string(),
            vicinity: "600 Congress Ave, Austin".to_string(),
            geometry: Geometry {
                location: LatLng {
                    lat: 30.2672,
                    lng: -97.7431,
                },
            },
            rating,
            user_ratings_total: reviews,
        }
    }

    #[test]
    fn compute_lead_score_rewards_each_signal() {
        assert_eq!(compute_lead_score(None, None, false, false), 50);
        assert_eq!(compute_lead_score(Some(4.2), Some(30), false, false), 50);
        assert_eq!(compute_lead_score(Some(4.5), Some(30), false, false), 60);
        assert_eq!(compute_lead_score(Some(4.8), Some(450), true, true), 90);
    }

    #[test]
    fn build_lead_prefers_details_over_vicinity() {
        let details = PlaceDetails {
            formatted_address: Some("600 Congress Ave, Austin, TX 78701, USA".to_string()),
            formatted_phone_number: Some("(512) 555-0147".to_string()),
            website: Some("https://example.com".to_string()),
        };
        let lead = build_lead(
            place("p1", "Caffe Medici", Some(4.6), Some(980)),
            details,
            "coffee shop",
        );

        assert_eq!(lead.address, "600 Congress Ave, Austin, TX 78701, USA");
        assert_eq!(lead.phone.as_deref(), Some("(512) 555-0147"));
        assert_eq!(lead.lead_score, 90);
        assert!(lead.is_pending());
        assert_eq!(lead.category, "coffee shop");
    }

    #[test]
    fn build_lead_falls_back_to_nearby_fields() {
        let lead = build_lead(
            place("p2", "Hole in the Wall", None, None),
            PlaceDetails::default(),
            "",
        );

        assert_eq!(lead.address, "600 Congress Ave, Austin");
        assert_eq!(lead.phone, None);
        assert_eq!(lead.lead_score, 50);
    }

    #[test]
    fn filters_drop_low_rating_and_low_reviews() {
        let strong = build_lead(
            place("p3", "Strong", Some(4.7), Some(900)),
            PlaceDetails::default(),
            "",
        );
        let weak = build_lead(
            place("p4", "Weak", Some(3.1), Some(4)),
            PlaceDetails::default(),
            "",
        );

        assert!(passes_filters(&strong, Some(4.0), Some(100)));
        assert!(!passes_filters(&weak, Some(4.0), None));
        assert!(!passes_filters(&weak, None, Some(100)));
        assert!(passes_filters(&weak, None, None));
    }
}
