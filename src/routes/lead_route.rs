use actix_web::{get, web, HttpResponse};
use askama::Template;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use uuid::Uuid;

use crate::{
    domain::lead::{Lead, LeadSearch},
    services::{enrich_batch, LeadEnricher, MapsClient, MAX_RADIUS_KM},
};

// Empty form fields arrive as empty strings, so every numeric param goes
// through the string-tolerant deserializer.
#[derive(Deserialize)]
pub struct LeadSearchQuery {
    location: String,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    radius_km: Option<u32>,
    #[serde(default)]
    category: String,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    min_rating: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    min_reviews: Option<u32>,
}

const DEFAULT_RADIUS_KM: u32 = 5;

#[derive(Template)]
#[template(path = "results.html")]
struct ResultsTemplate {
    location: String,
    formatted_address: String,
    radius_km: u32,
    category: String,
    leads: Vec<Lead>,
    leads_json: String,
    center_lat: f64,
    center_lon: f64,
    radius_m: u32,
    enriched_count: usize,
    failed_count: usize,
    average_score: u8,
    size_bars: Vec<SizeBar>,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    message: String,
}

struct SizeBar {
    label: String,
    count: usize,
    percent: u8,
}

#[get("/search")]
async fn search_leads(
    maps_client: web::Data<MapsClient>,
    enricher: web::Data<LeadEnricher>,
    query: web::Query<LeadSearchQuery>,
) -> HttpResponse {
    /*
    1. Resolve the free-text location to coordinates
    2. Find up to 8 businesses around them, pending state
    3. Enrich each lead (web search + AI synthesis), failures per lead
    4. Render the finished batch: map, list, profiles, analytics
    */
    let location = query.location.trim().to_string();
    if location.is_empty() {
        return render_error("Location is required. Please enter a location to search.");
    }

    let batch_id = Uuid::new_v4();
    let radius_km = query
        .radius_km
        .unwrap_or(DEFAULT_RADIUS_KM)
        .clamp(1, MAX_RADIUS_KM);
    log::info!(
        "Search {}: location \"{}\", radius {} km, category \"{}\"",
        batch_id,
        location,
        radius_km,
        query.category
    );

    let resolved = match maps_client.resolve_location(&location).await {
        Ok(resolved) => resolved,
        Err(e) => {
            log::error!("Search {}: geocoding failed: {}", batch_id, e);
            return render_error(&e.to_string());
        }
    };

    let search = LeadSearch {
        coordinates: resolved.coordinates,
        radius_km,
        category: query.category.trim().to_string(),
        min_rating: query.min_rating,
        min_reviews: query.min_reviews,
    };
    let leads = match maps_client.find_businesses(&search).await {
        Ok(leads) => leads,
        Err(e) => {
            log::error!("Search {}: business search failed: {}", batch_id, e);
            return render_error(&e.to_string());
        }
    };
    log::info!("Search {}: found {} businesses", batch_id, leads.len());

    let leads = enrich_batch(enricher, leads).await;
    let enriched_count = leads.iter().filter(|l| l.is_enriched()).count();
    let failed_count = leads.iter().filter(|l| l.is_failed()).count();
    log::info!(
        "Search {}: enriched {}, failed {}",
        batch_id,
        enriched_count,
        failed_count
    );

    let template = ResultsTemplate {
        leads_json: markers_json(&leads),
        center_lat: resolved.coordinates.lat,
        center_lon: resolved.coordinates.lon,
        radius_m: radius_km * 1000,
        enriched_count,
        failed_count,
        average_score: average_lead_score(&leads),
        size_bars: company_size_bars(&leads),
        location,
        formatted_address: resolved.formatted_address,
        radius_km,
        category: search.category,
        leads,
    };
    HttpResponse::Ok().body(template.render().unwrap())
}

fn render_error(message: &str) -> HttpResponse {
    let template = ErrorTemplate {
        message: message.to_string(),
    };
    HttpResponse::Ok().body(template.render().unwrap())
}

#[derive(Serialize)]
struct LeadMarker<'a> {
    name: &'a str,
    lat: f64,
    lon: f64,
    score: u8,
    status: &'static str,
}

fn markers_json(leads: &[Lead]) -> String {
    let markers: Vec<LeadMarker> = leads
        .iter()
        .map(|lead| LeadMarker {
            name: &lead.name,
            lat: lead.coordinates.lat,
            lon: lead.coordinates.lon,
            score: lead.lead_score,
            status: lead.status_label(),
        })
        .collect();

    serde_json::to_string(&markers).unwrap_or_else(|_| "[]".to_string())
}

fn average_lead_score(leads: &[Lead]) -> u8 {
    match leads.is_empty() {
        true => 0,
        false => {
            let total: u32 = leads.iter().map(|l| l.lead_score as u32).sum();
            (total / leads.len() as u32) as u8
        }
    }
}

fn company_size_bars(leads: &[Lead]) -> Vec<SizeBar> {
    let buckets = ["small", "medium", "large", "unknown"];
    let counts: Vec<usize> = buckets
        .iter()
        .map(|bucket| {
            leads
                .iter()
                .filter(|lead| {
                    let size = lead
                        .company_size_estimate
                        .as_deref()
                        .map(|s| s.to_lowercase());
                    match (bucket, size) {
                        (&"unknown", None) => true,
                        (_, Some(size)) => size.contains(bucket),
                        _ => false,
                    }
                })
                .count()
        })
        .collect();

    let max = counts.iter().max().copied().unwrap_or(0).max(1);
    buckets
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| SizeBar {
            label: label.to_string(),
            count,
            percent: (count * 100 / max) as u8,
        })
        .collect()
}
