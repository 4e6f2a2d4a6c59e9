use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// What the geocoder hands back for a free-text location.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    pub formatted_address: String,
}

/// One search request, resolved and clamped, as the finder consumes it.
#[derive(Debug, Clone)]
pub struct LeadSearch {
    pub coordinates: Coordinates,
    pub radius_km: u32,
    pub category: String,
    pub min_rating: Option<f64>,
    pub min_reviews: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentStatus {
    Pending,
    Enriched,
    Failed { reason: String },
}

/// The four inferred fields. Any of them may stay absent; absence means the
/// model had no signal, not that enrichment failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadInsight {
    pub owner_name: Option<String>,
    pub company_size_estimate: Option<String>,
    pub recent_news: Option<String>,
    pub pain_points: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub category: String,
    pub lead_score: u8,
    pub owner_name: Option<String>,
    pub company_size_estimate: Option<String>,
    pub recent_news: Option<String>,
    pub pain_points: Option<String>,
    pub enrichment_status: EnrichmentStatus,
}

impl Lead {
    pub fn with_insight(mut self, insight: LeadInsight) -> Self {
        self.owner_name = insight.owner_name;
        self.company_size_estimate = insight.company_size_estimate;
        self.recent_news = insight.recent_news;
        self.pain_points = insight.pain_points;
        self.enrichment_status = EnrichmentStatus::Enriched;
        self
    }

    pub fn mark_failed(mut self, reason: String) -> Self {
        self.owner_name = None;
        self.company_size_estimate = None;
        self.recent_news = None;
        self.pain_points = None;
        self.enrichment_status = EnrichmentStatus::Failed { reason };
        self
    }

    pub fn is_pending(&self) -> bool {
        self.enrichment_status == EnrichmentStatus::Pending
    }

    pub fn is_enriched(&self) -> bool {
        self.enrichment_status == EnrichmentStatus::Enriched
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.enrichment_status, EnrichmentStatus::Failed { .. })
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.enrichment_status {
            EnrichmentStatus::Failed { reason } => Some(reason.as_str()),
            _ => None,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self.enrichment_status {
            EnrichmentStatus::Pending => "pending",
            EnrichmentStatus::Enriched => "enriched",
            EnrichmentStatus::Failed { .. } => "failed",
        }
    }

    pub fn phone_display(&self) -> &str {
        self.phone.as_deref().unwrap_or("Not available")
    }

    pub fn rating_display(&self) -> String {
        match (self.rating, self.reviews) {
            (Some(rating), Some(reviews)) => format!("{:.1} ({} reviews)", rating, reviews),
            (Some(rating), None) => format!("{:.1}", rating),
            _ => "Unrated".to_string(),
        }
    }
}
