use actix_web::web::Data;

use crate::{
    domain::lead::{Lead, LeadInsight},
    services::{
        build_insight_prompt, build_owner_query, parse_insight_reply, EnrichmentError,
        InsightClient, SearchClient,
    },
};

pub struct LeadEnricher {
    search: SearchClient,
    insight: InsightClient,
}

impl LeadEnricher {
    pub fn new(search: SearchClient, insight: InsightClient) -> Self {
        LeadEnricher { search, insight }
    }

    /// Enrich one lead: web search, then AI synthesis over the snippets.
    /// A lead that is no longer pending is returned untouched, so
    /// re-running the enricher is a no-op. Failures are recorded on the
    /// lead, never propagated.
    pub async fn enrich_lead(&self, lead: Lead) -> Lead {
        if !lead.is_pending() {
            return lead;
        }

        match self.try_enrich(&lead).await {
            Ok(insight) => {
                log::info!("Enriched \"{}\"", lead.name);
                lead.with_insight(insight)
            }
            Err(e) => {
                log::error!("Could not enrich \"{}\": {}", lead.name, e);
                let reason = e.to_string();
                lead.mark_failed(reason)
            }
        }
    }

    async fn try_enrich(&self, lead: &Lead) -> Result<LeadInsight, EnrichmentError> {
        let query = build_owner_query(&lead.name, &lead.address);
        let snippets = self.search.search(&query).await?;
        let prompt = build_insight_prompt(lead, &snippets);
        let reply = self.insight.synthesize(&prompt).await?;
        parse_insight_reply(&reply)
    }
}

/// Fan out one task per lead and join in finder order, so completion order
/// never affects the displayed ranking. One lead's failure leaves the rest
/// of the batch untouched.
pub async fn enrich_batch(enricher: Data<LeadEnricher>, leads: Vec<Lead>) -> Vec<Lead> {
    let mut handles = Vec::with_capacity(leads.len());
    for lead in leads {
        let enricher = enricher.clone();
        let fallback = lead.clone();
        handles.push((
            fallback,
            tokio::spawn(async move { enricher.enrich_lead(lead).await }),
        ));
    }

    let mut enriched = Vec::with_capacity(handles.len());
    for (fallback, handle) in handles {
        match handle.await {
            Ok(lead) => enriched.push(lead),
            Err(e) => {
                log::error!("Enrichment task for \"{}\" died: {:?}", fallback.name, e);
                enriched.push(fallback.mark_failed("enrichment task failed".to_string()));
            }
        }
    }
    enriched
}
