//! Match link -> head-to-head report.
//!
//! Stages run strictly in order: resolve the link, fetch the match root record,
//! walk the championship's past matches, collect per-match stats, aggregate for both
//! factions. Nothing is returned until every stage has finished.

use crate::aggregate::{self, FactionAggregate};
use crate::faceit::{FaceitClient, FaceitError};
use crate::link::{self, LinkError};
use crate::models::{ChampionshipMatch, Faction, MatchId, MatchMetadata, RawMatchRecord};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const PAGE_SIZE: usize = 100;

const CHAMPIONSHIP: &str = "championship";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Faceit(#[from] FaceitError),
}

/// Some enumerated matches had no usable stats (forfeits, removed matches).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[error("{unavailable} of {total} matches had no stats available and were excluded")]
pub struct PartialFetch {
    pub unavailable: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchFilter {
    /// keep matches either faction played in
    #[default]
    Either,
    /// keep only matches the two factions played against each other
    HeadToHead,
}

impl MatchFilter {
    fn keeps(self, m: &ChampionshipMatch, faction1: &str, faction2: &str) -> bool {
        let ids: Vec<&str> = m.faction_ids().collect();
        match self {
            MatchFilter::Either => ids.iter().any(|id| *id == faction1 || *id == faction2),
            MatchFilter::HeadToHead => ids.contains(&faction1) && ids.contains(&faction2),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub filter: MatchFilter,
    /// stats requests in flight at once, 1 means strictly sequential
    pub concurrency: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { filter: MatchFilter::Either, concurrency: 1 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    pub match_ids: Vec<MatchId>,
    pub pages_fetched: usize,
    pub failed_pages: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub records: Vec<RawMatchRecord>,
    pub unavailable: Vec<MatchId>,
}

impl Collection {
    pub fn partial(&self) -> Option<PartialFetch> {
        if self.unavailable.is_empty() {
            return None;
        }
        Some(PartialFetch {
            unavailable: self.unavailable.len(),
            total: self.unavailable.len() + self.records.len(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FactionReport {
    pub faction: Faction,
    #[serde(flatten)]
    pub stats: FactionAggregate,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadToHead {
    pub match_id: MatchId,
    pub competition_id: String,
    pub competition_name: Option<String>,
    pub matches_enumerated: usize,
    pub matches_with_stats: usize,
    pub pages_fetched: usize,
    pub failed_pages: usize,
    pub partial: Option<PartialFetch>,
    pub faction1: FactionReport,
    pub faction2: FactionReport,
    pub generated_at: DateTime<Utc>,
}

pub async fn fetch_metadata(client: &FaceitClient, match_id: &MatchId) -> Result<MatchMetadata, FaceitError> {
    let root = client.get_match(match_id).await?;
    if root.competition_type != CHAMPIONSHIP {
        return Err(FaceitError::NotChampionship(root.competition_type));
    }
    Ok(MatchMetadata {
        match_id: match_id.clone(),
        competition_id: root.competition_id,
        competition_name: root.competition_name,
        faction1: Faction { id: root.teams.faction1.faction_id, name: root.teams.faction1.name },
        faction2: Faction { id: root.teams.faction2.faction_id, name: root.teams.faction2.name },
    })
}

/// Walk every page of past championship matches and keep the ones `filter` accepts.
///
/// A failed page ends the walk with whatever was gathered; only a missing API key is
/// returned as an error.
pub async fn enumerate_matches(
    client: &FaceitClient,
    competition_id: &str,
    faction1: &str,
    faction2: &str,
    filter: MatchFilter,
) -> Result<Enumeration, FaceitError> {
    let mut out = Enumeration::default();
    let mut offset = 0usize;
    loop {
        let page = match client.get_championship_matches(competition_id, offset, PAGE_SIZE).await {
            Ok(p) => p,
            Err(FaceitError::MissingApiKey) => return Err(FaceitError::MissingApiKey),
            Err(e) => {
                warn!(offset, "championship page failed, keeping {} matches: {}", out.match_ids.len(), e);
                out.failed_pages += 1;
                break;
            }
        };
        out.pages_fetched += 1;

        let before = out.match_ids.len();
        for item in &page.items {
            let Ok(m) = serde_json::from_value::<ChampionshipMatch>(item.clone()) else {
                debug!(offset, "skipping undecodable championship match");
                continue;
            };
            if filter.keeps(&m, faction1, faction2) {
                out.match_ids.push(MatchId::new(m.match_id));
            }
        }
        debug!(offset, items = page.items.len(), kept = out.match_ids.len() - before, "championship page");

        if page.items.len() < PAGE_SIZE {
            break;
        }
        offset += PAGE_SIZE;
    }
    info!("found {} matches in {} pages", out.match_ids.len(), out.pages_fetched);
    Ok(out)
}

/// Fetch stats for every id; failures are skipped and listed in `unavailable`.
///
/// With `concurrency > 1` up to that many requests run at once, output order still
/// follows `match_ids`.
pub async fn collect_stats(client: &FaceitClient, match_ids: &[MatchId], concurrency: usize) -> Collection {
    let results: Vec<(MatchId, Result<RawMatchRecord, FaceitError>)> = stream::iter(match_ids.iter().cloned())
        .map(|id| async move {
            let res = client.get_match_stats(&id).await;
            (id, res)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut out = Collection::default();
    for (id, res) in results {
        match res {
            Ok(record) => out.records.push(record),
            Err(e) => {
                warn!(match_id = %id, "no stats: {}", e);
                out.unavailable.push(id);
            }
        }
    }
    out
}

/// Run the whole pipeline for a match room link.
pub async fn run(client: &FaceitClient, link: &str, opts: RunOptions) -> Result<HeadToHead, PipelineError> {
    let match_id = link::resolve_match_id(link)?;
    if !client.has_api_key() {
        return Err(FaceitError::MissingApiKey.into());
    }

    let meta = fetch_metadata(client, &match_id).await?;
    info!(
        competition = %meta.competition_id,
        "{} vs {}", meta.faction1.name, meta.faction2.name
    );

    let listing = enumerate_matches(
        client,
        &meta.competition_id,
        &meta.faction1.id,
        &meta.faction2.id,
        opts.filter,
    )
    .await?;

    let collection = collect_stats(client, &listing.match_ids, opts.concurrency).await;
    let partial = collection.partial();
    if let Some(p) = partial {
        warn!("{}", p);
    }

    let faction1 = FactionReport {
        stats: aggregate::aggregate(&collection.records, &meta.faction1.id),
        faction: meta.faction1,
    };
    let faction2 = FactionReport {
        stats: aggregate::aggregate(&collection.records, &meta.faction2.id),
        faction: meta.faction2,
    };

    Ok(HeadToHead {
        match_id: meta.match_id,
        competition_id: meta.competition_id,
        competition_name: meta.competition_name,
        matches_enumerated: listing.match_ids.len(),
        matches_with_stats: collection.records.len(),
        pages_fetched: listing.pages_fetched,
        failed_pages: listing.failed_pages,
        partial,
        faction1,
        faction2,
        generated_at: Utc::now(),
    })
}
