use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    pub id: String,
    pub name: String,
}

/// What the pipeline keeps from a match root record.
#[derive(Debug, Clone, Serialize)]
pub struct MatchMetadata {
    pub match_id: MatchId,
    pub competition_id: String,
    pub competition_name: Option<String>,
    pub faction1: Faction,
    pub faction2: Faction,
}

// ============ GET /matches/{id} ============

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRoot {
    #[serde(default)]
    pub match_id: Option<String>,
    #[serde(default)]
    pub competition_type: String,
    #[serde(default)]
    pub competition_id: String,
    #[serde(default)]
    pub competition_name: Option<String>,
    pub teams: MatchTeams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchTeams {
    pub faction1: TeamInfo,
    pub faction2: TeamInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamInfo {
    pub faction_id: String,
    #[serde(default)]
    pub name: String,
}

// ============ GET /championships/{id}/matches ============

#[derive(Debug, Clone, Deserialize)]
pub struct ChampionshipMatchesPage {
    /// raw length matters for the exhaustion check, so items are kept as-is
    #[serde(default)]
    pub items: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChampionshipMatch {
    pub match_id: String,
    #[serde(default)]
    pub teams: Option<ChampionshipTeams>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChampionshipTeams {
    #[serde(default)]
    pub faction1: Option<FactionRef>,
    #[serde(default)]
    pub faction2: Option<FactionRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FactionRef {
    pub faction_id: String,
}

impl ChampionshipMatch {
    /// faction ids recorded on either side
    pub fn faction_ids(&self) -> impl Iterator<Item = &str> {
        self.teams
            .iter()
            .flat_map(|t| [t.faction1.as_ref(), t.faction2.as_ref()])
            .flatten()
            .map(|f| f.faction_id.as_str())
    }
}

// ============ GET /matches/{id}/stats ============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMatchRecord {
    /// Filled in by the collector, the payload itself only carries it per round.
    #[serde(default)]
    pub match_id: MatchId,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub rounds: Vec<RoundStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundStats {
    pub round_stats: RoundSummary,
    /// Raw side order is kept, a side that fails to decode stays as `None`.
    #[serde(default, deserialize_with = "positional_vec")]
    pub teams: Vec<Option<TeamSide>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSummary {
    #[serde(rename = "Map")]
    pub map: String,
    #[serde(rename = "Score", default)]
    pub score: String,
    #[serde(rename = "Winner", default)]
    pub winner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSide {
    pub team_id: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub players: Vec<RawPlayer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPlayer {
    pub player_id: String,
    #[serde(default)]
    pub nickname: String,
    /// label -> value, values are usually strings ("20", "1.35")
    #[serde(default)]
    pub player_stats: BTreeMap<String, Value>,
}

impl RoundStats {
    /// Index of the side `faction_id` played on. Raw-first side wins a tie.
    pub fn side_of(&self, faction_id: &str) -> Option<usize> {
        self.teams
            .iter()
            .take(2)
            .position(|t| t.as_ref().is_some_and(|t| t.team_id == faction_id))
    }

    pub fn side(&self, index: usize) -> Option<&TeamSide> {
        self.teams.get(index).and_then(Option::as_ref)
    }
}

// Drop entries that fail to decode instead of failing the whole document
fn lenient_vec<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<Value>>::deserialize(de)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

// Like `lenient_vec`, but an undecodable entry keeps its slot
fn positional_vec<'de, D, T>(de: D) -> Result<Vec<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<Value>>::deserialize(de)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|v| serde_json::from_value(v).ok())
        .collect())
}
