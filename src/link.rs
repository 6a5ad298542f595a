use crate::models::MatchId;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("invalid match link, expected a FACEIT CS2 match room URL: {0}")]
    InvalidLink(String),
}

// https://www.faceit.com/<lang>/cs2/room/<id>[/scoreboard]
static ROOM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://www\.faceit\.com/[a-z]+/cs2/room/([a-zA-Z0-9-]+)(?:/scoreboard)?/?(?:[?#].*)?$").unwrap()
});

/// extract the match id from a match room link
pub fn resolve_match_id(link: &str) -> Result<MatchId, LinkError> {
    let link = link.trim();
    ROOM_RE
        .captures(link)
        .and_then(|c| c.get(1))
        .map(|m| MatchId::new(m.as_str()))
        .ok_or_else(|| LinkError::InvalidLink(link.to_string()))
}
