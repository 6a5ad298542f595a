//! Head-to-head aggregation over collected match stats.
//!
//! Everything here is pure: the same records and faction id always produce the same
//! [`FactionAggregate`]. Rounds the faction did not play are ignored, malformed rounds
//! and players never reach this module (they are dropped while decoding). A malformed
//! team side stays in its slot as `None`, so the other side keeps its raw position.

use crate::models::{RawMatchRecord, RawPlayer};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const NICKNAME_SEPARATOR: &str = " || ";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapStat {
    pub played: u32,
    pub wins: u32,
    /// one oriented score per round played, "own/opponent"
    pub scores: Vec<String>,
}

impl MapStat {
    pub fn win_rate(&self) -> f64 {
        if self.played == 0 {
            0.0
        } else {
            self.wins as f64 / self.played as f64 * 100.0
        }
    }
}

macro_rules! player_metrics {
    ($( $field:ident => $label:literal ),+ $(,)?) => {
        /// Per-player metrics, one field per known `player_stats` label.
        ///
        /// While aggregating these hold running totals, once a player is finished they
        /// hold per-match averages rounded to two decimals.
        #[derive(Debug, Clone, Default, PartialEq, Serialize)]
        pub struct PlayerMetrics {
            $( pub $field: f64, )+
        }

        impl PlayerMetrics {
            /// (column key, remote label) for every metric, in display order
            pub const COLUMNS: &'static [(&'static str, &'static str)] = &[
                $( (stringify!($field), $label), )+
            ];

            fn add_raw(&mut self, raw: &BTreeMap<String, Value>) {
                $( self.$field += parse_metric(raw.get($label)); )+
            }

            fn finalize(&mut self, matches: u32) {
                $( self.$field = average(self.$field, matches); )+
            }

            /// value by column key, `None` for unknown keys
            pub fn get(&self, key: &str) -> Option<f64> {
                match key {
                    $( stringify!($field) => Some(self.$field), )+
                    _ => None,
                }
            }
        }
    };
}

player_metrics! {
    kills => "Kills",
    deaths => "Deaths",
    assists => "Assists",
    kd_ratio => "K/D Ratio",
    kr_ratio => "K/R Ratio",
    adr => "ADR",
    damage => "Damage",
    headshots => "Headshots",
    headshot_percentage => "Headshots %",
    mvps => "MVPs",
    double_kills => "Double Kills",
    triple_kills => "Triple Kills",
    quadro_kills => "Quadro Kills",
    penta_kills => "Penta Kills",
    first_kills => "First Kills",
    clutch_kills => "Clutch Kills",
    entry_count => "Entry Count",
    entry_wins => "Entry Wins",
    match_entry_rate => "Match Entry Rate",
    match_entry_success_rate => "Match Entry Success Rate",
    one_v_one_count => "1v1Count",
    one_v_one_wins => "1v1Wins",
    match_1v1_win_rate => "Match 1v1 Win Rate",
    one_v_two_count => "1v2Count",
    one_v_two_wins => "1v2Wins",
    match_1v2_win_rate => "Match 1v2 Win Rate",
    pistol_kills => "Pistol Kills",
    knife_kills => "Knife Kills",
    zeus_kills => "Zeus Kills",
    sniper_kills => "Sniper Kills",
    sniper_kill_rate_per_match => "Sniper Kill Rate per Match",
    sniper_kill_rate_per_round => "Sniper Kill Rate per Round",
    utility_count => "Utility Count",
    utility_damage => "Utility Damage",
    utility_enemies => "Utility Enemies",
    utility_usage_per_round => "Utility Usage per Round",
    utility_damage_per_round => "Utility Damage per Round in a Match",
    utility_success_rate_per_match => "Utility Success Rate per Match",
    utility_damage_success_rate_per_match => "Utility Damage Success Rate per Match",
    flash_count => "Flash Count",
    flash_successes => "Flash Successes",
    flash_success_rate_per_match => "Flash Success Rate per Match",
    flashes_per_round => "Flashes per Round in a Match",
    enemies_flashed => "Enemies Flashed",
    enemies_flashed_per_round => "Enemies Flashed per Round in a Match",
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStat {
    pub nickname: String,
    pub matches: u32,
    #[serde(flatten)]
    pub metrics: PlayerMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FactionAggregate {
    pub map_stats: BTreeMap<String, MapStat>,
    /// keyed by player id
    pub player_stats: BTreeMap<String, PlayerStat>,
}

#[derive(Default)]
struct PlayerAcc {
    nicknames: Vec<String>,
    matches: u32,
    totals: PlayerMetrics,
}

impl PlayerAcc {
    fn record(&mut self, player: &RawPlayer) {
        let nick = player.nickname.as_str();
        // first-seen value is the base as-is, later aliases only when distinct and non-blank
        let is_alias = !self.nicknames.is_empty();
        if !(is_alias && nick.trim().is_empty()) && !self.nicknames.iter().any(|n| n == nick) {
            self.nicknames.push(nick.to_string());
        }
        self.matches += 1;
        self.totals.add_raw(&player.player_stats);
    }

    fn finish(mut self) -> PlayerStat {
        self.totals.finalize(self.matches);
        PlayerStat {
            nickname: self.nicknames.join(NICKNAME_SEPARATOR),
            matches: self.matches,
            metrics: self.totals,
        }
    }
}

/// Fold `records` into map and player stats from `faction_id`'s point of view.
pub fn aggregate(records: &[RawMatchRecord], faction_id: &str) -> FactionAggregate {
    let mut map_stats: BTreeMap<String, MapStat> = BTreeMap::new();
    let mut players: BTreeMap<String, PlayerAcc> = BTreeMap::new();

    for round in records.iter().flat_map(|r| r.rounds.iter()) {
        let Some(side) = round.side_of(faction_id) else { continue };

        let summary = &round.round_stats;
        let entry = map_stats.entry(summary.map.clone()).or_default();
        entry.played += 1;
        if summary.winner == faction_id {
            entry.wins += 1;
        }
        entry.scores.push(orient_score(&summary.score, side));

        for player in round.side(side).into_iter().flat_map(|t| t.players.iter()) {
            players.entry(player.player_id.clone()).or_default().record(player);
        }
    }

    FactionAggregate {
        map_stats,
        player_stats: players.into_iter().map(|(id, acc)| (id, acc.finish())).collect(),
    }
}

/// Rewrite a raw "a / b" score so the faction's own rounds come first.
fn orient_score(raw: &str, side: usize) -> String {
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if side == 0 {
        return stripped;
    }
    match stripped.split_once('/') {
        Some((first, second)) => format!("{second}/{first}"),
        None => stripped,
    }
}

fn parse_metric(v: Option<&Value>) -> f64 {
    let n = match v {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|x| x.is_finite()).unwrap_or(0.0)
}

fn average(total: f64, matches: u32) -> f64 {
    if matches == 0 {
        return total;
    }
    (total / matches as f64 * 100.0).round() / 100.0
}
