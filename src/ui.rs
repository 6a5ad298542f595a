use crate::aggregate::{MapStat, PlayerMetrics, PlayerStat};
use crate::pipeline::{FactionReport, HeadToHead};
use comfy_table::{presets::UTF8_FULL, Table};
use std::collections::{BTreeMap, BTreeSet};

/// Metric columns shown when no preference has been saved.
pub const DEFAULT_VISIBLE: &[&str] = &[
    "kills",
    "deaths",
    "kd_ratio",
    "assists",
    "triple_kills",
    "quadro_kills",
    "penta_kills",
    "headshot_percentage",
    "mvps",
];

/// Which player metric columns to print. Consumed only here, never by aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPrefs {
    hidden: BTreeSet<String>,
}

impl Default for ColumnPrefs {
    fn default() -> Self {
        let hidden = PlayerMetrics::COLUMNS
            .iter()
            .map(|(key, _)| *key)
            .filter(|key| !DEFAULT_VISIBLE.contains(key))
            .map(str::to_string)
            .collect();
        Self { hidden }
    }
}

impl ColumnPrefs {
    pub fn from_hidden(hidden: Option<BTreeSet<String>>) -> Self {
        hidden.map(|hidden| Self { hidden }).unwrap_or_default()
    }

    pub fn show_all() -> Self {
        Self { hidden: BTreeSet::new() }
    }

    pub fn hidden(&self) -> &BTreeSet<String> {
        &self.hidden
    }

    pub fn hide(&mut self, key: &str) {
        self.hidden.insert(key.to_string());
    }

    pub fn show(&mut self, key: &str) {
        self.hidden.remove(key);
    }

    /// (key, label) of visible metric columns in schema order
    pub fn visible(&self) -> Vec<(&'static str, &'static str)> {
        PlayerMetrics::COLUMNS
            .iter()
            .copied()
            .filter(|(key, _)| !self.hidden.contains(*key))
            .collect()
    }
}

/// Column keys in `keys` that are not metric columns.
pub fn unknown_columns<'a>(keys: &'a [String]) -> Vec<&'a str> {
    keys.iter()
        .map(String::as_str)
        .filter(|k| !PlayerMetrics::COLUMNS.iter().any(|(key, _)| key == k))
        .collect()
}

pub fn print_report(report: &HeadToHead, prefs: &ColumnPrefs) {
    let title = report.competition_name.as_deref().unwrap_or(&report.competition_id);
    println!(
        "\n{} vs {} ({})\nMatches found: {}, with stats: {}",
        report.faction1.faction.name,
        report.faction2.faction.name,
        title,
        report.matches_enumerated,
        report.matches_with_stats,
    );
    if report.failed_pages > 0 {
        println!("Match listing stopped early after {} pages.", report.pages_fetched);
    }

    print_faction(&report.faction1, prefs);
    print_faction(&report.faction2, prefs);
}

fn print_faction(f: &FactionReport, prefs: &ColumnPrefs) {
    println!("\n== {} / Maps ==\n{}\n", f.faction.name, map_table(&f.stats.map_stats));
    println!("== {} / Players ==\n{}\n", f.faction.name, player_table(&f.stats.player_stats, prefs));
}

pub fn map_table(maps: &BTreeMap<String, MapStat>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Map", "Played", "Wins", "Win Rate", "Scores"]);

    for (map, s) in maps {
        table.add_row(vec![
            map.clone(),
            s.played.to_string(),
            s.wins.to_string(),
            format!("{:.2}%", s.win_rate()),
            s.scores.join(" || "),
        ]);
    }
    table
}

pub fn player_table(players: &BTreeMap<String, PlayerStat>, prefs: &ColumnPrefs) -> Table {
    let columns = prefs.visible();

    let mut header = vec!["Nickname".to_string(), "Matches".to_string()];
    header.extend(columns.iter().map(|(_, label)| label.to_string()));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header);

    for p in players.values() {
        let mut row = vec![p.nickname.clone(), p.matches.to_string()];
        row.extend(columns.iter().map(|(key, _)| fmt_opt_f(p.metrics.get(key))));
        table.add_row(row);
    }
    table
}

pub fn print_columns(prefs: &ColumnPrefs) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Column", "Label", "Shown"]);
    for (key, label) in PlayerMetrics::COLUMNS {
        let shown = if prefs.hidden().contains(*key) { "no" } else { "yes" };
        table.add_row(vec![*key, *label, shown]);
    }
    println!("{}", table);
}

fn fmt_opt_f(v: Option<f64>) -> String {
    v.map(|x| format!("{:.2}", x)).unwrap_or_else(|| "-".into())
}
