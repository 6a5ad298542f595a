use faceit_h2h::models::{ChampionshipMatch, MatchRoot, RawMatchRecord};

#[test]
fn decode_match_stats_document() {
    let json = serde_json::json!({
        "rounds": [
            {
                "best_of": "3",
                "match_id": "1-abc",
                "match_round": "1",
                "round_stats": {
                    "Map": "de_ancient",
                    "Rounds": "22",
                    "Score": "13 / 9",
                    "Winner": "f-1",
                    "Region": "EU"
                },
                "teams": [
                    {
                        "team_id": "f-1",
                        "premade": true,
                        "team_stats": { "Team": "Alpha", "Final Score": "13" },
                        "players": [
                            {
                                "player_id": "p-1",
                                "nickname": "s1mple",
                                "player_stats": {
                                    "Kills": "24",
                                    "Deaths": "15",
                                    "K/D Ratio": "1.6",
                                    "Headshots %": "46",
                                    "ADR": "101.3"
                                }
                            }
                        ]
                    },
                    {
                        "team_id": "f-2",
                        "players": []
                    }
                ]
            }
        ]
    });

    let rec: RawMatchRecord = serde_json::from_value(json).expect("decode");
    assert_eq!(rec.rounds.len(), 1);
    let round = &rec.rounds[0];
    assert_eq!(round.round_stats.map, "de_ancient");
    assert_eq!(round.round_stats.score, "13 / 9");
    assert_eq!(round.side_of("f-1"), Some(0));
    assert_eq!(round.side_of("f-2"), Some(1));
    assert_eq!(round.side_of("f-3"), None);
    let p = &round.side(0).unwrap().players[0];
    assert_eq!(p.nickname, "s1mple");
    assert_eq!(p.player_stats["ADR"], "101.3");
}

#[test]
fn forfeit_without_rounds_decodes_empty() {
    let rec: RawMatchRecord = serde_json::from_value(serde_json::json!({})).expect("decode");
    assert!(rec.rounds.is_empty());
    let rec: RawMatchRecord = serde_json::from_value(serde_json::json!({ "rounds": null })).expect("decode");
    assert!(rec.rounds.is_empty());
}

#[test]
fn decode_match_root_and_listing_item() {
    let root: MatchRoot = serde_json::from_value(serde_json::json!({
        "match_id": "1-abc",
        "competition_type": "championship",
        "competition_id": "c-1",
        "teams": {
            "faction1": { "faction_id": "f-1", "name": "Alpha", "roster": [] },
            "faction2": { "faction_id": "f-2", "name": "Bravo" }
        }
    }))
    .expect("decode");
    assert_eq!(root.competition_type, "championship");
    assert_eq!(root.teams.faction2.name, "Bravo");

    let item: ChampionshipMatch = serde_json::from_value(serde_json::json!({
        "match_id": "m-9",
        "teams": { "faction1": { "faction_id": "f-1" } }
    }))
    .expect("decode");
    assert_eq!(item.faction_ids().collect::<Vec<_>>(), vec!["f-1"]);
}
