use faceit_h2h::link::{resolve_match_id, LinkError};

#[test]
fn resolves_room_link() {
    let id = resolve_match_id("https://www.faceit.com/en/cs2/room/1-4f3c9a2e-77b1-4f0e-9d52-0c1b2a3d4e5f").unwrap();
    assert_eq!(id.as_str(), "1-4f3c9a2e-77b1-4f0e-9d52-0c1b2a3d4e5f");
}

#[test]
fn resolves_scoreboard_link_with_whitespace() {
    let id = resolve_match_id("  https://www.faceit.com/de/cs2/room/1-abc-DEF/scoreboard \n").unwrap();
    assert_eq!(id.as_str(), "1-abc-DEF");
}

#[test]
fn ignores_query_string() {
    let id = resolve_match_id("https://www.faceit.com/en/cs2/room/1-abc?tab=stats").unwrap();
    assert_eq!(id.as_str(), "1-abc");
}

#[test]
fn rejects_other_games_and_hosts() {
    for bad in [
        "https://www.faceit.com/en/csgo/room/1-abc",
        "https://faceit.com/en/cs2/room/1-abc",
        "https://www.example.com/en/cs2/room/1-abc",
        "http://www.faceit.com/en/cs2/room/1-abc",
        "https://www.faceit.com/en/cs2/room/",
        "1-abc",
        "",
    ] {
        let err = resolve_match_id(bad).unwrap_err();
        assert!(matches!(err, LinkError::InvalidLink(_)), "{bad}");
    }
}

#[test]
fn error_message_is_descriptive() {
    let err = resolve_match_id("https://www.faceit.com/en/cs2/lobby/1-abc").unwrap_err();
    assert!(err.to_string().contains("invalid match link"));
}
