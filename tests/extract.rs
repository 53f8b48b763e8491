use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;

use wtc_scrape::dom::{DomNode, ElementNode, find_pairings};
use wtc_scrape::extract::{ExtractError, PageError, decode_pairing, extract_page, run_extractor};
use wtc_scrape::model::{Game, Match, Page};

fn read_fixture(name: &str) -> Vec<u8> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read(path).expect("fixture file should be readable")
}

fn el(class: &str, children: Vec<DomNode>) -> DomNode {
    DomNode::Element(ElementNode {
        name: "div".to_string(),
        class: (!class.is_empty()).then(|| class.to_string()),
        children,
    })
}

fn text(raw: &str) -> DomNode {
    DomNode::Text(raw.to_string())
}

fn team(label: &str) -> DomNode {
    el("team", vec![el("", vec![el("flag", vec![]), el("", vec![text(label)])])])
}

fn game_row(p1: &str, l1: &str, p2: &str, l2: &str, side0_won: bool) -> DomNode {
    let side0 = if side0_won { "side winner" } else { "side" };
    el(
        "game",
        vec![
            el(side0, vec![text(p1), el("", vec![text(l1)])]),
            el("side", vec![text(p2), el("", vec![text(l2)])]),
        ],
    )
}

fn pairing(zone: &str, t1: &str, t2: &str, rows: Vec<DomNode>) -> DomNode {
    el(
        "pairing-row",
        vec![
            el("zone", vec![el("", vec![text("Table")]), el("", vec![text(zone)])]),
            team(t1),
            el("score", vec![text("0 - 0")]),
            team(t2),
            el("games", rows),
        ],
    )
}

#[test]
fn extracts_scenario_match_from_fixture() {
    let page = Page {
        round: 1,
        body: read_fixture("round1.html"),
    };
    let extract = extract_page(&page).expect("fixture should parse");
    assert_eq!(extract.matches.len(), 2);
    assert_eq!(extract.skipped, 1);

    assert_eq!(
        extract.matches[0],
        Match {
            round: 1,
            zone: "Zone A".to_string(),
            teams: ["USA Team Eagles".to_string(), "France Team Wolves".to_string()],
            games: vec![Game {
                players: ["Alice".to_string(), "Bob".to_string()],
                lists: ["Caine 2".to_string(), "Absylonia 2".to_string()],
                winner: 0,
            }],
        }
    );
}

#[test]
fn malformed_pairing_does_not_hide_later_siblings() {
    let page = Page {
        round: 1,
        body: read_fixture("round1.html"),
    };
    let extract = extract_page(&page).expect("fixture should parse");
    let zone_c = &extract.matches[1];
    assert_eq!(zone_c.zone, "Zone C");
    assert_eq!(zone_c.teams, ["Wales Dragons".to_string(), "Poland Hussars".to_string()]);
    let winners = zone_c.games.iter().map(|g| g.winner).collect::<Vec<_>>();
    assert_eq!(winners, vec![1, 0, 1]);
    assert_eq!(zone_c.games[0].lists[1], "vHarkevich 1");
}

#[test]
fn one_game_per_row_in_document_order() {
    let rows = (0..4)
        .map(|i| game_row(&format!("P{i}"), "Caine 2", &format!("Q{i}"), "Haley 2", i % 2 == 0))
        .collect();
    let node = pairing("Zone D", "USA Eagles", "Wales Dragons", rows);
    let m = decode_pairing(3, &node).expect("well-formed pairing");
    assert_eq!(m.round, 3);
    assert_eq!(m.games.len(), 4);
    assert_eq!(m.games[2].players, ["P2".to_string(), "Q2".to_string()]);
    assert_eq!(
        m.games.iter().map(|g| g.winner).collect::<Vec<_>>(),
        vec![0, 1, 0, 1]
    );
}

#[test]
fn pairing_without_games_has_empty_game_list() {
    let node = pairing("Zone E", "USA Eagles", "Wales Dragons", vec![]);
    let m = decode_pairing(1, &node).expect("well-formed pairing");
    assert!(m.games.is_empty());
}

#[test]
fn game_rows_past_five_are_dropped() {
    let rows = (0..7)
        .map(|i| game_row(&format!("P{i}"), "Caine 2", &format!("Q{i}"), "Haley 2", true))
        .collect();
    let node = pairing("Zone F", "USA Eagles", "Wales Dragons", rows);
    let m = decode_pairing(1, &node).expect("well-formed pairing");
    assert_eq!(m.games.len(), 5);
    assert_eq!(m.games[4].players[0], "P4");
}

#[test]
fn element_where_text_expected_is_malformed() {
    let bad_row = el(
        "game",
        vec![
            el("side", vec![el("", vec![text("Alice")])]),
            el("side", vec![text("Bob"), el("", vec![text("Haley 2")])]),
        ],
    );
    let node = pairing("Zone G", "USA Eagles", "Wales Dragons", vec![bad_row]);
    assert_eq!(
        decode_pairing(1, &node),
        Err(ExtractError::NotText { field: "player 1" })
    );
}

#[test]
fn walk_prunes_at_first_marker() {
    let inner = pairing("Inner", "USA Eagles", "Wales Dragons", vec![]);
    let outer = el("pairing-row outer", vec![inner]);
    let root = el("page", vec![outer, el("wrap", vec![text(" ")])]);
    let found = find_pairings(&root);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].class(), Some("pairing-row outer"));
}

#[test]
fn non_utf8_page_contributes_nothing() {
    let page = Page {
        round: 2,
        body: vec![0xff, 0xfe, 0x3c],
    };
    assert!(extract_page(&page).is_err());
}

#[test]
fn deeply_nested_page_fails_alone() {
    let deep = format!("<html><body>{}</body></html>", "<div>".repeat(20_000));
    let deep_page = Page {
        round: 1,
        body: deep.into_bytes(),
    };
    assert!(matches!(extract_page(&deep_page), Err(PageError::TooDeep(_))));

    let (page_tx, page_rx) = mpsc::sync_channel(2);
    let (match_tx, match_rx) = mpsc::sync_channel(8);
    page_tx.send(deep_page).expect("queue deep page");
    page_tx
        .send(Page {
            round: 2,
            body: read_fixture("round1.html"),
        })
        .expect("queue fixture page");
    drop(page_tx);

    let stats = run_extractor(page_rx, match_tx);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.pages_parsed, 1);
    assert_eq!(stats.matches_extracted, 2);

    let matches = match_rx.iter().collect::<Vec<Match>>();
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.round == 2));
}
