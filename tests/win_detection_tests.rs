//! Win detection tests.
//!
//! These tests verify the complete-hand rules:
//! - Standard shape: groups plus one pair, with exposed melds counted
//! - Seven distinct pairs, only with nothing exposed
//! - Flowers never complete a hand
//! - Attributes reported to the scorer

use mahjong_core::core::{parse_tiles, RuleConfig, Seat, Tile};
use mahjong_core::rules::{Meld, SuitPurity, WinDetector, WinShape};

fn tiles(text: &str) -> Vec<Tile> {
    parse_tiles(text).unwrap()
}

fn tile(code: &str) -> Tile {
    code.parse().unwrap()
}

/// One suit 1-9, then 1-2-3 again, plus a pair of nines.
#[test]
fn test_standard_win_positive() {
    let hand = tiles("1c 2c 3c 4c 5c 6c 7c 8c 9c 1c 2c 3c 9c 9c");
    let detector = WinDetector::default();

    assert!(detector.is_winning(&hand, 0));
    assert_eq!(detector.shape(&hand, 0), Some(WinShape::Standard));
}

/// Swapping one tile for an isolated tile of another suit breaks the hand.
#[test]
fn test_standard_win_negative() {
    let hand = tiles("1c 2c 3c 4c 5c 6c 7c 8c 9c 1c 2c 3c 9c 5d");
    assert!(!WinDetector::default().is_winning(&hand, 0));
}

/// A full 17-tile concealed hand: five groups and a pair.
#[test]
fn test_full_hand_of_seventeen() {
    let hand = tiles("1c 1c 1c 2b 3b 4b 7d 8d 9d E E E Rd Rd Rd 5c 5c");
    assert!(WinDetector::default().is_winning(&hand, 0));
}

/// Exposed melds count towards the groups.
#[test]
fn test_exposed_melds_count() {
    let detector = WinDetector::default();
    let hand = tiles("2b 3b 4b 7d 7d");
    assert!(detector.is_winning(&hand, 4));
    assert!(!detector.is_winning(&hand, 5));
}

/// Seven distinct pairs win even though no standard split exists.
#[test]
fn test_seven_pairs() {
    let hand = tiles("1c 1c 4c 4c 9b 9b 2d 2d E E Rd Rd Wd Wd");
    let detector = WinDetector::default();

    assert_eq!(detector.shape(&hand, 0), Some(WinShape::SevenPairs));
    assert!(!detector.is_winning(&hand, 1));
}

/// Four of a kind is not two pairs.
#[test]
fn test_seven_pairs_needs_distinct_values() {
    let hand = tiles("1c 1c 1c 1c 9b 9b 2d 2d E E Rd Rd Wd Wd");
    assert!(!WinDetector::default().is_winning(&hand, 0));
}

/// The seven-pairs shape can be switched off.
#[test]
fn test_seven_pairs_disabled() {
    let rules = RuleConfig::default().with_seven_pairs(false);
    let hand = tiles("1c 1c 4c 4c 9b 9b 2d 2d E E Rd Rd Wd Wd");
    assert!(!WinDetector::new(&rules).is_winning(&hand, 0));
}

/// Flowers can never stand in for a pair or group member.
#[test]
fn test_flowers_never_complete() {
    let hand = tiles("1c 2c 3c 4c 5c 6c 7c 8c 9c 1c 2c 3c 9c F1");
    assert!(!WinDetector::default().is_winning(&hand, 0));
}

/// Honors cannot form runs.
#[test]
fn test_honor_runs_rejected() {
    let hand = tiles("E S W 1c 1c");
    assert!(!WinDetector::default().is_winning(&hand, 4));
}

/// Runs do not wrap from nine to one.
#[test]
fn test_runs_do_not_wrap() {
    let hand = tiles("8c 9c 1c 5d 5d");
    assert!(!WinDetector::default().is_winning(&hand, 4));
}

/// A shape that needs the search to back out of a triplet.
#[test]
fn test_triplet_must_be_split_into_runs() {
    // Three triplets, or three identical runs.
    let hand = tiles("1c 1c 1c 2c 2c 2c 3c 3c 3c 4c 4c");
    assert!(WinDetector::default().is_winning(&hand, 2));

    let hand = tiles("1c 1c 1c 2c 2c 2c 3c 3c 3c 4c 5c 5c 5c 6c");
    assert!(WinDetector::default().is_winning(&hand, 1));
}

/// Wrong tile counts never win.
#[test]
fn test_bad_tile_counts() {
    let detector = WinDetector::default();
    assert!(!detector.is_winning(&[], 5));
    assert!(!detector.is_winning(&tiles("1c 1c 1c"), 4));
    assert!(!detector.is_winning(&tiles("1c 2c 3c 4c 4c 4c"), 4));
}

/// Report attributes: self-draw, concealment and suit purity.
#[test]
fn test_report_attributes() {
    let detector = WinDetector::default();
    let pong = Meld::pong(tile("9b"), Seat::new(3));
    let hand = tiles("1b 2b 3b 4b 5b 6b 7b 8b 9b 2b 3b 4b 5b 5b");

    let report = detector.evaluate(&hand, &[pong], tile("5b"), false).unwrap();
    assert!(!report.attributes.self_draw);
    assert!(!report.attributes.fully_concealed);
    assert_eq!(report.attributes.suit_purity, SuitPurity::Pure);
    assert_eq!(report.attributes.winning_tile, tile("5b"));
    assert_eq!(report.melds.len(), 1);
}

/// Honors with one suit are a mixed hand; a concealed kong keeps the hand
/// concealed.
#[test]
fn test_mixed_suit_and_concealed_kong() {
    let detector = WinDetector::default();
    let kong = Meld::concealed_kong(tile("N"));
    let hand = tiles("1d 2d 3d 4d 5d 6d 7d 8d 9d 1d 2d 3d 9d 9d");

    let report = detector.evaluate(&hand, &[kong], tile("9d"), true).unwrap();
    assert!(report.attributes.self_draw);
    assert!(report.attributes.fully_concealed);
    assert_eq!(report.attributes.suit_purity, SuitPurity::Mixed);
}

/// Two suits are neither pure nor mixed.
#[test]
fn test_two_suits_neither() {
    let hand = tiles("1c 2c 3c 4c 5c 6c 7c 8c 9c 1b 2b 3b 4b 4b");
    let report = WinDetector::default().evaluate(&hand, &[], tile("4b"), true).unwrap();
    assert_eq!(report.attributes.suit_purity, SuitPurity::Neither);
}
