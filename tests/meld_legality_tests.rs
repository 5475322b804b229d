//! Meld legality tests.
//!
//! These tests verify who may claim what:
//! - Chi only for the seat right after the discarder
//! - The predecessor exposed-kong restriction and its rule switch
//! - Added and concealed kong options on a self-draw

use mahjong_core::core::{parse_tiles, RuleConfig, Seat, Suit, Tile};
use mahjong_core::rules::{Meld, MeldKind, MeldLegality, SelfKong};

fn tiles(text: &str) -> Vec<Tile> {
    parse_tiles(text).unwrap()
}

fn tile(code: &str) -> Tile {
    code.parse().unwrap()
}

/// Every seat other than the discarder's next seat gets no chi, whatever it holds.
#[test]
fn test_chi_only_for_next_seat() {
    let legality = MeldLegality::default();
    let hand = tiles("1c 2c 3c 4c 5c 6c 7c 8c 9c");

    for discarder in Seat::all() {
        for claimant in discarder.others() {
            for rank in 1..=9 {
                let discard = Tile::try_suited(Suit::Character, rank).unwrap();
                let options = legality.chi_options(&hand, discard, discarder, claimant);
                if claimant == discarder.next() {
                    assert!(!options.is_empty(), "{} should chi {}", claimant, discard);
                } else {
                    assert!(options.is_empty(), "{} must not chi from {}", claimant, discarder);
                }
            }
        }
    }
}

/// Chi runs stay inside one suit and never use honors.
#[test]
fn test_chi_runs_bounded() {
    let legality = MeldLegality::default();
    let (d, c) = (Seat::new(2), Seat::new(3));

    let options = legality.chi_options(&tiles("8c 9c 1b 2b"), tile("1c"), d, c);
    assert!(options.is_empty());

    let options = legality.chi_options(&tiles("2c 3c"), tile("1c"), d, c);
    assert_eq!(options.as_slice(), &[[tile("1c"), tile("2c"), tile("3c")]]);

    let options = legality.chi_options(&tiles("S W"), tile("E"), d, c);
    assert!(options.is_empty());
}

/// Claimant holding three copies of a discard from its predecessor: pong
/// only.
#[test]
fn test_predecessor_cannot_exposed_kong() {
    let legality = MeldLegality::default();
    let hand = tiles("Gd Gd Gd 1b");
    let claimant = Seat::new(1);
    let discarder = Seat::new(0);

    assert_eq!(discarder, Seat::new((claimant.0 + 3) % 4));
    assert!(!legality.can_exposed_kong(&hand, tile("Gd"), discarder, claimant));
    assert!(legality.can_pong(&hand, tile("Gd")));

    // Any other discarder is fine.
    assert!(legality.can_exposed_kong(&hand, tile("Gd"), Seat::new(2), claimant));
    assert!(legality.can_exposed_kong(&hand, tile("Gd"), Seat::new(3), claimant));
}

/// The restriction is a house rule and can be lifted.
#[test]
fn test_predecessor_rule_configurable() {
    let rules = RuleConfig::default().with_predecessor_kong_restriction(false);
    let legality = MeldLegality::new(&rules);
    let hand = tiles("Gd Gd Gd 1b");

    assert!(legality.can_exposed_kong(&hand, tile("Gd"), Seat::new(0), Seat::new(1)));
}

/// Exposed kong needs exactly three copies; pong needs two.
#[test]
fn test_copy_counts() {
    let legality = MeldLegality::default();
    let (d, c) = (Seat::new(3), Seat::new(1));

    assert!(!legality.can_exposed_kong(&tiles("5d 5d"), tile("5d"), d, c));
    assert!(legality.can_pong(&tiles("5d 5d"), tile("5d")));
    assert!(!legality.can_pong(&tiles("5d 6d"), tile("5d")));
    assert!(!legality.can_pong(&tiles("F1"), tile("F1")));
}

/// Added kong: a pong plus its fourth copy in hand.
#[test]
fn test_added_kong_options() {
    let legality = MeldLegality::default();
    let melds = vec![
        Meld::pong(tile("E"), Seat::new(2)),
        Meld::pong(tile("3b"), Seat::new(1)),
        Meld::chi([tile("4c"), tile("5c"), tile("6c")], Seat::new(0)),
    ];

    let options = legality.added_kong_options(&tiles("E 4c 9d"), &melds);
    assert_eq!(options.as_slice(), &[tile("E")]);
}

/// Concealed kong: four copies in hand.
#[test]
fn test_concealed_kong_options() {
    let legality = MeldLegality::default();
    let options = legality.concealed_kong_options(&tiles("7b 7b 7b 7b N N N 1c"));
    assert_eq!(options.as_slice(), &[tile("7b")]);
}

/// Self-turn options list added kongs before concealed ones.
#[test]
fn test_self_kong_order() {
    let legality = MeldLegality::default();
    let melds = vec![Meld::pong(tile("Wd"), Seat::new(3))];
    let options = legality.self_kong_options(&tiles("2c 2c 2c 2c Wd"), &melds);

    assert_eq!(
        options.as_slice(),
        &[SelfKong::Added(tile("Wd")), SelfKong::Concealed(tile("2c"))]
    );
}

/// Upgrading a pong keeps the original claim source.
#[test]
fn test_pong_upgrade() {
    let mut meld = Meld::pong(tile("9c"), Seat::new(2));
    assert!(!meld.upgrade_to_added_kong(tile("8c")));
    assert!(meld.upgrade_to_added_kong(tile("9c")));

    assert_eq!(meld.kind(), MeldKind::AddedKong);
    assert_eq!(meld.len(), 4);
    assert_eq!(meld.claimed_from(), Some(Seat::new(2)));
    assert!(!meld.upgrade_to_added_kong(tile("9c")));
}
