/// Property-based tests for draw classification and settlement arithmetic
///
/// These tests check the pay rules over arbitrary draws, stakes and reel
/// weightings rather than a handful of hand-picked cases.
use proptest::prelude::*;
use starfarer::slots::{MachineConfig, Multiplier, PayTable, Reel, Symbol, WinKind, winnings};

fn default_table() -> (Reel, PayTable) {
    let config = MachineConfig::default();
    let reel = Reel::new(config.symbols.clone()).unwrap();
    let table = PayTable::new(&reel, &config);
    (reel, table)
}

// Strategy for a draw over the five default symbols
fn draw_strategy() -> impl Strategy<Value = [usize; 3]> {
    (0usize..5, 0usize..5, 0usize..5).prop_map(|(a, b, c)| [a, b, c])
}

// Strategy for a catalog of 1..8 symbols with positive weights
fn weights_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..1_000, 1..8)
}

proptest! {
    #[test]
    fn test_triples_pay_table_value(index in 0usize..5) {
        let (_, table) = default_table();
        let (kind, multiplier) = table.evaluate([index, index, index]);
        prop_assert_eq!(kind, WinKind::ThreeOfAKind);
        prop_assert_eq!(multiplier, table.three_of_a_kind(index));
    }

    #[test]
    fn test_classification_matches_rules(draw in draw_strategy()) {
        let (_, table) = default_table();
        let [a, b, c] = draw;
        let (kind, multiplier) = table.evaluate(draw);

        let expected = if a == b && b == c {
            WinKind::ThreeOfAKind
        } else if a == b || b == c {
            WinKind::AdjacentPair
        } else {
            WinKind::Loss
        };
        prop_assert_eq!(kind, expected);
        prop_assert_eq!(kind == WinKind::Loss, multiplier.is_zero());
    }

    #[test]
    fn test_outer_only_match_never_pays(outer in 0usize..5, middle in 0usize..5) {
        prop_assume!(outer != middle);
        let (_, table) = default_table();
        prop_assert_eq!(
            table.evaluate([outer, middle, outer]),
            (WinKind::Loss, Multiplier::ZERO)
        );
    }

    #[test]
    fn test_winnings_floor_with_minimum(stake in 1i64..1_000_000, hundredths in 1u32..10_000) {
        let multiplier = Multiplier::from_hundredths(hundredths);
        let won = winnings(stake, multiplier).unwrap();

        let exact = stake as i128 * hundredths as i128;
        prop_assert!(won >= 1);
        prop_assert!((won as i128) * 100 <= exact.max(100));
        if exact >= 100 {
            // floor: next chip up would exceed the exact product
            prop_assert!((won as i128 + 1) * 100 > exact);
        }
    }

    #[test]
    fn test_zero_multiplier_pays_nothing(stake in 1i64..1_000_000) {
        prop_assert_eq!(winnings(stake, Multiplier::ZERO), Some(0));
    }

    #[test]
    fn test_every_roll_maps_into_reel(weights in weights_strategy(), seed in any::<u64>()) {
        let symbols: Vec<Symbol> = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| Symbol::new(&format!("s{i}"), "?", w))
            .collect();
        let reel = Reel::new(symbols).unwrap();
        let total = reel.total_weight();
        let roll = seed % total;

        let index = reel.index_for_roll(roll);
        prop_assert!(index < weights.len());

        // The roll falls inside this symbol's cumulative window
        let lower: u64 = weights[..index].iter().map(|&w| u64::from(w)).sum();
        let upper = lower + u64::from(weights[index]);
        prop_assert!(lower <= roll && roll < upper);
    }
}
