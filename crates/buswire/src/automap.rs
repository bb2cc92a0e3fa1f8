//! Name-based pin pairing with positional fallback.

use std::collections::HashMap;

use buswire_core::{identifier::Id, model::Pin};

/// Pair every source pin with a target pin.
///
/// Target pins are indexed by their trimmed, lowercased name; when two
/// target pins share a name the later one wins. A source pin without a name
/// match falls back to the target pin at the same position, if there is one.
///
/// Returns one entry per source pin, in source order. The result may claim
/// a target pin more than once; callers normalize afterwards.
pub fn pair_pins<'a>(source: &'a [Pin], target: &[Pin]) -> Vec<(&'a Pin, Option<Id>)> {
    let by_name: HashMap<String, Id> = target
        .iter()
        .map(|pin| (pin.match_key(), pin.id()))
        .collect();

    source
        .iter()
        .enumerate()
        .map(|(idx, pin)| {
            let matched = by_name
                .get(&pin.match_key())
                .copied()
                .or_else(|| target.get(idx).map(Pin::id));
            (pin, matched)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use buswire_core::{identifier::EntityKind, model::PinDirection};

    use super::*;

    fn pins(names: &[&str]) -> Vec<Pin> {
        names
            .iter()
            .map(|name| Pin::new(Id::generate(EntityKind::Pin), *name, PinDirection::In))
            .collect()
    }

    fn target_names<'a>(pairs: &[(&Pin, Option<Id>)], target: &'a [Pin]) -> Vec<Option<&'a str>> {
        pairs
            .iter()
            .map(|(_, to)| to.and_then(|id| target.iter().find(|p| p.id() == id).map(Pin::name)))
            .collect()
    }

    #[test]
    fn test_matches_by_normalized_name() {
        let source = pins(&["clk", "data", "rst"]);
        let target = pins(&["RST", "Data", "CLK"]);

        let pairs = pair_pins(&source, &target);
        assert_eq!(
            target_names(&pairs, &target),
            [Some("CLK"), Some("Data"), Some("RST")]
        );
    }

    #[test]
    fn test_positional_fallback() {
        let source = pins(&["a", "b"]);
        let target = pins(&["x", "y"]);

        let pairs = pair_pins(&source, &target);
        assert_eq!(target_names(&pairs, &target), [Some("x"), Some("y")]);
    }

    #[test]
    fn test_no_counterpart_leaves_target_unset() {
        let source = pins(&["a", "b", "c"]);
        let target = pins(&["x"]);

        let pairs = pair_pins(&source, &target);
        assert_eq!(target_names(&pairs, &target), [Some("x"), None, None]);
    }

    #[test]
    fn test_later_duplicate_name_shadows_earlier() {
        let source = pins(&["clk"]);
        let target = pins(&["clk", " CLK "]);

        let pairs = pair_pins(&source, &target);
        assert_eq!(pairs[0].1, Some(target[1].id()));
    }
}
