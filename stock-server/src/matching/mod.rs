//! Ingredient Matcher
//!
//! Resolves a free-text ingredient name from a recipe to an inventory stock
//! record within one store. Pure and deterministic: same inputs, same output,
//! required for audit reproducibility.
//!
//! Two passes:
//! 1. exact equality on normalized names; a unique hit wins immediately
//! 2. bidirectional substring containment, gated on both names sharing the
//!    same first significant token so short unrelated strings don't match
//!
//! Ambiguity is a first-class outcome, not an error. Automated repair must
//! skip ambiguous ingredients; live deduction may pick the first candidate in
//! stable id order but has to flag the choice.

use shared::models::InventoryItem;
use shared::types::{first_token, normalize_name};

/// Outcome of matching one ingredient name against store inventory.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    /// Exactly one candidate survived.
    Match(InventoryItem),
    /// More than one candidate survived, in stable id order.
    Ambiguous(Vec<InventoryItem>),
    /// Nothing matched.
    NoMatch,
}

impl MatchOutcome {
    /// The single match, if unambiguous.
    pub fn into_match(self) -> Option<InventoryItem> {
        match self {
            MatchOutcome::Match(item) => Some(item),
            _ => None,
        }
    }
}

/// Match `ingredient_name` against `store_inventory`.
///
/// Inactive items never match. Candidates are evaluated in id order so the
/// result does not depend on input ordering.
pub fn match_ingredient(ingredient_name: &str, store_inventory: &[InventoryItem]) -> MatchOutcome {
    let target = normalize_name(ingredient_name);
    if target.is_empty() {
        return MatchOutcome::NoMatch;
    }

    let mut candidates: Vec<&InventoryItem> =
        store_inventory.iter().filter(|i| i.is_active).collect();
    candidates.sort_by(|a, b| a.id.cmp(&b.id));

    // Pass 1: exact equality on normalized names
    let exact: Vec<&InventoryItem> = candidates
        .iter()
        .copied()
        .filter(|i| normalize_name(&i.item) == target)
        .collect();
    match exact.len() {
        1 => return MatchOutcome::Match(exact[0].clone()),
        n if n > 1 => return MatchOutcome::Ambiguous(exact.into_iter().cloned().collect()),
        _ => {}
    }

    // Pass 2: bidirectional containment, gated on a shared first token
    let target_token = first_token(&target);
    let fuzzy: Vec<&InventoryItem> = candidates
        .iter()
        .copied()
        .filter(|i| {
            let candidate = normalize_name(&i.item);
            let contains = candidate.contains(&target) || target.contains(&candidate);
            contains && first_token(&candidate) == target_token
        })
        .collect();

    match fuzzy.len() {
        0 => MatchOutcome::NoMatch,
        1 => MatchOutcome::Match(fuzzy[0].clone()),
        _ => MatchOutcome::Ambiguous(fuzzy.into_iter().cloned().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            store_id: "store-1".to_string(),
            item: name.to_string(),
            unit: "pieces".to_string(),
            stock_quantity: 10.0,
            minimum_threshold: 0.0,
            is_active: true,
        }
    }

    #[test]
    fn test_exact_match_wins() {
        let inventory = vec![item("inv-1", "Choco Flakes"), item("inv-2", "Choco Syrup")];
        let outcome = match_ingredient("Choco Flakes", &inventory);
        assert_eq!(outcome.into_match().unwrap().id, "inv-1");
    }

    #[test]
    fn test_exact_beats_fuzzy_regardless_of_order() {
        // A fuzzy candidate earlier in the list must not shadow a later
        // exact one.
        let inventory = vec![
            item("inv-1", "Choco Flakes Toppings"),
            item("inv-2", "Choco Flakes"),
        ];
        let outcome = match_ingredient("Choco Flakes", &inventory);
        assert_eq!(outcome.into_match().unwrap().id, "inv-2");
    }

    #[test]
    fn test_fuzzy_containment() {
        let inventory = vec![item("inv-1", "Whipped Cream (Piping Bag)")];
        let outcome = match_ingredient("Whipped Cream", &inventory);
        assert_eq!(outcome.into_match().unwrap().id, "inv-1");
    }

    #[test]
    fn test_fuzzy_requires_shared_first_token() {
        // "Sauce" is contained in both, but the first tokens differ, so
        // neither survives the gate.
        let inventory = vec![item("inv-1", "Chocolate Sauce"), item("inv-2", "Caramel Sauce")];
        let outcome = match_ingredient("Sauce", &inventory);
        assert!(matches!(outcome, MatchOutcome::NoMatch));
    }

    #[test]
    fn test_ambiguous_returns_all_candidates() {
        let inventory = vec![
            item("inv-2", "Chocolate Sauce Dark"),
            item("inv-1", "Chocolate Sauce"),
        ];
        let outcome = match_ingredient("Chocolate", &inventory);
        match outcome {
            MatchOutcome::Ambiguous(items) => {
                // stable id order, not input order
                assert_eq!(items[0].id, "inv-1");
                assert_eq!(items[1].id, "inv-2");
            }
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn test_inactive_items_never_match() {
        let mut dead = item("inv-1", "KitKat");
        dead.is_active = false;
        let outcome = match_ingredient("KitKat", &[dead]);
        assert!(matches!(outcome, MatchOutcome::NoMatch));
    }

    #[test]
    fn test_determinism() {
        let inventory = vec![item("inv-1", "Chocolate Sauce"), item("inv-2", "Choco Flakes")];
        let first = match_ingredient("Choco Flakes", &inventory);
        let second = match_ingredient("Choco Flakes", &inventory);
        assert_eq!(
            first.into_match().map(|i| i.id),
            second.into_match().map(|i| i.id)
        );
    }

    #[test]
    fn test_no_match() {
        let inventory = vec![item("inv-1", "Regular Croissant")];
        assert!(matches!(
            match_ingredient("Marshmallow", &inventory),
            MatchOutcome::NoMatch
        ));
    }
}
