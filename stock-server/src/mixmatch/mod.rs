//! Mix & Match Parser
//!
//! A composite POS line encodes its selected add-ons in the display name:
//! `"<Base> with <Choice1> and <Choice2>"`. This module extracts the base
//! name and choice tokens, and partitions the resolved ingredient list into
//! packaging / base / choice-eligible entries.
//!
//! Composite-ness and the choice vocabulary are declared per category
//! ([`CategoryVocabulary`]), never inferred from name substrings; only the
//! choice extraction itself is name-driven, because the display name is the
//! external contract with the POS.

use shared::models::CategoryVocabulary;
use shared::normalize_name;

use crate::resolver::ResolvedIngredient;

/// Literal separator between base name and choice clause.
const WITH_SEPARATOR: &str = " with ";

/// Classification of one resolved ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientClass {
    /// Boxes, sticks, wax paper; always deducted, fixed per unit sold.
    Packaging,
    /// Required ingredients, always deducted.
    Base,
    /// Deducted only when selected, at the category's choice portion.
    Choice,
}

/// Parse result for one line item.
#[derive(Debug, Clone, Default)]
pub struct CompositeParse {
    /// Ingredients to deduct, in resolver order, with choice portions
    /// already applied to `quantity_per_unit`.
    pub applicable: Vec<ResolvedIngredient>,
    /// Required (non-packaging) ingredients.
    pub base_ingredients: Vec<ResolvedIngredient>,
    /// Packaging ingredients.
    pub packaging_ingredients: Vec<ResolvedIngredient>,
    /// Choice tokens recognized against the vocabulary, as written in the
    /// display name.
    pub selected_choices: Vec<String>,
    /// Choice tokens that matched nothing. Never deducted, never fatal;
    /// kept for observability.
    pub unmatched_tokens: Vec<String>,
    pub warnings: Vec<String>,
}

/// Split a display name into base name and optional choice clause.
///
/// No `" with "` means the product is not composite.
pub fn split_display_name(display_name: &str) -> (String, Option<String>) {
    match display_name.split_once(WITH_SEPARATOR) {
        Some((base, clause)) => (base.trim().to_string(), Some(clause.trim().to_string())),
        None => (display_name.trim().to_string(), None),
    }
}

/// Split a choice clause into trimmed tokens: `"A and B, C"` → `[A, B, C]`.
pub fn parse_choice_clause(clause: &str) -> Vec<String> {
    clause
        .split(" and ")
        .flat_map(|part| part.split(','))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Classify one ingredient by naming convention and declared vocabulary.
pub fn classify_ingredient(
    ingredient_name: &str,
    vocabulary: Option<&CategoryVocabulary>,
    packaging_keywords: &[String],
) -> IngredientClass {
    let normalized = normalize_name(ingredient_name);
    if packaging_keywords
        .iter()
        .any(|kw| normalized.contains(&normalize_name(kw)))
    {
        return IngredientClass::Packaging;
    }
    if let Some(vocab) = vocabulary
        && vocab
            .choices
            .iter()
            .any(|choice| normalize_name(choice) == normalized)
    {
        return IngredientClass::Choice;
    }
    IngredientClass::Base
}

/// Filter a resolved ingredient list down to what this sale deducts.
///
/// Non-composite names pass the base ingredients through unchanged. For
/// composite names, choice-eligible ingredients are kept only when selected,
/// scaled by the category's choice portion; packaging and base entries are
/// always kept at full quantity. Output order follows the resolver's list
/// order so audit logs stay reproducible.
pub fn parse_composite(
    display_name: &str,
    ingredients: &[ResolvedIngredient],
    vocabulary: Option<&CategoryVocabulary>,
    packaging_keywords: &[String],
) -> CompositeParse {
    let mut result = CompositeParse::default();
    let (_, clause) = split_display_name(display_name);

    // Recognize choice tokens against the declared vocabulary.
    let mut selected_normalized: Vec<String> = Vec::new();
    if let Some(clause) = clause {
        let tokens = parse_choice_clause(&clause);
        match vocabulary {
            Some(vocab) if vocab.is_composite => {
                for token in tokens {
                    let normalized = normalize_name(&token);
                    let known = vocab
                        .choices
                        .iter()
                        .any(|choice| normalize_name(choice) == normalized);
                    if known {
                        selected_normalized.push(normalized);
                        result.selected_choices.push(token);
                    } else {
                        result
                            .warnings
                            .push(format!("unrecognized choice '{token}'"));
                        result.unmatched_tokens.push(token);
                    }
                }
            }
            _ => {
                // A choice clause on a non-composite category: tokens are
                // recorded, nothing extra is deducted.
                for token in tokens {
                    result
                        .warnings
                        .push(format!("choice '{token}' on non-composite product"));
                    result.unmatched_tokens.push(token);
                }
            }
        }
    }

    let portion = vocabulary.map(|v| v.choice_portion).unwrap_or(1.0);
    for ingredient in ingredients {
        match classify_ingredient(&ingredient.ingredient_name, vocabulary, packaging_keywords) {
            IngredientClass::Packaging => {
                result.packaging_ingredients.push(ingredient.clone());
                result.applicable.push(ingredient.clone());
            }
            IngredientClass::Base => {
                result.base_ingredients.push(ingredient.clone());
                result.applicable.push(ingredient.clone());
            }
            IngredientClass::Choice => {
                let normalized = normalize_name(&ingredient.ingredient_name);
                if selected_normalized.contains(&normalized) {
                    let mut scaled = ingredient.clone();
                    scaled.quantity_per_unit *= portion;
                    result.applicable.push(scaled);
                }
                // Unselected choices are simply not deducted.
            }
        }
    }

    result
}
