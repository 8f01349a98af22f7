//! Pre-Transaction Validator
//!
//! Read-only gate the POS runs before finalizing a sale. A line item whose
//! product resolves nowhere is blocking; template fallback and unmapped
//! ingredients are warnings; checkout is never stalled by a data-quality
//! issue, but every compromise is logged and discoverable via the audit
//! service.

use shared::SaleInput;
use shared::response::{BlockedProduct, ValidationResult};
use tracing::info;

use crate::mixmatch::split_display_name;
use crate::resolver::{IngredientSource, RecipeResolver};

pub struct PreTransactionValidator {
    resolver: RecipeResolver,
}

impl PreTransactionValidator {
    pub fn new(resolver: RecipeResolver) -> Self {
        Self { resolver }
    }

    /// Check that every proposed line item has a usable resolution path.
    /// Performs no writes.
    pub async fn validate(&self, sale: &SaleInput) -> ValidationResult {
        let mut result = ValidationResult::passed();

        for item in &sale.items {
            let (base_name, _) = split_display_name(&item.name);
            match self
                .resolver
                .resolve(&sale.store_id, item.product_id.as_deref(), &base_name)
                .await
            {
                Ok(resolved) => {
                    if resolved.source == IngredientSource::TemplateFallback {
                        result.warnings.push(format!(
                            "'{}' will deduct via template fallback",
                            item.name
                        ));
                    }
                    for warning in resolved.warnings {
                        result.warnings.push(format!("'{}': {warning}", item.name));
                    }
                }
                Err(e) => {
                    result.blocked_products.push(BlockedProduct {
                        product_id: item.product_id.clone(),
                        product_name: item.name.clone(),
                        issues: vec![e.to_string()],
                    });
                }
            }
        }

        result.can_proceed = result.blocked_products.is_empty();
        info!(
            transaction_id = %sale.transaction_id,
            store_id = %sale.store_id,
            can_proceed = result.can_proceed,
            blocked = result.blocked_products.len(),
            warnings = result.warnings.len(),
            "pre-transaction validation finished"
        );
        result
    }
}
