//! Named extra scopes callers may append to the base scope.
//!
//! Requests carry `(name, args)` pairs; each name resolves to a typed
//! function here. Unknown names fail before the store is queried.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogSearchError, Result};
use crate::filter::{RangeValue, Scalar};
use crate::store::scope::{ScopePredicate, StoreScope};

/// A caller-requested scope: registry name plus positional arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraScope {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Scalar>,
}

impl ExtraScope {
    pub fn new<S: Into<String>>(name: S, args: Vec<Scalar>) -> Self {
        ExtraScope {
            name: name.into(),
            args,
        }
    }
}

/// Function applying a named scope to a base scope.
pub type ScopeFn = Arc<dyn Fn(StoreScope, &[Scalar]) -> Result<StoreScope> + Send + Sync>;

/// Registry of named scopes.
#[derive(Clone, Default)]
pub struct ScopeRegistry {
    scopes: HashMap<String, ScopeFn>,
}

impl ScopeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        ScopeRegistry::default()
    }

    /// A registry with the built-in scopes: `in_taxon(taxon)`,
    /// `with_attribute(field, value)`, `attribute_between(field, low, high)`
    /// and `name_contains(text)`.
    pub fn with_defaults() -> Self {
        let mut registry = ScopeRegistry::new();
        registry.register("in_taxon", |scope, args| {
            expect_arity("in_taxon", args, 1)?;
            Ok(scope.in_taxon(args[0].to_string()))
        });
        registry.register("with_attribute", |scope, args| {
            expect_arity("with_attribute", args, 2)?;
            Ok(scope.with(ScopePredicate::AttributeEquals {
                field: args[0].to_string(),
                value: args[1].clone(),
            }))
        });
        registry.register("attribute_between", |scope, args| {
            expect_arity("attribute_between", args, 3)?;
            let range = RangeValue::new(args[1].clone(), args[2].clone()).ok_or_else(|| {
                CatalogSearchError::invalid_argument(format!(
                    "attribute_between: {}..{} is not an ordered range",
                    args[1], args[2]
                ))
            })?;
            Ok(scope.with(ScopePredicate::AttributeWithin {
                field: args[0].to_string(),
                range,
            }))
        });
        registry.register("name_contains", |scope, args| {
            expect_arity("name_contains", args, 1)?;
            Ok(scope.with(ScopePredicate::NameContains(args[0].to_string())))
        });
        registry
    }

    /// Register (or replace) a named scope.
    pub fn register<S, F>(&mut self, name: S, scope_fn: F)
    where
        S: Into<String>,
        F: Fn(StoreScope, &[Scalar]) -> Result<StoreScope> + Send + Sync + 'static,
    {
        self.scopes.insert(name.into(), Arc::new(scope_fn));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scopes.contains_key(name)
    }

    /// Apply one extra scope.
    pub fn apply(&self, scope: StoreScope, extra: &ExtraScope) -> Result<StoreScope> {
        let scope_fn = self
            .scopes
            .get(&extra.name)
            .ok_or_else(|| CatalogSearchError::unknown_scope(extra.name.clone()))?;
        scope_fn(scope, &extra.args)
    }

    /// Apply extra scopes in the order given.
    pub fn apply_all(&self, scope: StoreScope, extras: &[ExtraScope]) -> Result<StoreScope> {
        extras
            .iter()
            .try_fold(scope, |scope, extra| self.apply(scope, extra))
    }
}

impl fmt::Debug for ScopeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.scopes.keys().collect();
        names.sort();
        f.debug_struct("ScopeRegistry")
            .field("scopes", &names)
            .finish()
    }
}

fn expect_arity(name: &str, args: &[Scalar], arity: usize) -> Result<()> {
    if args.len() == arity {
        Ok(())
    } else {
        Err(CatalogSearchError::invalid_argument(format!(
            "{name} takes {arity} argument(s), got {}",
            args.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_scopes_apply_in_order() {
        let registry = ScopeRegistry::with_defaults();
        let scope = registry
            .apply_all(
                StoreScope::new().active(),
                &[
                    ExtraScope::new("in_taxon", vec![Scalar::from("Clothing")]),
                    ExtraScope::new(
                        "attribute_between",
                        vec![Scalar::from("price"), Scalar::Integer(10), Scalar::Integer(20)],
                    ),
                ],
            )
            .unwrap();

        assert_eq!(scope.predicates().len(), 3);
        assert_eq!(scope.predicates()[0], ScopePredicate::Active);
        assert_eq!(
            scope.predicates()[1],
            ScopePredicate::InTaxon("Clothing".to_string())
        );
        assert!(matches!(
            scope.predicates()[2],
            ScopePredicate::AttributeWithin { .. }
        ));
    }

    #[test]
    fn test_unknown_scope_fails() {
        let registry = ScopeRegistry::with_defaults();
        let result = registry.apply(StoreScope::new(), &ExtraScope::new("on_sale", vec![]));
        assert!(matches!(result, Err(CatalogSearchError::UnknownScope(name)) if name == "on_sale"));
    }

    #[test]
    fn test_bad_arguments_fail() {
        let registry = ScopeRegistry::with_defaults();
        let result = registry.apply(StoreScope::new(), &ExtraScope::new("in_taxon", vec![]));
        assert!(matches!(result, Err(CatalogSearchError::InvalidArgument(_))));

        let result = registry.apply(
            StoreScope::new(),
            &ExtraScope::new(
                "attribute_between",
                vec![Scalar::from("price"), Scalar::Integer(20), Scalar::Integer(10)],
            ),
        );
        assert!(matches!(result, Err(CatalogSearchError::InvalidArgument(_))));
    }

    #[test]
    fn test_custom_scope_registration() {
        let mut registry = ScopeRegistry::new();
        assert!(!registry.contains("featured"));
        registry.register("featured", |scope, _args| {
            Ok(scope.with(ScopePredicate::AttributeEquals {
                field: "featured".to_string(),
                value: Scalar::Boolean(true),
            }))
        });
        assert!(registry.contains("featured"));

        let scope = registry
            .apply(StoreScope::new(), &ExtraScope::new("featured", vec![]))
            .unwrap();
        assert_eq!(scope.predicates().len(), 1);
        assert!(format!("{registry:?}").contains("featured"));
    }
}
