//! Product scope selection: everything, or one product.

use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

use crate::model::ReviewRecord;
use crate::{DelphiError, Result};

pub const ALL_PRODUCTS: &str = "All Products";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductScope {
  All,
  Product(String),
}

impl ProductScope {
  /// Resolve a selector against the products present in `records`.
  ///
  /// `All Products` (or `all`, any case) selects everything; otherwise the
  /// value must name an existing product exactly.
  pub fn parse(selector: &str, records: &[ReviewRecord]) -> Result<Self> {
    let selector = selector.trim();
    if selector.eq_ignore_ascii_case(ALL_PRODUCTS) || selector.eq_ignore_ascii_case("all") {
      return Ok(ProductScope::All);
    }

    if records.iter().any(|r| r.product == selector) {
      return Ok(ProductScope::Product(selector.to_string()));
    }

    Err(DelphiError::UnknownProduct {
      product: selector.to_string(),
      available: distinct_products(records).join(", "),
    })
  }

  pub fn is_all(&self) -> bool {
    matches!(self, ProductScope::All)
  }

  pub fn label(&self) -> &str {
    match self {
      ProductScope::All => ALL_PRODUCTS,
      ProductScope::Product(product) => product,
    }
  }

  pub fn contains(&self, record: &ReviewRecord) -> bool {
    match self {
      ProductScope::All => true,
      ProductScope::Product(product) => &record.product == product,
    }
  }

  /// Records in scope, in table order
  pub fn apply<'a>(&self, records: &'a [ReviewRecord]) -> Vec<&'a ReviewRecord> {
    records.iter().filter(|r| self.contains(r)).collect()
  }
}

impl fmt::Display for ProductScope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl Serialize for ProductScope {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(self.label())
  }
}

/// Sorted distinct product identifiers
pub fn distinct_products(records: &[ReviewRecord]) -> Vec<String> {
  records.iter().map(|r| r.product.as_str()).collect::<BTreeSet<_>>().into_iter().map(String::from).collect()
}

/// Selector choices: `All Products` followed by every product, sorted
pub fn product_options(records: &[ReviewRecord]) -> Vec<String> {
  std::iter::once(ALL_PRODUCTS.to_string()).chain(distinct_products(records)).collect()
}
