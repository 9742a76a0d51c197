//! Predicates restricting which rows an operation affects

use crate::error::{Result, StoreError};
use crate::value::Value;

/// A predicate for [`update_cell`](crate::DataStore::update_cell).
///
/// Either an equality conjunction over named columns (each pair becomes a
/// bound `column = ?` term joined with ` AND `) or an opaque raw SQL
/// predicate passed through unmodified. The two forms are mutually
/// exclusive by construction, so a caller can never supply both.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Conjunction of `column = value` equality terms, in order
    Equality(Vec<(String, Value)>),
    /// Raw SQL predicate text, used verbatim as the WHERE-clause body
    Raw(String),
}

impl Condition {
    /// Equality condition on a single column
    pub fn key(column: &str, value: impl Into<Value>) -> Self {
        Condition::Equality(vec![(column.to_string(), value.into())])
    }

    /// Equality condition over several columns, combined with AND
    pub fn keys<N, V, I>(pairs: I) -> Self
    where
        N: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (N, V)>,
    {
        Condition::Equality(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// Raw SQL predicate
    pub fn raw(predicate: &str) -> Self {
        Condition::Raw(predicate.to_string())
    }

    /// Build the WHERE-clause body and its bound parameters.
    ///
    /// Fails with [`StoreError::InvalidArgument`] when the condition is
    /// effectively absent (empty equality map or blank raw text), before
    /// any database interaction.
    pub fn to_where_clause(&self) -> Result<(String, Vec<Value>)> {
        match self {
            Condition::Equality(pairs) => {
                if pairs.is_empty() {
                    return Err(StoreError::InvalidArgument(
                        "condition requires at least one column".to_string(),
                    ));
                }
                let clause = pairs
                    .iter()
                    .map(|(name, _)| format!("{name} = ?"))
                    .collect::<Vec<_>>()
                    .join(" AND ");
                let params = pairs.iter().map(|(_, value)| value.clone()).collect();
                Ok((clause, params))
            }
            Condition::Raw(predicate) => {
                if predicate.trim().is_empty() {
                    return Err(StoreError::InvalidArgument(
                        "raw condition must not be blank".to_string(),
                    ));
                }
                Ok((predicate.clone(), Vec::new()))
            }
        }
    }
}
