//! Search parameters and their validation
//!
//! Every check here runs before the embedding backend or the store is
//! touched.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Options for filtered search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Maximum results to return (default: 10)
    pub limit: usize,
    /// Rows must score strictly above this (default: 0.0)
    pub min_similarity: f32,
    /// Allowed `ui_type` values; empty means any
    pub categories: Vec<String>,
    /// Include the raw content payload in results
    pub include_content: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            min_similarity: 0.0,
            categories: vec![],
            include_content: false,
        }
    }
}

impl SearchOptions {
    pub fn validate(&self) -> Result<()> {
        validate_limit(self.limit)?;
        validate_threshold(self.min_similarity)?;
        if self.categories.iter().any(|c| c.trim().is_empty()) {
            return Err(RagError::validation("category filter must not contain empty names"));
        }
        Ok(())
    }
}

pub fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(RagError::validation("query must not be empty"));
    }
    Ok(())
}

pub fn validate_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(RagError::validation("limit must be greater than 0"));
    }
    Ok(())
}

pub fn validate_threshold(min_similarity: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&min_similarity) {
        return Err(RagError::validation(format!(
            "min_similarity must be within [0, 1], got {}",
            min_similarity
        )));
    }
    Ok(())
}

/// Queries must be non-empty; weights, when given, must match them one to one
pub fn validate_multi_query<S: AsRef<str>>(queries: &[S], weights: Option<&[f32]>) -> Result<()> {
    if queries.is_empty() {
        return Err(RagError::validation("at least one query is required"));
    }
    for query in queries {
        validate_query(query.as_ref())?;
    }
    if let Some(weights) = weights {
        if weights.len() != queries.len() {
            return Err(RagError::validation(format!(
                "{} weights given for {} queries",
                weights.len(),
                queries.len()
            )));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(RagError::validation(format!(
                "weights must be finite and non-negative, got {}",
                bad
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.limit, 10);
        assert_eq!(options.min_similarity, 0.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(validate_query("   ").unwrap_err().is_validation());
        assert!(validate_limit(0).unwrap_err().is_validation());
        assert!(validate_threshold(1.5).unwrap_err().is_validation());
        assert!(validate_threshold(-0.1).unwrap_err().is_validation());
        assert!(validate_threshold(f32::NAN).unwrap_err().is_validation());
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(1.0).is_ok());
    }

    #[test]
    fn test_multi_query_weights() {
        assert!(validate_multi_query(&["a", "b"], Some(&[1.0, 0.5])).is_ok());
        assert!(validate_multi_query(&["a", "b"], None).is_ok());

        let err = validate_multi_query(&["a", "b"], Some(&[1.0])).unwrap_err();
        assert!(err.to_string().contains("1 weights given for 2 queries"));

        let empty: [&str; 0] = [];
        assert!(validate_multi_query(&empty, None).is_err());
        assert!(validate_multi_query(&["a", ""], None).is_err());
        assert!(validate_multi_query(&["a"], Some(&[f32::INFINITY])).is_err());
    }

    #[test]
    fn test_options_reject_blank_category() {
        let options = SearchOptions {
            categories: vec!["form".to_string(), " ".to_string()],
            ..SearchOptions::default()
        };
        assert!(options.validate().unwrap_err().is_validation());
    }
}
