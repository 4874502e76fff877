// SPDX-License-Identifier: MIT
// Copyright 2026 GreenMatch Authors

//! Static reference catalogs used as in-context guidance for generation.
//!
//! Persona archetypes describe values, constraints, and attitudes toward
//! technology; the company list names sustainable products a challenge can
//! point at. Neither is stored per-user.

use serde_json::Value;
use std::fs;
use std::path::Path;

/// Persona and company reference data, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Catalog {
    personas: Value,
    companies: Value,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            personas: Value::Array(vec![]),
            companies: Value::Array(vec![]),
        }
    }
}

impl Catalog {
    /// Load both catalogs from JSON files.
    pub fn load_from_files<P: AsRef<Path>>(
        personas_path: P,
        companies_path: P,
    ) -> Result<Self, CatalogError> {
        let personas = fs::read_to_string(personas_path.as_ref())
            .map_err(|e| CatalogError::IoError(e.to_string()))?;
        let companies = fs::read_to_string(companies_path.as_ref())
            .map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&personas, &companies)
    }

    /// Load both catalogs from JSON strings.
    pub fn load_from_json(personas: &str, companies: &str) -> Result<Self, CatalogError> {
        let personas: Value = serde_json::from_str(personas)
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;
        let companies: Value = serde_json::from_str(companies)
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;
        Ok(Self {
            personas,
            companies,
        })
    }

    pub fn personas(&self) -> &Value {
        &self.personas
    }

    pub fn companies(&self) -> &Value {
        &self.companies
    }

    pub fn persona_count(&self) -> usize {
        self.personas.as_array().map(Vec::len).unwrap_or(0)
    }

    pub fn company_count(&self) -> usize {
        self.companies.as_array().map(Vec::len).unwrap_or(0)
    }
}

/// Errors from catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    IoError(String),

    #[error("Failed to parse catalog JSON: {0}")]
    ParseError(String),
}
