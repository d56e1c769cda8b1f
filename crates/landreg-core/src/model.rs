use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CatalogError;

/// Top-level catalog document (`land_registry.json` and friends).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogDocument {
    /// Contract version for this catalog format.
    pub catalog_version: String,
    /// Field schema shared by every application type.
    pub base_schema: BTreeMap<String, FieldSpec>,
    /// Application type definitions, in catalog order.
    pub types: Vec<ApplicationTypeDefinition>,
}

/// Grouping of application types as published by the registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationCategory {
    Core,
    Additional,
}

impl ApplicationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationCategory::Core => "core",
            ApplicationCategory::Additional => "additional",
        }
    }
}

impl fmt::Display for ApplicationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationCategory {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "core" => Ok(ApplicationCategory::Core),
            "additional" => Ok(ApplicationCategory::Additional),
            other => Err(CatalogError::InvalidCatalog(format!(
                "unknown category '{other}'"
            ))),
        }
    }
}

/// A single application type (e.g. "First Registrations").
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApplicationTypeDefinition {
    pub id: u32,
    pub category: ApplicationCategory,
    pub name: String,
    pub description: String,
    /// Form codes valid for this type; never empty.
    pub forms: Vec<String>,
    /// Type-specific fields and overrides of `base_schema` entries.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_schema: BTreeMap<String, FieldSpec>,
}

/// Schema entry for one application field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldSpec {
    /// Synthesizer id, e.g. `date.window`.
    pub synthesizer: String,
    #[serde(default)]
    pub required: bool,
    /// Generation constraints understood by the synthesizer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Fields of an application record that a schema may declare.
///
/// Declaration order is synthesis order: the completion date is derived from
/// the submission date, so it must come later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApplicationField {
    PropertyAddress,
    Applicants,
    SubmissionDate,
    ExpectedCompletionDate,
    Status,
    Priority,
    Lender,
    LoanAmount,
    ReasonForCorrection,
}

impl ApplicationField {
    pub const ALL: [ApplicationField; 9] = [
        ApplicationField::PropertyAddress,
        ApplicationField::Applicants,
        ApplicationField::SubmissionDate,
        ApplicationField::ExpectedCompletionDate,
        ApplicationField::Status,
        ApplicationField::Priority,
        ApplicationField::Lender,
        ApplicationField::LoanAmount,
        ApplicationField::ReasonForCorrection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationField::PropertyAddress => "property_address",
            ApplicationField::Applicants => "applicants",
            ApplicationField::SubmissionDate => "submission_date",
            ApplicationField::ExpectedCompletionDate => "expected_completion_date",
            ApplicationField::Status => "status",
            ApplicationField::Priority => "priority",
            ApplicationField::Lender => "lender",
            ApplicationField::LoanAmount => "loan_amount",
            ApplicationField::ReasonForCorrection => "reason_for_correction",
        }
    }

    /// Base fields are carried by every application; the rest are type-specific.
    pub fn is_base(&self) -> bool {
        !matches!(
            self,
            ApplicationField::Lender
                | ApplicationField::LoanAmount
                | ApplicationField::ReasonForCorrection
        )
    }
}

impl fmt::Display for ApplicationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationField {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ApplicationField::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| CatalogError::SchemaViolation(format!("unknown field '{value}'")))
    }
}
