//! Department records.

use serde::{Deserialize, Serialize};

use super::{RecordId, Searchable};
use crate::validation::{DIGITS, FieldRules, NO_DIGITS, ValidationErrors, ValidationIssue};

/// A department, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    /// Server identifier.
    pub id: RecordId,
    /// Display name.
    pub department_name: String,
    /// Depth in the department hierarchy.
    #[serde(default)]
    pub level: u32,
    /// Owning branch.
    #[serde(default)]
    pub branch_id: Option<RecordId>,
    /// Parent department, absent for top-level departments.
    #[serde(default)]
    pub parent_department_id: Option<RecordId>,
}

impl Searchable for Department {
    fn search_text(&self) -> &str {
        &self.department_name
    }
}

/// Department form as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DepartmentForm {
    /// Display name, may not contain digits.
    pub department_name: String,
    /// Hierarchy level, digits only.
    pub level: String,
    /// Owning branch id, digits only.
    pub branch_id: String,
    /// Parent department id, digits only when present.
    pub parent_department_id: String,
}

/// Request body for creating or updating a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentPayload {
    /// Display name.
    pub department_name: String,
    /// Hierarchy level.
    pub level: u32,
    /// Owning branch.
    pub branch_id: RecordId,
    /// Parent department.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_department_id: Option<RecordId>,
}

impl DepartmentForm {
    /// Checks field formats.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        FieldRules::new(&mut errors, "departmentName", &self.department_name)
            .required()
            .min_len(5)
            .max_len(255)
            .pattern(&NO_DIGITS);
        for (field, value) in [("level", &self.level), ("branchId", &self.branch_id)] {
            FieldRules::new(&mut errors, field, value)
                .required()
                .max_len(10)
                .pattern(&DIGITS);
        }
        FieldRules::new(&mut errors, "parentDepartmentId", &self.parent_department_id)
            .max_len(10)
            .pattern(&DIGITS);
        errors.into_result()
    }

    /// Validates the form and converts it into a request body.
    ///
    /// # Errors
    ///
    /// Returns the failing fields, including numbers that overflow.
    pub fn to_payload(&self) -> Result<DepartmentPayload, ValidationErrors> {
        self.validate()?;

        let mut errors = ValidationErrors::new();
        let level = parse_field(&mut errors, "level", &self.level);
        let branch_id = parse_field(&mut errors, "branchId", &self.branch_id);
        let parent_department_id = if self.parent_department_id.is_empty() {
            None
        } else {
            parse_field(&mut errors, "parentDepartmentId", &self.parent_department_id)
        };

        match (level, branch_id) {
            (Some(level), Some(branch_id)) if errors.is_empty() => Ok(DepartmentPayload {
                department_name: self.department_name.clone(),
                level,
                branch_id,
                parent_department_id,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_field<T: std::str::FromStr>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
) -> Option<T> {
    let parsed = value.parse().ok();
    if parsed.is_none() {
        errors.add(field, ValidationIssue::Pattern);
    }
    parsed
}
