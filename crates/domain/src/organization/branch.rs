//! Branch records.

use serde::{Deserialize, Serialize};

use super::{FormMode, RecordId, Searchable};
use crate::validation::{FieldRules, ORG_EMAIL, PHONE, TAX_CODE, ValidationErrors, ValidationIssue};

const PHONE_LEN: usize = 10;

/// A branch of the organization, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// Server identifier.
    pub id: RecordId,
    /// Display name, unique within the organization.
    pub branch_name: String,
    /// Province code.
    #[serde(default)]
    pub province: String,
    /// District code.
    #[serde(default)]
    pub district: String,
    /// Ward code.
    #[serde(default)]
    pub ward: String,
    /// Street address.
    #[serde(default)]
    pub specific_address: String,
    /// Contact email, unique.
    #[serde(default)]
    pub email: String,
    /// Contact phone, unique.
    #[serde(default)]
    pub phone_number: String,
    /// Tax registration code, unique.
    #[serde(default)]
    pub tax_code: String,
}

impl Searchable for Branch {
    fn search_text(&self) -> &str {
        &self.branch_name
    }
}

/// Create/edit form for a branch. Serialized as the request body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchForm {
    /// Display name.
    pub branch_name: String,
    /// Province code.
    pub province: String,
    /// District code.
    pub district: String,
    /// Ward code.
    pub ward: String,
    /// Street address.
    pub specific_address: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone_number: String,
    /// Tax registration code.
    pub tax_code: String,
}

impl BranchForm {
    /// Prefills the form from an existing record.
    #[must_use]
    pub fn from_branch(branch: &Branch) -> Self {
        Self {
            branch_name: branch.branch_name.clone(),
            province: branch.province.clone(),
            district: branch.district.clone(),
            ward: branch.ward.clone(),
            specific_address: branch.specific_address.clone(),
            email: branch.email.clone(),
            phone_number: branch.phone_number.clone(),
            tax_code: branch.tax_code.clone(),
        }
    }

    /// Checks field formats.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        FieldRules::new(&mut errors, "branchName", &self.branch_name)
            .required()
            .min_len(5)
            .max_len(255);
        FieldRules::new(&mut errors, "province", &self.province).required();
        FieldRules::new(&mut errors, "district", &self.district).required();
        FieldRules::new(&mut errors, "ward", &self.ward).required();
        FieldRules::new(&mut errors, "specificAddress", &self.specific_address)
            .required()
            .min_len(5)
            .max_len(255);
        FieldRules::new(&mut errors, "email", &self.email)
            .required()
            .pattern(&ORG_EMAIL);
        FieldRules::new(&mut errors, "phoneNumber", &self.phone_number)
            .required()
            .min_len(PHONE_LEN)
            .max_len(PHONE_LEN)
            .pattern(&PHONE);
        FieldRules::new(&mut errors, "taxCode", &self.tax_code)
            .required()
            .pattern(&TAX_CODE);
        errors.into_result()
    }

    /// Flags fields whose value is already used by another branch.
    ///
    /// Names and emails compare trimmed and case-insensitively; tax codes and
    /// phone numbers compare trimmed.
    #[must_use]
    pub fn find_duplicates(&self, rows: &[Branch], mode: FormMode) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let others: Vec<&Branch> = rows
            .iter()
            .filter(|branch| mode.compares_against(branch.id))
            .collect();

        let name = self.branch_name.trim().to_lowercase();
        let email = self.email.trim().to_lowercase();
        let tax_code = self.tax_code.trim();
        let phone = self.phone_number.trim();

        if others
            .iter()
            .any(|b| b.branch_name.trim().to_lowercase() == name)
        {
            errors.add("branchName", ValidationIssue::Duplicate);
        }
        if others.iter().any(|b| b.email.trim().to_lowercase() == email) {
            errors.add("email", ValidationIssue::Duplicate);
        }
        if others.iter().any(|b| b.tax_code.trim() == tax_code) {
            errors.add("taxCode", ValidationIssue::Duplicate);
        }
        if others.iter().any(|b| b.phone_number.trim() == phone) {
            errors.add("phoneNumber", ValidationIssue::Duplicate);
        }
        errors
    }

    /// Runs format checks and duplicate detection together.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate_against(
        &self,
        rows: &[Branch],
        mode: FormMode,
    ) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_default();
        errors.merge(self.find_duplicates(rows, mode));
        errors.into_result()
    }
}
