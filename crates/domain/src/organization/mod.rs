//! Organizational entities managed from the settings screens.

mod branch;
mod department;
mod listing;

use serde::{Deserialize, Serialize};

pub use branch::{Branch, BranchForm};
pub use department::{Department, DepartmentForm, DepartmentPayload};
pub use listing::{DEFAULT_PAGE_SIZE, ListView, Searchable};

/// Server-side identifier of an organizational record.
pub type RecordId = i64;

/// What a record form is being used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    /// Creating a new record.
    #[default]
    Add,
    /// Editing the record with this id.
    Edit(RecordId),
    /// Read-only details.
    View,
}

impl FormMode {
    /// Returns true if a record with `id` should be compared against the form
    /// in duplicate checks. In edit mode the edited record is skipped.
    #[must_use]
    pub fn compares_against(self, id: RecordId) -> bool {
        match self {
            Self::Edit(edited) => edited != id,
            Self::Add | Self::View => true,
        }
    }

    /// Returns true if the form accepts input.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        !matches!(self, Self::View)
    }
}

/// Body of a bulk delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    /// Records to delete.
    pub ids: Vec<RecordId>,
}
