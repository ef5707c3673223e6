//! Branch management use case.

use std::sync::Arc;

use hrm_domain::{Branch, BranchForm, FormMode, RecordId};
use tracing::info;

use super::ResourceClient;
use crate::error::ApplicationResult;
use crate::ports::{HttpClient, Notifier};

/// Lists, creates, edits and deletes branches.
///
/// Forms are checked for format errors and for values already used by
/// another branch before any request is sent.
pub struct BranchService<C> {
    resource: ResourceClient<C>,
    notifier: Arc<dyn Notifier>,
}

impl<C: HttpClient> BranchService<C> {
    /// Creates the service for the API at `base_url`.
    pub fn new(client: C, base_url: &str, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            resource: ResourceClient::new(client, base_url, "branch"),
            notifier,
        }
    }

    /// Fetches every branch.
    ///
    /// # Errors
    ///
    /// Returns an error if the list could not be loaded.
    pub async fn list(&self) -> ApplicationResult<Vec<Branch>> {
        self.resource
            .list()
            .await
            .inspect_err(|e| self.notifier.error("Could not load branches", &e.to_string()))
    }

    /// Creates a branch, rejecting values already used in `existing`.
    ///
    /// # Errors
    ///
    /// Returns the failing fields, or the API error.
    pub async fn create(&self, form: &BranchForm, existing: &[Branch]) -> ApplicationResult<()> {
        form.validate_against(existing, FormMode::Add)?;
        self.resource
            .create(form)
            .await
            .inspect_err(|e| self.notifier.error("Could not create branch", &e.to_string()))?;
        info!(name = %form.branch_name, "branch created");
        self.notifier
            .success("Branch created", &format!("{} was added.", form.branch_name));
        Ok(())
    }

    /// Updates branch `id`; the branch itself is ignored in duplicate checks.
    ///
    /// # Errors
    ///
    /// Returns the failing fields, or the API error.
    pub async fn update(
        &self,
        id: RecordId,
        form: &BranchForm,
        existing: &[Branch],
    ) -> ApplicationResult<()> {
        form.validate_against(existing, FormMode::Edit(id))?;
        self.resource
            .update(id, form)
            .await
            .inspect_err(|e| self.notifier.error("Could not update branch", &e.to_string()))?;
        info!(id, "branch updated");
        self.notifier
            .success("Branch updated", &format!("{} was saved.", form.branch_name));
        Ok(())
    }

    /// Deletes the given branches.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    pub async fn delete(&self, ids: Vec<RecordId>) -> ApplicationResult<()> {
        let count = ids.len();
        self.resource
            .delete(ids)
            .await
            .inspect_err(|e| self.notifier.error("Could not delete branches", &e.to_string()))?;
        info!(count, "branches deleted");
        self.notifier
            .success("Branches deleted", &format!("{count} branch(es) removed."));
        Ok(())
    }
}
