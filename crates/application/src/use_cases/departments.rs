//! Department management use case.

use std::sync::Arc;

use hrm_domain::{Department, DepartmentForm, RecordId};
use tracing::info;

use super::ResourceClient;
use crate::error::ApplicationResult;
use crate::ports::{HttpClient, Notifier};

/// Lists, creates, edits and deletes departments.
pub struct DepartmentService<C> {
    resource: ResourceClient<C>,
    notifier: Arc<dyn Notifier>,
}

impl<C: HttpClient> DepartmentService<C> {
    /// Creates the service for the API at `base_url`.
    pub fn new(client: C, base_url: &str, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            resource: ResourceClient::new(client, base_url, "department"),
            notifier,
        }
    }

    /// Fetches every department.
    ///
    /// # Errors
    ///
    /// Returns an error if the list could not be loaded.
    pub async fn list(&self) -> ApplicationResult<Vec<Department>> {
        self.resource
            .list()
            .await
            .inspect_err(|e| self.notifier.error("Could not load departments", &e.to_string()))
    }

    /// Creates a department.
    ///
    /// # Errors
    ///
    /// Returns the failing fields, or the API error.
    pub async fn create(&self, form: &DepartmentForm) -> ApplicationResult<()> {
        let payload = form.to_payload()?;
        self.resource
            .create(&payload)
            .await
            .inspect_err(|e| self.notifier.error("Could not create department", &e.to_string()))?;
        info!(name = %payload.department_name, "department created");
        self.notifier.success(
            "Department created",
            &format!("{} was added.", payload.department_name),
        );
        Ok(())
    }

    /// Updates department `id`.
    ///
    /// # Errors
    ///
    /// Returns the failing fields, or the API error.
    pub async fn update(&self, id: RecordId, form: &DepartmentForm) -> ApplicationResult<()> {
        let payload = form.to_payload()?;
        self.resource
            .update(id, &payload)
            .await
            .inspect_err(|e| self.notifier.error("Could not update department", &e.to_string()))?;
        info!(id, "department updated");
        self.notifier.success(
            "Department updated",
            &format!("{} was saved.", payload.department_name),
        );
        Ok(())
    }

    /// Deletes the given departments.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    pub async fn delete(&self, ids: Vec<RecordId>) -> ApplicationResult<()> {
        let count = ids.len();
        self.resource
            .delete(ids)
            .await
            .inspect_err(|e| self.notifier.error("Could not delete departments", &e.to_string()))?;
        info!(count, "departments deleted");
        self.notifier
            .success("Departments deleted", &format!("{count} department(s) removed."));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ApplicationError;
    use crate::testing::{Authorized, FakeApi, RecordingNotifier};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn service(api: &Arc<FakeApi>) -> DepartmentService<Authorized> {
        DepartmentService::new(
            Authorized(Arc::clone(api)),
            "http://api.test",
            Arc::new(RecordingNotifier::default()),
        )
    }

    fn form() -> DepartmentForm {
        DepartmentForm {
            department_name: "Human Resources".to_string(),
            level: "1".to_string(),
            branch_id: "3".to_string(),
            parent_department_id: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_sends_typed_payload() {
        let api = Arc::new(FakeApi::accepting("t"));

        service(&api).create(&form()).await.unwrap();

        let request = &api.requests()[0];
        assert_eq!(request.url, "http://api.test/department");
        let body: serde_json::Value =
            serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"departmentName": "Human Resources", "level": 1, "branchId": 3})
        );
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let api = Arc::new(FakeApi::accepting("t"));
        let mut form = form();
        form.department_name = "HR 2".to_string();

        let error = service(&api).create(&form).await.unwrap_err();

        assert!(matches!(error, ApplicationError::Validation(_)));
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn test_list_departments() {
        let api = Arc::new(FakeApi::accepting("t"));
        api.respond(
            "http://api.test/department",
            200,
            json!({"data": [{"id": 4, "departmentName": "Finance", "level": 2, "branchId": 3}]}),
        );

        let rows = service(&api).list().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].department_name, "Finance");
        assert_eq!(rows[0].parent_department_id, None);
    }
}
