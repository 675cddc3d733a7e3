use std::sync::Arc;

use crate::api::{ApiClient, PersonalizeRequest};
use crate::errors::ApiError;
use crate::notify::Notifications;
use crate::session::SessionManager;

pub const EMPTY_JOB_DESCRIPTION: &str = "Please paste a job description.";

/// Cover-letter personalization flow. Pure request/response: validate
/// locally, call the gateway, report through the notification queue.
pub struct PersonalizeWorkflow {
    api: ApiClient,
    session: Arc<SessionManager>,
    notifications: Notifications,
}

impl PersonalizeWorkflow {
    pub fn new(api: ApiClient, session: Arc<SessionManager>, notifications: Notifications) -> Self {
        Self {
            api,
            session,
            notifications,
        }
    }

    /// Personalizes the user's default cover letter against a job
    /// description. An empty description is rejected before any network
    /// traffic happens.
    pub async fn personalize(&self, job_description: &str) -> Result<String, ApiError> {
        if job_description.trim().is_empty() {
            self.notifications.error(EMPTY_JOB_DESCRIPTION);
            return Err(ApiError::Validation(EMPTY_JOB_DESCRIPTION.to_string()));
        }

        // The base letter comes from the hydrated profile. Personalizing
        // without a stored default still works, it just starts from nothing.
        let base_letter = self
            .session
            .snapshot()
            .user
            .and_then(|user| user.default_cover_letter)
            .unwrap_or_default();

        let request = PersonalizeRequest {
            job_description: job_description.to_string(),
            base_letter,
        };

        match self.api.personalize_letter(&request).await {
            Ok(letter) => {
                self.notifications.success("Cover letter personalized!");
                Ok(letter.personalized_letter)
            }
            Err(err) => {
                self.notifications.error(err.to_string());
                Err(err)
            }
        }
    }
}
