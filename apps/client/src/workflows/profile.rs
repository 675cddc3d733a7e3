use std::sync::Arc;

use crate::api::ApiClient;
use crate::errors::ApiError;
use crate::models::user::ProfileUpdate;
use crate::notify::Notifications;
use crate::session::SessionManager;

/// Profile update flow: push the edit, then re-fetch so the session reflects
/// what the backend actually stored. The locally submitted patch is never
/// written into the session directly.
pub struct ProfileWorkflow {
    api: ApiClient,
    session: Arc<SessionManager>,
    notifications: Notifications,
}

impl ProfileWorkflow {
    pub fn new(api: ApiClient, session: Arc<SessionManager>, notifications: Notifications) -> Self {
        Self {
            api,
            session,
            notifications,
        }
    }

    pub async fn update(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        match self.api.update_profile(update).await {
            Ok(_) => {
                self.session.refetch_user().await;
                self.notifications.success("Profile updated successfully!");
                Ok(())
            }
            Err(err) => {
                self.notifications.error(err.to_string());
                Err(err)
            }
        }
    }
}
