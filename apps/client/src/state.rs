use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::notify::Notifications;
use crate::session::SessionManager;
use crate::token_store::TokenStore;
use crate::workflows::personalize::PersonalizeWorkflow;
use crate::workflows::profile::ProfileWorkflow;
use crate::workflows::submission::SubmissionWorkflow;

/// Everything the shell needs, wired once at startup.
///
/// The token store is shared deliberately: the session manager is its only
/// writer, the gateway its only reader. Session and notification state live
/// behind their own narrow accessors — nothing mutates them from outside.
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub session: Arc<SessionManager>,
    pub notifications: Notifications,
    pub submission: SubmissionWorkflow,
    pub personalize: PersonalizeWorkflow,
    pub profile: ProfileWorkflow,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let tokens = TokenStore::new(config.token_path.clone());
        let api = ApiClient::new(&config, tokens.clone());
        let session = Arc::new(SessionManager::new(api.clone(), tokens));
        let notifications = Notifications::new();

        AppState {
            submission: SubmissionWorkflow::new(api.clone(), notifications.clone()),
            personalize: PersonalizeWorkflow::new(
                api.clone(),
                session.clone(),
                notifications.clone(),
            ),
            profile: ProfileWorkflow::new(api.clone(), session.clone(), notifications.clone()),
            config,
            api,
            session,
            notifications,
        }
    }
}
