use std::sync::Arc;

use crate::config::ClientConfig;
use crate::external::auth::AuthClient;
use crate::external::session::Session;
use crate::services::controller::DashboardController;
use crate::services::sink::DashboardSink;

#[derive(Clone)]
pub struct AppState {
    pub config: ClientConfig,
    pub session: Session,
    pub auth: Arc<AuthClient>,
    pub controller: DashboardController,
    pub sink: Arc<dyn DashboardSink>,
}
