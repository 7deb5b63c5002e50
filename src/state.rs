use std::sync::Arc;

use crate::config::Config;
use crate::integrations::{NotificationSink, RecordSink};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub records: Arc<dyn RecordSink>,
    pub notifications: Arc<dyn NotificationSink>,
}
