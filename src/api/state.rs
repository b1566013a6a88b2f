use std::sync::Arc;

use crate::auth::AuthenticationService;
use crate::config::Config;
use crate::crypto::keys::VerificationKeyStore;

#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<VerificationKeyStore>,
    pub auth: AuthenticationService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(keys: VerificationKeyStore, config: Config) -> Self {
        let keys = Arc::new(keys);
        AppState {
            auth: AuthenticationService::new(keys.clone()),
            keys,
            config: Arc::new(config),
        }
    }
}
