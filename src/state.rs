use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::db::Store;

/// Process-wide resources created once at startup and shared with every
/// worker through `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub keys: TokenKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, keys: TokenKeys) -> Self {
        Self { store, keys }
    }
}
