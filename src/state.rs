use sqlx::PgPool;
use std::sync::Arc;

use crate::adapters::{Geocoder, ImageStore};
use crate::config::Config;

/// Per-process dependencies: constructed once in `main`, shared read-only
/// with every handler through the router state.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub geocoder: Arc<Geocoder>,
    pub image_store: Arc<ImageStore>,
}
