use std::env;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

/// Avatars are capped at 5 MiB; event images default higher but stay
/// configurable through `EVENT_IMAGE_MAX_BYTES`.
pub const AVATAR_MAX_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_EVENT_IMAGE_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Square side avatars are resized to after the center crop.
pub const AVATAR_SIZE: u32 = 512;

const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_version: String,
    /// Search endpoint of the geocoding provider.
    pub geocoder_url: String,
    /// Upload/delete endpoint of the image store.
    pub image_store_url: String,
    pub image_store_key: String,
    /// Public CDN base; stored image URLs are `<cdn_domain>/<id>/`.
    pub cdn_domain: String,
    /// Avatar assigned to freshly registered profiles.
    pub default_avatar_url: String,
    pub event_image_max_bytes: usize,
    /// Applied to every outbound adapter call so a slow collaborator
    /// cannot hold a request worker indefinitely.
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let cdn_domain = env::var("CDN_DOMAIN")
            .unwrap_or_else(|_| "https://cdn.eventhub.example".to_string());
        let default_avatar_url = env::var("DEFAULT_AVATAR_URL")
            .unwrap_or_else(|_| format!("{}/default-avatar/", cdn_domain.trim_end_matches('/')));

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/eventhub".to_string()),
            app_version: env::var("APP_VERSION").unwrap_or_else(|_| "1.0".to_string()),
            geocoder_url: env::var("GEOCODER_URL")
                .unwrap_or_else(|_| DEFAULT_GEOCODER_URL.to_string()),
            image_store_url: env::var("IMAGE_STORE_URL")
                .unwrap_or_else(|_| "https://upload.eventhub.example/files".to_string()),
            image_store_key: env::var("IMAGE_STORE_KEY").unwrap_or_default(),
            cdn_domain,
            default_avatar_url,
            event_image_max_bytes: env::var("EVENT_IMAGE_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_EVENT_IMAGE_MAX_BYTES),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }
}
