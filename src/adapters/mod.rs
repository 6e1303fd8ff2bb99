pub mod geocoding;
pub mod image_store;

pub use geocoding::{GeocodeError, Geocoder};
pub use image_store::{ImageStore, StoreError, StoredImage};
