pub mod api;

pub use api::FunkitApiClient;
