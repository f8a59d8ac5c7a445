pub mod asa;
pub mod http;

// Re-export commonly used types
pub use asa::AsaClient;
pub use http::{HttpFetch, HttpResponse, ReqwestFetcher};
