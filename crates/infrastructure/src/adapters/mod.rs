//! Adapters implementing the application ports over real services.

mod notifier;
mod reqwest_client;
mod session_api;

pub use notifier::TracingNotifier;
pub use reqwest_client::ReqwestHttpClient;
pub use session_api::HttpSessionApi;
