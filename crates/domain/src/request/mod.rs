//! Outgoing request types

mod method;
mod spec;

pub use method::HttpMethod;
pub use spec::{ApiRequest, AUTHORIZATION, CONTENT_TYPE, JSON_CONTENT_TYPE};
