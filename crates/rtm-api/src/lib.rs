mod error;
pub use error::ApiError;

mod types;
pub use types::{
    BatchCommand, BatchRequest, DeleteResponse, PodByNameRequest, PodListRequest, RestartResponse,
};

mod handler;
pub use handler::ApiHandler;

mod adapter;
pub use adapter::RuntimeApiAdapter;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpApi;

#[cfg(feature = "http")]
pub use axum;
