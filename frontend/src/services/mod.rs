pub mod api;
pub mod storage;

pub use api::{ApiService, ClientError};
pub use storage::LocalTokenStorage;
