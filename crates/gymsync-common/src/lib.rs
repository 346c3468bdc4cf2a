pub mod errors;
pub mod protocol;

pub use errors::{ConfigError, GymSyncError, StatusError};
pub use protocol::{
    routes, CreateStatusRequest, ErrorBody, OkBody, StatusFields, StatusView, UserRequest,
    BANNER,
};

pub type Result<T> = std::result::Result<T, GymSyncError>;
