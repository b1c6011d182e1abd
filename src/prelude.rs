pub use crate::base::{
    config::Config,
    types::{Err, RelayError, Res, Submission, Void},
};
pub use crate::runtime::Runtime;
pub use anyhow::anyhow;
pub use tracing::{debug, error, info, instrument, warn};
