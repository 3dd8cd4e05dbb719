pub mod arc56;
pub mod metadata;
pub mod schema;
pub mod types;

pub use arc56::{AppSpec, Arc56Error};
pub use metadata::{APP_DEPLOY_NOTE_DAPP, AppDeployMetadata, MetadataError};
pub use schema::{AppSchema, StateSchema};
pub use types::*;
