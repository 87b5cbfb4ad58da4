//! Time-delayed deletion of chat messages.
//! Each tracked channel carries a TTL; messages seen there are scheduled for
//! deletion at `seen + ttl` and a 10-second background sweep drains whatever
//! has expired. Persistent storage via [`store::ConfigStore`] (JSON file by
//! default), platform access via the [`backend`] traits.

pub mod backend;
pub mod error;
pub mod parse;
pub mod service;
pub mod store;
pub mod store_file;
pub mod store_memory;
pub mod types;

pub use backend::{
    BackendError, ChannelDirectory, ChannelKind, FetchedMessage, MessageBackend, ResolvedChannel,
};
pub use error::{Error, Result};
pub use service::{SWEEP_INTERVAL, SweeperService};
pub use types::{ChannelConfig, RemoveReport, TrackedChannel};
