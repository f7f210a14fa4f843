pub mod config;
pub mod error;
pub mod host;
pub mod listing;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use host::{HostMessage, HostSink};
pub use listing::{Listing, Row, SourceLocation};
