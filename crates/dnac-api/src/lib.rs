// dnac-api: Async Rust client for the Cisco DNA Center REST API

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod geo;
pub mod groups;
pub mod outcome;
pub mod session;
pub mod settings;
pub mod task;
pub mod transport;

pub use auth::AuthFlow;
pub use client::DnacClient;
pub use config::ControllerConfig;
pub use error::Error;
pub use geo::{Geocoder, Location, NominatimGeocoder};
pub use groups::GLOBAL_GROUP_ID;
pub use outcome::Outcome;
pub use session::Session;
pub use settings::{CommonSetting, SettingKind, SettingState};
pub use task::{PollConfig, TaskNamespace, TaskState};
pub use transport::{TlsMode, TransportConfig};
