//! Streamcue Core - shared resources, data types, and error handling

pub mod database;
pub mod error;
pub mod saver;
pub mod settings;
pub mod surface;
pub mod types;

pub use database::{Database, TrackRecord};
pub use error::{Error, Result};
pub use saver::Saver;
pub use settings::Settings;
pub use surface::OutputSurface;
pub use types::{ClientStatus, FormattedOutput, MapSearchResult, ModSet, NowPlayingEvent, TokenMap};
