//! Load a flat list of records, keep the ones with a visible label, sort and
//! group them by list id, and publish the outcome as observable state.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod loader;
pub mod state;
pub mod ui;

pub use app::GroupListApp;
pub use data::model::{Group, PipelineResult, Record};
pub use data::parser::{RecordFormat, parse, parse_as};
pub use data::pipeline::transform;
pub use error::{LoadError, ParseError};
pub use loader::{ByteSource, DirSource, LoadHandle, Loader, StaticSource};
pub use state::{LoadState, StateStore, Subscription};
