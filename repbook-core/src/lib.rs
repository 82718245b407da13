pub mod db;
pub mod error;
pub mod history;
pub mod logging;
pub mod records;
pub mod templates;
pub mod tracker;

pub use error::{Error, ErrorKind, Result};
pub use tracker::Tracker;
