pub mod api;
pub mod config;
pub mod dsv;
pub mod panel;
pub mod table;
pub mod util;

pub use api::{Api, ApiError, FetchError, Mode};
pub use dsv::{parse, Record, Table, Value};
