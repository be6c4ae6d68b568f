mod config;
mod conn;
mod context;
mod schema;

pub use config::{
    default_settings_path, get_config, Config, CONNECTION_STRING_VAR, SETTINGS_FILE,
};
pub use context::{HotelContext, SeedBatch, Table};
pub use schema::create_schema;
