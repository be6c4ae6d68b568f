//! Seeds a small hotel schema in SQLite and renders it as Markdown.

pub mod db;
pub mod error;
pub mod model;
pub mod report;
pub mod seed;

pub use db::{get_config, Config, HotelContext, SeedBatch, Table};
pub use error::{HotelError, Result};
pub use report::write_report;
pub use seed::add_data;

/// Remove every row from every table.
pub fn drop_data(ctx: &mut HotelContext) -> Result<()> {
    ctx.drop_all()
}
