pub mod config;
pub mod migrate;
pub mod status;

pub use migrate::run_migrate;
pub use status::show_status;
