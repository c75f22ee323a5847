mod defaults;
mod io;
mod schema;
mod validate;

pub use io::load_config;
pub use schema::{Alerts, Config, Live};
pub use validate::ConfigError;
