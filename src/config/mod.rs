#[allow(clippy::module_inception)]
pub mod config;

pub use self::config::{
    load_config, AppConfig, HttpConfig, PageErrorPolicy, SaveMode, ScrapeConfig,
};
