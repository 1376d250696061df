pub mod loader;
pub mod resolution_config;

pub use loader::{ConfigFormat, parse_config_content, parse_config_file};
pub use resolution_config::{
    ConfigFile, ConfigOverrides, DEFAULT_CACHE_DIRECTORY, HandoffConfig, ResolutionConfig,
    SvnConfig,
};
