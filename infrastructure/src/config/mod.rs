//! Configuration file loading for strata-council
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources. The priority order (highest to lowest):
//!
//! 1. `COUNCIL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./council.toml` or `./.council.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/strata-council/config.toml`
//! 5. Fallback: `~/.config/strata-council/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileApiConfig, FileConfig, FileDebateConfig, FilePanelConfig,
    FileParticipant,
};
pub use loader::ConfigLoader;
