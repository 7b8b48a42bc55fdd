//! Arena definition set for a configuration

use std::path::Path;

use crate::arena::{DefinitionError, MapRegistry, builtin_arenas, load_arenas_from_dir};
use dodger_types::AppConfig;

/// Built-in definitions, overridden per stage by the configured directory
pub fn load_registry(config: &AppConfig) -> Result<MapRegistry, DefinitionError> {
    let mut arenas = builtin_arenas()?;

    if let Some(dir) = config.definitions_directory.as_deref() {
        let custom = load_arenas_from_dir(Path::new(dir))?;
        tracing::info!(dir, count = custom.len(), "Loaded custom arena definitions");
        arenas.extend(custom);
    }

    Ok(MapRegistry::new(arenas))
}
