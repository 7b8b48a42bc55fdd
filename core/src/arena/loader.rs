//! Arena definition loading
//!
//! Load stage definitions from TOML files. A directory is searched
//! recursively; every `*.toml` file holds exactly one stage.

use std::fs;
use std::path::{Path, PathBuf};

use super::ArenaConfig;
use super::error::DefinitionError;

/// Definitions compiled into the binary, used when no directory is configured
const BUILTIN: &[(&str, &str)] = &[
    ("builtin/stage1.toml", include_str!("../../definitions/stage1.toml")),
    ("builtin/stage3.toml", include_str!("../../definitions/stage3.toml")),
];

/// Parse and validate a single definition
pub fn parse_arena(content: &str, path: &Path) -> Result<ArenaConfig, DefinitionError> {
    let config: ArenaConfig = toml::from_str(content).map_err(|source| DefinitionError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;

    config
        .validate()
        .map_err(|reason| DefinitionError::InvalidDefinition {
            path: path.to_path_buf(),
            reason,
        })?;

    Ok(config)
}

/// Load a stage definition from a TOML file
pub fn load_arena_from_file(path: &Path) -> Result<ArenaConfig, DefinitionError> {
    let content = fs::read_to_string(path).map_err(|source| DefinitionError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_arena(&content, path)
}

/// Load all stage definitions from a directory (recursive).
/// A missing directory yields no definitions.
pub fn load_arenas_from_dir(dir: &Path) -> Result<Vec<ArenaConfig>, DefinitionError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut arenas = Vec::new();
    load_arenas_recursive(dir, &mut arenas)?;
    Ok(arenas)
}

fn load_arenas_recursive(dir: &Path, arenas: &mut Vec<ArenaConfig>) -> Result<(), DefinitionError> {
    let entries = fs::read_dir(dir).map_err(|source| DefinitionError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            load_arenas_recursive(&path, arenas)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            let arena = load_arena_from_file(&path)?;
            tracing::debug!(path = %path.display(), phase = %arena.arena.phase, "Loaded arena definition");
            arenas.push(arena);
        }
    }

    Ok(())
}

/// Definitions shipped with the crate
pub fn builtin_arenas() -> Result<Vec<ArenaConfig>, DefinitionError> {
    BUILTIN
        .iter()
        .map(|(name, content)| parse_arena(content, Path::new(name)))
        .collect()
}
