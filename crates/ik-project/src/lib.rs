//! ik-project: reaction file format, validation and solver construction.

pub mod build;
pub mod schema;
pub mod validate;

pub use build::{build_solver, newton_config_from_file, reaction_from_file, spectrometer_from_file};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_reaction_file};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Kinematics error: {0}")]
    Kinematics(#[from] ik_kinematics::KinematicsError),

    #[error("Unsupported file extension: {path}")]
    UnknownFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<ReactionFile> {
    let content = std::fs::read_to_string(path)?;
    let file: ReactionFile = serde_yaml::from_str(&content)?;
    validate_reaction_file(&file)?;
    Ok(file)
}

pub fn save_yaml(path: &Path, file: &ReactionFile) -> ProjectResult<()> {
    validate_reaction_file(file)?;
    let content = serde_yaml::to_string(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<ReactionFile> {
    let content = std::fs::read_to_string(path)?;
    let file: ReactionFile = serde_json::from_str(&content)?;
    validate_reaction_file(&file)?;
    Ok(file)
}

pub fn save_json(path: &Path, file: &ReactionFile) -> ProjectResult<()> {
    validate_reaction_file(file)?;
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, `.yaml`/`.yml` as YAML.
pub fn load_path(path: &Path) -> ProjectResult<ReactionFile> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            load_yaml(path)
        }
        _ => Err(ProjectError::UnknownFormat {
            path: path.display().to_string(),
        }),
    }
}
