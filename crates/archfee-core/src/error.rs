//! Error types for archfee-core
//!
//! Hard errors only exist at the edges (reading config and data files,
//! validating raw input). Business conditions inside the pipeline are
//! recorded as advisory notes and never abort a calculation.

use archfee_types::{CalcNote, NoteSeverity, ProjectInput};
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for archfee operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // IO Errors
    // ===================
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    // ===================
    // Parse Errors
    // ===================
    #[error("Failed to parse JSON in {path}: {message}")]
    JsonParse {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse TOML in {path}: {message}")]
    TomlParse {
        path: PathBuf,
        message: String,
        #[source]
        source: toml::de::Error,
    },

    // ===================
    // Config / Input Errors
    // ===================
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid input field '{field}': {message}")]
    InvalidInput { field: String, message: String },
}

impl CoreError {
    fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Schema-level validation for the API boundary
///
/// The pipeline itself clamps out-of-range values instead of rejecting them;
/// callers that want strict input call this first.
pub fn validate_input(input: &ProjectInput) -> Result<(), CoreError> {
    if !(1..=5).contains(&input.category) {
        return Err(CoreError::invalid_input("category", "must be between 1 and 5"));
    }

    for (field, value) in [
        ("newAreaFt2", input.new_area_ft2),
        ("existingAreaFt2", input.existing_area_ft2),
        ("siteAreaFt2", input.site_area_ft2),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::invalid_input(field, "must be a non-negative number"));
        }
    }

    if input.historic_multiplier <= 0.0 {
        return Err(CoreError::invalid_input("historicMultiplier", "must be positive"));
    }

    if let Some(m) = input.remodel_multiplier {
        if !(m > 0.0 && m <= 1.0) {
            return Err(CoreError::invalid_input("remodelMultiplier", "must be in (0, 1]"));
        }
    }

    let o = &input.overrides;
    let engineering = archfee_types::Discipline::ENGINEERING
        .iter()
        .map(|&d| (d.label(), o.engineering.get(d)));
    let fractions = [
        ("shellShare", o.shell_share),
        ("interiorShare", o.interior_share),
        ("landscapeShare", o.landscape_share),
        ("architectureFloor", o.architecture_floor),
        ("coordinationFeePct", o.coordination_fee_pct),
        ("discount", o.discount),
    ]
    .into_iter()
    .chain(engineering);

    for (field, value) in fractions {
        if let Some(v) = value {
            if !(0.0..=1.0).contains(&v) {
                return Err(CoreError::invalid_input(field, "must be a decimal in [0, 1]"));
            }
        }
    }

    Ok(())
}

/// Notes collected while running the pipeline
///
/// Enables best-effort results by tracking consistency warnings
/// and data fallbacks instead of failing.
#[derive(Debug, Default, Clone)]
pub struct CalcNotes {
    pub notes: Vec<CalcNote>,
}

impl CalcNotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.notes.push(CalcNote::info(source, message));
    }

    pub fn warn(&mut self, source: impl Into<String>, message: impl Into<String>) {
        let note = CalcNote::warning(source, message);
        tracing::warn!(source = %note.source, "{}", note.message);
        self.notes.push(note);
    }

    /// Returns only warnings
    pub fn warnings(&self) -> impl Iterator<Item = &CalcNote> {
        self.notes
            .iter()
            .filter(|n| n.severity == NoteSeverity::Warning)
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Merge another set of notes into this one
    pub fn merge(&mut self, other: CalcNotes) {
        self.notes.extend(other.notes);
    }

    pub fn into_vec(self) -> Vec<CalcNote> {
        self.notes
    }
}
