// ─────────────────────────────────────────────────────────────────────
// SCPN Injector Chain — Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InjectorError {
    #[error("Unsupported reference ion species '{0}': only Pb is available")]
    UnsupportedReferenceSpecies(String),

    #[error("No precomputed gammas for key '{key}'")]
    LookupKeyNotFound { key: String },

    #[error("Invalid relativistic gamma {gamma} ({context}): gamma must be finite and > 1")]
    InvalidGamma { gamma: f64, context: String },

    #[error("Ion '{ion}' is missing field '{field}'")]
    MissingIonField { ion: String, field: &'static str },

    #[error("Ion '{ion}' has invalid {field} = {value}: {reason}")]
    InvalidIonField {
        ion: String,
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Unknown ion species '{0}'")]
    UnknownIon(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Physics constraint violated: {0}")]
    PhysicsViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type InjectorResult<T> = Result<T, InjectorError>;
