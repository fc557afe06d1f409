// ─────────────────────────────────────────────────────────────────────
// SCPN Injector Chain — Linear Space-Charge Scaling
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Linear space-charge intensity scaling between ion species.
//!
//! The incoherent tune shift scales as
//! `ΔQ ∝ Nb·q² / (m·β·γ²·ε·σz)` (Eq. 1 of CERN-ACC-NOTE, CDS 2749453,
//! lattice integral dropped). Keeping ΔQ, ε and σz equal to those of a
//! reference beam gives the intensity limit of any other species as
//!
//! `Nb = Nb0 · (m/m0) · (q0/q)² · (β/β0) · (γ/γ0)²`.

use injector_types::error::{InjectorError, InjectorResult};
use injector_types::state::{ChargeState, IonSpecies};
use tracing::debug;

use crate::kinematics::beta;

/// Reference beam a scaling starts from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingReference {
    /// Ions per bunch
    pub intensity: f64,
    pub charge: f64,
    pub mass_gev: f64,
    pub gamma: f64,
}

fn validate_positive(value: f64, label: &str) -> InjectorResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(InjectorError::PhysicsViolation(format!(
            "{label} must be finite and > 0, got {value}"
        )));
    }
    Ok(())
}

/// Ratio of the intensity limit of (`mass_gev`, `charge`, `gamma`) to that
/// of the reference beam.
pub fn linear_intensity_factor(
    mass_gev: f64,
    charge: f64,
    gamma: f64,
    reference: &ScalingReference,
) -> InjectorResult<f64> {
    validate_positive(mass_gev, "mass_gev")?;
    validate_positive(charge, "charge")?;
    validate_positive(reference.mass_gev, "reference mass_gev")?;
    validate_positive(reference.charge, "reference charge")?;

    let beta_1 = beta(gamma)?;
    let beta_0 = beta(reference.gamma)?;

    let factor = (mass_gev / reference.mass_gev)
        * (reference.charge / charge).powi(2)
        * (beta_1 / beta_0)
        * (gamma / reference.gamma).powi(2);
    Ok(factor)
}

/// Scaled bunch intensity for an arbitrary (mass, charge, gamma).
pub fn scale_intensity(
    mass_gev: f64,
    charge: f64,
    gamma: f64,
    reference: &ScalingReference,
) -> InjectorResult<f64> {
    if !reference.intensity.is_finite() || reference.intensity < 0.0 {
        return Err(InjectorError::PhysicsViolation(format!(
            "reference intensity must be finite and >= 0, got {}",
            reference.intensity
        )));
    }
    let factor = linear_intensity_factor(mass_gev, charge, gamma, reference)?;
    Ok(reference.intensity * factor)
}

/// Intensity limit of `ion` at `gamma` in the given charge state, assuming
/// the same tune shift, emittance and bunch length as the reference beam.
pub fn linear_intensity_limit(
    ion: &IonSpecies,
    gamma: f64,
    reference: &ScalingReference,
    state: ChargeState,
) -> InjectorResult<f64> {
    let charge = ion.charge(state);
    let limit = scale_intensity(ion.mass_gev, charge, gamma, reference)?;
    debug!(
        ion = %ion.id,
        ?state,
        charge,
        charge_0 = reference.charge,
        gamma,
        gamma_0 = reference.gamma,
        nb_0 = reference.intensity,
        limit,
        "linear intensity limit"
    );
    Ok(limit)
}

/// Space-charge tune shift up to the lattice integral and constants:
/// `Nb·q² / (m·β·γ²·ε·σz)`.
pub fn space_charge_tune_shift_proxy(
    bunch_intensity: f64,
    mass_gev: f64,
    charge: f64,
    gamma: f64,
    emittance: f64,
    bunch_length: f64,
) -> InjectorResult<f64> {
    validate_positive(mass_gev, "mass_gev")?;
    validate_positive(emittance, "emittance")?;
    validate_positive(bunch_length, "bunch_length")?;
    let beta_1 = beta(gamma)?;
    Ok(bunch_intensity * charge * charge
        / (mass_gev * beta_1 * gamma * gamma * emittance * bunch_length))
}
