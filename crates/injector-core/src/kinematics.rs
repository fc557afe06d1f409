// ─────────────────────────────────────────────────────────────────────
// SCPN Injector Chain — Stage Kinematics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Relativistic factors and space-charge limited intensities per ring.
//!
//! Ring 1 is LEIR, ring 2 the PS and ring 3 the SPS. LEIR and PS are
//! scaled at extraction energy with the charge before stripping, the SPS
//! at injection energy with the bare nucleus.

use injector_types::config::Ring3InjectionGamma;
use injector_types::error::{InjectorError, InjectorResult};
use injector_types::state::{ChargeState, IonSpecies, RingState, StageState};
use injector_types::tables::StageGammas;

use crate::reference::ReferenceConstants;
use crate::scaling::linear_intensity_limit;

/// Relativistic β from γ.
pub fn beta(gamma: f64) -> InjectorResult<f64> {
    check_gamma(gamma, "beta")?;
    Ok((1.0 - 1.0 / (gamma * gamma)).sqrt())
}

fn check_gamma(gamma: f64, context: &str) -> InjectorResult<f64> {
    if !gamma.is_finite() || gamma <= 1.0 {
        return Err(InjectorError::InvalidGamma {
            gamma,
            context: context.to_string(),
        });
    }
    Ok(gamma)
}

/// γ = (m + E_kin/A · A) / m.
pub fn gamma_from_kinetic_energy(mass_gev: f64, ekin_per_nucleon_gev: f64, mass_number: f64) -> f64 {
    (mass_gev + ekin_per_nucleon_gev * mass_number) / mass_gev
}

/// γ giving the same magnetic rigidity Bρ = p/q as a reference beam with
/// `reference_gamma`, for an ion with `charge` and `mass_gev`:
///
/// `γ = sqrt(1 + ((q/q0) / (m/m0))² · (γ0² − 1))`
pub fn rigidity_matched_gamma(
    charge: f64,
    mass_gev: f64,
    reference_charge: f64,
    reference_mass_gev: f64,
    reference_gamma: f64,
) -> InjectorResult<f64> {
    check_gamma(reference_gamma, "rigidity reference")?;
    let ratio = (charge / reference_charge) / (mass_gev / reference_mass_gev);
    let gamma = (1.0 + ratio * ratio * (reference_gamma * reference_gamma - 1.0)).sqrt();
    check_gamma(gamma, "rigidity matched")
}

/// Where the gammas of an ion come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GammaSource<'a> {
    /// Closed-form energy-per-nucleon formulas.
    Formula {
        ring3_injection: Ring3InjectionGamma,
        /// LEIR→PS stripping; sets the charge at PS extraction.
        early_strip: bool,
    },
    /// Precomputed table entry of this ion.
    Lookup(&'a StageGammas),
}

/// LEIR gammas and extracted intensity (Pb54+ reference, 10e10 charges).
pub fn ring1_kinematics(
    ion: &IonSpecies,
    reference: &ReferenceConstants,
    source: GammaSource<'_>,
) -> InjectorResult<RingState> {
    let (gamma_inj, gamma_extr) = match source {
        GammaSource::Lookup(g) => (g.ring1_inj, g.ring1_extr),
        GammaSource::Formula { .. } => (
            gamma_from_kinetic_energy(ion.mass_gev, reference.kinetic.ring1_inj, ion.a),
            gamma_from_kinetic_energy(ion.mass_gev, reference.kinetic.ring1_extr, ion.a),
        ),
    };
    check_gamma(gamma_inj, "LEIR injection")?;
    check_gamma(gamma_extr, "LEIR extraction")?;

    let bunch_intensity = linear_intensity_limit(
        ion,
        gamma_extr,
        &reference.ring1.at_extraction(reference.mass_gev),
        ChargeState::BeforeStripping,
    )?;
    Ok(RingState {
        gamma_inj,
        gamma_extr,
        bunch_intensity,
        charge_intensity: bunch_intensity * ion.q,
    })
}

/// PS gammas and extracted intensity (Pb54+ reference).
pub fn ring2_kinematics(
    ion: &IonSpecies,
    reference: &ReferenceConstants,
    source: GammaSource<'_>,
) -> InjectorResult<RingState> {
    let (gamma_inj, gamma_extr) = match source {
        GammaSource::Lookup(g) => (g.ring2_inj, g.ring2_extr),
        GammaSource::Formula { .. } => (
            gamma_from_kinetic_energy(ion.mass_gev, reference.kinetic.ring2_inj, ion.a),
            gamma_from_kinetic_energy(ion.mass_gev, reference.kinetic.ring2_extr, ion.a),
        ),
    };
    check_gamma(gamma_inj, "PS injection")?;
    check_gamma(gamma_extr, "PS extraction")?;

    let bunch_intensity = linear_intensity_limit(
        ion,
        gamma_extr,
        &reference.ring2.at_extraction(reference.mass_gev),
        ChargeState::BeforeStripping,
    )?;
    Ok(RingState {
        gamma_inj,
        gamma_extr,
        bunch_intensity,
        charge_intensity: bunch_intensity * ion.q,
    })
}

/// SPS gammas and intensity limit (Pb82+ reference). The limit comes from
/// injection energy, where space charge is strongest.
pub fn ring3_kinematics(
    ion: &IonSpecies,
    reference: &ReferenceConstants,
    source: GammaSource<'_>,
) -> InjectorResult<RingState> {
    let (gamma_inj, gamma_extr) = match source {
        GammaSource::Lookup(g) => (g.ring3_inj, g.ring3_extr),
        GammaSource::Formula {
            ring3_injection,
            early_strip,
        } => {
            let gamma_extr =
                gamma_from_kinetic_energy(ion.mass_gev, reference.kinetic.ring3_extr, ion.a);
            let gamma_inj = match ring3_injection {
                Ring3InjectionGamma::EnergyPerNucleon => {
                    gamma_from_kinetic_energy(ion.mass_gev, reference.kinetic.ring3_inj, ion.a)
                }
                // Bρ at PS extraction equals that of Pb54+; the charge there
                // is Z if the ion was already stripped after LEIR.
                Ring3InjectionGamma::ConstantRigidity => {
                    let charge = if early_strip { ion.z } else { ion.q };
                    rigidity_matched_gamma(
                        charge,
                        ion.mass_gev,
                        reference.ring2.charge,
                        reference.mass_gev,
                        reference.ring3.gamma_inj,
                    )?
                }
            };
            (gamma_inj, gamma_extr)
        }
    };
    check_gamma(gamma_inj, "SPS injection")?;
    check_gamma(gamma_extr, "SPS extraction")?;

    let bunch_intensity = linear_intensity_limit(
        ion,
        gamma_inj,
        &reference.ring3.at_injection(reference.mass_gev),
        ChargeState::FullyStripped,
    )?;
    Ok(RingState {
        gamma_inj,
        gamma_extr,
        bunch_intensity,
        charge_intensity: bunch_intensity * ion.z,
    })
}

/// All three rings for one ion, in chain order.
pub fn stage_state(
    ion: &IonSpecies,
    reference: &ReferenceConstants,
    source: GammaSource<'_>,
) -> InjectorResult<StageState> {
    let ring1 = ring1_kinematics(ion, reference, source)?;
    let ring2 = ring2_kinematics(ion, reference, source)?;
    let ring3 = ring3_kinematics(ion, reference, source)?;
    Ok(StageState {
        ring1,
        ring2,
        ring3,
    })
}
