// ─────────────────────────────────────────────────────────────────────
// SCPN Injector Chain — Reference Ion
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reference beam parameters every other species is scaled from.
//!
//! Only Pb has measured intensities at all three rings: Pb54+ in LEIR and
//! the PS, Pb82+ in the SPS.

use std::str::FromStr;

use injector_types::config::ChainConfig;
use injector_types::constants::{
    EKIN_PER_A_LEIR_EXTR, EKIN_PER_A_LEIR_INJ, EKIN_PER_A_PS_EXTR, EKIN_PER_A_PS_INJ,
    EKIN_PER_A_SPS_EXTR, EKIN_PER_A_SPS_INJ, PB_A, PB_MASS_GEV, PB_NB_SPS_EXTR, PB_NQ_LEIR_EXTR,
    PB_NQ_PS_EXTR, PB_Q_BEFORE_STRIP, PB_Z, SPS_TRANSMISSION,
};
use injector_types::error::{InjectorError, InjectorResult};
use tracing::debug;

use crate::kinematics::gamma_from_kinetic_energy;
use crate::scaling::ScalingReference;

/// Species with known injector performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSpecies {
    Lead,
}

impl FromStr for ReferenceSpecies {
    type Err = InjectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pb" => Ok(ReferenceSpecies::Lead),
            other => Err(InjectorError::UnsupportedReferenceSpecies(
                other.to_string(),
            )),
        }
    }
}

/// Kinetic energy per nucleon [GeV/u] at each stage boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KineticEnergies {
    pub ring1_inj: f64,
    pub ring1_extr: f64,
    pub ring2_inj: f64,
    pub ring2_extr: f64,
    pub ring3_inj: f64,
    pub ring3_extr: f64,
}

impl KineticEnergies {
    /// LIU design values, common to all species.
    pub const DESIGN: KineticEnergies = KineticEnergies {
        ring1_inj: EKIN_PER_A_LEIR_INJ,
        ring1_extr: EKIN_PER_A_LEIR_EXTR,
        ring2_inj: EKIN_PER_A_PS_INJ,
        ring2_extr: EKIN_PER_A_PS_EXTR,
        ring3_inj: EKIN_PER_A_SPS_INJ,
        ring3_extr: EKIN_PER_A_SPS_EXTR,
    };
}

/// Reference beam at one ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceStage {
    pub charge: f64,
    /// Extracted ions per bunch
    pub bunch_intensity: f64,
    /// Extracted charges per bunch
    pub charge_intensity: f64,
    pub gamma_inj: f64,
    pub gamma_extr: f64,
}

impl ReferenceStage {
    pub fn at_injection(&self, mass_gev: f64) -> ScalingReference {
        ScalingReference {
            intensity: self.bunch_intensity,
            charge: self.charge,
            mass_gev,
            gamma: self.gamma_inj,
        }
    }

    pub fn at_extraction(&self, mass_gev: f64) -> ScalingReference {
        ScalingReference {
            intensity: self.bunch_intensity,
            charge: self.charge,
            mass_gev,
            gamma: self.gamma_extr,
        }
    }
}

/// Reference ion values, built once per simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceConstants {
    pub species: ReferenceSpecies,
    pub mass_gev: f64,
    pub z: f64,
    pub a: f64,
    pub kinetic: KineticEnergies,
    pub ring1: ReferenceStage,
    pub ring2: ReferenceStage,
    pub ring3: ReferenceStage,
    /// SPS transmission the SPS reference intensity was corrected for.
    pub ring3_transmission: f64,
}

impl ReferenceConstants {
    /// Reference values with the nominal SPS transmission, or none at all.
    pub fn initialize(
        species_id: &str,
        account_for_ring3_transmission: bool,
    ) -> InjectorResult<Self> {
        let transmission = if account_for_ring3_transmission {
            SPS_TRANSMISSION
        } else {
            1.0
        };
        Self::with_ring3_transmission(species_id, transmission)
    }

    /// Reference values matching a chain configuration.
    pub fn from_config(config: &ChainConfig) -> InjectorResult<Self> {
        Self::with_ring3_transmission(
            &config.reference_species,
            config.effective_ring3_transmission(),
        )
    }

    /// The SPS reference intensity is the observed extracted intensity
    /// divided by `ring3_transmission`, i.e. what was injected.
    pub fn with_ring3_transmission(
        species_id: &str,
        ring3_transmission: f64,
    ) -> InjectorResult<Self> {
        let species: ReferenceSpecies = species_id.parse()?;
        if !ring3_transmission.is_finite() || ring3_transmission <= 0.0 || ring3_transmission > 1.0
        {
            return Err(InjectorError::ConfigError(format!(
                "SPS transmission must be finite and in (0, 1], got {ring3_transmission}"
            )));
        }

        let reference = match species {
            ReferenceSpecies::Lead => Self::lead(ring3_transmission),
        };
        debug!(
            ?species,
            sps_transmission = ring3_transmission,
            nb_leir = reference.ring1.bunch_intensity,
            nb_ps = reference.ring2.bunch_intensity,
            nb_sps = reference.ring3.bunch_intensity,
            "reference values initialized"
        );
        Ok(reference)
    }

    fn lead(ring3_transmission: f64) -> Self {
        let kinetic = KineticEnergies::DESIGN;
        let m0 = PB_MASS_GEV;
        let gamma = |ekin: f64| gamma_from_kinetic_energy(m0, ekin, PB_A);

        let ring1 = ReferenceStage {
            charge: PB_Q_BEFORE_STRIP,
            bunch_intensity: PB_NQ_LEIR_EXTR / PB_Q_BEFORE_STRIP,
            charge_intensity: PB_NQ_LEIR_EXTR,
            gamma_inj: gamma(kinetic.ring1_inj),
            gamma_extr: gamma(kinetic.ring1_extr),
        };
        let ring2 = ReferenceStage {
            charge: PB_Q_BEFORE_STRIP,
            bunch_intensity: PB_NQ_PS_EXTR / PB_Q_BEFORE_STRIP,
            charge_intensity: PB_NQ_PS_EXTR,
            gamma_inj: gamma(kinetic.ring2_inj),
            gamma_extr: gamma(kinetic.ring2_extr),
        };
        let nb_sps = PB_NB_SPS_EXTR / ring3_transmission;
        let ring3 = ReferenceStage {
            charge: PB_Z,
            bunch_intensity: nb_sps,
            charge_intensity: nb_sps * PB_Z,
            gamma_inj: gamma(kinetic.ring3_inj),
            gamma_extr: gamma(kinetic.ring3_extr),
        };

        ReferenceConstants {
            species: ReferenceSpecies::Lead,
            mass_gev: m0,
            z: PB_Z,
            a: PB_A,
            kinetic,
            ring1,
            ring2,
            ring3,
            ring3_transmission,
        }
    }
}
