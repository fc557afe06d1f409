// ─────────────────────────────────────────────────────────────────────
// SCPN Injector Chain — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::error::{InjectorError, InjectorResult};

/// Charge state of an ion at a given point of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeState {
    /// Q, as produced by the source.
    BeforeStripping,
    /// Z, after the stripper foil.
    FullyStripped,
}

impl ChargeState {
    pub fn from_fully_stripped(fully_stripped: bool) -> Self {
        if fully_stripped {
            ChargeState::FullyStripped
        } else {
            ChargeState::BeforeStripping
        }
    }
}

/// One ion species as seen by the injectors. SI units except the mass.
#[derive(Debug, Clone, PartialEq)]
pub struct IonSpecies {
    pub id: String,
    /// Atomic number
    pub z: f64,
    /// Mass number
    pub a: f64,
    /// Rest mass [GeV]
    pub mass_gev: f64,
    /// Charge state before stripping
    pub q: f64,
    /// Linac3 current [A]
    pub linac3_current_a: f64,
    /// Linac3 pulse length [s]
    pub linac3_pulse_length_s: f64,
    /// Stripping efficiency of the LEIR→PS foil, fraction
    pub leir_ps_stripping_efficiency: f64,
}

impl IonSpecies {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        z: f64,
        a: f64,
        mass_gev: f64,
        q: f64,
        linac3_current_a: f64,
        linac3_pulse_length_s: f64,
        leir_ps_stripping_efficiency: f64,
    ) -> InjectorResult<Self> {
        let ion = IonSpecies {
            id: id.into(),
            z,
            a,
            mass_gev,
            q,
            linac3_current_a,
            linac3_pulse_length_s,
            leir_ps_stripping_efficiency,
        };
        ion.validate()?;
        Ok(ion)
    }

    pub fn validate(&self) -> InjectorResult<()> {
        let positive = [
            ("Z", self.z),
            ("A", self.a),
            ("mass [GeV]", self.mass_gev),
            ("Q before stripping", self.q),
            ("Linac3 current", self.linac3_current_a),
            ("Linac3 pulse length", self.linac3_pulse_length_s),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(self.invalid(field, value, "must be finite and > 0"));
            }
        }
        if self.q > self.z {
            return Err(self.invalid(
                "Q before stripping",
                self.q,
                "charge state cannot exceed Z",
            ));
        }
        let eff = self.leir_ps_stripping_efficiency;
        if !eff.is_finite() || !(0.0..=1.0).contains(&eff) {
            return Err(self.invalid(
                "LEIR-PS Stripping Efficiency",
                eff,
                "must be finite and in [0, 1]",
            ));
        }
        Ok(())
    }

    fn invalid(&self, field: &'static str, value: f64, reason: &'static str) -> InjectorError {
        InjectorError::InvalidIonField {
            ion: self.id.clone(),
            field,
            value,
            reason,
        }
    }

    /// Charge number in the requested state.
    pub fn charge(&self, state: ChargeState) -> f64 {
        match state {
            ChargeState::BeforeStripping => self.q,
            ChargeState::FullyStripped => self.z,
        }
    }

    /// Source already delivers bare nuclei.
    pub fn is_fully_stripped_at_source(&self) -> bool {
        self.q == self.z
    }
}

/// Relativistic and intensity state at one ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingState {
    pub gamma_inj: f64,
    pub gamma_extr: f64,
    /// Extracted ions per bunch (space-charge limit)
    pub bunch_intensity: f64,
    /// Extracted charges per bunch
    pub charge_intensity: f64,
}

/// Per-ion state of LEIR, PS and SPS, always built together for one ion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageState {
    pub ring1: RingState,
    pub ring2: RingState,
    pub ring3: RingState,
}

/// Result of threading one ion through Linac3, LEIR, PS and SPS to the LHC.
/// Field names on the wire are the established output column labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResult {
    #[serde(rename = "Ion")]
    pub ion: String,
    #[serde(rename = "chargeBeforeStrip")]
    pub charge_before_strip: u32,
    #[serde(rename = "atomicNumber")]
    pub atomic_number: u32,
    #[serde(rename = "massNumber")]
    pub mass_number: u32,
    #[serde(rename = "Linac3_current [A]")]
    pub linac3_current_a: f64,
    #[serde(rename = "Linac3_pulse_length [s]")]
    pub linac3_pulse_length_s: f64,
    #[serde(rename = "Linac3_ionsPerPulse")]
    pub linac3_ions_per_pulse: f64,
    #[serde(rename = "LEIR_numberofPulses")]
    pub leir_number_of_pulses: u32,
    #[serde(rename = "LEIR_injection_efficiency")]
    pub leir_injection_efficiency: f64,
    #[serde(rename = "LEIR_maxIntensity")]
    pub leir_max_intensity: f64,
    #[serde(rename = "LEIR_space_charge_limit")]
    pub leir_space_charge_limit: f64,
    #[serde(rename = "LEIR_splitting")]
    pub leir_bunches: u32,
    #[serde(rename = "LEIR_gamma")]
    pub leir_gamma_inj: f64,
    #[serde(rename = "LEIR_extractedIonPerBunch")]
    pub leir_extracted_ions_per_bunch: f64,
    #[serde(rename = "LEIR_transmission")]
    pub leir_transmission: f64,
    #[serde(rename = "PS_space_charge_limit")]
    pub ps_space_charge_limit: f64,
    /// PS output was capped by its space-charge limit.
    #[serde(rename = "PS_space_charge_limited")]
    pub ps_space_charge_limited: bool,
    #[serde(rename = "PS_splitting")]
    pub ps_splitting: u32,
    #[serde(rename = "PS_transmission")]
    pub ps_transmission: f64,
    #[serde(rename = "PS_ionsExtractedPerBunch")]
    pub ps_ions_extracted_per_bunch: f64,
    /// Same value as `sps_inj_gamma`, kept under its older column label.
    #[serde(rename = "gammaInjSPS")]
    pub gamma_inj_sps: f64,
    #[serde(rename = "PS_SPS_stripping_efficiency")]
    pub ps_sps_stripping_efficiency: f64,
    #[serde(rename = "SPS_maxIntensityPerBunch")]
    pub sps_max_intensity_per_bunch: f64,
    #[serde(rename = "SPS_spaceChargeLimit")]
    pub sps_space_charge_limit: f64,
    #[serde(rename = "SPS_inj_gamma")]
    pub sps_inj_gamma: f64,
    #[serde(rename = "SPS_accIntensity")]
    pub sps_acc_intensity: f64,
    #[serde(rename = "SPS_transmission")]
    pub sps_transmission: f64,
    #[serde(rename = "LHC_ionsPerBunch")]
    pub lhc_ions_per_bunch: f64,
    #[serde(rename = "LHC_chargesPerBunch")]
    pub lhc_charges_per_bunch: f64,
    /// Only present with LEIR→PS stripping.
    #[serde(
        rename = "LEIR_PS_strippingEfficiency",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub leir_ps_stripping_efficiency: Option<f64>,
}
