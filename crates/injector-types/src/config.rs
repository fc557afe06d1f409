// ─────────────────────────────────────────────────────────────────────
// SCPN Injector Chain — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::constants::{
    LEIR_INJECTION_EFFICIENCY, LEIR_TRANSMISSION, PS_SPS_STRIPPING_EFFICIENCY,
    PS_SPS_TRANSMISSION_EFFICIENCY, PS_TRANSMISSION, SPS_SLIPSTACKING_TRANSMISSION,
    SPS_TRANSMISSION,
};
use crate::error::{InjectorError, InjectorResult};

/// Top-level configuration of one injector chain simulation.
/// Every field is optional in JSON; absent fields take the nominal Pb
/// operation values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Reference ion species. Only "Pb" exists.
    #[serde(default = "default_reference_species")]
    pub reference_species: String,
    /// Linac3 pulses injected into LEIR; 0 selects the automatic count.
    #[serde(default = "default_one")]
    pub pulse_count_override: u32,
    /// Bunches extracted from LEIR.
    #[serde(default = "default_one")]
    pub bunch_count_ring1: u32,
    /// Bunch splitting factor in the PS.
    #[serde(default = "default_one")]
    pub splitting_ring2: u32,
    /// Scale the SPS reference intensity by the SPS transmission.
    #[serde(default = "default_true")]
    pub account_for_ring3_transmission: bool,
    /// Strip between LEIR and PS instead of between PS and SPS.
    #[serde(default)]
    pub early_strip: bool,
    /// Cap the PS output at its space-charge limit.
    #[serde(default = "default_true")]
    pub consider_ring2_space_charge_limit: bool,
    /// Take gammas from a precomputed table instead of the closed-form formulas.
    #[serde(default)]
    pub use_lookup_table: bool,
    /// Gamma table computed for the raised LEIR magnetic rigidity. Only
    /// affects which table lookup mode expects.
    #[serde(default)]
    pub higher_brho_leir: bool,
    #[serde(default)]
    pub ring3_injection_gamma: Ring3InjectionGamma,
    #[serde(default)]
    pub efficiencies: MachineEfficiencies,
}

/// How the SPS injection gamma is obtained in formula mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ring3InjectionGamma {
    /// Same magnetic rigidity at PS extraction as the Pb54+ reference.
    #[default]
    ConstantRigidity,
    /// Same kinetic energy per nucleon as the reference.
    EnergyPerNucleon,
}

/// Where the ions lose their remaining electrons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripScheme {
    /// Foil in the PS→SPS transfer line.
    #[default]
    PsSps,
    /// Foil in the LEIR→PS transfer line.
    LeirPs,
}

impl StripScheme {
    pub fn from_early_strip(early_strip: bool) -> Self {
        if early_strip {
            StripScheme::LeirPs
        } else {
            StripScheme::PsSps
        }
    }
}

/// Operating scenario a precomputed gamma table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GammaScheme {
    pub strip: StripScheme,
    pub higher_brho_leir: bool,
}

impl GammaScheme {
    /// Conventional file name, e.g. `gammas_leir_ps_strip_higher_brho_leir.json`.
    pub fn file_name(&self) -> String {
        let strip = match self.strip {
            StripScheme::PsSps => "ps_sps",
            StripScheme::LeirPs => "leir_ps",
        };
        let brho = if self.higher_brho_leir {
            "_higher_brho_leir"
        } else {
            ""
        };
        format!("gammas_{strip}_strip{brho}.json")
    }
}

/// Transmission and stripping efficiencies along the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineEfficiencies {
    #[serde(default = "default_leir_injection_efficiency")]
    pub leir_injection_efficiency: f64,
    #[serde(default = "default_leir_transmission")]
    pub leir_transmission: f64,
    #[serde(default = "default_ps_transmission")]
    pub ps_transmission: f64,
    /// PS→SPS transfer when no stripping happens there.
    #[serde(default = "default_ps_sps_transmission_efficiency")]
    pub ps_sps_transmission_efficiency: f64,
    /// PS→SPS transfer through the stripper foil.
    #[serde(default = "default_ps_sps_stripping_efficiency")]
    pub ps_sps_stripping_efficiency: f64,
    #[serde(default = "default_sps_transmission")]
    pub sps_transmission: f64,
    #[serde(default = "default_sps_slipstacking_transmission")]
    pub sps_slipstacking_transmission: f64,
}

fn default_reference_species() -> String {
    "Pb".to_string()
}
fn default_one() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_leir_injection_efficiency() -> f64 {
    LEIR_INJECTION_EFFICIENCY
}
fn default_leir_transmission() -> f64 {
    LEIR_TRANSMISSION
}
fn default_ps_transmission() -> f64 {
    PS_TRANSMISSION
}
fn default_ps_sps_transmission_efficiency() -> f64 {
    PS_SPS_TRANSMISSION_EFFICIENCY
}
fn default_ps_sps_stripping_efficiency() -> f64 {
    PS_SPS_STRIPPING_EFFICIENCY
}
fn default_sps_transmission() -> f64 {
    SPS_TRANSMISSION
}
fn default_sps_slipstacking_transmission() -> f64 {
    SPS_SLIPSTACKING_TRANSMISSION
}

impl Default for MachineEfficiencies {
    fn default() -> Self {
        MachineEfficiencies {
            leir_injection_efficiency: default_leir_injection_efficiency(),
            leir_transmission: default_leir_transmission(),
            ps_transmission: default_ps_transmission(),
            ps_sps_transmission_efficiency: default_ps_sps_transmission_efficiency(),
            ps_sps_stripping_efficiency: default_ps_sps_stripping_efficiency(),
            sps_transmission: default_sps_transmission(),
            sps_slipstacking_transmission: default_sps_slipstacking_transmission(),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        ChainConfig {
            reference_species: default_reference_species(),
            pulse_count_override: default_one(),
            bunch_count_ring1: default_one(),
            splitting_ring2: default_one(),
            account_for_ring3_transmission: true,
            early_strip: false,
            consider_ring2_space_charge_limit: true,
            use_lookup_table: false,
            higher_brho_leir: false,
            ring3_injection_gamma: Ring3InjectionGamma::default(),
            efficiencies: MachineEfficiencies::default(),
        }
    }
}

impl MachineEfficiencies {
    pub fn validate(&self) -> InjectorResult<()> {
        let named = [
            ("leir_injection_efficiency", self.leir_injection_efficiency),
            ("leir_transmission", self.leir_transmission),
            ("ps_transmission", self.ps_transmission),
            (
                "ps_sps_transmission_efficiency",
                self.ps_sps_transmission_efficiency,
            ),
            ("ps_sps_stripping_efficiency", self.ps_sps_stripping_efficiency),
            ("sps_transmission", self.sps_transmission),
            (
                "sps_slipstacking_transmission",
                self.sps_slipstacking_transmission,
            ),
        ];
        for (name, value) in named {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(InjectorError::ConfigError(format!(
                    "{name} must be finite and in (0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl ChainConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> InjectorResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check counts and efficiencies. The reference species is checked
    /// when the reference values are built.
    pub fn validate(&self) -> InjectorResult<()> {
        if self.bunch_count_ring1 == 0 {
            return Err(InjectorError::ConfigError(
                "bunch_count_ring1 must be >= 1".to_string(),
            ));
        }
        if self.splitting_ring2 == 0 {
            return Err(InjectorError::ConfigError(
                "splitting_ring2 must be >= 1".to_string(),
            ));
        }
        self.efficiencies.validate()
    }

    /// SPS transmission in effect, both for the reference intensity and
    /// for the delivered intensity.
    pub fn effective_ring3_transmission(&self) -> f64 {
        if self.account_for_ring3_transmission {
            self.efficiencies.sps_transmission
        } else {
            1.0
        }
    }

    /// Gamma table scenario matching this configuration.
    pub fn gamma_scheme(&self) -> GammaScheme {
        GammaScheme {
            strip: StripScheme::from_early_strip(self.early_strip),
            higher_brho_leir: self.higher_brho_leir,
        }
    }

    /// Automatic LEIR pulse count requested.
    pub fn auto_pulse_count(&self) -> bool {
        self.pulse_count_override == 0
    }
}
