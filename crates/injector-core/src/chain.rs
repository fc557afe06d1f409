// ─────────────────────────────────────────────────────────────────────
// SCPN Injector Chain — Chain Aggregator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! LHC bunch intensity of an ion species through Linac3, LEIR, PS and SPS.
//!
//! Every machine caps the beam at the smaller of what it receives and its
//! linear space-charge limit, then loses a fixed fraction in transmission
//! or stripping. All per-ion quantities are rebuilt on each call; the
//! simulator itself only holds read-only configuration and reference data.

use indexmap::IndexMap;
use injector_types::config::ChainConfig;
use injector_types::constants::{MAX_LEIR_PULSES, Q_ELECTRON};
use injector_types::error::{InjectorError, InjectorResult};
use injector_types::state::{ChainResult, ChargeState, IonSpecies, StageState};
use injector_types::tables::{ChainResultTable, GammaTable, IonTable};
use tracing::{debug, info, warn};

use crate::kinematics::{stage_state, GammaSource};
use crate::reference::ReferenceConstants;
use crate::scaling::linear_intensity_limit;

/// Injector chain simulator for one configuration.
#[derive(Debug, Clone)]
pub struct InjectorChain {
    config: ChainConfig,
    reference: ReferenceConstants,
    gammas: Option<GammaTable>,
}

/// Ions per Linac3 pulse: I·τ / (Q·e).
pub fn ions_per_pulse(ion: &IonSpecies) -> f64 {
    (ion.linac3_current_a * ion.linac3_pulse_length_s) / (ion.q * Q_ELECTRON)
}

/// Linac3 pulses accumulated in LEIR. In automatic mode, as many as needed
/// to fill the space-charge limit, at most `MAX_LEIR_PULSES`.
pub fn leir_pulse_count(
    config: &ChainConfig,
    space_charge_limit: f64,
    ions_per_pulse: f64,
) -> u32 {
    if !config.auto_pulse_count() {
        return config.pulse_count_override;
    }
    let injected_per_pulse = ions_per_pulse * config.efficiencies.leir_injection_efficiency;
    let needed = (space_charge_limit / injected_per_pulse).ceil();
    if needed.is_finite() {
        needed.clamp(1.0, MAX_LEIR_PULSES as f64) as u32
    } else {
        MAX_LEIR_PULSES
    }
}

/// LEIR limit: Pb54+ reference at LEIR extraction, charge before stripping.
pub fn leir_space_charge_limit(
    ion: &IonSpecies,
    reference: &ReferenceConstants,
    stages: &StageState,
) -> InjectorResult<f64> {
    linear_intensity_limit(
        ion,
        stages.ring1.gamma_extr,
        &reference.ring1.at_extraction(reference.mass_gev),
        ChargeState::BeforeStripping,
    )
}

/// PS limit: PS reference intensity at PS injection, where space charge
/// dominates. The ion is bare here only with LEIR→PS stripping.
pub fn ps_space_charge_limit(
    ion: &IonSpecies,
    reference: &ReferenceConstants,
    stages: &StageState,
    early_strip: bool,
) -> InjectorResult<f64> {
    linear_intensity_limit(
        ion,
        stages.ring2.gamma_inj,
        &reference.ring2.at_injection(reference.mass_gev),
        ChargeState::from_fully_stripped(early_strip),
    )
}

/// SPS limit: Pb82+ reference at SPS injection, always fully stripped.
pub fn sps_space_charge_limit(
    ion: &IonSpecies,
    reference: &ReferenceConstants,
    stages: &StageState,
) -> InjectorResult<f64> {
    linear_intensity_limit(
        ion,
        stages.ring3.gamma_inj,
        &reference.ring3.at_injection(reference.mass_gev),
        ChargeState::FullyStripped,
    )
}

impl InjectorChain {
    /// Simulator with formula gammas. Fails for an unsupported reference
    /// species, an invalid configuration, or lookup mode without a table.
    pub fn new(config: ChainConfig) -> InjectorResult<Self> {
        if config.use_lookup_table {
            return Err(InjectorError::ConfigError(
                "use_lookup_table requires a gamma table (InjectorChain::with_gamma_table)"
                    .to_string(),
            ));
        }
        Self::build(config, None)
    }

    /// Simulator that can take gammas from a precomputed table. In lookup
    /// mode the table must belong to the configured stripping scenario.
    pub fn with_gamma_table(config: ChainConfig, gammas: GammaTable) -> InjectorResult<Self> {
        if !config.use_lookup_table {
            warn!("gamma table supplied but use_lookup_table is off; formula gammas are used");
        } else if gammas.scheme != config.gamma_scheme() {
            return Err(InjectorError::ConfigError(format!(
                "gamma table is for {:?}, configuration expects {:?} ({})",
                gammas.scheme,
                config.gamma_scheme(),
                config.gamma_scheme().file_name()
            )));
        }
        Self::build(config, Some(gammas))
    }

    fn build(config: ChainConfig, gammas: Option<GammaTable>) -> InjectorResult<Self> {
        config.validate()?;
        let reference = ReferenceConstants::from_config(&config)?;
        info!(
            reference = %config.reference_species,
            early_strip = config.early_strip,
            lookup = config.use_lookup_table,
            "injector chain configured"
        );
        Ok(InjectorChain {
            config,
            reference,
            gammas,
        })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceConstants {
        &self.reference
    }

    fn gamma_source(&self, ion: &IonSpecies) -> InjectorResult<GammaSource<'_>> {
        match (&self.gammas, self.config.use_lookup_table) {
            (Some(table), true) => Ok(GammaSource::Lookup(table.lookup(ion)?)),
            (None, true) => Err(InjectorError::ConfigError(
                "lookup mode without gamma table".to_string(),
            )),
            (_, false) => Ok(GammaSource::Formula {
                ring3_injection: self.config.ring3_injection_gamma,
                early_strip: self.config.early_strip,
            }),
        }
    }

    /// Gammas and space-charge limited intensities of `ion` in every ring.
    pub fn space_charge_limits(&self, ion: &IonSpecies) -> InjectorResult<StageState> {
        ion.validate()?;
        let source = self.gamma_source(ion)?;
        stage_state(ion, &self.reference, source)
    }

    /// Bunch intensity delivered to the LHC for one ion, with every
    /// intermediate limit.
    pub fn compute_chain_result(&self, ion: &IonSpecies) -> InjectorResult<ChainResult> {
        let stages = self.space_charge_limits(ion)?;
        let cfg = &self.config;
        let eff = &cfg.efficiencies;
        let reference = &self.reference;

        // Linac3 → LEIR
        let ions_per_pulse = ions_per_pulse(ion);
        let sc_limit_leir = leir_space_charge_limit(ion, reference, &stages)?;
        let n_pulses = leir_pulse_count(cfg, sc_limit_leir, ions_per_pulse);
        let total_injected_leir =
            ions_per_pulse * n_pulses as f64 * eff.leir_injection_efficiency;
        let extracted_leir = eff.leir_transmission * total_injected_leir.min(sc_limit_leir)
            / cfg.bunch_count_ring1 as f64;

        // LEIR → PS
        let leir_ps_eff = if cfg.early_strip {
            ion.leir_ps_stripping_efficiency
        } else {
            1.0
        };
        let extracted_ps =
            extracted_leir * leir_ps_eff * eff.ps_transmission / cfg.splitting_ring2 as f64;
        let sc_limit_ps = ps_space_charge_limit(ion, reference, &stages, cfg.early_strip)?;

        let ps_limited = cfg.consider_ring2_space_charge_limit && sc_limit_ps < extracted_ps;
        let ions_per_bunch_ps = if cfg.consider_ring2_space_charge_limit {
            sc_limit_ps.min(extracted_ps)
        } else {
            extracted_ps
        };
        if ps_limited {
            info!(
                ion = %ion.id,
                sc_limit_ps,
                extracted_ps,
                "PS space-charge limit reached"
            );
        }

        // PS → SPS; the foil is only here without LEIR→PS stripping.
        // TODO: confirm with operations which of the two PS→SPS efficiencies
        // applies to already bare ions.
        let ps_sps_eff = if ion.is_fully_stripped_at_source() || cfg.early_strip {
            eff.ps_sps_transmission_efficiency
        } else {
            eff.ps_sps_stripping_efficiency
        };
        let injected_sps = ions_per_bunch_ps * ps_sps_eff;
        let sc_limit_sps = sps_space_charge_limit(ion, reference, &stages)?;

        // SPS → LHC
        let accelerated_sps = sc_limit_sps.min(injected_sps);
        let ions_per_bunch_lhc =
            accelerated_sps * reference.ring3_transmission * eff.sps_slipstacking_transmission;

        let result = ChainResult {
            ion: ion.id.clone(),
            charge_before_strip: ion.q.trunc() as u32,
            atomic_number: ion.z.trunc() as u32,
            mass_number: ion.a.trunc() as u32,
            linac3_current_a: ion.linac3_current_a,
            linac3_pulse_length_s: ion.linac3_pulse_length_s,
            linac3_ions_per_pulse: ions_per_pulse,
            leir_number_of_pulses: n_pulses,
            leir_injection_efficiency: eff.leir_injection_efficiency,
            leir_max_intensity: total_injected_leir,
            leir_space_charge_limit: sc_limit_leir,
            leir_bunches: cfg.bunch_count_ring1,
            leir_gamma_inj: stages.ring1.gamma_inj,
            leir_extracted_ions_per_bunch: extracted_leir,
            leir_transmission: eff.leir_transmission,
            ps_space_charge_limit: sc_limit_ps,
            ps_space_charge_limited: ps_limited,
            ps_splitting: cfg.splitting_ring2,
            ps_transmission: eff.ps_transmission,
            ps_ions_extracted_per_bunch: extracted_ps,
            gamma_inj_sps: stages.ring3.gamma_inj,
            ps_sps_stripping_efficiency: eff.ps_sps_stripping_efficiency,
            sps_max_intensity_per_bunch: injected_sps,
            sps_space_charge_limit: sc_limit_sps,
            sps_inj_gamma: stages.ring3.gamma_inj,
            sps_acc_intensity: accelerated_sps,
            sps_transmission: reference.ring3_transmission,
            lhc_ions_per_bunch: ions_per_bunch_lhc,
            lhc_charges_per_bunch: ions_per_bunch_lhc * ion.z,
            leir_ps_stripping_efficiency: cfg.early_strip.then_some(ion.leir_ps_stripping_efficiency),
        };
        debug!(
            ion = %result.ion,
            n_pulses,
            lhc_ions_per_bunch = result.lhc_ions_per_bunch,
            "chain result"
        );
        Ok(result)
    }

    /// Chain results for every ion of `table`, in table order. Stops at the
    /// first ion that fails.
    pub fn compute_chain_results_for_all_ions(
        &self,
        table: &IonTable,
    ) -> InjectorResult<ChainResultTable> {
        let mut results = ChainResultTable::new();
        for (_, species) in table.iter_species() {
            results.insert(self.compute_chain_result(&species?)?);
        }
        info!(ions = results.len(), "chain results computed");
        Ok(results)
    }

    /// Like [`Self::compute_chain_results_for_all_ions`], but keeps going
    /// past failing ions and reports each outcome separately.
    pub fn compute_chain_results_partial(
        &self,
        table: &IonTable,
    ) -> IndexMap<String, InjectorResult<ChainResult>> {
        let mut outcomes = IndexMap::with_capacity(table.len());
        for (id, species) in table.iter_species() {
            let outcome = species.and_then(|ion| self.compute_chain_result(&ion));
            if let Err(err) = &outcome {
                warn!(ion = id, error = %err, "ion skipped");
            }
            outcomes.insert(id.to_string(), outcome);
        }
        let failed = outcomes.values().filter(|o| o.is_err()).count();
        info!(ions = outcomes.len(), failed, "chain results computed");
        outcomes
    }

    /// Space-charge limits and gammas per ring for every ion of `table`.
    pub fn space_charge_limits_for_all_ions(
        &self,
        table: &IonTable,
    ) -> InjectorResult<IndexMap<String, StageState>> {
        let mut limits = IndexMap::with_capacity(table.len());
        for (id, species) in table.iter_species() {
            limits.insert(id.to_string(), self.space_charge_limits(&species?)?);
        }
        Ok(limits)
    }
}
