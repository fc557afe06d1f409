// ─────────────────────────────────────────────────────────────────────
// SCPN Injector Chain — Property-Based Tests (proptest) for injector-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for injector-core using proptest.
//!
//! Covers: relativistic beta, linear intensity scaling (identity, inverse,
//! charge monotonicity), chain min-of-limits and pulse cap, batch isolation.

use injector_core::chain::InjectorChain;
use injector_core::kinematics::{beta, rigidity_matched_gamma};
use injector_core::scaling::{scale_intensity, ScalingReference};
use injector_types::config::ChainConfig;
use injector_types::constants::MAX_LEIR_PULSES;
use injector_types::state::IonSpecies;
use injector_types::tables::{IonRecord, IonTable};
use proptest::prelude::*;

/// Random but physical ion: 1 <= Q <= Z, A ~ 2Z, m ~ 0.93 A.
fn ion_strategy() -> impl Strategy<Value = IonSpecies> {
    (1u32..=92, 0.05f64..=1.0, 1.9f64..2.6, 1.0f64..200.0, 50.0f64..500.0, 0.0f64..=1.0).prop_map(
        |(z, q_frac, a_over_z, current_ua, pulse_us, leir_ps_eff)| {
            let z = z as f64;
            let q = (z * q_frac).round().clamp(1.0, z);
            let a = (z * a_over_z).round().max(1.0);
            IonSpecies::new(
                "X",
                z,
                a,
                0.9315 * a,
                q,
                current_ua * 1e-6,
                pulse_us * 1e-6,
                leir_ps_eff,
            )
            .expect("strategy produces valid ions")
        },
    )
}

fn config_strategy() -> impl Strategy<Value = ChainConfig> {
    (0u32..=8, 1u32..=4, 1u32..=4, any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(pulses, bunches, splitting, early_strip, consider_ps, account_sps)| {
            let mut cfg = ChainConfig::default();
            cfg.pulse_count_override = pulses;
            cfg.bunch_count_ring1 = bunches;
            cfg.splitting_ring2 = splitting;
            cfg.early_strip = early_strip;
            cfg.consider_ring2_space_charge_limit = consider_ps;
            cfg.account_for_ring3_transmission = account_sps;
            cfg
        },
    )
}

// ── Relativistic Beta ────────────────────────────────────────────────

proptest! {
    /// beta lies in (0, 1) for every gamma > 1.
    #[test]
    fn beta_in_unit_interval(gamma in 1.000_001f64..1.0e4) {
        let b = beta(gamma).unwrap();
        prop_assert!(b > 0.0 && b < 1.0, "beta({}) = {}", gamma, b);
    }

    /// beta increases with gamma.
    #[test]
    fn beta_monotone(g1 in 1.000_001f64..1.0e3, dg in 1e-3f64..1.0e3) {
        prop_assert!(beta(g1 + dg).unwrap() > beta(g1).unwrap());
    }

    /// gamma <= 1 is rejected.
    #[test]
    fn beta_rejects_sub_unity_gamma(gamma in -10.0f64..=1.0) {
        prop_assert!(beta(gamma).is_err());
    }

    /// Matching the reference charge-to-mass ratio reproduces the reference gamma.
    #[test]
    fn rigidity_identity(q in 1.0f64..92.0, m in 1.0f64..250.0, g0 in 1.01f64..200.0) {
        let g = rigidity_matched_gamma(q, m, q, m, g0).unwrap();
        prop_assert!((g - g0).abs() / g0 < 1e-12);
    }
}

// ── Linear Intensity Scaling ─────────────────────────────────────────

proptest! {
    /// Scaling the reference onto itself returns the reference intensity.
    #[test]
    fn scaling_identity(
        n0 in 1e6f64..1e12,
        m in 1.0f64..250.0,
        c in 1.0f64..92.0,
        g in 1.001f64..200.0,
    ) {
        let reference = ScalingReference { intensity: n0, charge: c, mass_gev: m, gamma: g };
        prop_assert_eq!(scale_intensity(m, c, g, &reference).unwrap(), n0);
    }

    /// Scaling A from R and then R back from A returns the starting intensity.
    #[test]
    fn scaling_inverse(
        n0 in 1e6f64..1e12,
        (m0, m1) in (1.0f64..250.0, 1.0f64..250.0),
        (c0, c1) in (1.0f64..92.0, 1.0f64..92.0),
        (g0, g1) in (1.001f64..200.0, 1.001f64..200.0),
    ) {
        let r = ScalingReference { intensity: n0, charge: c0, mass_gev: m0, gamma: g0 };
        let n1 = scale_intensity(m1, c1, g1, &r).unwrap();
        let back = ScalingReference { intensity: n1, charge: c1, mass_gev: m1, gamma: g1 };
        let n0_again = scale_intensity(m0, c0, g0, &back).unwrap();
        prop_assert!((n0_again - n0).abs() / n0 < 1e-10, "{} vs {}", n0_again, n0);
    }

    /// A lower target charge (higher c0/c) strictly increases the limit.
    #[test]
    fn scaling_monotone_in_inverse_charge(
        c_low in 1.0f64..45.0,
        dc in 0.5f64..45.0,
        m in 1.0f64..250.0,
        g in 1.001f64..200.0,
    ) {
        let r = ScalingReference { intensity: 1e9, charge: 54.0, mass_gev: 193.687, gamma: 7.336 };
        let high = scale_intensity(m, c_low, g, &r).unwrap();
        let low = scale_intensity(m, c_low + dc, g, &r).unwrap();
        prop_assert!(high > low);
        // Quadratic in c0/c.
        let ratio = high / low;
        let expected = ((c_low + dc) / c_low).powi(2);
        prop_assert!((ratio - expected).abs() / expected < 1e-12);
    }
}

// ── Chain Invariants ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Every stage delivers at most its space-charge limit and at most what it received.
    #[test]
    fn chain_min_of_limits(ion in ion_strategy(), cfg in config_strategy()) {
        let consider_ps = cfg.consider_ring2_space_charge_limit;
        let chain = InjectorChain::new(cfg).unwrap();
        let r = chain.compute_chain_result(&ion).unwrap();

        prop_assert!(r.lhc_ions_per_bunch.is_finite() && r.lhc_ions_per_bunch >= 0.0);
        prop_assert!(r.lhc_ions_per_bunch <= r.sps_space_charge_limit);
        prop_assert!(r.lhc_ions_per_bunch <= r.sps_max_intensity_per_bunch);
        prop_assert!(r.sps_acc_intensity <= r.sps_space_charge_limit);
        prop_assert!(r.sps_acc_intensity <= r.sps_max_intensity_per_bunch);
        prop_assert!(r.leir_extracted_ions_per_bunch <= r.leir_space_charge_limit);
        prop_assert!(r.leir_extracted_ions_per_bunch <= r.leir_max_intensity);
        if consider_ps {
            prop_assert!(r.sps_max_intensity_per_bunch <= r.ps_space_charge_limit);
        }
        prop_assert!(r.sps_max_intensity_per_bunch <= r.ps_ions_extracted_per_bunch);
        prop_assert!((r.lhc_charges_per_bunch - r.lhc_ions_per_bunch * ion.z).abs()
            <= 1e-12 * r.lhc_charges_per_bunch.abs());
    }

    /// Automatic pulse count never exceeds the LEIR cap.
    #[test]
    fn auto_pulse_count_capped(ion in ion_strategy(), tiny_current in any::<bool>()) {
        let mut ion = ion;
        if tiny_current {
            ion.linac3_current_a = 1e-12;
        }
        let mut cfg = ChainConfig::default();
        cfg.pulse_count_override = 0;
        let r = InjectorChain::new(cfg).unwrap().compute_chain_result(&ion).unwrap();
        prop_assert!(r.leir_number_of_pulses >= 1);
        prop_assert!(r.leir_number_of_pulses <= MAX_LEIR_PULSES);
        if tiny_current {
            prop_assert_eq!(r.leir_number_of_pulses, MAX_LEIR_PULSES);
        }
    }

    /// The early-strip efficiency is reported exactly when early stripping is on.
    #[test]
    fn early_strip_field_presence(ion in ion_strategy(), cfg in config_strategy()) {
        let early = cfg.early_strip;
        let r = InjectorChain::new(cfg).unwrap().compute_chain_result(&ion).unwrap();
        prop_assert_eq!(r.leir_ps_stripping_efficiency.is_some(), early);
    }
}

// ── Batch Isolation ──────────────────────────────────────────────────

fn record_of(ion: &IonSpecies) -> IonRecord {
    IonRecord {
        mass_gev: Some(ion.mass_gev),
        z: Some(ion.z),
        a: Some(ion.a),
        q: Some(ion.q),
        linac3_current_ua: Some(ion.linac3_current_a * 1e6),
        linac3_pulse_length_us: Some(ion.linac3_pulse_length_s * 1e6),
        leir_ps_stripping_efficiency: Some(ion.leir_ps_stripping_efficiency),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// N rows give N results in input order, and the same ion listed twice
    /// around a different one gives identical numbers both times.
    #[test]
    fn batch_repeated_ion_identical(
        first in ion_strategy(),
        other in ion_strategy(),
        cfg in config_strategy(),
    ) {
        let mut table = IonTable::new();
        table.insert("first", record_of(&first));
        table.insert("other", record_of(&other));
        table.insert("first-again", record_of(&first));

        let chain = InjectorChain::new(cfg).unwrap();
        let results = chain.compute_chain_results_for_all_ions(&table).unwrap();
        prop_assert_eq!(results.len(), 3);
        let ids: Vec<&str> = results.iter().map(|r| r.ion.as_str()).collect();
        prop_assert_eq!(ids, vec!["first", "other", "first-again"]);

        let a = results.get("first").unwrap().clone();
        let mut b = results.get("first-again").unwrap().clone();
        b.ion = a.ion.clone();
        prop_assert_eq!(a, b);
    }
}
