// ─────────────────────────────────────────────────────────────────────
// SCPN Injector Chain — Property-Based Tests (proptest) for injector-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for injector-types using proptest.
//!
//! Covers: IonSpecies charge invariants, ion table unit conversion,
//! gamma table keys, configuration serialization roundtrip.

use injector_types::config::{ChainConfig, GammaScheme};
use injector_types::state::{ChargeState, IonSpecies};
use injector_types::tables::{gamma_key, GammaTable, IonRecord, IonTable, StageGammas};
use proptest::prelude::*;

// ── IonSpecies Invariants ────────────────────────────────────────────

proptest! {
    /// Any charge state 0 < Q <= Z is accepted, and the stripped charge is Z.
    #[test]
    fn species_accepts_q_up_to_z(
        z in 1u32..100,
        q_frac in 0.01f64..=1.0,
        mass in 1.0f64..250.0,
    ) {
        let z = z as f64;
        let q = (z * q_frac).max(1e-3).min(z);
        let ion = IonSpecies::new("X", z, 2.0 * z, mass, q, 20e-6, 200e-6, 1.0);
        prop_assert!(ion.is_ok());
        let ion = ion.unwrap();
        prop_assert_eq!(ion.charge(ChargeState::FullyStripped), z);
        prop_assert!(ion.charge(ChargeState::BeforeStripping) <= ion.charge(ChargeState::FullyStripped));
    }

    /// Q above Z is always rejected.
    #[test]
    fn species_rejects_q_above_z(z in 1u32..100, excess in 0.5f64..20.0) {
        let z = z as f64;
        let ion = IonSpecies::new("X", z, 2.0 * z, 10.0, z + excess, 20e-6, 200e-6, 1.0);
        prop_assert!(ion.is_err());
    }

    /// Stripping efficiency outside [0, 1] is rejected.
    #[test]
    fn species_rejects_efficiency_out_of_range(eff in 1.0001f64..10.0) {
        prop_assert!(IonSpecies::new("X", 8.0, 16.0, 14.9, 4.0, 20e-6, 200e-6, eff).is_err());
        prop_assert!(IonSpecies::new("X", 8.0, 16.0, 14.9, 4.0, 20e-6, 200e-6, -eff).is_err());
    }
}

// ── Ion Table Conversion ─────────────────────────────────────────────

proptest! {
    /// Table rows are converted from µA and µs to SI units.
    #[test]
    fn record_converts_units(current_ua in 0.1f64..500.0, pulse_us in 1.0f64..1000.0) {
        let record = IonRecord {
            mass_gev: Some(37.2155),
            z: Some(18.0),
            a: Some(40.0),
            q: Some(11.0),
            linac3_current_ua: Some(current_ua),
            linac3_pulse_length_us: Some(pulse_us),
            leir_ps_stripping_efficiency: Some(0.9),
        };
        let ion = record.to_species("Ar").unwrap();
        prop_assert!((ion.linac3_current_a - current_ua * 1e-6).abs() <= 1e-12 * current_ua);
        prop_assert!((ion.linac3_pulse_length_s - pulse_us * 1e-6).abs() <= 1e-12 * pulse_us);
        prop_assert_eq!(ion.id, "Ar");
    }

    /// Insertion order survives a JSON roundtrip.
    #[test]
    fn ion_table_order_roundtrip(n in 1usize..20) {
        let mut table = IonTable::new();
        for i in (0..n).rev() {
            table.insert(format!("ion{i}"), IonRecord { z: Some(i as f64 + 1.0), ..Default::default() });
        }
        let json = serde_json::to_string(&table).unwrap();
        let back = IonTable::from_json_str(&json).unwrap();
        let ids: Vec<&str> = back.ids().collect();
        let expected: Vec<String> = (0..n).rev().map(|i| format!("ion{i}")).collect();
        prop_assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }
}

// ── Gamma Table Keys ─────────────────────────────────────────────────

proptest! {
    /// An entry stored under the ion's key is found by lookup.
    #[test]
    fn gamma_lookup_uses_charge_id_mass_number(q in 1u32..82, extra in 0u32..150) {
        let a = (2 * q + extra) as f64;
        let z = (q + extra / 2).max(q) as f64;
        let ion = IonSpecies::new("Ion", z, a, a * 0.93, q as f64, 10e-6, 100e-6, 1.0).unwrap();
        let gammas = StageGammas {
            ring1_inj: 1.004,
            ring1_extr: 1.077,
            ring2_inj: 1.077,
            ring2_extr: 7.3,
            ring3_inj: 7.3,
            ring3_extr: 190.0,
        };
        let mut table = GammaTable::new(GammaScheme::default());
        table.insert(gamma_key(q as f64, "Ion", a), gammas);
        prop_assert_eq!(table.lookup(&ion).unwrap(), &gammas);
        prop_assert_eq!(gamma_key(q as f64, "Ion", a), format!("{q}Ion{}", a as i64));
    }
}

// ── Configuration Roundtrip ──────────────────────────────────────────

proptest! {
    #[test]
    fn config_roundtrip(
        pulses in 0u32..8,
        bunches in 1u32..5,
        splitting in 1u32..5,
        early_strip in any::<bool>(),
        lookup in any::<bool>(),
        sps_transmission in 0.1f64..=1.0,
    ) {
        let mut cfg = ChainConfig::default();
        cfg.pulse_count_override = pulses;
        cfg.bunch_count_ring1 = bunches;
        cfg.splitting_ring2 = splitting;
        cfg.early_strip = early_strip;
        cfg.use_lookup_table = lookup;
        cfg.efficiencies.sps_transmission = sps_transmission;
        prop_assert!(cfg.validate().is_ok());

        let json = serde_json::to_string(&cfg).unwrap();
        let back: ChainConfig = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(cfg, back);
    }
}
