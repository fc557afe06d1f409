// ─────────────────────────────────────────────────────────────────────
// SCPN Injector Chain — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Physical constants and reference design values of the ion injectors.
//!
//! Kinetic energies per nucleon and Pb reference intensities follow the
//! LIU-Ions beam parameter table (EDMS 1420286).

/// Elementary charge (C)
pub const Q_ELECTRON: f64 = 1.602176634e-19;

// ── Kinetic energy per nucleon at stage boundaries [GeV/u] ──────────
// Identical for all species.

/// LEIR injection, before RF capture.
pub const EKIN_PER_A_LEIR_INJ: f64 = 4.2e-3;
/// LEIR extraction.
pub const EKIN_PER_A_LEIR_EXTR: f64 = 7.22e-2;
/// PS injection.
pub const EKIN_PER_A_PS_INJ: f64 = 7.22e-2;
/// PS extraction.
pub const EKIN_PER_A_PS_EXTR: f64 = 5.9;
/// SPS injection.
pub const EKIN_PER_A_SPS_INJ: f64 = 5.9;
/// SPS extraction.
pub const EKIN_PER_A_SPS_EXTR: f64 = 176.4;

// ── Pb reference ion ─────────────────────────────────────────────────

/// Pb-208 rest mass (GeV)
pub const PB_MASS_GEV: f64 = 193.687;
/// Pb atomic number
pub const PB_Z: f64 = 82.0;
/// Pb mass number
pub const PB_A: f64 = 208.0;
/// Pb charge state in LEIR and PS (before stripping)
pub const PB_Q_BEFORE_STRIP: f64 = 54.0;

/// Observed charges per bunch extracted from LEIR (Pb54+).
pub const PB_NQ_LEIR_EXTR: f64 = 10e10;
/// Observed charges per bunch extracted from the PS (Pb54+).
/// November 2022 ion lifetime MD; 8e10 before.
pub const PB_NQ_PS_EXTR: f64 = 6e10;
/// Ions per bunch extracted from the SPS (Pb82+, 2015).
pub const PB_NB_SPS_EXTR: f64 = 2.21e8;

// ── Machine efficiencies (defaults) ─────────────────────────────────

pub const LEIR_INJECTION_EFFICIENCY: f64 = 0.5;
pub const LEIR_TRANSMISSION: f64 = 0.8;
pub const PS_TRANSMISSION: f64 = 0.9;
/// 0.9 is observed today; 1.0 is the design assumption.
pub const PS_SPS_TRANSMISSION_EFFICIENCY: f64 = 1.0;
pub const PS_SPS_STRIPPING_EFFICIENCY: f64 = 0.9;
pub const SPS_TRANSMISSION: f64 = 0.62;
pub const SPS_SLIPSTACKING_TRANSMISSION: f64 = 1.0;

/// Upper bound on Linac3 pulses accumulated in LEIR in automatic mode.
pub const MAX_LEIR_PULSES: u32 = 7;
