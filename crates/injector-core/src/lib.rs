// ─────────────────────────────────────────────────────────────────────
// SCPN Injector Chain — Injector Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Intensity limits of ion species through the CERN ion injector chain
//! (Linac3 → LEIR → PS → SPS → LHC) with linear space-charge scaling
//! from the Pb reference beam.
//!
//! - `reference`: Pb reference gammas and intensities
//! - `kinematics`: per-ring gammas and space-charge limited intensities
//! - `scaling`: linear intensity scaling between species
//! - `chain`: full chain per ion and over ion tables

pub mod chain;
pub mod kinematics;
pub mod reference;
pub mod scaling;

pub use chain::InjectorChain;
