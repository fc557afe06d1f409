// ─────────────────────────────────────────────────────────────────────
// SCPN Injector Chain — Injector Types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Shared data model of the injector chain intensity model.
//!
//! Everything in here is plain data: physical constants, the chain
//! configuration, ion and gamma tables, per-stage state and the result
//! records produced by `injector-core`.

pub mod config;
pub mod constants;
pub mod error;
pub mod state;
pub mod tables;
