// ─────────────────────────────────────────────────────────────────────
// SCPN Injector Chain — Tables
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Ion property table, precomputed gamma table and result table.
//!
//! All three are JSON objects keyed by ion (or gamma) identifier. Key
//! order is preserved so results come out in the order ions were listed.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::{ChainConfig, GammaScheme};
use crate::error::{InjectorError, InjectorResult};
use crate::state::{ChainResult, IonSpecies};

/// Ordered map that refuses repeated keys instead of keeping the last one.
fn deserialize_unique_keys<'de, D, V>(deserializer: D) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueKeyVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> serde::de::Visitor<'de> for UniqueKeyVisitor<V> {
        type Value = IndexMap<String, V>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map with unique keys")
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: serde::de::MapAccess<'de>,
        {
            let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(key) = map.next_key::<String>()? {
                if entries.contains_key(&key) {
                    return Err(serde::de::Error::custom(format!("duplicate key \"{key}\"")));
                }
                let value = map.next_value()?;
                entries.insert(key, value);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(UniqueKeyVisitor(PhantomData))
}

/// One row of the ion property table, in table units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IonRecord {
    #[serde(rename = "mass [GeV]", default, skip_serializing_if = "Option::is_none")]
    pub mass_gev: Option<f64>,
    #[serde(rename = "Z", default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(rename = "A", default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    #[serde(
        rename = "Q before stripping",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub q: Option<f64>,
    #[serde(
        rename = "Linac3 current [uA]",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub linac3_current_ua: Option<f64>,
    #[serde(
        rename = "Linac3 pulse length [us]",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub linac3_pulse_length_us: Option<f64>,
    #[serde(
        rename = "LEIR-PS Stripping Efficiency",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub leir_ps_stripping_efficiency: Option<f64>,
}

fn required(ion: &str, field: &'static str, value: Option<f64>) -> InjectorResult<f64> {
    value.ok_or_else(|| InjectorError::MissingIonField {
        ion: ion.to_string(),
        field,
    })
}

impl IonRecord {
    /// Convert to SI and validate. Missing fields are errors, never defaults.
    pub fn to_species(&self, id: &str) -> InjectorResult<IonSpecies> {
        let mass_gev = required(id, "mass [GeV]", self.mass_gev)?;
        let z = required(id, "Z", self.z)?;
        let a = required(id, "A", self.a)?;
        let q = required(id, "Q before stripping", self.q)?;
        let current_ua = required(id, "Linac3 current [uA]", self.linac3_current_ua)?;
        let pulse_us = required(id, "Linac3 pulse length [us]", self.linac3_pulse_length_us)?;
        let leir_ps_eff = required(
            id,
            "LEIR-PS Stripping Efficiency",
            self.leir_ps_stripping_efficiency,
        )?;

        IonSpecies::new(
            id,
            z,
            a,
            mass_gev,
            q,
            current_ua * 1e-6,
            pulse_us * 1e-6,
            leir_ps_eff,
        )
    }
}

/// Ion property table, ordered as listed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IonTable {
    #[serde(deserialize_with = "deserialize_unique_keys")]
    pub ions: IndexMap<String, IonRecord>,
}

impl IonTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> InjectorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file. A repeated ion id is an error.
    pub fn from_file(path: &str) -> InjectorResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Append (or replace in place) a row.
    pub fn insert(&mut self, id: impl Into<String>, record: IonRecord) {
        self.ions.insert(id.into(), record);
    }

    pub fn len(&self) -> usize {
        self.ions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ions.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ions.keys().map(String::as_str)
    }

    /// Validated species for one identifier.
    pub fn species(&self, id: &str) -> InjectorResult<IonSpecies> {
        self.ions
            .get(id)
            .ok_or_else(|| InjectorError::UnknownIon(id.to_string()))?
            .to_species(id)
    }

    /// Every row converted in table order; a bad row does not hide the others.
    pub fn iter_species(&self) -> impl Iterator<Item = (&str, InjectorResult<IonSpecies>)> {
        self.ions
            .iter()
            .map(|(id, record)| (id.as_str(), record.to_species(id)))
    }
}

/// Precomputed gammas of one ion at every stage boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageGammas {
    #[serde(rename = "LEIR_gamma_inj")]
    pub ring1_inj: f64,
    #[serde(rename = "LEIR_gamma_extr")]
    pub ring1_extr: f64,
    #[serde(rename = "PS_gamma_inj")]
    pub ring2_inj: f64,
    #[serde(rename = "PS_gamma_extr")]
    pub ring2_extr: f64,
    #[serde(rename = "SPS_gamma_inj")]
    pub ring3_inj: f64,
    #[serde(rename = "SPS_gamma_extr")]
    pub ring3_extr: f64,
}

/// Key of the gamma table: integer charge, ion id, integer mass number,
/// e.g. `54Pb208`.
pub fn gamma_key(q: f64, id: &str, a: f64) -> String {
    format!("{}{}{}", q.trunc() as i64, id, a.trunc() as i64)
}

/// Gamma table for one operating scenario. The scenario is not part of
/// the JSON; it is set by whoever loads the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GammaTable {
    #[serde(deserialize_with = "deserialize_unique_keys")]
    pub entries: IndexMap<String, StageGammas>,
    #[serde(skip)]
    pub scheme: GammaScheme,
}

impl GammaTable {
    pub fn new(scheme: GammaScheme) -> Self {
        GammaTable {
            entries: IndexMap::new(),
            scheme,
        }
    }

    pub fn from_json_str(json: &str, scheme: GammaScheme) -> InjectorResult<Self> {
        let mut table: GammaTable = serde_json::from_str(json)?;
        table.scheme = scheme;
        Ok(table)
    }

    /// Load from a JSON file computed for `scheme`.
    pub fn from_file(path: &str, scheme: GammaScheme) -> InjectorResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents, scheme)
    }

    /// Load the table matching `config` from `dir`, named after its scenario.
    pub fn load_for_config(dir: impl AsRef<Path>, config: &ChainConfig) -> InjectorResult<Self> {
        let scheme = config.gamma_scheme();
        let path = dir.as_ref().join(scheme.file_name());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents, scheme)
    }

    pub fn insert(&mut self, key: impl Into<String>, gammas: StageGammas) {
        self.entries.insert(key.into(), gammas);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gammas for `ion`, keyed by its charge before stripping and mass number.
    pub fn lookup(&self, ion: &IonSpecies) -> InjectorResult<&StageGammas> {
        let key = gamma_key(ion.q, &ion.id, ion.a);
        self.entries
            .get(&key)
            .ok_or(InjectorError::LookupKeyNotFound { key })
    }
}

/// Chain results keyed by ion, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainResultTable {
    pub results: IndexMap<String, ChainResult>,
}

impl ChainResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, result: ChainResult) {
        self.results.insert(result.ion.clone(), result);
    }

    pub fn get(&self, id: &str) -> Option<&ChainResult> {
        self.results.get(id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainResult> {
        self.results.values()
    }

    pub fn to_json_pretty(&self) -> InjectorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the table as pretty JSON.
    pub fn save_json(&self, path: &str) -> InjectorResult<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

impl FromIterator<ChainResult> for ChainResultTable {
    fn from_iter<I: IntoIterator<Item = ChainResult>>(iter: I) -> Self {
        let mut table = ChainResultTable::new();
        for result in iter {
            table.insert(result);
        }
        table
    }
}
