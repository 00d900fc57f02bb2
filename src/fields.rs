//! Field catalog: every key the certificate form collects, with its label and
//! the value the form is pre-filled with.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeDef {
    pub key: &'static str,
    pub label: &'static str,
    pub default: &'static str,
}

/// One tested parameter, stored in the field map as a `<stem>_spec`,
/// `<stem>_result`, `<stem>_method` triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParameterDef {
    pub stem: &'static str,
    pub label: &'static str,
    pub spec_default: &'static str,
    pub result_default: &'static str,
    pub method_default: &'static str,
}

impl ParameterDef {
    const fn new(
        stem: &'static str,
        label: &'static str,
        spec_default: &'static str,
        result_default: &'static str,
        method_default: &'static str,
    ) -> Self {
        Self {
            stem,
            label,
            spec_default,
            result_default,
            method_default,
        }
    }

    pub fn spec_key(&self) -> String {
        format!("{}_spec", self.stem)
    }

    pub fn result_key(&self) -> String {
        format!("{}_result", self.stem)
    }

    pub fn method_key(&self) -> String {
        format!("{}_method", self.stem)
    }

    /// (key, form label, default) for each of the three fields.
    pub fn fields(&self) -> [(String, String, &'static str); 3] {
        [
            (
                self.spec_key(),
                format!("Specification for {}", self.label),
                self.spec_default,
            ),
            (
                self.result_key(),
                format!("Result for {}", self.label),
                self.result_default,
            ),
            (
                self.method_key(),
                format!("Method for {}", self.label),
                self.method_default,
            ),
        ]
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SectionDef {
    pub name: &'static str,
    pub parameters: &'static [ParameterDef],
}

pub const IDENTITY: [AttributeDef; 13] = [
    AttributeDef { key: "product_name", label: "Product Name", default: "X" },
    AttributeDef { key: "product_code", label: "Product Code", default: "X" },
    AttributeDef { key: "batch_no", label: "Batch No.", default: "X" },
    AttributeDef { key: "manufacturing_date", label: "Date of Manufacturing", default: "X" },
    AttributeDef { key: "reanalysis_date", label: "Date of Reanalysis", default: "X" },
    AttributeDef { key: "botanical_name", label: "Botanical Name", default: "X" },
    AttributeDef { key: "extraction_ratio", label: "Extraction Ratio", default: "X" },
    AttributeDef { key: "solvent", label: "Extraction Solvents", default: "X" },
    AttributeDef { key: "plant_part", label: "Plant Parts", default: "X" },
    AttributeDef { key: "cas_no", label: "CAS No.", default: "X" },
    AttributeDef { key: "chemical_name", label: "Chemical Name", default: "X" },
    AttributeDef { key: "quantity", label: "Quantity", default: "X" },
    AttributeDef { key: "origin", label: "Country of Origin", default: "India" },
];

const PHYSICAL: &[ParameterDef] = &[
    ParameterDef::new("description", "Description", "X with Characteristic taste and odour", "Compiles", "Physical"),
    ParameterDef::new("identification", "Identification", "To comply by TLC", "Compiles", "TLC"),
    ParameterDef::new("loss_on_drying", "Loss on Drying", "Not more than X", "X", "USP<731>"),
    ParameterDef::new("moisture", "Moisture", "Not more than X", "X", "USP<921>"),
    ParameterDef::new("particle_size", "Particle Size", "X", "X", "USP<786>"),
    ParameterDef::new("ash_contents", "Ash Contents", "Not more than X", "X", "USP<561>"),
    ParameterDef::new("residue_on_ignition", "Residue on Ignition", "Not more than X", "X", "USP<281>"),
    ParameterDef::new("bulk_density", "Bulk Density", "Between 0.3g/ml to 0.6g/ml", "X", "USP<616>"),
    ParameterDef::new("tapped_density", "Tapped Density", "Between 0.4g/ml to 0.8g/ml", "X", "USP<616>"),
    ParameterDef::new("solubility", "Solubility", "X", "X", "USP<1236>"),
    ParameterDef::new("ph", "pH", "X", "X", "USP<791>"),
    ParameterDef::new("chlorides_nacl", "Chlorides of NaCl", "X", "X", "USP<221>"),
    ParameterDef::new("sulphates", "Sulphates", "X", "X", "USP<221>"),
    ParameterDef::new("fats", "Fats", "X", "X", "USP<731>"),
    ParameterDef::new("protein", "Protein", "X", "X", "Kjeldahl"),
    ParameterDef::new("total_ig_g", "Total IgG", "X", "X", "HPLC"),
    ParameterDef::new("sodium", "Sodium", "X", "X", "ICP-MS"),
    ParameterDef::new("gluten", "Gluten", "NMT X", "X", "ELISA"),
];

const OTHERS: &[ParameterDef] = &[
    ParameterDef::new("lead", "Lead", "Not more than X ppm", "X", "ICP-MS"),
    ParameterDef::new("cadmium", "Cadmium", "Not more than X ppm", "X", "ICP-MS"),
    ParameterDef::new("arsenic", "Arsenic", "Not more than X ppm", "X", "ICP-MS"),
    ParameterDef::new("mercury", "Mercury", "Not more than X ppm", "X", "ICP-MS"),
];

const ASSAYS: &[ParameterDef] = &[ParameterDef::new("assays", "Assays", "X", "X", "X")];

const PESTICIDES: &[ParameterDef] = &[ParameterDef::new(
    "pesticide",
    "Pesticide",
    "Meet USP<561>",
    "Compiles",
    "USP<561>",
)];

const RESIDUAL_SOLVENT: &[ParameterDef] = &[ParameterDef::new(
    "residual_solvent",
    "Residual Solvent",
    "X",
    "Compiles",
    "X",
)];

const MICROBIOLOGICAL: &[ParameterDef] = &[
    ParameterDef::new("total_plate_count", "Total Plate Count", "Not more than X cfu/g", "X cfu/g", "USP<61>"),
    ParameterDef::new("yeasts_mould", "Yeasts & Mould Count", "Not more than X cfu/g", "X cfu/g", "USP<61>"),
    ParameterDef::new("salmonella", "Salmonella", "Absent/25g", "Absent", "USP<62>"),
    ParameterDef::new("e_coli", "Escherichia coli", "Absent/10g", "Absent", "USP<62>"),
    ParameterDef::new("coliforms", "Coliforms", "NMT X cfu/g", "X", "USP<62>"),
];

/// Specification table sections, in print order.
pub const SECTIONS: [SectionDef; 6] = [
    SectionDef { name: "Physical", parameters: PHYSICAL },
    SectionDef { name: "Others", parameters: OTHERS },
    SectionDef { name: "Assays", parameters: ASSAYS },
    SectionDef { name: "Pesticides", parameters: PESTICIDES },
    SectionDef { name: "Residual Solvent", parameters: RESIDUAL_SOLVENT },
    SectionDef { name: "Microbiological Profile", parameters: MICROBIOLOGICAL },
];

pub fn section(name: &str) -> Option<&'static SectionDef> {
    SECTIONS.iter().find(|s| s.name == name)
}

/// Every field in form order as (key, label, default).
pub fn catalog() -> Vec<(String, String, &'static str)> {
    let mut out: Vec<(String, String, &'static str)> = IDENTITY
        .iter()
        .map(|a| (a.key.to_string(), a.label.to_string(), a.default))
        .collect();
    for section in &SECTIONS {
        for param in section.parameters {
            out.extend(param.fields());
        }
    }
    out
}

pub fn all_keys() -> Vec<String> {
    catalog().into_iter().map(|(key, _, _)| key).collect()
}

/// Submitted form values keyed by field name. Missing keys read as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, String>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every catalog field set to the value the form is pre-filled with.
    pub fn with_form_defaults() -> Self {
        catalog()
            .into_iter()
            .map(|(key, _, default)| (key, default.to_string()))
            .collect()
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Value with surrounding whitespace removed; empty when absent.
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(|v| v.trim()).unwrap_or("")
    }

    pub fn has_value(&self, key: &str) -> bool {
        !self.get(key).is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys that no catalog field uses; they never reach the document.
    pub fn unknown_keys(&self) -> Vec<&str> {
        let known = all_keys();
        self.0
            .keys()
            .filter(|k| !known.iter().any(|known| known == *k))
            .map(|k| k.as_str())
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for FieldMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
