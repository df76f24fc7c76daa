//! Lipinski Rule of Five drug-likeness evaluation.

use serde::{Deserialize, Serialize};

use crate::descriptors::DescriptorSet;
use crate::error::EvaluationError;
use crate::mol::Molecule;

pub const MAX_MOLECULAR_WEIGHT: f64 = 500.0;
pub const MAX_LOGP: f64 = 5.0;
pub const MAX_H_BOND_DONORS: usize = 5;
pub const MAX_H_BOND_ACCEPTORS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Lipinski report as returned by the `/lipinski` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugLikenessReport {
    pub molecular_weight: f64,
    #[serde(rename = "logP")]
    pub logp: f64,
    #[serde(rename = "HBD")]
    pub hbd: usize,
    #[serde(rename = "HBA")]
    pub hba: usize,
    pub drug_likeness: Verdict,
    pub message: String,
}

impl DrugLikenessReport {
    pub fn from_descriptors(d: &DescriptorSet) -> Self {
        let verdict = lipinski_verdict(d);
        let message = match verdict {
            Verdict::Pass => "Molecule satisfies Lipinski's Rule of Five",
            Verdict::Fail => "Molecule does NOT satisfy Lipinski's Rule",
        };
        Self {
            molecular_weight: round_to(d.molecular_weight, 3),
            logp: round_to(d.logp, 3),
            hbd: d.h_bond_donors,
            hba: d.h_bond_acceptors,
            drug_likeness: verdict,
            message: message.to_string(),
        }
    }
}

/// All four Rule of Five conditions, inclusive.
pub fn satisfies_rule_of_five(d: &DescriptorSet) -> bool {
    d.molecular_weight <= MAX_MOLECULAR_WEIGHT
        && d.logp <= MAX_LOGP
        && d.h_bond_donors <= MAX_H_BOND_DONORS
        && d.h_bond_acceptors <= MAX_H_BOND_ACCEPTORS
}

pub fn lipinski_verdict(d: &DescriptorSet) -> Verdict {
    if satisfies_rule_of_five(d) {
        Verdict::Pass
    } else {
        Verdict::Fail
    }
}

/// Parse a SMILES string and evaluate it against the Rule of Five.
pub fn evaluate_drug_likeness(smiles: &str) -> Result<DrugLikenessReport, EvaluationError> {
    let descriptors = describe(smiles)?;
    Ok(DrugLikenessReport::from_descriptors(&descriptors))
}

/// Parse and compute descriptors, mapping every failure to an invalid structure.
pub(crate) fn describe(smiles: &str) -> Result<DescriptorSet, EvaluationError> {
    let mol = Molecule::from_smiles(smiles).map_err(EvaluationError::InvalidStructure)?;
    DescriptorSet::compute(&mol).map_err(EvaluationError::InvalidStructure)
}

/// Half-away-from-zero rounding for presentation.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(molecular_weight: f64, logp: f64, h_bond_donors: usize, h_bond_acceptors: usize) -> DescriptorSet {
        DescriptorSet { molecular_weight, logp, tpsa: 0.0, rotatable_bonds: 0, h_bond_donors, h_bond_acceptors }
    }

    #[test]
    fn typical_kinase_inhibitor_passes() {
        assert_eq!(lipinski_verdict(&set(443.551, 3.642, 2, 5)), Verdict::Pass);
    }

    #[test]
    fn a_single_violation_fails() {
        assert_eq!(lipinski_verdict(&set(600.0, 1.0, 0, 0)), Verdict::Fail);
        assert_eq!(lipinski_verdict(&set(300.0, 5.01, 0, 0)), Verdict::Fail);
        assert_eq!(lipinski_verdict(&set(300.0, 1.0, 6, 0)), Verdict::Fail);
        assert_eq!(lipinski_verdict(&set(300.0, 1.0, 0, 11)), Verdict::Fail);
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(lipinski_verdict(&set(500.0, 5.0, 5, 10)), Verdict::Pass);
        assert_eq!(lipinski_verdict(&set(500.001, 5.0, 5, 10)), Verdict::Fail);
    }

    #[test]
    fn report_rounds_to_three_places() {
        let report = DrugLikenessReport::from_descriptors(&set(180.04225873, 1.31009999, 1, 3));
        assert_eq!(report.molecular_weight, 180.042);
        assert_eq!(report.logp, 1.31);
        assert_eq!(report.message, "Molecule satisfies Lipinski's Rule of Five");
    }

    #[test]
    fn report_serializes_with_wire_names() {
        let report = DrugLikenessReport::from_descriptors(&set(600.0, 1.0, 2, 3));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["drug_likeness"], "Fail");
        assert_eq!(json["HBD"], 2);
        assert_eq!(json["HBA"], 3);
        assert_eq!(json["logP"], 1.0);
        assert_eq!(json["message"], "Molecule does NOT satisfy Lipinski's Rule");
    }

    #[test]
    fn evaluates_aspirin() {
        let report = evaluate_drug_likeness("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        assert_eq!(report.drug_likeness, Verdict::Pass);
        assert_eq!(report.molecular_weight, 180.042);
        assert_eq!(report.logp, 1.31);
        assert_eq!((report.hbd, report.hba), (1, 3));
    }

    #[test]
    fn invalid_input_is_a_tagged_error() {
        for input in ["", "C1CC", "not a molecule"] {
            let err = evaluate_drug_likeness(input).unwrap_err();
            assert_eq!(err.to_string(), "Invalid SMILES string");
        }
    }

    #[test]
    fn evaluation_is_repeatable() {
        let smiles = "CC(C)Cc1ccc(C(C)C(=O)O)cc1";
        assert_eq!(evaluate_drug_likeness(smiles).unwrap(), evaluate_drug_likeness(smiles).unwrap());
    }
}
