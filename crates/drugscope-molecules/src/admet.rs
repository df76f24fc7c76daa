//! Rule-based ADMET estimates.

use serde::{Deserialize, Serialize};

use crate::descriptors::DescriptorSet;
use crate::error::EvaluationError;
use crate::lipinski::{describe, round_to, satisfies_rule_of_five};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    High,
    Low,
}

impl Level {
    fn high_if(condition: bool) -> Self {
        if condition {
            Level::High
        } else {
            Level::Low
        }
    }

    fn low_if(condition: bool) -> Self {
        if condition {
            Level::Low
        } else {
            Level::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Absorption {
    pub intestinal_absorption: Level,
    pub blood_brain_barrier: Level,
    #[serde(rename = "TPSA")]
    pub tpsa: f64,
    pub rotatable_bonds: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metabolism {
    pub risk_level: Level,
    pub molecular_weight: f64,
    #[serde(rename = "logP")]
    pub logp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toxicity {
    pub risk_level: Level,
    pub hbd: usize,
    pub hba: usize,
}

/// ADMET report as returned by the `/admet` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmetReport {
    pub absorption: Absorption,
    pub metabolism: Metabolism,
    pub toxicity: Toxicity,
    pub message: String,
}

/// High unless polar surface or flexibility is excessive.
pub fn intestinal_absorption(d: &DescriptorSet) -> Level {
    Level::high_if(d.tpsa < 140.0 && d.rotatable_bonds < 10)
}

pub fn blood_brain_barrier(d: &DescriptorSet) -> Level {
    Level::high_if(d.molecular_weight < 400.0 && d.logp < 5.0 && d.tpsa < 90.0)
}

/// Low exactly when the Rule of Five holds.
pub fn metabolism_risk(d: &DescriptorSet) -> Level {
    Level::low_if(satisfies_rule_of_five(d))
}

/// Low only for moderately lipophilic, polar molecules. There is no lower
/// TPSA bound: apolar molecules always come out High.
pub fn toxicity_risk(d: &DescriptorSet) -> Level {
    Level::low_if(d.logp < 5.0 && d.tpsa > 75.0)
}

impl AdmetReport {
    pub fn from_descriptors(d: &DescriptorSet) -> Self {
        Self {
            absorption: Absorption {
                intestinal_absorption: intestinal_absorption(d),
                blood_brain_barrier: blood_brain_barrier(d),
                tpsa: round_to(d.tpsa, 2),
                rotatable_bonds: d.rotatable_bonds,
            },
            metabolism: Metabolism {
                risk_level: metabolism_risk(d),
                molecular_weight: round_to(d.molecular_weight, 2),
                logp: round_to(d.logp, 2),
            },
            toxicity: Toxicity {
                risk_level: toxicity_risk(d),
                hbd: d.h_bond_donors,
                hba: d.h_bond_acceptors,
            },
            message: "ADMET properties predicted from computed molecular descriptors".to_string(),
        }
    }
}

/// Parse a SMILES string and apply the ADMET heuristics.
pub fn evaluate_admet(smiles: &str) -> Result<AdmetReport, EvaluationError> {
    let descriptors = describe(smiles)?;
    Ok(AdmetReport::from_descriptors(&descriptors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(molecular_weight: f64, logp: f64, tpsa: f64, rotatable_bonds: usize) -> DescriptorSet {
        DescriptorSet { molecular_weight, logp, tpsa, rotatable_bonds, h_bond_donors: 1, h_bond_acceptors: 3 }
    }

    #[test]
    fn toxicity_boundary_is_strict_on_tpsa() {
        assert_eq!(toxicity_risk(&set(300.0, 4.9, 76.0, 2)), Level::Low);
        assert_eq!(toxicity_risk(&set(300.0, 4.9, 75.0, 2)), Level::High);
        assert_eq!(toxicity_risk(&set(300.0, 5.0, 120.0, 2)), Level::High);
        assert_eq!(toxicity_risk(&set(300.0, 1.0, 0.0, 2)), Level::High);
    }

    #[test]
    fn absorption_rules() {
        assert_eq!(intestinal_absorption(&set(300.0, 2.0, 139.9, 9)), Level::High);
        assert_eq!(intestinal_absorption(&set(300.0, 2.0, 140.0, 9)), Level::Low);
        assert_eq!(intestinal_absorption(&set(300.0, 2.0, 60.0, 10)), Level::Low);
        assert_eq!(blood_brain_barrier(&set(399.9, 4.9, 89.9, 0)), Level::High);
        assert_eq!(blood_brain_barrier(&set(400.0, 4.9, 89.9, 0)), Level::Low);
        assert_eq!(blood_brain_barrier(&set(300.0, 2.0, 90.0, 0)), Level::Low);
    }

    #[test]
    fn metabolism_follows_rule_of_five() {
        assert_eq!(metabolism_risk(&set(500.0, 5.0, 10.0, 0)), Level::Low);
        assert_eq!(metabolism_risk(&set(500.001, 5.0, 10.0, 0)), Level::High);
    }

    #[test]
    fn aspirin_report() {
        let report = evaluate_admet("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let expected = AdmetReport {
            absorption: Absorption {
                intestinal_absorption: Level::High,
                blood_brain_barrier: Level::High,
                tpsa: 63.6,
                rotatable_bonds: 3,
            },
            metabolism: Metabolism { risk_level: Level::Low, molecular_weight: 180.04, logp: 1.31 },
            toxicity: Toxicity { risk_level: Level::High, hbd: 1, hba: 3 },
            message: "ADMET properties predicted from computed molecular descriptors".to_string(),
        };
        assert_eq!(report, expected);
    }

    #[test]
    fn wire_names() {
        let json = serde_json::to_value(AdmetReport::from_descriptors(&set(250.123, 2.345, 80.456, 4))).unwrap();
        assert_eq!(json["absorption"]["TPSA"], 80.46);
        assert_eq!(json["absorption"]["intestinal_absorption"], "High");
        assert_eq!(json["metabolism"]["logP"], 2.35);
        assert_eq!(json["metabolism"]["molecular_weight"], 250.12);
        assert_eq!(json["toxicity"]["risk_level"], "Low");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(evaluate_admet(""), Err(EvaluationError::InvalidStructure(_))));
    }
}
