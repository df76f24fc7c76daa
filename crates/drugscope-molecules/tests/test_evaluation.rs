//! Drug-likeness and ADMET evaluation through the public entry points.

use drugscope_molecules::{evaluate_admet, evaluate_drug_likeness, EvaluationError, Level, Molecule, Verdict};
use pretty_assertions::assert_eq;

#[test]
fn empty_input_is_rejected_by_both_evaluators() {
    assert!(matches!(evaluate_drug_likeness(""), Err(EvaluationError::InvalidStructure(_))));
    assert!(matches!(evaluate_admet(""), Err(EvaluationError::InvalidStructure(_))));
}

#[test]
fn caffeine() {
    let report = evaluate_drug_likeness("CN1C=NC2=C1C(=O)N(C(=O)N2C)C").unwrap();
    assert_eq!(report.drug_likeness, Verdict::Pass);
    assert_eq!(report.molecular_weight, 194.08);
    assert_eq!(report.hbd, 0);

    let admet = evaluate_admet("CN1C=NC2=C1C(=O)N(C(=O)N2C)C").unwrap();
    assert_eq!(admet.absorption.intestinal_absorption, Level::High);
    assert_eq!(admet.absorption.rotatable_bonds, 0);
}

#[test]
fn long_alkane_fails_on_logp() {
    let report = evaluate_drug_likeness("CCCCCCCCCCCCCCCCCCCC").unwrap();
    assert_eq!(report.drug_likeness, Verdict::Fail);
    assert!(report.logp > 5.0);
    let admet = evaluate_admet("CCCCCCCCCCCCCCCCCCCC").unwrap();
    assert_eq!(admet.metabolism.risk_level, Level::High);
    assert_eq!(admet.absorption.blood_brain_barrier, Level::Low);
}

#[test]
fn canonical_form_does_not_depend_on_atom_order() {
    let pairs = [
        ("OCC(=O)O", "OC(=O)CO"),
        ("c1ccc(cc1)O", "Oc1ccccc1"),
        ("CC(=O)Nc1ccc(O)cc1", "Oc1ccc(NC(C)=O)cc1"),
    ];
    for (a, b) in pairs {
        let a = Molecule::from_smiles(a).unwrap().to_smiles().unwrap();
        let b = Molecule::from_smiles(b).unwrap().to_smiles().unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn evaluations_agree_on_equivalent_inputs() {
    let a = evaluate_admet("C1=CC=CC=C1O").unwrap();
    let b = evaluate_admet("Oc1ccccc1").unwrap();
    assert_eq!(a, b);
}

#[test]
fn oversized_charges_and_hydrogen_counts_are_invalid() {
    let inputs = [
        format!("[C{}]", "+".repeat(130)),
        format!("[N{}]", "+".repeat(129)),
        format!("C{}", "([H])".repeat(256)),
        format!("C{}", "([H])".repeat(260)),
    ];
    for smiles in &inputs {
        assert!(matches!(evaluate_drug_likeness(smiles), Err(EvaluationError::InvalidStructure(_))));
        assert!(matches!(evaluate_admet(smiles), Err(EvaluationError::InvalidStructure(_))));
    }
}
