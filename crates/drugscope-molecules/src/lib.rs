//! Drugscope Molecules - SMILES toolkit and rule-based drug evaluation.
//!
//! This crate covers everything that happens to a structure string:
//! 1. Parsing and sanitizing SMILES into a [`Molecule`]
//! 2. Canonical SMILES output
//! 3. Descriptor calculation (exact mass, Crippen logP, TPSA, H-bond counts)
//! 4. Lipinski and ADMET rule evaluation
//! 5. Fragment-based generation and seed mutation
//! 6. The remote binding-affinity client

pub mod admet;
pub mod binding;
pub mod descriptors;
pub mod element;
pub mod error;
pub mod fragments;
pub mod generate;
pub mod lipinski;
pub mod mol;

mod sanitize;
mod smiles;
mod writer;

pub use admet::{evaluate_admet, AdmetReport, Level};
pub use binding::{BindingPredictor, RemoteBindingModel};
pub use descriptors::DescriptorSet;
pub use error::{BindingError, EvaluationError, GenerationError, MoleculeError, SanitizeError, SmilesError};
pub use generate::{generate_candidates, GenerationReport, Generator};
pub use lipinski::{evaluate_drug_likeness, DrugLikenessReport, Verdict};
pub use mol::{Atom, Bond, BondOrder, Molecule};
