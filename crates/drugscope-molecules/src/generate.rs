//! Fragment-based molecule generation and seed mutation.
//!
//! Every attempt produces an explicit [`Attempt`]; skipped attempts are
//! logged at debug level and never abort the run.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GenerationError, MoleculeError};
use crate::fragments::{SCRATCH_FRAGMENTS, SEED_ATOMS, SEED_FRAGMENTS};
use crate::lipinski::{describe, lipinski_verdict, Verdict};
use crate::mol::{BondOrder, Molecule};

pub const DEFAULT_ATTEMPTS_PER_SAMPLE: usize = 10;

/// Minimum atom count a seed keeps before the remove-atom edit applies.
const MIN_ATOMS_FOR_REMOVAL: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generated_molecules: Vec<String>,
    pub num_molecules: usize,
    pub message: String,
}

impl GenerationReport {
    fn new(generated_molecules: Vec<String>) -> Self {
        Self {
            num_molecules: generated_molecules.len(),
            generated_molecules,
            message: "Generated drug-like molecules that pass Lipinski's Rule of Five".to_string(),
        }
    }
}

/// Outcome of a single generation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt {
    Accepted(String),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    BaseFragment(&'static str),
    Edit(MoleculeError),
    Sanitize(MoleculeError),
    Evaluation(String),
    NotDrugLike(String),
    Duplicate(String),
}

/// One random edit applied to a copy of the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    AddAtom,
    RemoveAtom,
    ModifyBond,
    AddFragment,
}

/// Scratch-mode result before it becomes a report.
struct Assembly {
    accepted: Vec<String>,
    attempts: usize,
}

const EDITS: [Edit; 4] = [Edit::AddAtom, Edit::RemoveAtom, Edit::ModifyBond, Edit::AddFragment];

#[derive(Debug, Clone)]
pub struct Generator {
    attempts_per_sample: usize,
}

impl Default for Generator {
    fn default() -> Self {
        Self { attempts_per_sample: DEFAULT_ATTEMPTS_PER_SAMPLE }
    }
}

impl Generator {
    pub fn new(attempts_per_sample: usize) -> Self {
        Self { attempts_per_sample: attempts_per_sample.max(1) }
    }

    /// Generate up to `num_samples` drug-like molecules, mutating `seed`
    /// when given and assembling scratch fragments otherwise.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        num_samples: usize,
        seed: Option<&str>,
        rng: &mut R,
    ) -> Result<GenerationReport, GenerationError> {
        let accepted = match seed {
            Some(seed) => self.mutate_seed(num_samples, seed, rng)?,
            None => self.assemble(num_samples, rng).accepted,
        };
        if accepted.is_empty() {
            return Err(GenerationError::NoValidCandidates);
        }
        info!(requested = num_samples, generated = accepted.len(), seeded = seed.is_some(), "Generation finished");
        Ok(GenerationReport::new(accepted))
    }

    fn assemble<R: Rng + ?Sized>(&self, num_samples: usize, rng: &mut R) -> Assembly {
        let max_attempts = num_samples.saturating_mul(self.attempts_per_sample);
        let mut accepted: Vec<String> = Vec::new();
        let mut attempts = 0;
        while accepted.len() < num_samples && attempts < max_attempts {
            attempts += 1;
            match scratch_attempt(rng, &accepted) {
                Attempt::Accepted(smiles) => accepted.push(smiles),
                Attempt::Skipped(reason) => debug!(attempt = attempts, ?reason, "Scratch attempt skipped"),
            }
        }
        Assembly { accepted, attempts }
    }

    fn mutate_seed<R: Rng + ?Sized>(
        &self,
        num_samples: usize,
        seed: &str,
        rng: &mut R,
    ) -> Result<Vec<String>, GenerationError> {
        let seed = Molecule::from_smiles(seed).map_err(GenerationError::InvalidSeed)?;
        let mut accepted = Vec::new();
        for sample in 0..num_samples {
            match seed_attempt(&seed, rng) {
                Attempt::Accepted(smiles) => accepted.push(smiles),
                Attempt::Skipped(reason) => debug!(sample, ?reason, "Seed mutation skipped"),
            }
        }
        Ok(accepted)
    }
}

/// Generate with the default attempt budget.
pub fn generate_candidates<R: Rng + ?Sized>(
    num_samples: usize,
    seed: Option<&str>,
    rng: &mut R,
) -> Result<GenerationReport, GenerationError> {
    Generator::default().generate(num_samples, seed, rng)
}

fn scratch_attempt<R: Rng + ?Sized>(rng: &mut R, accepted: &[String]) -> Attempt {
    let count = rng.gen_range(2..=4);
    let mut picked: Vec<&'static str> = SCRATCH_FRAGMENTS.choose_multiple(rng, count).copied().collect();
    picked.shuffle(rng);

    let Some((&first, rest)) = picked.split_first() else {
        return Attempt::Skipped(SkipReason::BaseFragment(""));
    };
    let Ok(mut mol) = Molecule::from_smiles(first) else {
        return Attempt::Skipped(SkipReason::BaseFragment(first));
    };
    // Unusable fragments after the base are left out.
    for fragment in rest {
        if let Ok(part) = Molecule::from_smiles(fragment) {
            mol.combine(&part);
        }
    }
    if let Err(err) = mol.sanitize() {
        return Attempt::Skipped(SkipReason::Sanitize(err.into()));
    }
    match judge(&mol) {
        Attempt::Accepted(smiles) if accepted.contains(&smiles) => Attempt::Skipped(SkipReason::Duplicate(smiles)),
        outcome => outcome,
    }
}

fn seed_attempt<R: Rng + ?Sized>(seed: &Molecule, rng: &mut R) -> Attempt {
    let mut mol = seed.clone();
    let edit = EDITS.choose(rng).copied().unwrap_or(Edit::AddAtom);
    if let Err(err) = apply_edit(&mut mol, edit, rng) {
        return Attempt::Skipped(SkipReason::Edit(err));
    }
    if let Err(err) = mol.sanitize() {
        return Attempt::Skipped(SkipReason::Sanitize(err.into()));
    }
    judge(&mol)
}

fn apply_edit<R: Rng + ?Sized>(mol: &mut Molecule, edit: Edit, rng: &mut R) -> Result<(), MoleculeError> {
    match edit {
        Edit::AddAtom => {
            let anchor = rng.gen_range(0..mol.atom_count());
            let symbol = SEED_ATOMS.choose(rng).copied().unwrap_or("C");
            let added = mol.add_atom(symbol)?;
            mol.add_bond(anchor, added, BondOrder::Single)?;
        }
        Edit::RemoveAtom => {
            if mol.atom_count() > MIN_ATOMS_FOR_REMOVAL {
                let atom = rng.gen_range(0..mol.atom_count());
                mol.remove_atom(atom)?;
            }
        }
        Edit::ModifyBond => {
            if mol.bond_count() > 0 {
                let bond = rng.gen_range(0..mol.bond_count());
                let order = if rng.gen_bool(0.5) { BondOrder::Single } else { BondOrder::Double };
                mol.set_bond_order(bond, order)?;
            }
        }
        Edit::AddFragment => {
            let fragment = SEED_FRAGMENTS.choose(rng).copied().unwrap_or("CC");
            let part = Molecule::from_smiles(fragment)?;
            mol.combine(&part);
        }
    }
    Ok(())
}

/// Serialize and re-evaluate from the canonical string.
fn judge(mol: &Molecule) -> Attempt {
    let smiles = match mol.to_smiles() {
        Ok(smiles) => smiles,
        Err(err) => return Attempt::Skipped(SkipReason::Sanitize(err)),
    };
    match describe(&smiles) {
        Ok(descriptors) if lipinski_verdict(&descriptors) == Verdict::Pass => Attempt::Accepted(smiles),
        Ok(_) => Attempt::Skipped(SkipReason::NotDrugLike(smiles)),
        Err(_) => Attempt::Skipped(SkipReason::Evaluation(smiles)),
    }
}
