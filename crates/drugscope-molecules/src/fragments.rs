//! Building blocks for fragment-based generation.

/// Fragments combined when generating from scratch.
pub static SCRATCH_FRAGMENTS: &[&str] = &[
    "CC", "c1ccccc1", "C1CCCCC1", "c1ccncc1",
    "CC(=O)N", "CCO", "CCN", "CC(=O)O",
    "CN", "CF", "CCl", "CBr",
    "c1cccnc1", "c1ccco1", "c1ccs1",
];

/// Fragments appended to a seed by the add-fragment edit.
pub static SEED_FRAGMENTS: &[&str] = &["CC", "CN", "CO", "CF", "CCl", "c1ccccc1"];

/// Atoms attached to a seed by the add-atom edit.
pub static SEED_ATOMS: &[&str] = &["C", "N", "O"];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mol::Molecule;

    #[test]
    fn fragment_counts() {
        assert_eq!(SCRATCH_FRAGMENTS.len(), 15);
        assert_eq!(SEED_FRAGMENTS.len(), 6);
    }

    #[test]
    fn only_the_four_membered_thiophene_is_unusable() {
        let broken: Vec<_> = SCRATCH_FRAGMENTS
            .iter()
            .filter(|s| Molecule::from_smiles(s).is_err())
            .collect();
        assert_eq!(broken, vec![&"c1ccs1"]);
        assert!(SEED_FRAGMENTS.iter().all(|s| Molecule::from_smiles(s).is_ok()));
    }
}
