//! Error types for the molecules crate.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SmilesError {
    #[error("empty SMILES")]
    Empty,

    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("unterminated bracket atom starting at position {0}")]
    UnclosedBracket(usize),

    #[error("unclosed branch")]
    UnclosedBranch,

    #[error("unmatched ')' at position {0}")]
    UnmatchedParenthesis(usize),

    #[error("ring bond {0} was never closed")]
    UnclosedRing(u16),

    #[error("ring bond {0} closes onto an already bonded atom")]
    InvalidRingBond(u16),

    #[error("ring bond {0} has conflicting bond orders")]
    ConflictingRingBond(u16),

    #[error("bond symbol at position {0} is not followed by an atom")]
    DanglingBond(usize),

    #[error("unknown element '{0}'")]
    UnknownElement(String),

    #[error("formal charge at position {0} is out of range")]
    ChargeOutOfRange(usize),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("explicit valence {valence} for atom {atom} ({element}) is greater than permitted")]
    Valence { atom: usize, element: &'static str, valence: u8 },

    #[error("can't kekulize aromatic system")]
    Kekulize,

    #[error("non-ring atom {0} marked aromatic")]
    NonRingAromatic(usize),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoleculeError {
    #[error(transparent)]
    Smiles(#[from] SmilesError),

    #[error(transparent)]
    Sanitize(#[from] SanitizeError),

    #[error("molecule was edited and must be sanitized first")]
    Unsanitized,

    #[error("unknown element '{0}'")]
    UnknownElement(String),

    #[error("atom index {0} out of range")]
    AtomOutOfRange(usize),

    #[error("bond index {0} out of range")]
    BondOutOfRange(usize),

    #[error("atoms {0} and {1} cannot be bonded")]
    DuplicateBond(usize, usize),
}

/// Failure of the drug-likeness or ADMET evaluators.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("Invalid SMILES string")]
    InvalidStructure(#[source] MoleculeError),
}

/// Failure of the fragment assembler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Invalid seed SMILES string")]
    InvalidSeed(#[source] MoleculeError),

    #[error("Failed to generate valid drug-like molecules. Try different parameters or seed SMILES.")]
    NoValidCandidates,
}

/// Failure talking to the remote binding-affinity model.
#[derive(Debug, Error)]
pub enum BindingError {
    #[error("binding model is not configured")]
    NotConfigured,

    #[error("binding model request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("binding model error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected binding model response: {0}")]
    Serde(#[from] serde_json::Error),
}
