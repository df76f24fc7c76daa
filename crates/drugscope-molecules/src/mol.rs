//! Molecule graph: atoms, bonds and the in-place edits used by the generator.

use crate::element::{self, Element};
use crate::error::{MoleculeError, SanitizeError};
use crate::{sanitize, smiles, writer};

/// Kekulé bond order. `Aromatic` only exists between parsing and
/// kekulization; a sanitized molecule never carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Contribution to the valence of each end atom.
    pub fn valence(self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: &'static Element,
    pub charge: i8,
    pub isotope: Option<u16>,
    /// Set by the parser for lowercase symbols, then by aromaticity perception.
    pub aromatic: bool,
    /// Written in brackets: the hydrogen count is fixed.
    pub bracket: bool,
    /// Hydrogens given in brackets or folded in from explicit `[H]` atoms.
    pub explicit_hydrogens: u8,
    /// Hydrogens filled in by the valence model.
    pub implicit_hydrogens: u8,
}

impl Atom {
    /// A plain organic-subset atom with no charge.
    pub fn new(element: &'static Element) -> Self {
        Self {
            element,
            charge: 0,
            isotope: None,
            aromatic: false,
            bracket: false,
            explicit_hydrogens: 0,
            implicit_hydrogens: 0,
        }
    }

    pub fn total_hydrogens(&self) -> u8 {
        self.explicit_hydrogens.saturating_add(self.implicit_hydrogens)
    }

    /// Mass of the atom itself, hydrogens excluded.
    pub fn mass(&self) -> f64 {
        match self.isotope {
            Some(iso) => f64::from(iso),
            None => self.element.mass,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    pub begin: usize,
    pub end: usize,
    pub order: BondOrder,
    /// Set by aromaticity perception.
    pub aromatic: bool,
    /// Set by ring perception: the bond is not a bridge.
    pub in_ring: bool,
}

impl Bond {
    pub fn other(&self, atom: usize) -> usize {
        if self.begin == atom {
            self.end
        } else {
            self.begin
        }
    }
}

/// A molecule handle. Only obtainable through [`Molecule::from_smiles`],
/// so every handle has been parsed and sanitized at least once. Edits mark
/// it dirty until [`Molecule::sanitize`] succeeds again.
#[derive(Debug, Clone)]
pub struct Molecule {
    pub(crate) atoms: Vec<Atom>,
    pub(crate) bonds: Vec<Bond>,
    /// Per atom: (neighbour, bond index).
    adjacency: Vec<Vec<(usize, usize)>>,
    pub(crate) dirty: bool,
}

impl Molecule {
    pub(crate) fn from_parts(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut mol = Self { atoms, bonds, adjacency: Vec::new(), dirty: true };
        mol.rebuild_adjacency();
        mol
    }

    /// Parse and sanitize a SMILES string.
    pub fn from_smiles(input: &str) -> Result<Self, MoleculeError> {
        let mut mol = smiles::parse(input)?;
        sanitize::sanitize_parsed(&mut mol)?;
        Ok(mol)
    }

    /// Canonical SMILES of a sanitized molecule.
    pub fn to_smiles(&self) -> Result<String, MoleculeError> {
        self.ensure_sanitized()?;
        Ok(writer::write_canonical(self))
    }

    /// Re-run ring perception, hydrogen assignment, valence checks and
    /// aromaticity perception after edits.
    pub fn sanitize(&mut self) -> Result<(), SanitizeError> {
        sanitize::sanitize_edited(self)
    }

    pub fn ensure_sanitized(&self) -> Result<(), MoleculeError> {
        if self.dirty {
            Err(MoleculeError::Unsanitized)
        } else {
            Ok(())
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn atom(&self, index: usize) -> &Atom {
        &self.atoms[index]
    }

    pub fn bond(&self, index: usize) -> &Bond {
        &self.bonds[index]
    }

    /// Neighbours of an atom as (neighbour, bond index) pairs.
    pub fn neighbors(&self, atom: usize) -> &[(usize, usize)] {
        &self.adjacency[atom]
    }

    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    /// Sum of bond valences plus explicit hydrogens.
    pub fn explicit_valence(&self, atom: usize) -> u8 {
        self.adjacency[atom]
            .iter()
            .map(|&(_, b)| self.bonds[b].order.valence())
            .fold(self.atoms[atom].explicit_hydrogens, u8::saturating_add)
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.adjacency[a].iter().find(|&&(n, _)| n == b).map(|&(_, bond)| bond)
    }

    pub fn is_ring_atom(&self, atom: usize) -> bool {
        self.adjacency[atom].iter().any(|&(_, b)| self.bonds[b].in_ring)
    }

    // ── Edits ──────────────────────────────────────────────────────────────

    /// Disjoint union: append `other`'s atoms and bonds with shifted indices.
    pub fn combine(&mut self, other: &Molecule) {
        let offset = self.atoms.len();
        self.atoms.extend(other.atoms.iter().cloned());
        self.bonds.extend(other.bonds.iter().map(|b| Bond {
            begin: b.begin + offset,
            end: b.end + offset,
            ..b.clone()
        }));
        self.dirty = true;
        self.rebuild_adjacency();
    }

    /// Append an unbonded neutral atom and return its index.
    pub fn add_atom(&mut self, symbol: &str) -> Result<usize, MoleculeError> {
        let element = element::by_symbol(symbol)
            .ok_or_else(|| MoleculeError::UnknownElement(symbol.to_string()))?;
        self.atoms.push(Atom::new(element));
        self.adjacency.push(Vec::new());
        self.dirty = true;
        Ok(self.atoms.len() - 1)
    }

    pub fn add_bond(&mut self, begin: usize, end: usize, order: BondOrder) -> Result<usize, MoleculeError> {
        let n = self.atoms.len();
        if begin >= n || end >= n {
            return Err(MoleculeError::AtomOutOfRange(begin.max(end)));
        }
        if begin == end || self.bond_between(begin, end).is_some() {
            return Err(MoleculeError::DuplicateBond(begin, end));
        }
        let index = self.bonds.len();
        self.bonds.push(Bond { begin, end, order, aromatic: false, in_ring: false });
        self.adjacency[begin].push((end, index));
        self.adjacency[end].push((begin, index));
        self.dirty = true;
        Ok(index)
    }

    /// Remove an atom and its bonds; later atoms shift down by one.
    pub fn remove_atom(&mut self, atom: usize) -> Result<(), MoleculeError> {
        if atom >= self.atoms.len() {
            return Err(MoleculeError::AtomOutOfRange(atom));
        }
        self.atoms.remove(atom);
        self.bonds.retain(|b| b.begin != atom && b.end != atom);
        for bond in &mut self.bonds {
            if bond.begin > atom {
                bond.begin -= 1;
            }
            if bond.end > atom {
                bond.end -= 1;
            }
        }
        self.dirty = true;
        self.rebuild_adjacency();
        Ok(())
    }

    pub fn set_bond_order(&mut self, bond: usize, order: BondOrder) -> Result<(), MoleculeError> {
        let b = self.bonds.get_mut(bond).ok_or(MoleculeError::BondOutOfRange(bond))?;
        b.order = order;
        b.aromatic = false;
        self.dirty = true;
        Ok(())
    }

    pub(crate) fn rebuild_adjacency(&mut self) {
        let mut adjacency = vec![Vec::new(); self.atoms.len()];
        for (i, b) in self.bonds.iter().enumerate() {
            adjacency[b.begin].push((b.end, i));
            adjacency[b.end].push((b.begin, i));
        }
        self.adjacency = adjacency;
    }
}
