//! SMILES reader.
//!
//! Produces a raw [`Molecule`] whose aromatic bonds still carry
//! [`BondOrder::Aromatic`]; the sanitizer turns it into a usable handle.
//! Stereo marks (`@`, `/`, `\`) are accepted and dropped.

use std::collections::BTreeMap;

use crate::element::{self, Element};
use crate::error::SmilesError;
use crate::mol::{Atom, Bond, BondOrder, Molecule};

/// Largest formal charge magnitude a bracket atom may carry.
const MAX_CHARGE: i8 = 15;

/// Parse a SMILES string into an unsanitized molecule.
pub(crate) fn parse(input: &str) -> Result<Molecule, SmilesError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(SmilesError::Empty);
    }
    let mut parser = Parser::new(input);
    parser.run()?;
    Ok(Molecule::from_parts(parser.atoms, parser.bonds))
}

struct RingOpening {
    atom: usize,
    order: Option<BondOrder>,
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// Atom the next atom bonds to.
    prev: Option<usize>,
    branches: Vec<usize>,
    /// Explicit bond symbol waiting for its second atom, with its position.
    pending: Option<(BondOrder, usize)>,
    rings: BTreeMap<u16, RingOpening>,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            prev: None,
            branches: Vec::new(),
            pending: None,
            rings: BTreeMap::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn unexpected(&self) -> SmilesError {
        match self.peek() {
            Some(ch) => SmilesError::UnexpectedCharacter { ch, position: self.pos },
            None => SmilesError::UnexpectedCharacter { ch: ' ', position: self.pos },
        }
    }

    fn run(&mut self) -> Result<(), SmilesError> {
        while let Some(ch) = self.peek() {
            match ch {
                '(' => {
                    let prev = self.prev.ok_or_else(|| self.unexpected())?;
                    if let Some((_, at)) = self.pending {
                        return Err(SmilesError::DanglingBond(at));
                    }
                    self.branches.push(prev);
                    self.pos += 1;
                }
                ')' => {
                    if let Some((_, at)) = self.pending {
                        return Err(SmilesError::DanglingBond(at));
                    }
                    let back = self
                        .branches
                        .pop()
                        .ok_or(SmilesError::UnmatchedParenthesis(self.pos))?;
                    self.prev = Some(back);
                    self.pos += 1;
                }
                '.' => {
                    if let Some((_, at)) = self.pending {
                        return Err(SmilesError::DanglingBond(at));
                    }
                    self.prev = None;
                    self.pos += 1;
                }
                '-' | '=' | '#' | ':' | '/' | '\\' => {
                    if self.prev.is_none() || self.pending.is_some() {
                        return Err(self.unexpected());
                    }
                    let order = match ch {
                        '=' => BondOrder::Double,
                        '#' => BondOrder::Triple,
                        ':' => BondOrder::Aromatic,
                        _ => BondOrder::Single,
                    };
                    self.pending = Some((order, self.pos));
                    self.pos += 1;
                }
                '0'..='9' | '%' => self.ring_bond()?,
                '[' => {
                    let atom = self.bracket_atom()?;
                    self.push_atom(atom);
                }
                _ => {
                    let atom = self.organic_atom()?;
                    self.push_atom(atom);
                }
            }
        }

        if let Some((_, at)) = self.pending {
            return Err(SmilesError::DanglingBond(at));
        }
        if !self.branches.is_empty() {
            return Err(SmilesError::UnclosedBranch);
        }
        if let Some((&number, _)) = self.rings.iter().next() {
            return Err(SmilesError::UnclosedRing(number));
        }
        if self.atoms.is_empty() {
            return Err(SmilesError::Empty);
        }
        Ok(())
    }

    fn default_order(&self, a: usize, b: usize) -> BondOrder {
        if self.atoms[a].aromatic && self.atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn push_atom(&mut self, atom: Atom) {
        let index = self.atoms.len();
        self.atoms.push(atom);
        if let Some(prev) = self.prev {
            let order = match self.pending.take() {
                Some((order, _)) => order,
                None => self.default_order(prev, index),
            };
            self.bonds.push(Bond { begin: prev, end: index, order, aromatic: false, in_ring: false });
        }
        self.prev = Some(index);
    }

    fn ring_bond(&mut self) -> Result<(), SmilesError> {
        let Some(current) = self.prev else {
            return Err(self.unexpected());
        };
        let number = match self.peek() {
            Some('%') => {
                let tens = self.peek_at(1).and_then(|c| c.to_digit(10));
                let ones = self.peek_at(2).and_then(|c| c.to_digit(10));
                match (tens, ones) {
                    (Some(t), Some(o)) => {
                        self.pos += 3;
                        (t * 10 + o) as u16
                    }
                    _ => return Err(self.unexpected()),
                }
            }
            Some(c) => {
                self.pos += 1;
                c.to_digit(10).map(|d| d as u16).ok_or(SmilesError::UnexpectedCharacter {
                    ch: c,
                    position: self.pos - 1,
                })?
            }
            None => return Err(self.unexpected()),
        };
        let order = self.pending.take().map(|(order, _)| order);

        match self.rings.remove(&number) {
            Some(opening) => {
                let partner = opening.atom;
                let duplicate = self
                    .bonds
                    .iter()
                    .any(|b| (b.begin == partner && b.end == current) || (b.begin == current && b.end == partner));
                if partner == current || duplicate {
                    return Err(SmilesError::InvalidRingBond(number));
                }
                let order = match (opening.order, order) {
                    (Some(a), Some(b)) if a != b => return Err(SmilesError::ConflictingRingBond(number)),
                    (Some(a), _) | (None, Some(a)) => a,
                    (None, None) => self.default_order(partner, current),
                };
                self.bonds.push(Bond { begin: partner, end: current, order, aromatic: false, in_ring: false });
            }
            None => {
                self.rings.insert(number, RingOpening { atom: current, order });
            }
        }
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<Atom, SmilesError> {
        let ch = self.peek().ok_or_else(|| self.unexpected())?;
        let (symbol, aromatic, width) = match ch {
            'C' if self.peek_at(1) == Some('l') => ("Cl", false, 2),
            'B' if self.peek_at(1) == Some('r') => ("Br", false, 2),
            'B' => ("B", false, 1),
            'C' => ("C", false, 1),
            'N' => ("N", false, 1),
            'O' => ("O", false, 1),
            'P' => ("P", false, 1),
            'S' => ("S", false, 1),
            'F' => ("F", false, 1),
            'I' => ("I", false, 1),
            'b' => ("B", true, 1),
            'c' => ("C", true, 1),
            'n' => ("N", true, 1),
            'o' => ("O", true, 1),
            'p' => ("P", true, 1),
            's' => ("S", true, 1),
            _ => return Err(self.unexpected()),
        };
        let element = element::by_symbol(symbol).ok_or_else(|| SmilesError::UnknownElement(symbol.to_string()))?;
        self.pos += width;
        let mut atom = Atom::new(element);
        atom.aromatic = aromatic;
        Ok(atom)
    }

    fn read_number(&mut self) -> Option<u32> {
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(d);
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }

    fn bracket_atom(&mut self) -> Result<Atom, SmilesError> {
        let start = self.pos;
        self.pos += 1;
        let isotope = self.read_number().map(|n| n.min(u16::MAX as u32) as u16);

        let (element, aromatic) = self.bracket_symbol()?;

        // Chirality: @, @@, or @TH1-style classes.
        if self.peek() == Some('@') {
            while self.peek() == Some('@') {
                self.pos += 1;
            }
            if let (Some(a), Some(b)) = (self.peek(), self.peek_at(1)) {
                let class = matches!((a, b), ('T', 'H') | ('A', 'L') | ('S', 'P') | ('T', 'B') | ('O', 'H'));
                if class && self.peek_at(2).is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 2;
                    self.read_number();
                }
            }
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some('H') {
            self.pos += 1;
            hydrogens = self.read_number().map(|n| n.min(u8::MAX as u32) as u8).unwrap_or(1);
        }

        let mut charge: i8 = 0;
        if let Some(sign @ ('+' | '-')) = self.peek() {
            let at = self.pos;
            self.pos += 1;
            let magnitude = match self.read_number() {
                Some(n) => n as usize,
                None => {
                    let mut count = 1usize;
                    while self.peek() == Some(sign) {
                        count += 1;
                        self.pos += 1;
                    }
                    count
                }
            };
            if magnitude > MAX_CHARGE as usize {
                return Err(SmilesError::ChargeOutOfRange(at));
            }
            let magnitude = magnitude as i8;
            charge = if sign == '+' { magnitude } else { -magnitude };
        }

        if self.peek() == Some(':') {
            self.pos += 1;
            self.read_number().ok_or_else(|| self.unexpected())?;
        }

        match self.peek() {
            Some(']') => self.pos += 1,
            Some(_) => return Err(self.unexpected()),
            None => return Err(SmilesError::UnclosedBracket(start)),
        }

        Ok(Atom {
            element,
            charge,
            isotope,
            aromatic,
            bracket: true,
            explicit_hydrogens: hydrogens,
            implicit_hydrogens: 0,
        })
    }

    fn bracket_symbol(&mut self) -> Result<(&'static Element, bool), SmilesError> {
        let first = self.peek().ok_or_else(|| self.unexpected())?;
        let second = self.peek_at(1);
        if first.is_ascii_uppercase() {
            if let Some(s) = second.filter(|c| c.is_ascii_lowercase()) {
                let two: String = [first, s].iter().collect();
                if let Some(element) = element::by_symbol(&two) {
                    self.pos += 2;
                    return Ok((element, false));
                }
            }
            let one = first.to_string();
            let element = element::by_symbol(&one).ok_or(SmilesError::UnknownElement(one))?;
            self.pos += 1;
            return Ok((element, false));
        }
        if first.is_ascii_lowercase() {
            if let Some(s) = second {
                let two: String = [first, s].iter().collect();
                if matches!(two.as_str(), "se" | "as" | "te") {
                    let upper = capitalize(&two);
                    if let Some(element) = element::by_symbol(&upper) {
                        self.pos += 2;
                        return Ok((element, true));
                    }
                }
            }
            if matches!(first, 'b' | 'c' | 'n' | 'o' | 'p' | 's') {
                let upper = first.to_ascii_uppercase().to_string();
                let element = element::by_symbol(&upper).ok_or(SmilesError::UnknownElement(upper))?;
                self.pos += 1;
                return Ok((element, true));
            }
        }
        if first == '*' {
            return Err(SmilesError::UnknownElement("*".to_string()));
        }
        Err(self.unexpected())
    }
}

fn capitalize(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chain_with_branches() {
        let mol = parse("CC(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.bond_count(), 3);
        assert_eq!(mol.bond(1).order, BondOrder::Double);
        assert_eq!(mol.bond(2).begin, 1);
    }

    #[test]
    fn aromatic_ring_bonds_are_pending() {
        let mol = parse("c1ccccc1").unwrap();
        assert_eq!(mol.bond_count(), 6);
        assert!(mol.bonds().iter().all(|b| b.order == BondOrder::Aromatic));
        let biphenyl = parse("c1ccccc1-c1ccccc1").unwrap();
        assert_eq!(biphenyl.bond(6).order, BondOrder::Single);
    }

    #[test]
    fn bracket_atoms() {
        let mol = parse("[13CH3][NH3+].[O-2]").unwrap();
        let c = mol.atom(0);
        assert_eq!(c.isotope, Some(13));
        assert_eq!(c.explicit_hydrogens, 3);
        assert!(c.bracket);
        assert_eq!(mol.atom(1).charge, 1);
        assert_eq!(mol.atom(2).charge, -2);
        assert_eq!(mol.bond_count(), 1);

        let chiral = parse("N[C@@H](C)C(=O)O").unwrap();
        assert_eq!(chiral.atom(1).explicit_hydrogens, 1);
        let double_minus = parse("[O--]").unwrap();
        assert_eq!(double_minus.atom(0).charge, -2);
        let selenophene = parse("[se]1cccc1").unwrap();
        assert!(selenophene.atom(0).aromatic);
        assert_eq!(selenophene.atom(0).element.symbol, "Se");
    }

    #[test]
    fn two_digit_ring_closures() {
        let mol = parse("C%12CC%12").unwrap();
        assert_eq!(mol.bond_count(), 3);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse("").unwrap_err(), SmilesError::Empty);
        assert_eq!(parse("   ").unwrap_err(), SmilesError::Empty);
        assert_eq!(parse("C(C").unwrap_err(), SmilesError::UnclosedBranch);
        assert_eq!(parse("CC)").unwrap_err(), SmilesError::UnmatchedParenthesis(2));
        assert_eq!(parse("C1CC").unwrap_err(), SmilesError::UnclosedRing(1));
        assert_eq!(parse("CC=").unwrap_err(), SmilesError::DanglingBond(2));
        assert_eq!(parse("C11").unwrap_err(), SmilesError::InvalidRingBond(1));
        assert_eq!(parse("C=1CC-1").unwrap_err(), SmilesError::ConflictingRingBond(1));
        assert_eq!(parse("[Xx]").unwrap_err(), SmilesError::UnknownElement("X".to_string()));
        assert_eq!(parse("[C").unwrap_err(), SmilesError::UnclosedBracket(0));
        assert!(matches!(parse("not_a_smiles"), Err(SmilesError::UnexpectedCharacter { .. })));
        assert!(matches!(parse("=C"), Err(SmilesError::UnexpectedCharacter { ch: '=', position: 0 })));
    }

    #[test]
    fn charge_magnitude_is_bounded() {
        assert_eq!(parse("[Fe+15]").unwrap().atom(0).charge, 15);
        assert_eq!(parse("[O-15]").unwrap().atom(0).charge, -15);
        assert_eq!(parse("[Fe+16]").unwrap_err(), SmilesError::ChargeOutOfRange(3));
        assert_eq!(parse("[N-4294967296]").unwrap_err(), SmilesError::ChargeOutOfRange(2));

        let many_plus = format!("[C{}]", "+".repeat(130));
        assert_eq!(parse(&many_plus).unwrap_err(), SmilesError::ChargeOutOfRange(2));
        let sixteen_minus = format!("[N{}]", "-".repeat(16));
        assert_eq!(parse(&sixteen_minus).unwrap_err(), SmilesError::ChargeOutOfRange(2));
        let fifteen_minus = format!("[N{}]", "-".repeat(15));
        assert_eq!(parse(&fifteen_minus).unwrap().atom(0).charge, -15);
    }
}
