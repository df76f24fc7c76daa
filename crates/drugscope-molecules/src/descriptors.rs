//! Physicochemical descriptors of a sanitized molecule.

use serde::{Deserialize, Serialize};

use crate::element;
use crate::error::MoleculeError;
use crate::mol::{Bond, BondOrder, Molecule};
use crate::sanitize::smallest_rings;

/// The descriptor set every rule in this crate is evaluated on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSet {
    pub molecular_weight: f64,
    pub logp: f64,
    pub tpsa: f64,
    pub rotatable_bonds: usize,
    pub h_bond_donors: usize,
    pub h_bond_acceptors: usize,
}

impl DescriptorSet {
    pub fn compute(mol: &Molecule) -> Result<Self, MoleculeError> {
        mol.ensure_sanitized()?;
        Ok(Self {
            molecular_weight: exact_mass(mol),
            logp: crippen_logp(mol),
            tpsa: tpsa(mol),
            rotatable_bonds: rotatable_bonds(mol),
            h_bond_donors: h_bond_donors(mol),
            h_bond_acceptors: h_bond_acceptors(mol),
        })
    }
}

// Bond predicates in the SMARTS sense: `-` and `=` never match aromatic
// bonds, an unwritten bond matches single or aromatic.

fn single(b: &Bond) -> bool {
    !b.aromatic && b.order == BondOrder::Single
}

fn double(b: &Bond) -> bool {
    !b.aromatic && b.order == BondOrder::Double
}

fn triple(b: &Bond) -> bool {
    b.order == BondOrder::Triple
}

fn plain(b: &Bond) -> bool {
    b.aromatic || b.order == BondOrder::Single
}

/// Monoisotopic mass including implicit hydrogens.
pub fn exact_mass(mol: &Molecule) -> f64 {
    let hydrogen = element::by_number(1).map_or(1.00782503223, |h| h.mass);
    mol.atoms()
        .iter()
        .map(|a| a.mass() + f64::from(a.total_hydrogens()) * hydrogen)
        .sum()
}

// ── Wildman-Crippen logP ─────────────────────────────────────────────────

/// Wildman-Crippen logP: per-atom type contributions plus one contribution
/// per attached hydrogen. Types are tried in table order, first match wins.
pub fn crippen_logp(mol: &Molecule) -> f64 {
    (0..mol.atom_count())
        .map(|i| {
            let atom = mol.atom(i);
            let heavy = match atom.element.number {
                1 => 0.0,
                6 => crippen_carbon(mol, i),
                7 => crippen_nitrogen(mol, i),
                8 => crippen_oxygen(mol, i),
                9 | 17 | 35 | 53 if atom.charge < 0 => -2.996,
                9 => 0.4202,
                17 => 0.6895,
                35 => 0.8456,
                53 => 0.8857,
                15 => 0.8612,
                16 if atom.aromatic => 0.6237,
                16 if atom.charge == 0 => 0.6482,
                16 => -0.0024,
                _ => 0.0,
            };
            heavy + f64::from(atom.total_hydrogens()) * crippen_hydrogen(mol, i)
        })
        .sum()
}

struct Env<'a> {
    mol: &'a Molecule,
    atom: usize,
}

impl<'a> Env<'a> {
    fn new(mol: &'a Molecule, atom: usize) -> Self {
        Self { mol, atom }
    }

    fn h(&self) -> u8 {
        self.mol.atom(self.atom).total_hydrogens()
    }

    /// Total connections, hydrogens included (SMARTS `X`).
    fn x(&self) -> usize {
        self.mol.degree(self.atom) + self.h() as usize
    }

    fn charge(&self) -> i8 {
        self.mol.atom(self.atom).charge
    }

    /// Neighbours reached through bonds satisfying `bond`, matching `atom`.
    fn count(&self, bond: impl Fn(&Bond) -> bool, atom: impl Fn(usize) -> bool) -> usize {
        self.mol
            .neighbors(self.atom)
            .iter()
            .filter(|&&(n, b)| bond(self.mol.bond(b)) && atom(n))
            .count()
    }

    fn any(&self, bond: impl Fn(&Bond) -> bool, atom: impl Fn(usize) -> bool) -> bool {
        self.count(bond, atom) > 0
    }

    fn z(&self, n: usize) -> u8 {
        self.mol.atom(n).element.number
    }

    fn aromatic(&self, n: usize) -> bool {
        self.mol.atom(n).aromatic
    }

    /// Aliphatic heavy atom (SMARTS `[A;!#1]`).
    fn aliphatic(&self, n: usize) -> bool {
        !self.aromatic(n) && self.z(n) != 1
    }

    fn aliphatic_is(&self, n: usize, numbers: &[u8]) -> bool {
        !self.aromatic(n) && numbers.contains(&self.z(n))
    }
}

const HETERO: &[u8] = &[7, 8, 15, 16, 9, 17, 35, 53];
const COMMON: &[u8] = &[1, 6, 7, 8, 15, 16, 9, 17, 35, 53];

fn crippen_carbon(mol: &Molecule, i: usize) -> f64 {
    let e = Env::new(mol, i);
    let (h, x) = (e.h(), e.x());
    let ali_c = |n: usize| e.aliphatic_is(n, &[6]);
    let hetero = |n: usize| e.aliphatic_is(n, HETERO);
    let aliphatic = |n: usize| e.aliphatic(n);
    let aromatic = |n: usize| e.aromatic(n);

    if e.aromatic(i) {
        let arom_bonds = e.count(|b| b.aromatic, |_| true);
        if h == 0 && e.any(single, |n| (e.aliphatic(n) && !COMMON.contains(&e.z(n))) || e.aliphatic_is(n, &[15])) {
            return -0.5443; // C13
        }
        if e.any(|_| true, |n| e.z(n) == 9) {
            return 0.0; // C14
        }
        if e.any(|_| true, |n| e.z(n) == 17) {
            return 0.245; // C15
        }
        if e.any(|_| true, |n| e.z(n) == 35) {
            return 0.198; // C16
        }
        if e.any(|_| true, |n| e.z(n) == 53) {
            return 0.0; // C17
        }
        if h == 1 {
            return 0.1581; // C18
        }
        if arom_bonds >= 3 {
            return 0.2955; // C19
        }
        if arom_bonds >= 2 {
            if e.any(single, aromatic) {
                return 0.2713; // C20
            }
            if e.any(single, ali_c) {
                return 0.136; // C21
            }
            if e.any(single, |n| e.aliphatic_is(n, &[7])) {
                return 0.4619; // C22
            }
            if e.any(single, |n| e.aliphatic_is(n, &[8])) {
                return 0.5437; // C23
            }
            if e.any(single, |n| e.aliphatic_is(n, &[16])) {
                return 0.1893; // C24
            }
            if e.any(double, |n| e.aliphatic_is(n, &[6, 7, 8])) {
                return -0.8186; // C25
            }
        }
        return 0.08129; // CS
    }

    let c_single = e.count(plain, ali_c);
    let c1 = (h == 4 && mol.degree(i) == 0) || (h == 3 && c_single >= 1) || (h == 2 && c_single >= 2);
    if c1 {
        return 0.1441;
    }
    if (h == 1 && c_single >= 3) || (h == 0 && c_single >= 4) {
        return 0.0; // C2
    }
    let hetero_nbrs = e.count(plain, hetero);
    let aliphatic_nbrs = e.count(plain, aliphatic);
    if (h == 3 && hetero_nbrs >= 1) || (h == 2 && x == 4 && hetero_nbrs >= 1 && aliphatic_nbrs >= 2) {
        return -0.2035; // C3
    }
    if (h == 1 && x == 4 && hetero_nbrs >= 1 && aliphatic_nbrs >= 3)
        || (h == 0 && x == 4 && hetero_nbrs >= 1 && aliphatic_nbrs >= 4)
    {
        return -0.2051; // C4
    }
    if e.any(double, |n| e.aliphatic(n) && e.z(n) != 6) {
        return -0.2783; // C5
    }
    let double_c = e.count(double, ali_c);
    let others = e.count(plain, aliphatic);
    if double_c >= 1 && (h == 2 || (h == 1 && others >= 1) || (h == 0 && others >= 2) || double_c >= 2) {
        return 0.1551; // C6
    }
    if x == 2 && e.any(triple, aliphatic) {
        return 0.0017; // C7
    }
    let aromatic_nbrs = e.count(plain, aromatic);
    if h == 3 && e.any(plain, |n| e.aromatic(n) && e.z(n) == 6) {
        return 0.08452; // C8
    }
    if h == 3 && aromatic_nbrs >= 1 {
        return -0.1444; // C9
    }
    if x == 4 && aromatic_nbrs >= 1 {
        return match h {
            2 => -0.0516, // C10
            1 => 0.1193,  // C11
            _ => -0.0967, // C12
        };
    }
    let aromatic_c = e.count(plain, |n| e.aromatic(n) && e.z(n) == 6);
    let c26 = (double_c >= 1 && aromatic_nbrs >= 1 && (h == 1 || others >= 1 || aromatic_c >= 1))
        || e.any(double, |n| e.aromatic(n) && e.z(n) == 6);
    if c26 {
        return 0.264;
    }
    if x == 4 && e.any(|_| true, |n| e.aliphatic(n) && !COMMON.contains(&e.z(n))) {
        return 0.2148; // C27
    }
    0.08129 // CS
}

fn crippen_nitrogen(mol: &Molecule, i: usize) -> f64 {
    let e = Env::new(mol, i);
    let (h, charge) = (e.h(), e.charge());
    let aliphatic = |n: usize| e.aliphatic(n);
    let aromatic = |n: usize| e.aromatic(n);
    let heavy = |n: usize| e.z(n) != 1;

    if e.aromatic(i) {
        return match charge {
            0 => -0.3239,          // N11
            c if c > 0 => -1.119,  // N12
            _ => -0.4806,          // NS
        };
    }

    if charge == 0 {
        if h == 2 && e.any(plain, aliphatic) {
            return -1.019; // N1
        }
        if h == 1 && e.count(plain, aliphatic) >= 2 {
            return -0.7096; // N2
        }
        if h == 2 && e.any(plain, aromatic) {
            return -1.027; // N3
        }
        if h == 1 && e.any(plain, aromatic) && e.count(plain, heavy) >= 2 {
            return -0.5188; // N4
        }
        if h == 1 && e.any(double, heavy) {
            return 0.08387; // N5
        }
        if h == 0 && e.any(double, heavy) && e.any(plain, heavy) {
            return 0.1836; // N6
        }
        if h == 0 && e.count(plain, aliphatic) >= 3 {
            return -0.3187; // N7
        }
        if h == 0 && e.any(plain, aromatic) && e.count(plain, heavy) >= 3 {
            return -0.4458; // N8
        }
        if e.any(triple, aliphatic) {
            return 0.01508; // N9
        }
    }
    if charge > 0 && (1..=3).contains(&h) {
        return -1.95; // N10
    }
    if charge > 0 && h == 0 {
        let quaternary = e.count(plain, aliphatic) >= 4;
        let iminium = e.any(double, aliphatic) && e.count(plain, heavy) >= 2;
        let cumulated = e.any(double, |n| e.z(n) == 6) && e.any(double, |n| e.z(n) == 7);
        if quaternary || iminium || cumulated {
            return -0.3396; // N13
        }
    }
    if (charge > 0 && e.any(triple, aliphatic)) || charge < 0 {
        return 0.2887; // N14
    }
    -0.4806 // NS
}

fn crippen_oxygen(mol: &Molecule, i: usize) -> f64 {
    let e = Env::new(mol, i);
    let (h, charge) = (e.h(), e.charge());
    let aliphatic = |n: usize| e.aliphatic(n);
    let aromatic = |n: usize| e.aromatic(n);

    if e.aromatic(i) {
        return 0.1552; // O1
    }
    if h >= 1 {
        return -0.2893; // O2
    }
    if e.count(plain, aliphatic) >= 2 {
        return -0.0684; // O3
    }
    if e.any(plain, aromatic) && e.count(plain, |n| e.z(n) != 1) >= 2 {
        return -0.4195; // O4
    }
    let lone_anion = charge < 0 && e.x() == 1;
    if e.any(double, |n| matches!(e.z(n), 7 | 8)) || (lone_anion && e.any(|_| true, |n| e.z(n) == 7)) {
        return 0.0335; // O5
    }
    if lone_anion && e.any(|_| true, |n| e.z(n) == 16) {
        return -0.3339; // O6
    }
    if charge < 0 {
        let carboxylate = mol.neighbors(i).iter().any(|&(c, _)| {
            e.aliphatic_is(c, &[6])
                && mol
                    .neighbors(c)
                    .iter()
                    .any(|&(o, b)| o != i && double(mol.bond(b)) && e.aliphatic_is(o, &[8]))
        });
        return if carboxylate { -1.326 } else { -1.189 }; // O12 / O7
    }
    if e.any(double, |n| e.aromatic(n) && e.z(n) == 6) {
        return 0.1788; // O8
    }

    // Carbonyl oxygens, typed by the carbonyl carbon's other neighbours.
    let carbonyl = mol
        .neighbors(i)
        .iter()
        .find(|&&(c, b)| double(mol.bond(b)) && e.aliphatic_is(c, &[6]))
        .map(|&(c, _)| c);
    if let Some(c) = carbonyl {
        let ce = Env::new(mol, c);
        let rest: Vec<usize> = mol
            .neighbors(c)
            .iter()
            .filter(|&&(n, b)| n != i && plain(mol.bond(b)))
            .map(|&(n, _)| n)
            .collect();
        let ch = ce.h();
        let ali_c = rest.iter().filter(|&&n| e.aliphatic_is(n, &[6])).count();
        let ali = rest.iter().filter(|&&n| e.aliphatic(n)).count();
        let arom = rest.iter().filter(|&&n| e.aromatic(n)).count();
        let arom_c = rest.iter().filter(|&&n| e.aromatic(n) && e.z(n) == 6).count();
        let ali_no = rest.iter().any(|&n| e.aliphatic_is(n, &[7, 8]));
        let second_oxo = ce.x() == 2
            && mol
                .neighbors(c)
                .iter()
                .any(|&(o, b)| o != i && double(mol.bond(b)) && e.aliphatic_is(o, &[8]));

        let o9 = (ch == 1 && ali_c >= 1) || (ali_c >= 1 && ali >= 2) || (ch == 1 && ali_no) || ch == 2 || second_oxo;
        if o9 {
            return -0.1526; // O9
        }
        let o10 = (ch == 1 && arom_c >= 1) || ((ali_c + arom_c) >= 1 && arom >= 2) || (arom_c >= 1 && ali >= 1);
        if o10 {
            return 0.1129; // O10
        }
        if rest.len() >= 2 && rest.iter().all(|&n| !matches!(e.z(n), 1 | 6)) {
            return 0.4833; // O11
        }
    }
    -0.1188 // OS
}

/// Contribution of one hydrogen attached to atom `i`.
fn crippen_hydrogen(mol: &Molecule, i: usize) -> f64 {
    let e = Env::new(mol, i);
    match e.z(i) {
        1 | 6 => 0.123, // H1
        7 => 0.2142,    // H3
        8 => {
            let partners: Vec<usize> = mol.neighbors(i).iter().map(|&(n, _)| n).collect();
            let h2 = partners.iter().any(|&n| {
                let x4_carbon = e.aliphatic_is(n, &[6]) && Env::new(mol, n).x() == 4;
                let aromatic_carbon = e.aromatic(n) && e.z(n) == 6;
                x4_carbon || aromatic_carbon || !matches!(e.z(n), 6 | 7 | 8 | 16)
            });
            if h2 {
                return -0.2677;
            }
            if partners.iter().any(|&n| e.z(n) == 7) {
                return 0.2142; // H3
            }
            let h4 = partners.iter().any(|&n| {
                if e.aliphatic_is(n, &[8, 16]) {
                    return true;
                }
                e.aliphatic_is(n, &[6])
                    && mol.neighbors(n).iter().any(|&(m, b)| {
                        m != i
                            && double(mol.bond(b))
                            && (matches!(e.z(m), 6 | 7) || e.aliphatic_is(m, &[8, 16]))
                    })
            });
            if h4 {
                0.298
            } else {
                0.1125 // HS
            }
        }
        _ => -0.2677, // H2
    }
}

// ── Ertl TPSA ────────────────────────────────────────────────────────────

/// Topological polar surface area from N and O fragment contributions.
pub fn tpsa(mol: &Molecule) -> f64 {
    let rings = smallest_rings(mol);
    let in_three_ring = |atom: usize| rings.iter().any(|r| r.len() == 3 && r.contains(&atom));
    (0..mol.atom_count())
        .map(|i| match mol.atom(i).element.number {
            7 => tpsa_nitrogen(mol, i, in_three_ring(i)),
            8 => tpsa_oxygen(mol, i, in_three_ring(i)),
            _ => 0.0,
        })
        .sum()
}

struct BondCounts {
    single: usize,
    double: usize,
    triple: usize,
    aromatic: usize,
    heavy: usize,
}

fn bond_counts(mol: &Molecule, atom: usize) -> BondCounts {
    let mut counts = BondCounts { single: 0, double: 0, triple: 0, aromatic: 0, heavy: 0 };
    for &(n, b) in mol.neighbors(atom) {
        if mol.atom(n).element.is_hydrogen() {
            continue;
        }
        counts.heavy += 1;
        let bond = mol.bond(b);
        if bond.aromatic {
            counts.aromatic += 1;
        } else {
            match bond.order {
                BondOrder::Single | BondOrder::Aromatic => counts.single += 1,
                BondOrder::Double => counts.double += 1,
                BondOrder::Triple => counts.triple += 1,
            }
        }
    }
    counts
}

fn tpsa_nitrogen(mol: &Molecule, i: usize, three_ring: bool) -> f64 {
    let atom = mol.atom(i);
    let h = atom.total_hydrogens();
    let c = bond_counts(mol, i);
    let key = (c.single, c.double, c.triple, c.aromatic, h);
    let value = match atom.charge {
        0 => match key {
            (3, 0, 0, 0, 0) if three_ring => Some(3.01),
            (3, 0, 0, 0, 0) => Some(3.24),
            (1, 1, 0, 0, 0) => Some(12.36),
            (0, 0, 1, 0, 0) => Some(23.79),
            (1, 2, 0, 0, 0) => Some(11.68),
            (0, 1, 1, 0, 0) => Some(13.6),
            (2, 0, 0, 0, 1) if three_ring => Some(21.94),
            (2, 0, 0, 0, 1) => Some(12.03),
            (0, 1, 0, 0, 1) => Some(23.85),
            (1, 0, 0, 0, 2) => Some(26.02),
            (0, 0, 0, 2, 0) => Some(12.89),
            (0, 0, 0, 3, 0) => Some(4.41),
            (1, 0, 0, 2, 0) => Some(4.93),
            (0, 1, 0, 2, 0) => Some(8.39),
            (0, 0, 0, 2, 1) => Some(15.79),
            _ => None,
        },
        1 => match key {
            (4, 0, 0, 0, 0) => Some(0.0),
            (2, 1, 0, 0, 0) => Some(3.01),
            (1, 0, 1, 0, 0) => Some(4.36),
            (3, 0, 0, 0, 1) => Some(4.44),
            (1, 1, 0, 0, 1) => Some(13.97),
            (2, 0, 0, 0, 2) => Some(16.61),
            (0, 1, 0, 0, 2) => Some(25.59),
            (1, 0, 0, 0, 3) => Some(27.64),
            (0, 0, 0, 3, 0) => Some(4.1),
            (1, 0, 0, 2, 0) => Some(3.88),
            (0, 0, 0, 2, 1) => Some(14.14),
            _ => None,
        },
        _ => None,
    };
    value.unwrap_or_else(|| (30.5 - 8.2 * c.heavy as f64 + 1.5 * f64::from(h)).max(0.0))
}

fn tpsa_oxygen(mol: &Molecule, i: usize, three_ring: bool) -> f64 {
    let atom = mol.atom(i);
    let h = atom.total_hydrogens();
    let c = bond_counts(mol, i);
    let value = match (atom.charge, c.single, c.double, c.aromatic, h) {
        (0, 2, 0, 0, 0) if three_ring => Some(12.53),
        (0, 2, 0, 0, 0) => Some(9.23),
        (0, 0, 1, 0, 0) => Some(17.07),
        (0, 1, 0, 0, 1) => Some(20.23),
        (-1, 1, 0, 0, 0) => Some(23.06),
        (0, 0, 0, 2, 0) => Some(13.14),
        _ => None,
    };
    value.unwrap_or_else(|| (28.5 - 8.6 * c.heavy as f64 + 1.5 * f64::from(h)).max(0.0))
}

// ── Lipinski donors, acceptors and rotatable bonds ───────────────────────

/// NH/OH/SH donors: `[N;!H0;v3]`, `[N;!H0;+1;v4]`, `[O,S;H1;+0]`, `[n;H1;+0]`.
pub fn h_bond_donors(mol: &Molecule) -> usize {
    (0..mol.atom_count())
        .filter(|&i| {
            let a = mol.atom(i);
            let h = a.total_hydrogens();
            let v = mol.explicit_valence(i) + a.implicit_hydrogens;
            match (a.element.number, a.aromatic) {
                (7, false) => h > 0 && (v == 3 || (v == 4 && a.charge == 1)),
                (8 | 16, false) => h == 1 && a.charge == 0,
                (7, true) => h == 1 && a.charge == 0,
                _ => false,
            }
        })
        .count()
}

/// Acceptor atoms by the usual Lipinski definition.
pub fn h_bond_acceptors(mol: &Molecule) -> usize {
    (0..mol.atom_count()).filter(|&i| is_acceptor(mol, i)).count()
}

fn is_acceptor(mol: &Molecule, i: usize) -> bool {
    let e = Env::new(mol, i);
    let a = mol.atom(i);
    let h = a.total_hydrogens();
    let v = mol.explicit_valence(i) + a.implicit_hydrogens;
    // Bonded through a single bond to an atom carrying =[O,N,P,S].
    let next_to_oxo = || {
        mol.neighbors(i).iter().any(|&(n, b)| {
            single(mol.bond(b))
                && mol
                    .neighbors(n)
                    .iter()
                    .any(|&(m, mb)| m != i && double(mol.bond(mb)) && e.aliphatic_is(m, &[7, 8, 15, 16]))
        })
    };
    match (a.element.number, a.aromatic) {
        (8 | 16, false) => {
            (h == 1 && v == 2 && !next_to_oxo()) || (h == 0 && v == 2) || a.charge < 0
        }
        (7, false) => v == 3 && !next_to_oxo(),
        (7, true) => h == 0 && a.charge == 0,
        (8 | 16, true) => {
            if a.charge != 0 {
                return false;
            }
            let aromatic_n = |n: usize| e.aromatic(n) && e.z(n) == 7;
            let beside_n = e.any(|b| b.aromatic, aromatic_n);
            let across_c = mol.neighbors(i).iter().any(|&(c, b)| {
                mol.bond(b).aromatic
                    && e.aromatic(c)
                    && e.z(c) == 6
                    && mol.neighbors(c).iter().any(|&(n, nb)| n != i && mol.bond(nb).aromatic && aromatic_n(n))
            });
            !beside_n && !across_c
        }
        _ => false,
    }
}

/// Non-ring single bonds between non-terminal atoms, excluding bonds to
/// triple-bonded atoms and amide `NH-C(=O)` bonds.
pub fn rotatable_bonds(mol: &Molecule) -> usize {
    let eligible = |atom: usize| {
        let heavy = mol.neighbors(atom).iter().filter(|&&(n, _)| !mol.atom(n).element.is_hydrogen()).count();
        let in_triple = mol.neighbors(atom).iter().any(|&(_, b)| triple(mol.bond(b)));
        heavy > 1 && !in_triple && !is_amide_nh(mol, atom)
    };
    mol.bonds()
        .iter()
        .filter(|b| single(b) && !b.in_ring && eligible(b.begin) && eligible(b.end))
        .count()
}

/// `[NH]!@C(=O)`
fn is_amide_nh(mol: &Molecule, atom: usize) -> bool {
    let a = mol.atom(atom);
    if !a.element.is_nitrogen() || a.aromatic || a.total_hydrogens() != 1 {
        return false;
    }
    mol.neighbors(atom).iter().any(|&(c, b)| {
        let carbon = mol.atom(c);
        !mol.bond(b).in_ring
            && plain(mol.bond(b))
            && carbon.element.is_carbon()
            && !carbon.aromatic
            && mol
                .neighbors(c)
                .iter()
                .any(|&(o, ob)| double(mol.bond(ob)) && mol.atom(o).element.is_oxygen() && !mol.atom(o).aromatic)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors(smiles: &str) -> DescriptorSet {
        DescriptorSet::compute(&Molecule::from_smiles(smiles).unwrap()).unwrap()
    }

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn crippen_reference_values() {
        assert!(close(descriptors("CCO").logp, -0.0014, 1e-4));
        assert!(close(descriptors("c1ccccc1").logp, 1.6866, 1e-4));
        assert!(close(descriptors("CC(=O)Oc1ccccc1C(=O)O").logp, 1.3101, 1e-4));
    }

    #[test]
    fn aspirin_descriptors() {
        let d = descriptors("CC(=O)Oc1ccccc1C(=O)O");
        assert!(close(d.molecular_weight, 180.042, 1e-3), "{}", d.molecular_weight);
        assert!(close(d.tpsa, 63.6, 1e-6));
        assert_eq!(d.h_bond_donors, 1);
        assert_eq!(d.h_bond_acceptors, 3);
        assert_eq!(d.rotatable_bonds, 3);
    }

    #[test]
    fn exact_mass_counts_implicit_hydrogens() {
        assert!(close(descriptors("C").molecular_weight, 16.0313, 1e-4));
        assert!(close(descriptors("O").molecular_weight, 18.0106, 1e-4));
        assert!(close(descriptors("[13CH4]").molecular_weight, 17.0313, 1e-4));
    }

    #[test]
    fn tpsa_fragments() {
        assert!(close(descriptors("CCN").tpsa, 26.02, 1e-6));
        assert!(close(descriptors("c1ccncc1").tpsa, 12.89, 1e-6));
        assert!(close(descriptors("c1cc[nH]c1").tpsa, 15.79, 1e-6));
        assert!(close(descriptors("CC#N").tpsa, 23.79, 1e-6));
        assert!(close(descriptors("CSC").tpsa, 0.0, 1e-6));
        assert!(close(descriptors("C1CO1").tpsa, 12.53, 1e-6));
    }

    #[test]
    fn donors_and_acceptors() {
        let pyrrole = descriptors("c1cc[nH]c1");
        assert_eq!((pyrrole.h_bond_donors, pyrrole.h_bond_acceptors), (1, 0));
        let pyridine = descriptors("c1ccncc1");
        assert_eq!((pyridine.h_bond_donors, pyridine.h_bond_acceptors), (0, 1));
        let acetamide = descriptors("CC(N)=O");
        assert_eq!((acetamide.h_bond_donors, acetamide.h_bond_acceptors), (1, 1));
        let furan = descriptors("c1ccoc1");
        assert_eq!(furan.h_bond_acceptors, 1);
        let oxazole = descriptors("c1cocn1");
        assert_eq!(oxazole.h_bond_acceptors, 1);
    }

    #[test]
    fn rotatable_bond_rules() {
        assert_eq!(descriptors("CCCC").rotatable_bonds, 1);
        assert_eq!(descriptors("C1CCCCC1").rotatable_bonds, 0);
        assert_eq!(descriptors("CC#CC").rotatable_bonds, 0);
        assert_eq!(descriptors("CC(=O)NC").rotatable_bonds, 0);
        assert_eq!(descriptors("c1ccccc1-c1ccccc1").rotatable_bonds, 1);
    }

    #[test]
    fn edited_molecules_must_be_sanitized() {
        let mut mol = Molecule::from_smiles("CC").unwrap();
        mol.add_atom("O").unwrap();
        assert_eq!(DescriptorSet::compute(&mol).unwrap_err(), MoleculeError::Unsanitized);
    }
}
