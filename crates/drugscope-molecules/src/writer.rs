//! Canonical SMILES writer.
//!
//! Atoms are ranked by iterative neighbourhood refinement, then written in
//! two passes: a depth-first pass that fixes the spanning forest and the
//! ring-closure bonds, and an output pass that assigns closure digits
//! lowest-first and reuses them as soon as a ring closes.

use std::collections::{BTreeMap, BTreeSet};

use crate::element;
use crate::mol::{BondOrder, Molecule};

pub(crate) fn write_canonical(mol: &Molecule) -> String {
    let ranks = canonical_ranks(mol);
    let forest = Forest::build(mol, &ranks);

    let mut out = String::new();
    let mut digits = DigitPool::default();
    let mut open: BTreeMap<usize, u16> = BTreeMap::new();

    for &root in &forest.roots {
        if !out.is_empty() {
            out.push('.');
        }
        let mut tasks = vec![Task::Atom(root)];
        while let Some(task) = tasks.pop() {
            let v = match task {
                Task::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Task::Atom(v) => v,
            };
            out.push_str(&atom_symbol(mol, v));
            for bond in &forest.closings[v] {
                if let Some(digit) = open.remove(bond) {
                    out.push_str(&digit_text(digit));
                    digits.release(digit);
                }
            }
            for &bond in &forest.openings[v] {
                let digit = digits.take();
                open.insert(bond, digit);
                out.push_str(bond_symbol(mol, bond));
                out.push_str(&digit_text(digit));
            }
            let children = &forest.children[v];
            for (k, &(child, bond)) in children.iter().enumerate().rev() {
                let branch = k + 1 != children.len();
                if branch {
                    tasks.push(Task::Text(")"));
                }
                tasks.push(Task::Atom(child));
                tasks.push(Task::Text(bond_symbol(mol, bond)));
                if branch {
                    tasks.push(Task::Text("("));
                }
            }
        }
    }
    out
}

enum Task {
    Atom(usize),
    Text(&'static str),
}

// ── Ranking ──────────────────────────────────────────────────────────────

/// Canonical rank of every atom; ties between equivalent atoms are broken
/// towards the lowest input index, which does not affect the output string.
pub(crate) fn canonical_ranks(mol: &Molecule) -> Vec<usize> {
    let n = mol.atom_count();
    let invariants: Vec<_> = mol
        .atoms()
        .iter()
        .enumerate()
        .map(|(i, a)| {
            (
                mol.degree(i),
                a.element.number,
                a.aromatic,
                a.total_hydrogens(),
                a.charge,
                a.isotope.unwrap_or(0),
                mol.is_ring_atom(i),
            )
        })
        .collect();

    let mut ranks = refine(mol, dense_ranks(&invariants));
    while class_count(&ranks) < n {
        let mut sizes = vec![0usize; n];
        for &r in &ranks {
            sizes[r] += 1;
        }
        let Some(tied) = sizes.iter().position(|&s| s > 1) else {
            break;
        };
        let Some(chosen) = ranks.iter().position(|&r| r == tied) else {
            break;
        };
        let split: Vec<(usize, bool)> = ranks
            .iter()
            .enumerate()
            .map(|(i, &r)| (r, r == tied && i != chosen))
            .collect();
        ranks = refine(mol, dense_ranks(&split));
    }
    ranks
}

fn refine(mol: &Molecule, mut ranks: Vec<usize>) -> Vec<usize> {
    loop {
        let keys: Vec<(usize, Vec<(usize, u8)>)> = (0..mol.atom_count())
            .map(|i| {
                let mut around: Vec<(usize, u8)> = mol
                    .neighbors(i)
                    .iter()
                    .map(|&(n, b)| (ranks[n], bond_code(mol, b)))
                    .collect();
                around.sort_unstable();
                (ranks[i], around)
            })
            .collect();
        let next = dense_ranks(&keys);
        if class_count(&next) == class_count(&ranks) {
            return next;
        }
        ranks = next;
    }
}

fn dense_ranks<K: Ord>(keys: &[K]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
    let mut ranks = vec![0; keys.len()];
    let mut rank = 0;
    for (pos, &i) in order.iter().enumerate() {
        if pos > 0 && keys[i] != keys[order[pos - 1]] {
            rank += 1;
        }
        ranks[i] = rank;
    }
    ranks
}

fn class_count(ranks: &[usize]) -> usize {
    ranks.iter().collect::<BTreeSet<_>>().len()
}

fn bond_code(mol: &Molecule, bond: usize) -> u8 {
    let b = mol.bond(bond);
    if b.aromatic {
        4
    } else {
        b.order.valence()
    }
}

// ── Spanning forest ──────────────────────────────────────────────────────

struct Forest {
    roots: Vec<usize>,
    /// Tree children in output order, with the connecting bond.
    children: Vec<Vec<(usize, usize)>>,
    /// Ring-closure bonds whose digit is opened at this atom.
    openings: Vec<Vec<usize>>,
    /// Ring-closure bonds whose digit is closed at this atom.
    closings: Vec<Vec<usize>>,
}

impl Forest {
    fn build(mol: &Molecule, ranks: &[usize]) -> Self {
        let n = mol.atom_count();
        let sorted: Vec<Vec<(usize, usize)>> = (0..n)
            .map(|i| {
                let mut around = mol.neighbors(i).to_vec();
                around.sort_by_key(|&(w, _)| ranks[w]);
                around
            })
            .collect();

        let mut forest = Forest {
            roots: Vec::new(),
            children: vec![Vec::new(); n],
            openings: vec![Vec::new(); n],
            closings: vec![Vec::new(); n],
        };
        let mut visited = vec![false; n];
        let mut seen_bond = vec![false; mol.bond_count()];

        let mut starts: Vec<usize> = (0..n).collect();
        starts.sort_by_key(|&i| ranks[i]);

        for start in starts {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            forest.roots.push(start);
            let mut stack = vec![(start, 0usize)];
            while let Some(top) = stack.last_mut() {
                let v = top.0;
                let Some(&(w, b)) = sorted[v].get(top.1) else {
                    stack.pop();
                    continue;
                };
                top.1 += 1;
                if seen_bond[b] {
                    continue;
                }
                seen_bond[b] = true;
                if visited[w] {
                    // w is an ancestor still on the stack.
                    forest.openings[w].push(b);
                    forest.closings[v].push(b);
                } else {
                    visited[w] = true;
                    forest.children[v].push((w, b));
                    stack.push((w, 0));
                }
            }
        }
        forest
    }
}

#[derive(Default)]
struct DigitPool {
    in_use: BTreeSet<u16>,
}

impl DigitPool {
    fn take(&mut self) -> u16 {
        let mut digit = 1;
        while self.in_use.contains(&digit) {
            digit += 1;
        }
        self.in_use.insert(digit);
        digit
    }

    fn release(&mut self, digit: u16) {
        self.in_use.remove(&digit);
    }
}

fn digit_text(digit: u16) -> String {
    if digit < 10 {
        digit.to_string()
    } else {
        format!("%{digit:02}")
    }
}

// ── Symbols ──────────────────────────────────────────────────────────────

fn bond_symbol(mol: &Molecule, bond: usize) -> &'static str {
    let b = mol.bond(bond);
    if b.aromatic {
        return "";
    }
    match b.order {
        BondOrder::Single | BondOrder::Aromatic => {
            if mol.atom(b.begin).aromatic && mol.atom(b.end).aromatic {
                "-"
            } else {
                ""
            }
        }
        BondOrder::Double => "=",
        BondOrder::Triple => "#",
    }
}

/// Hydrogens the reader would fill in for a bare symbol, from bond orders alone.
fn default_hydrogens(mol: &Molecule, atom: usize) -> Option<u8> {
    let a = mol.atom(atom);
    let valence = mol.explicit_valence(atom).saturating_sub(a.explicit_hydrogens);
    element::allowed_valences(a.element, 0)
        .iter()
        .find(|&&v| v >= valence)
        .map(|&v| v - valence)
}

fn atom_symbol(mol: &Molecule, atom: usize) -> String {
    let a = mol.atom(atom);
    let hydrogens = a.total_hydrogens();
    let derived = default_hydrogens(mol, atom);
    let plain = a.charge == 0 && a.isotope.is_none() && a.element.is_organic_subset();
    let bare = plain
        && if a.aromatic {
            if a.element.is_carbon() {
                derived == Some(hydrogens)
            } else {
                hydrogens == 0 && derived == Some(0)
            }
        } else {
            derived == Some(hydrogens)
        };

    let symbol = if a.aromatic {
        a.element.symbol.to_ascii_lowercase()
    } else {
        a.element.symbol.to_string()
    };
    if bare {
        return symbol;
    }

    let mut out = String::from("[");
    if let Some(isotope) = a.isotope {
        out.push_str(&isotope.to_string());
    }
    out.push_str(&symbol);
    match hydrogens {
        0 => {}
        1 => out.push('H'),
        h => out.push_str(&format!("H{h}")),
    }
    match a.charge {
        0 => {}
        1 => out.push('+'),
        -1 => out.push('-'),
        c if c > 0 => out.push_str(&format!("+{c}")),
        c => out.push_str(&format!("-{}", -c)),
    }
    out.push(']');
    out
}
