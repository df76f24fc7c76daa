//! Sanitization: rings, kekulization, hydrogens, valence and aromaticity.

use std::collections::{BTreeSet, VecDeque};

use crate::element;
use crate::error::SanitizeError;
use crate::mol::{BondOrder, Molecule};

/// Upper bound on backtracking steps while kekulizing.
const KEKULIZE_BUDGET: usize = 100_000;

/// Full sanitization of freshly parsed input.
pub(crate) fn sanitize_parsed(mol: &mut Molecule) -> Result<(), SanitizeError> {
    fold_explicit_hydrogens(mol)?;
    perceive_rings(mol);
    for atom in 0..mol.atom_count() {
        if mol.atoms[atom].aromatic && !mol.is_ring_atom(atom) {
            return Err(SanitizeError::NonRingAromatic(atom));
        }
    }
    kekulize(mol)?;
    finish(mol)
}

/// Sanitization after graph edits; bond orders are already Kekulé.
pub(crate) fn sanitize_edited(mol: &mut Molecule) -> Result<(), SanitizeError> {
    perceive_rings(mol);
    kekulize(mol)?;
    finish(mol)
}

fn finish(mol: &mut Molecule) -> Result<(), SanitizeError> {
    assign_hydrogens(mol)?;
    perceive_aromaticity(mol);
    mol.dirty = false;
    Ok(())
}

/// Fold neutral `[H]` atoms hanging off a heavy atom into its hydrogen count.
fn fold_explicit_hydrogens(mol: &mut Molecule) -> Result<(), SanitizeError> {
    let mut folded = Vec::new();
    for (i, atom) in mol.atoms.iter().enumerate() {
        if !atom.element.is_hydrogen() || atom.charge != 0 || atom.isotope.is_some() || atom.explicit_hydrogens > 0 {
            continue;
        }
        if let [(heavy, bond)] = mol.neighbors(i) {
            if !mol.atoms[*heavy].element.is_hydrogen() && mol.bonds[*bond].order == BondOrder::Single {
                folded.push((i, *heavy));
            }
        }
    }
    for &(_, heavy) in &folded {
        let atom = &mut mol.atoms[heavy];
        atom.explicit_hydrogens = atom.explicit_hydrogens.checked_add(1).ok_or(SanitizeError::Valence {
            atom: heavy,
            element: atom.element.symbol,
            valence: u8::MAX,
        })?;
    }
    // Highest index first so earlier indices stay valid.
    for &(h, _) in folded.iter().rev() {
        mol.atoms.remove(h);
        mol.bonds.retain(|b| b.begin != h && b.end != h);
        for bond in &mut mol.bonds {
            if bond.begin > h {
                bond.begin -= 1;
            }
            if bond.end > h {
                bond.end -= 1;
            }
        }
    }
    if !folded.is_empty() {
        mol.rebuild_adjacency();
    }
    Ok(())
}

/// A bond is a ring bond iff it is not a bridge (Tarjan).
fn perceive_rings(mol: &mut Molecule) {
    const UNSEEN: usize = usize::MAX;
    let n = mol.atom_count();
    let mut disc = vec![UNSEEN; n];
    let mut low = vec![0usize; n];
    let mut bridge = vec![false; mol.bond_count()];
    let mut timer = 0;

    for root in 0..n {
        if disc[root] != UNSEEN {
            continue;
        }
        disc[root] = timer;
        low[root] = timer;
        timer += 1;
        // (atom, bond used to reach it, next neighbour slot)
        let mut stack = vec![(root, UNSEEN, 0usize)];
        while let Some(frame) = stack.last_mut() {
            let (v, via) = (frame.0, frame.1);
            if let Some(&(w, b)) = mol.neighbors(v).get(frame.2) {
                frame.2 += 1;
                if b == via {
                    continue;
                }
                if disc[w] == UNSEEN {
                    disc[w] = timer;
                    low[w] = timer;
                    timer += 1;
                    stack.push((w, b, 0));
                } else {
                    low[v] = low[v].min(disc[w]);
                }
            } else {
                stack.pop();
                if let Some(&(u, _, _)) = stack.last() {
                    low[u] = low[u].min(low[v]);
                    if low[v] > disc[u] {
                        bridge[via] = true;
                    }
                }
            }
        }
    }

    for (bond, is_bridge) in mol.bonds.iter_mut().zip(bridge) {
        bond.in_ring = !is_bridge;
    }
}

/// Give every pending aromatic bond a concrete single or double order.
fn kekulize(mol: &mut Molecule) -> Result<(), SanitizeError> {
    // Aromatic bonds outside rings are plain single bonds.
    for bond in &mut mol.bonds {
        if bond.order == BondOrder::Aromatic && !bond.in_ring {
            bond.order = BondOrder::Single;
        }
    }
    if !mol.bonds.iter().any(|b| b.order == BondOrder::Aromatic) {
        return Ok(());
    }

    let needs_pi: Vec<bool> = (0..mol.atom_count()).map(|i| needs_pi_bond(mol, i)).collect();
    let mut partner: Vec<Option<usize>> = vec![None; mol.atom_count()];
    let mut budget = KEKULIZE_BUDGET;
    if !match_pi_bonds(mol, &needs_pi, &mut partner, &mut budget) {
        return Err(SanitizeError::Kekulize);
    }

    let doubles: BTreeSet<usize> = partner.into_iter().flatten().collect();
    for (i, bond) in mol.bonds.iter_mut().enumerate() {
        if bond.order == BondOrder::Aromatic {
            bond.order = if doubles.contains(&i) { BondOrder::Double } else { BondOrder::Single };
        }
    }
    Ok(())
}

/// An atom on a pending aromatic bond needs one double bond if it has none
/// yet and its default valence leaves room for it.
fn needs_pi_bond(mol: &Molecule, atom: usize) -> bool {
    let neighbors = mol.neighbors(atom);
    let pending = neighbors.iter().any(|&(_, b)| mol.bonds[b].order == BondOrder::Aromatic);
    let saturated = neighbors
        .iter()
        .any(|&(_, b)| matches!(mol.bonds[b].order, BondOrder::Double | BondOrder::Triple));
    if !pending || saturated {
        return false;
    }
    let a = &mol.atoms[atom];
    match element::default_valence(a.element, a.charge) {
        Some(valence) => valence >= mol.explicit_valence(atom).saturating_add(1),
        None => false,
    }
}

/// Backtracking perfect matching over pending aromatic bonds, always
/// extending the most constrained atom first.
fn match_pi_bonds(mol: &Molecule, needs_pi: &[bool], partner: &mut [Option<usize>], budget: &mut usize) -> bool {
    if *budget == 0 {
        return false;
    }
    *budget -= 1;

    let mut best: Option<(usize, Vec<usize>)> = None;
    for atom in 0..mol.atom_count() {
        if !needs_pi[atom] || partner[atom].is_some() {
            continue;
        }
        let options: Vec<usize> = mol
            .neighbors(atom)
            .iter()
            .filter(|&&(n, b)| mol.bonds[b].order == BondOrder::Aromatic && needs_pi[n] && partner[n].is_none())
            .map(|&(_, b)| b)
            .collect();
        if options.is_empty() {
            return false;
        }
        if best.as_ref().map_or(true, |(_, o)| options.len() < o.len()) {
            best = Some((atom, options));
        }
    }

    let Some((atom, options)) = best else {
        return true;
    };
    for bond in options {
        let other = mol.bonds[bond].other(atom);
        partner[atom] = Some(bond);
        partner[other] = Some(bond);
        if match_pi_bonds(mol, needs_pi, partner, budget) {
            return true;
        }
        partner[atom] = None;
        partner[other] = None;
    }
    false
}

fn assign_hydrogens(mol: &mut Molecule) -> Result<(), SanitizeError> {
    for i in 0..mol.atom_count() {
        let valence = mol.explicit_valence(i);
        let atom = &mol.atoms[i];
        let allowed = element::allowed_valences(atom.element, atom.charge);
        let error = SanitizeError::Valence { atom: i, element: atom.element.symbol, valence };
        let implicit = if atom.bracket {
            match allowed.last() {
                Some(&max) if valence > max => return Err(error),
                _ => 0,
            }
        } else if allowed.is_empty() {
            0
        } else {
            match allowed.iter().find(|&&v| v >= valence) {
                Some(&v) => v - valence,
                None => return Err(error),
            }
        };
        mol.atoms[i].implicit_hydrogens = implicit;
    }
    Ok(())
}

/// Shortest cycle through each ring bond, deduplicated by atom set.
pub(crate) fn smallest_rings(mol: &Molecule) -> Vec<Vec<usize>> {
    let mut seen = BTreeSet::new();
    let mut rings = Vec::new();
    for (index, bond) in mol.bonds.iter().enumerate() {
        if !bond.in_ring {
            continue;
        }
        if let Some(path) = shortest_path_avoiding(mol, bond.begin, bond.end, index) {
            let mut key = path.clone();
            key.sort_unstable();
            if seen.insert(key) {
                rings.push(path);
            }
        }
    }
    rings
}

fn shortest_path_avoiding(mol: &Molecule, from: usize, to: usize, skip: usize) -> Option<Vec<usize>> {
    let mut parent = vec![usize::MAX; mol.atom_count()];
    parent[from] = from;
    let mut queue = VecDeque::from([from]);
    while let Some(v) = queue.pop_front() {
        if v == to {
            let mut path = vec![to];
            let mut cur = to;
            while cur != from {
                cur = parent[cur];
                path.push(cur);
            }
            path.reverse();
            return Some(path);
        }
        for &(w, b) in mol.neighbors(v) {
            if b != skip && mol.bonds[b].in_ring && parent[w] == usize::MAX {
                parent[w] = v;
                queue.push_back(w);
            }
        }
    }
    None
}

/// Pi electrons an atom donates to a ring, or `None` if it cannot be part
/// of an aromatic ring.
fn pi_electrons(mol: &Molecule, atom: usize) -> Option<u8> {
    let a = &mol.atoms[atom];
    let coordination = mol.degree(atom) + a.total_hydrogens() as usize;
    if coordination > 3 {
        return None;
    }
    let mut double = None;
    for &(_, b) in mol.neighbors(atom) {
        match mol.bonds[b].order {
            BondOrder::Triple => return None,
            BondOrder::Double if double.is_some() => return None,
            BondOrder::Double => double = Some(b),
            _ => {}
        }
    }
    if let Some(b) = double {
        let bond = &mol.bonds[b];
        if bond.in_ring {
            return Some(1);
        }
        // Exocyclic double bonds to electronegative atoms take the electron.
        let other = &mol.atoms[bond.other(atom)];
        return matches!(other.element.number, 7 | 8 | 16).then_some(0);
    }
    match (a.element.number, a.charge) {
        (6, -1) => Some(2),
        (6, 1) => Some(0),
        (7 | 15 | 33, 0) if coordination == 3 => Some(2),
        (7 | 15 | 33, -1) if coordination == 2 => Some(2),
        (8 | 16 | 34 | 52, 0) if coordination == 2 => Some(2),
        (5, 0) if coordination == 3 => Some(0),
        _ => None,
    }
}

/// Hückel 4n+2 perception over single rings and fused ring pairs.
fn perceive_aromaticity(mol: &mut Molecule) {
    for atom in &mut mol.atoms {
        atom.aromatic = false;
    }
    for bond in &mut mol.bonds {
        bond.aromatic = false;
    }

    let rings = smallest_rings(mol);
    let electrons: Vec<Option<u8>> = (0..mol.atom_count()).map(|i| pi_electrons(mol, i)).collect();
    let huckel = |atoms: &BTreeSet<usize>| -> bool {
        let mut total = 0u32;
        for &a in atoms {
            match electrons[a] {
                Some(e) => total += u32::from(e),
                None => return false,
            }
        }
        total % 4 == 2
    };

    let sets: Vec<BTreeSet<usize>> = rings.iter().map(|r| r.iter().copied().collect()).collect();
    let mut aromatic: Vec<bool> = sets.iter().map(|s| huckel(s)).collect();

    for i in 0..sets.len() {
        for j in (i + 1)..sets.len() {
            if aromatic[i] && aromatic[j] {
                continue;
            }
            if sets[i].intersection(&sets[j]).count() < 2 {
                continue;
            }
            let union: BTreeSet<usize> = sets[i].union(&sets[j]).copied().collect();
            if huckel(&union) {
                aromatic[i] = true;
                aromatic[j] = true;
            }
        }
    }

    for (ring, &flag) in rings.iter().zip(&aromatic) {
        if !flag {
            continue;
        }
        for (k, &a) in ring.iter().enumerate() {
            let b = ring[(k + 1) % ring.len()];
            mol.atoms[a].aromatic = true;
            if let Some(bond) = mol.bond_between(a, b) {
                mol.bonds[bond].aromatic = true;
            }
        }
    }
}
