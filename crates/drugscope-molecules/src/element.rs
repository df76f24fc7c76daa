//! Periodic table subset used by the SMILES toolkit.

/// Static element data.
#[derive(Debug, PartialEq)]
pub struct Element {
    pub symbol: &'static str,
    pub number: u8,
    /// Monoisotopic mass of the most abundant isotope.
    pub mass: f64,
    /// Allowed total valences, ascending. Empty means unconstrained.
    pub valences: &'static [u8],
}

impl Element {
    pub fn is_hydrogen(&self) -> bool {
        self.number == 1
    }

    pub fn is_carbon(&self) -> bool {
        self.number == 6
    }

    pub fn is_nitrogen(&self) -> bool {
        self.number == 7
    }

    pub fn is_oxygen(&self) -> bool {
        self.number == 8
    }

    /// Elements that may be written without brackets.
    pub fn is_organic_subset(&self) -> bool {
        matches!(self.number, 5 | 6 | 7 | 8 | 9 | 15 | 16 | 17 | 35 | 53)
    }
}

macro_rules! element {
    ($sym:expr, $num:expr, $mass:expr, [$($v:expr),*]) => {
        Element { symbol: $sym, number: $num, mass: $mass, valences: &[$($v),*] }
    };
}

static ELEMENTS: &[Element] = &[
    element!("H", 1, 1.00782503223, [1]),
    element!("He", 2, 4.00260325413, [0]),
    element!("Li", 3, 7.0160034366, [1]),
    element!("Be", 4, 9.012183065, [2]),
    element!("B", 5, 11.00930536, [3]),
    element!("C", 6, 12.0, [4]),
    element!("N", 7, 14.00307400443, [3]),
    element!("O", 8, 15.99491461957, [2]),
    element!("F", 9, 18.99840316273, [1]),
    element!("Ne", 10, 19.9924401762, [0]),
    element!("Na", 11, 22.9897692820, [1]),
    element!("Mg", 12, 23.985041697, [2]),
    element!("Al", 13, 26.98153853, [3]),
    element!("Si", 14, 27.97692653465, [4]),
    element!("P", 15, 30.97376199842, [3, 5, 7]),
    element!("S", 16, 31.9720711744, [2, 4, 6]),
    element!("Cl", 17, 34.968852682, [1]),
    element!("Ar", 18, 39.9623831237, [0]),
    element!("K", 19, 38.9637064864, [1]),
    element!("Ca", 20, 39.962590863, [2]),
    element!("Ti", 22, 47.94794198, []),
    element!("Cr", 24, 51.94050623, []),
    element!("Mn", 25, 54.93804391, []),
    element!("Fe", 26, 55.93493633, []),
    element!("Co", 27, 58.93319429, []),
    element!("Ni", 28, 57.93534241, []),
    element!("Cu", 29, 62.92959772, []),
    element!("Zn", 30, 63.92914201, [2]),
    element!("Ga", 31, 68.9255735, [3]),
    element!("Ge", 32, 73.921177761, [4]),
    element!("As", 33, 74.92159457, [3, 5]),
    element!("Se", 34, 79.9165218, [2, 4, 6]),
    element!("Br", 35, 78.9183376, [1]),
    element!("Kr", 36, 83.9114977282, [0]),
    element!("Rb", 37, 84.9117897379, [1]),
    element!("Sr", 38, 87.9056125, [2]),
    element!("Ag", 47, 106.9050916, []),
    element!("Sn", 50, 119.90220163, [2, 4]),
    element!("Te", 52, 129.906222748, [2, 4, 6]),
    element!("I", 53, 126.9044719, [1, 3, 5]),
    element!("Xe", 54, 131.9041550856, [0]),
    element!("Cs", 55, 132.905451961, [1]),
    element!("Ba", 56, 137.905247, [2]),
    element!("Pt", 78, 194.9647917, []),
    element!("Au", 79, 196.96656879, []),
    element!("Hg", 80, 201.9706434, []),
    element!("Pb", 82, 207.9766525, []),
    element!("Bi", 83, 208.9803991, []),
];

/// Look up an element by its (case-sensitive) symbol.
pub fn by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

/// Look up an element by atomic number.
pub fn by_number(number: u8) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.number == number)
}

/// Allowed valences of an atom carrying a formal charge.
///
/// Charged main-group atoms take the valences of their isoelectronic
/// neutral element (N+ behaves like C, O- like F). Metals and anything
/// without a tabulated isoelectronic partner are unconstrained.
pub fn allowed_valences(element: &'static Element, charge: i8) -> &'static [u8] {
    if charge == 0 || element.valences.is_empty() {
        return element.valences;
    }
    // Only the p-block follows the isoelectronic shift.
    if !matches!(element.number, 5..=9 | 13..=17 | 31..=35 | 49..=53) {
        return &[];
    }
    let shifted = element.number as i16 - charge as i16;
    if shifted <= 0 {
        return &[];
    }
    match by_number(shifted as u8) {
        // Noble gases and alkali metals carry no useful valence model.
        Some(iso) if iso.valences.first().is_some_and(|&v| v > 0) => iso.valences,
        _ => &[],
    }
}

/// The lowest allowed valence, used for pi-electron bookkeeping.
pub fn default_valence(element: &'static Element, charge: i8) -> Option<u8> {
    allowed_valences(element, charge).first().copied()
}
