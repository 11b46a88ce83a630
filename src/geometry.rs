//! Backbone geometry resolution: locating N/Cα/C/O atoms per residue and inferring the amide
//! hydrogen position that DSSP-style hydrogen bonding needs but that crystal structures never
//! report directly.

use crate::constants::{AMIDE_BOND_LENGTH, PREV_C_DISTANCE_TRIGGER};
use crate::errors::SecStructError;
use crate::structure::Residue;
use crate::vec3::Vec3;

/// The four backbone atom coordinates a residue needs to participate in hydrogen bonding.
#[derive(Clone, Copy, Debug)]
pub struct Backbone {
    pub n: Vec3,
    pub ca: Vec3,
    pub c: Vec3,
    pub o: Vec3,
}

/// Locates N, Cα, C and O for one amino-acid residue.
///
/// `N` is the first atom named `"N"` at or before the Cα atom in the residue's atom list; `C`
/// and `O` are the first atoms named `"C"` / `"O"` after the Cα atom. The Cα coordinate itself
/// comes from [`Residue::alpha_coordinate`], which already implements the `MissingAlpha`
/// tolerance (substituting the first atom when an amino acid has no located Cα).
///
/// Returns `None` (logging a [`SecStructError::MissingBackboneAtom`]) when any of the four
/// atoms cannot be located; the caller excludes that residue from the relevant donor/acceptor
/// role, never aborting the whole run.
pub fn resolve_backbone(residue: &Residue, aa_index: usize) -> Option<Backbone> {
    if residue.atoms.is_empty() {
        return None;
    }

    let alpha_index = match residue.alpha_atom_index {
        Some(idx) => idx,
        None => {
            if residue.classification.is_amino_acid() && !residue.atoms.is_empty() {
                log::warn!("{}", SecStructError::MissingAlpha { aa_index });
                0
            } else {
                return None;
            }
        }
    };

    let ca = residue.alpha_coordinate()?;

    let n = residue.atoms[..=alpha_index.min(residue.atoms.len() - 1)]
        .iter()
        .find(|a| a.name == "N")
        .map(|a| a.coordinate);
    let n = match n {
        Some(v) => v,
        None => {
            log::warn!("{}", SecStructError::MissingBackboneAtom { aa_index, atom_name: "N" });
            return None;
        }
    };

    let after_alpha = &residue.atoms[alpha_index.min(residue.atoms.len() - 1)..];
    let c = after_alpha.iter().find(|a| a.name == "C").map(|a| a.coordinate);
    let c = match c {
        Some(v) => v,
        None => {
            log::warn!("{}", SecStructError::MissingBackboneAtom { aa_index, atom_name: "C" });
            return None;
        }
    };
    let o = after_alpha.iter().find(|a| a.name == "O").map(|a| a.coordinate);
    let o = match o {
        Some(v) => v,
        None => {
            log::warn!("{}", SecStructError::MissingBackboneAtom { aa_index, atom_name: "O" });
            return None;
        }
    };

    Some(Backbone { n, ca, c, o })
}

/// Infers the amide hydrogen position for residue `i`, given its own backbone and (when `i` is
/// not the first amino acid in the chain) the backbone of residue `i - 1`.
///
/// - First AA in a chain: `H = N + normalize(O - C) * AMIDE_BOND_LENGTH`.
/// - Otherwise: if the previous residue's carbonyl carbon is within
///   [`PREV_C_DISTANCE_TRIGGER`] of this residue's N, `H = N + normalize(Cp - Op) * AMIDE_BOND_LENGTH`;
///   otherwise the own-carbonyl fallback above is used.
///
/// This is a deliberate simplification of trans-peptide geometry, not a dihedral-accurate
/// construction; placing `H` is the only use to which backbone-inferred hydrogens are put.
pub fn infer_amide_hydrogen(own: &Backbone, previous: Option<&Backbone>) -> Vec3 {
    let own_fallback_direction = own.o.diff(&own.c).normalize();

    let direction = match previous {
        Some(prev) if prev.c.dist(&own.n) <= PREV_C_DISTANCE_TRIGGER => prev.c.diff(&prev.o).normalize(),
        _ => own_fallback_direction,
    };

    own.n.add(&direction.scale(AMIDE_BOND_LENGTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{Atom, Classification};

    fn residue(atoms: Vec<Atom>) -> Residue {
        Residue::new("A", Classification::AminoAcid, atoms)
    }

    #[test]
    fn resolves_backbone_atoms_around_alpha_carbon() {
        let res = residue(vec![
            Atom::new("N", "A", Vec3::new(0.0, 0.0, 0.0)),
            Atom::new("CA", "A", Vec3::new(1.0, 0.0, 0.0)),
            Atom::new("C", "A", Vec3::new(2.0, 0.0, 0.0)),
            Atom::new("O", "A", Vec3::new(2.0, 1.0, 0.0)),
        ]);
        let bb = resolve_backbone(&res, 0).unwrap();
        assert_eq!(bb.n, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(bb.ca, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(bb.c, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(bb.o, Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn duplicate_n_atoms_resolve_to_the_first_one_before_alpha() {
        // An alt-location record with two "N" entries before CA: the first, not the closest
        // to CA, is the one the spec calls for.
        let res = residue(vec![
            Atom::new("N", "A", Vec3::new(-5.0, 0.0, 0.0)),
            Atom::new("N", "A", Vec3::new(0.0, 0.0, 0.0)),
            Atom::new("CA", "A", Vec3::new(1.0, 0.0, 0.0)),
            Atom::new("C", "A", Vec3::new(2.0, 0.0, 0.0)),
            Atom::new("O", "A", Vec3::new(2.0, 1.0, 0.0)),
        ]);
        let bb = resolve_backbone(&res, 0).unwrap();
        assert_eq!(bb.n, Vec3::new(-5.0, 0.0, 0.0));
    }

    #[test]
    fn missing_oxygen_returns_none() {
        let res = residue(vec![
            Atom::new("N", "A", Vec3::zero()),
            Atom::new("CA", "A", Vec3::new(1.0, 0.0, 0.0)),
            Atom::new("C", "A", Vec3::new(2.0, 0.0, 0.0)),
        ]);
        assert!(resolve_backbone(&res, 0).is_none());
    }

    #[test]
    fn first_residue_uses_own_carbonyl_fallback() {
        let bb = Backbone {
            n: Vec3::new(0.0, 0.0, 0.0),
            ca: Vec3::new(1.0, 0.0, 0.0),
            c: Vec3::new(1.0, -1.0, 0.0),
            o: Vec3::new(2.0, -1.0, 0.0),
        };
        let h = infer_amide_hydrogen(&bb, None);
        let expected_dir = bb.o.diff(&bb.c).normalize();
        let expected = bb.n.add(&expected_dir.scale(AMIDE_BOND_LENGTH));
        assert!(h.dist(&expected) < 1e-9);
    }

    #[test]
    fn close_previous_carbonyl_sets_trans_peptide_direction() {
        let prev = Backbone {
            n: Vec3::new(-2.0, 0.0, 0.0),
            ca: Vec3::new(-1.0, 0.0, 0.0),
            c: Vec3::new(-0.5, 1.0, 0.0),
            o: Vec3::new(-0.5, 2.0, 0.0),
        };
        let own = Backbone {
            n: Vec3::new(0.0, 0.0, 0.0),
            ca: Vec3::new(1.0, 0.0, 0.0),
            c: Vec3::new(2.0, 0.0, 0.0),
            o: Vec3::new(2.0, 1.0, 0.0),
        };
        assert!(prev.c.dist(&own.n) <= PREV_C_DISTANCE_TRIGGER);
        let h = infer_amide_hydrogen(&own, Some(&prev));
        let expected_dir = prev.c.diff(&prev.o).normalize();
        let expected = own.n.add(&expected_dir.scale(AMIDE_BOND_LENGTH));
        assert!(h.dist(&expected) < 1e-9);
    }

    #[test]
    fn distant_previous_carbonyl_falls_back_to_own() {
        let prev = Backbone {
            n: Vec3::new(-20.0, 0.0, 0.0),
            ca: Vec3::new(-19.0, 0.0, 0.0),
            c: Vec3::new(-18.0, 1.0, 0.0),
            o: Vec3::new(-18.0, 2.0, 0.0),
        };
        let own = Backbone {
            n: Vec3::new(0.0, 0.0, 0.0),
            ca: Vec3::new(1.0, 0.0, 0.0),
            c: Vec3::new(2.0, 0.0, 0.0),
            o: Vec3::new(2.0, 1.0, 0.0),
        };
        assert!(prev.c.dist(&own.n) > PREV_C_DISTANCE_TRIGGER);
        let h = infer_amide_hydrogen(&own, Some(&prev));
        let expected_dir = own.o.diff(&own.c).normalize();
        let expected = own.n.add(&expected_dir.scale(AMIDE_BOND_LENGTH));
        assert!(h.dist(&expected) < 1e-9);
    }
}
