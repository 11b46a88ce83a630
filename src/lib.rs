//! Assigns protein secondary structure — a Kabsch-Sander DSSP variant, in the style of the
//! Molscript/Kraulis cartoon renderer — from backbone coordinates already loaded into memory.
//!
//! # Scope
//!
//! This crate starts from a [`Structure`] — chains of residues, each with a classification and
//! the atoms it was deposited with — and produces, per residue, one of the five coarse
//! secondary-structure components plus the full extended 8-symbol trace behind that call.
//! Reading a PDB or mmCIF deposit into a [`Structure`], rendering the result as a cartoon, and
//! any UI or CLI around either of those, are explicitly out of scope: those are jobs for a
//! separate crate that depends on this one.
//!
//! # Pipeline
//!
//! [`annotate`] runs, in order: an octree-accelerated neighbor search over Cα atoms
//! ([`octree`]), backbone geometry resolution and amide-hydrogen inference ([`geometry`]),
//! Kabsch-Sander hydrogen-bond energy evaluation ([`energy`]), n-turn and β-bridge pattern
//! classification ([`patterns`]), the extended-alphabet symbol assigner ([`symbols`]),
//! coarsening and fragment extraction ([`fragments`]), and finally per-chain publication
//! ([`chains`]).

pub mod chains;
pub mod constants;
pub mod energy;
pub mod errors;
pub mod fragments;
pub mod geometry;
pub mod octree;
pub mod patterns;
pub mod structure;
pub mod symbols;
pub mod vec3;

pub use chains::{publish_chain_ranges, ChainRange};
pub use constants::H_BOND_CUTOFF_DISTANCE;
pub use energy::{evaluate_h_bonds, HBondDiagnostic, HBondSlots};
pub use errors::SecStructError;
pub use fragments::{extract_fragments, reinterpret, ComponentType, Fragment};
pub use geometry::{infer_amide_hydrogen, resolve_backbone, Backbone};
pub use octree::{Octree, OctreeItem};
pub use patterns::{classify_patterns, Patterns};
pub use structure::{Atom, Classification, Residue, Structure};
pub use symbols::{assign_symbols, initial_symbols};
pub use vec3::Vec3;

/// A residue whose backbone geometry could not be resolved: no symbol pass ever touches it, so
/// it must not be confused with a resolved amino acid that simply carries no secondary
/// structure (`' '`, coarsened to [`ComponentType::Coil`]).
const UNRESOLVED_BACKBONE_SYMBOL: char = '?';

/// Everything this crate computes for one [`Structure`]: the per-chain fragment ranges, the raw
/// extended-alphabet trace they were derived from, the retained hydrogen bonds, and any
/// non-fatal anomalies encountered along the way.
///
/// Beyond the published fragments, this also carries the intermediate pattern/β-partner state
/// a caller may want to inspect — e.g. to explain why a particular residue got the assignment
/// it did — without having to re-run the pipeline by hand.
#[derive(Clone, Debug, Default)]
pub struct Annotations {
    pub chains: Vec<ChainRange>,
    /// One entry per residue in [`Structure::residues`] order, in the extended 8-symbol alphabet
    /// (before the coarsening [`reinterpret`] performs on the way to [`Fragment`]s).
    pub extended_symbols: Vec<char>,
    /// Every hydrogen bond that cleared the energy threshold, in both donor/acceptor directions
    /// (see [`HBondSlots::co_bonds`]/[`HBondSlots::hn_bonds`]).
    pub h_bonds: Vec<HBondDiagnostic>,
    /// `pattern[aa_index]`, the n-turn/bridge bit-field from [`patterns::classify_patterns`].
    pub patterns: Vec<u8>,
    /// `beta1[g]`, the first β-partner of global residue `g`, or `None`.
    pub beta1: Vec<Option<usize>>,
    /// `beta2[g]`, the second β-partner of global residue `g`, or `None`.
    pub beta2: Vec<Option<usize>>,
    pub warnings: Vec<SecStructError>,
}

impl Annotations {
    fn empty() -> Annotations {
        Annotations::default()
    }

    /// The hydrogen bond donated by this AA's C=O, if its `co` slot is filled.
    pub fn h_bond_donated_by(&self, aa_index: usize) -> Option<&HBondDiagnostic> {
        self.h_bonds.iter().find(|b| b.donor_aa == aa_index)
    }

    /// The hydrogen bond accepted by this AA's N-H, if its `hn` slot is filled.
    pub fn h_bond_accepted_by(&self, aa_index: usize) -> Option<&HBondDiagnostic> {
        self.h_bonds.iter().find(|b| b.acceptor_aa == aa_index)
    }
}

/// Runs the full secondary-structure pipeline over `structure`.
///
/// An input with no amino-acid residues logs [`SecStructError::EmptyChains`] and yields an empty
/// [`Annotations`] rather than failing outright — this engine never returns `Err`; every anomaly
/// it can detect is a diagnostic, not a reason to stop.
pub fn annotate(structure: &Structure) -> Annotations {
    let residues = structure.residues();
    let total_residues = residues.len();

    let res_pointers: Vec<usize> =
        residues.iter().enumerate().filter(|(_, r)| r.classification.is_amino_acid()).map(|(g, _)| g).collect();

    if res_pointers.is_empty() {
        log::warn!("{}", SecStructError::EmptyChains);
        return Annotations::empty();
    }

    let backbones: Vec<Option<Backbone>> =
        res_pointers.iter().enumerate().map(|(aa_index, &g)| resolve_backbone(&residues[g], aa_index)).collect();

    let hydrogens: Vec<Option<Vec3>> = (0..backbones.len())
        .map(|aa_index| {
            let own = backbones[aa_index]?;
            let previous = previous_backbone_in_chain(aa_index, &res_pointers, residues, &backbones);
            Some(infer_amide_hydrogen(&own, previous.as_ref()))
        })
        .collect();

    let n: Vec<Option<Vec3>> = backbones.iter().map(|b| b.map(|bb| bb.n)).collect();
    let c: Vec<Option<Vec3>> = backbones.iter().map(|b| b.map(|bb| bb.c)).collect();
    let o: Vec<Option<Vec3>> = backbones.iter().map(|b| b.map(|bb| bb.o)).collect();

    let items: Vec<OctreeItem> =
        backbones.iter().enumerate().filter_map(|(aa_index, b)| b.map(|bb| OctreeItem::new(aa_index, bb.ca))).collect();
    let octree = Octree::build(items, H_BOND_CUTOFF_DISTANCE);
    let candidate_pairs = octree.candidate_pairs(H_BOND_CUTOFF_DISTANCE);

    let hb = evaluate_h_bonds(&n, &hydrogens, &c, &o, &candidate_pairs);
    let patterns = classify_patterns(&res_pointers, &hb, total_residues);

    let is_amino_acid: Vec<bool> = residues.iter().map(|r| r.classification.is_amino_acid()).collect();
    let mut ss_flags = initial_symbols(&is_amino_acid);
    for (aa_index, bb) in backbones.iter().enumerate() {
        if bb.is_none() {
            ss_flags[res_pointers[aa_index]] = UNRESOLVED_BACKBONE_SYMBOL;
        }
    }
    assign_symbols(&res_pointers, &patterns, &mut ss_flags);

    let raw_fragments = extract_fragments(structure, &ss_flags);
    let chains = publish_chain_ranges(structure, raw_fragments);

    let mut h_bonds: Vec<HBondDiagnostic> = hb.co_bonds().collect();
    h_bonds.extend(hb.hn_bonds());

    Annotations {
        chains,
        extended_symbols: ss_flags,
        h_bonds,
        patterns: patterns.pattern.clone(),
        beta1: patterns.beta1.clone(),
        beta2: patterns.beta2.clone(),
        warnings: octree.excessive_divisions().to_vec(),
    }
}

/// The backbone of the AA immediately before `aa_index`, or `None` at the start of a chain or
/// when that backbone itself failed to resolve.
///
/// Guards the `aa_index == 0` boundary explicitly rather than indexing `aa_index - 1`, which
/// would underflow.
fn previous_backbone_in_chain(
    aa_index: usize,
    res_pointers: &[usize],
    residues: &[Residue],
    backbones: &[Option<Backbone>],
) -> Option<Backbone> {
    if aa_index == 0 {
        return None;
    }
    let this_chain = &residues[res_pointers[aa_index]].chain_id;
    let prev_chain = &residues[res_pointers[aa_index - 1]].chain_id;
    if this_chain != prev_chain {
        return None;
    }
    backbones[aa_index - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helix_residue(chain_id: &str, i: usize) -> Residue {
        // A loose idealized helix: 1.5A rise and 100 degree turn per residue, radius 2.3A,
        // close enough to real backbone geometry to trigger i,i+4 hydrogen bonds.
        let angle = (i as f64) * 100.0_f64.to_radians();
        let radius = 2.3;
        let rise = 1.5;
        let ca = Vec3::new(radius * angle.cos(), radius * angle.sin(), rise * i as f64);
        let n = ca.add(&Vec3::new(0.6, 0.0, -0.6));
        let c = ca.add(&Vec3::new(-0.3, 0.5, 0.6));
        let o = c.add(&Vec3::new(-0.2, 0.7, 0.5));
        Residue::new(
            chain_id,
            Classification::AminoAcid,
            vec![Atom::new("N", chain_id, n), Atom::new("CA", chain_id, ca), Atom::new("C", chain_id, c), Atom::new("O", chain_id, o)],
        )
    }

    #[test]
    fn empty_structure_yields_empty_annotations_without_panicking() {
        let structure = Structure::new(vec![]);
        let annotations = annotate(&structure);
        assert!(annotations.chains.is_empty());
        assert!(annotations.extended_symbols.is_empty());
    }

    #[test]
    fn structure_with_only_non_amino_acid_residues_yields_empty_annotations() {
        let structure = Structure::new(vec![Residue::new(
            "A",
            Classification::Water,
            vec![Atom::new("O", "A", Vec3::zero())],
        )]);
        let annotations = annotate(&structure);
        assert!(annotations.chains.is_empty());
    }

    #[test]
    fn single_residue_chain_does_not_panic_on_the_first_residue_boundary() {
        let structure = Structure::new(vec![helix_residue("A", 0)]);
        let annotations = annotate(&structure);
        assert_eq!(annotations.extended_symbols.len(), 1);
    }

    #[test]
    fn two_separate_chains_do_not_chain_an_amide_hydrogen_across_the_boundary() {
        let structure = Structure::new(vec![helix_residue("A", 0), helix_residue("B", 0)]);
        // Must not panic: residue 1 (first AA of chain B) must not look at chain A's backbone.
        let annotations = annotate(&structure);
        assert_eq!(annotations.chains.len(), 2);
    }

    #[test]
    fn annotations_expose_patterns_and_beta_partners_alongside_fragments() {
        let residues: Vec<Residue> = (0..12).map(|i| helix_residue("A", i)).collect();
        let structure = Structure::new(residues);
        let annotations = annotate(&structure);

        assert_eq!(annotations.patterns.len(), 12);
        assert_eq!(annotations.beta1.len(), 12);
        assert_eq!(annotations.beta2.len(), 12);
        // An idealized helix forms i,i+4 hydrogen bonds, so some donor slot must be filled.
        assert!(!annotations.h_bonds.is_empty());
        let donated = annotations.h_bonds[0];
        assert!(annotations.h_bond_donated_by(donated.donor_aa).is_some());
    }
}
