//! Groups fragments by chain for publication, and runs the separate nucleic-acid pass of §4.8:
//! every contiguous same-chain run of nucleic-acid residues is emitted as its own Strand
//! fragment, entirely independent of the amino-acid symbol pipeline (which never touches
//! non-amino-acid residues at all).

use crate::fragments::{ComponentType, Fragment};
use crate::structure::{Classification, Structure};

/// All fragments belonging to one chain, in residue order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainRange {
    pub chain_id: String,
    pub fragments: Vec<Fragment>,
}

/// Merges `fragments` (from [`crate::fragments::extract_fragments`]) with a fresh scan for
/// nucleic-acid runs, then groups everything by chain in residue order.
pub fn publish_chain_ranges(structure: &Structure, fragments: Vec<Fragment>) -> Vec<ChainRange> {
    let mut all = fragments;
    all.extend(nucleic_acid_strand_fragments(structure));
    all.sort_by_key(|f| (f.chain_id.clone(), f.start_global));
    group_into_chain_ranges(all)
}

/// Every contiguous same-chain run of [`Classification::NucleicAcid`] residues, each published
/// as one Strand fragment.
fn nucleic_acid_strand_fragments(structure: &Structure) -> Vec<Fragment> {
    let residues = structure.residues();
    let mut out = Vec::new();
    let mut i = 0;
    while i < residues.len() {
        if residues[i].classification != Classification::NucleicAcid {
            i += 1;
            continue;
        }
        let chain_id = residues[i].chain_id.clone();
        let start = i;
        let mut j = i;
        while j + 1 < residues.len() && residues[j + 1].classification == Classification::NucleicAcid && residues[j + 1].chain_id == chain_id {
            j += 1;
        }
        out.push(Fragment { component: ComponentType::Strand, chain_id, start_global: start, end_global: j });
        i = j + 1;
    }
    out
}

fn group_into_chain_ranges(fragments: Vec<Fragment>) -> Vec<ChainRange> {
    let mut ranges: Vec<ChainRange> = Vec::new();
    for frag in fragments {
        match ranges.last_mut() {
            Some(last) if last.chain_id == frag.chain_id => last.fragments.push(frag),
            _ => ranges.push(ChainRange { chain_id: frag.chain_id.clone(), fragments: vec![frag] }),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{Atom, Residue};
    use crate::vec3::Vec3;

    fn residue(chain_id: &str, classification: Classification) -> Residue {
        Residue::new(chain_id, classification, vec![Atom::new("CA", chain_id, Vec3::zero())])
    }

    #[test]
    fn fragments_from_the_same_chain_are_grouped_together() {
        let structure = Structure::new(vec![residue("A", Classification::AminoAcid), residue("A", Classification::AminoAcid)]);
        let fragments = vec![
            Fragment { component: ComponentType::Helix, chain_id: "A".into(), start_global: 0, end_global: 0 },
            Fragment { component: ComponentType::Coil, chain_id: "A".into(), start_global: 1, end_global: 1 },
        ];
        let ranges = publish_chain_ranges(&structure, fragments);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].fragments.len(), 2);
    }

    #[test]
    fn nucleic_acid_chain_with_no_aa_yields_one_strand_fragment() {
        let residues: Vec<Residue> = (0..15).map(|_| residue("R", Classification::NucleicAcid)).collect();
        let structure = Structure::new(residues);
        let ranges = publish_chain_ranges(&structure, vec![]);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].fragments.len(), 1);
        assert_eq!(ranges[0].fragments[0].component, ComponentType::Strand);
        assert_eq!((ranges[0].fragments[0].start_global, ranges[0].fragments[0].end_global), (0, 14));
    }

    #[test]
    fn nucleic_acid_run_interleaves_with_amino_acid_fragments_on_the_same_chain() {
        let residues = vec![
            residue("A", Classification::NucleicAcid),
            residue("A", Classification::NucleicAcid),
            residue("A", Classification::AminoAcid),
            residue("A", Classification::AminoAcid),
        ];
        let structure = Structure::new(residues);
        let aa_fragments = vec![Fragment { component: ComponentType::Coil, chain_id: "A".into(), start_global: 2, end_global: 3 }];
        let ranges = publish_chain_ranges(&structure, aa_fragments);
        assert_eq!(ranges.len(), 1);
        let subs = &ranges[0].fragments;
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].component, ComponentType::Strand);
        assert_eq!((subs[0].start_global, subs[0].end_global), (0, 1));
        assert_eq!(subs[1].component, ComponentType::Coil);
        assert_eq!((subs[1].start_global, subs[1].end_global), (2, 3));
    }

    #[test]
    fn different_chains_produce_separate_ranges() {
        let structure = Structure::new(vec![residue("A", Classification::AminoAcid), residue("B", Classification::AminoAcid)]);
        let fragments = vec![
            Fragment { component: ComponentType::Coil, chain_id: "A".into(), start_global: 0, end_global: 0 },
            Fragment { component: ComponentType::Coil, chain_id: "B".into(), start_global: 1, end_global: 1 },
        ];
        let ranges = publish_chain_ranges(&structure, fragments);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].chain_id, "A");
        assert_eq!(ranges[1].chain_id, "B");
    }
}
