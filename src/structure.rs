//! The read-only structural model consumed by the secondary-structure engine.
//!
//! Populating a [`Structure`] from a PDB or mmCIF deposit is explicitly out of scope for this
//! crate (see the crate-level documentation); a file reader is an external collaborator that
//! builds one of these and then calls [`crate::annotate`]. What follows is the minimal shape
//! the engine actually needs: chain membership, a residue classification, and backbone atom
//! coordinates.

use std::fmt;

use crate::vec3::Vec3;

/// The chemical classification of a residue, as assigned by the (out-of-scope) file reader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    AminoAcid,
    NucleicAcid,
    Ligand,
    Water,
    Unknown,
}

impl Classification {
    pub fn is_amino_acid(&self) -> bool {
        matches!(self, Classification::AminoAcid)
    }

    pub fn is_nucleic_acid(&self) -> bool {
        matches!(self, Classification::NucleicAcid)
    }
}

/// A single atom: its PDB-style name, the chain it belongs to, and its coordinate.
///
/// The `name` field is compared verbatim against `"N"`, `"CA"`, `"C"`, `"O"` by the backbone
/// geometry resolver; callers that build a [`Structure`] from a padded PDB record (e.g. `" N  "`)
/// are expected to have already trimmed it.
#[derive(Clone, Debug, PartialEq)]
pub struct Atom {
    pub name: String,
    pub chain_id: String,
    pub coordinate: Vec3,
}

impl Atom {
    pub fn new(name: &str, chain_id: &str, coordinate: Vec3) -> Atom {
        Atom { name: name.to_string(), chain_id: chain_id.to_string(), coordinate }
    }
}

/// A single residue: its chain, classification, atoms, and a pointer at its Cα atom.
#[derive(Clone, Debug)]
pub struct Residue {
    pub chain_id: String,
    pub classification: Classification,
    pub atoms: Vec<Atom>,
    /// Index into `atoms` of the alpha-carbon, or `None` when absent (mirrors the spec's `-1`).
    pub alpha_atom_index: Option<usize>,
}

impl Residue {
    pub fn new(chain_id: &str, classification: Classification, atoms: Vec<Atom>) -> Residue {
        let alpha_atom_index = atoms.iter().position(|a| a.name == "CA");
        Residue { chain_id: chain_id.to_string(), classification, atoms, alpha_atom_index }
    }

    /// Builds a residue with an explicit Cα pointer, bypassing the automatic lookup above.
    ///
    /// Used by tests and by callers that want to exercise the `MissingAlpha` tolerance path: an
    /// `AMINO_ACID` residue whose `alpha_atom_index` is `None` even though a `"CA"` atom exists
    /// by coincidence, or vice versa.
    pub fn with_alpha_index(
        chain_id: &str,
        classification: Classification,
        atoms: Vec<Atom>,
        alpha_atom_index: Option<usize>,
    ) -> Residue {
        Residue { chain_id: chain_id.to_string(), classification, atoms, alpha_atom_index }
    }

    pub fn atom_named(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    /// The Cα coordinate, falling back to the first atom when the residue is an amino acid with
    /// no located Cα (the `MissingAlpha` tolerance case from the error taxonomy).
    pub fn alpha_coordinate(&self) -> Option<Vec3> {
        if let Some(idx) = self.alpha_atom_index {
            return self.atoms.get(idx).map(|a| a.coordinate);
        }
        if self.classification.is_amino_acid() {
            return self.atoms.first().map(|a| a.coordinate);
        }
        None
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:?} ({} atoms)", self.chain_id, self.classification, self.atoms.len())
    }
}

/// The ordered, read-only sequence of residues that make up a structural model.
///
/// Residues must be listed in chain order (all residues of one chain are contiguous); the
/// engine never reorders them.
#[derive(Clone, Debug, Default)]
pub struct Structure {
    residues: Vec<Residue>,
}

impl Structure {
    pub fn new(residues: Vec<Residue>) -> Structure {
        Structure { residues }
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}
