use thiserror::Error;

/// Errors the secondary-structure engine can report.
///
/// [`crate::annotate`] never fails outright: per the engine's missing-density tolerance
/// philosophy, every variant here is a diagnostic, not a control-flow signal. An empty structure
/// ([`SecStructError::EmptyChains`]) yields an empty [`crate::Annotations`]; a residue with
/// incomplete backbone geometry is excluded from the relevant donor/acceptor role; an
/// over-dense octree sub-volume still gets every pair compared, just without the usual pruning.
/// Each is logged at `warn!` where it is detected, and the octree's are additionally collected
/// into [`crate::Annotations::warnings`] for programmatic inspection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecStructError {
    /// No amino-acid chains were found in the input structure.
    #[error("structure contains no amino-acid chains")]
    EmptyChains,

    /// A residue is missing one of its backbone N, C or O atoms.
    #[error("residue at AA-index {aa_index} is missing its backbone {atom_name} atom")]
    MissingBackboneAtom { aa_index: usize, atom_name: &'static str },

    /// An amino-acid residue has no located Cα atom; the first atom was substituted.
    #[error("residue at AA-index {aa_index} is classified as an amino acid but has no Cα atom")]
    MissingAlpha { aa_index: usize },

    /// The octree exceeded its maximum subdivision depth while indexing a sub-volume.
    #[error("octree exceeded its maximum depth while subdividing {item_count} atoms")]
    OctreeExcessiveDivision { item_count: usize },
}
