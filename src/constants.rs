//! Domain constants for the Kabsch-Sander DSSP variant implemented by this crate.
//!
//! These are fixed by the algorithm, not runtime configuration: the spec is explicit that they
//! must not be exposed as options.

/// Radius, in Angstrom, used by the octree to enumerate candidate H-bond donor/acceptor pairs.
pub const H_BOND_CUTOFF_DISTANCE: f64 = 8.0;

/// The `f` factor (kcal/mol * Angstrom) in the Kabsch-Sander electrostatic approximation.
pub const ENERGY_FACTOR: f64 = 332.0;

/// Partial charge on the amide nitrogen / carbonyl oxygen pair (`q1`).
pub const CHARGE_1: f64 = 0.42;

/// Partial charge on the amide hydrogen / carbonyl carbon pair (`q2`).
pub const CHARGE_2: f64 = 0.20;

/// A candidate donor/acceptor pair is only accepted as a hydrogen bond below this energy.
pub const H_BOND_ENERGY_THRESHOLD: f64 = -0.5;

/// Length, in Angstrom, of the inferred N-H amide bond.
pub const AMIDE_BOND_LENGTH: f64 = 1.008;

/// Maximum distance between the previous residue's carbonyl carbon and this residue's amide
/// nitrogen for the "trans-peptide" H inference to apply; beyond this the own-carbonyl fallback
/// direction is used instead.
pub const PREV_C_DISTANCE_TRIGGER: f64 = 2.0;

/// Cα-Cα distances beyond this, between chain-adjacent residues, mark a missing-density gap
/// and force a fragment split.
pub const GAP_SPLIT_THRESHOLD: f64 = 5.1;

/// Helix and strand fragments shorter than this many residues are demoted to coil.
pub const MIN_SS_FRAGMENT_LENGTH: usize = 3;

/// Maximum octree subdivision depth before a sub-volume is reported as `OctreeExcessiveDivision`.
pub const OCTREE_MAX_DEPTH: u32 = 32;

/// Maximum number of items an octree leaf may hold before it is split (subject to `OCTREE_MAX_DEPTH`).
pub const OCTREE_LEAF_CAPACITY: usize = 8;
