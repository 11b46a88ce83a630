//! Kabsch-Sander hydrogen-bond energy evaluation and the per-AA "best bond" slots it feeds.

use crate::constants::{CHARGE_1, CHARGE_2, ENERGY_FACTOR, H_BOND_ENERGY_THRESHOLD};
use crate::vec3::Vec3;

/// Energies start above any real bond energy, so the first candidate always wins its slot.
const INITIAL_ENERGY: f64 = 1e10;

/// The Kabsch-Sander electrostatic approximation for one donor (`N-H` of residue `a`) / acceptor
/// (`C=O` of residue `b`) pair.
///
/// ```text
/// E = q1 * q2 * f * (1/|O_b - N_a| + 1/|C_b - H_a| - 1/|O_b - H_a| - 1/|C_b - N_a|)
/// ```
pub fn dssp_energy(donor_n: Vec3, donor_h: Vec3, acceptor_o: Vec3, acceptor_c: Vec3) -> f64 {
    let term = 1.0 / donor_n.dist(&acceptor_o) + 1.0 / donor_h.dist(&acceptor_c)
        - 1.0 / donor_h.dist(&acceptor_o)
        - 1.0 / donor_n.dist(&acceptor_c);
    CHARGE_1 * CHARGE_2 * ENERGY_FACTOR * term
}

/// A diagnostic view of one retained hydrogen bond, for logging and introspection — it does not
/// change which bonds are kept, only reports one that already was.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HBondDiagnostic {
    pub donor_aa: usize,
    pub acceptor_aa: usize,
    pub energy: f64,
}

/// The per-AA `coHBonds`/`hnHBonds`/`coEnergy`/`hnEnergy` working arrays from the data model.
///
/// Each donor slot (`co_partner[i]`, the acceptor of residue `i`'s C=O) and each acceptor slot
/// (`hn_partner[i]`, the donor of residue `i`'s N-H) retains only the single lowest-energy bond
/// found across every candidate pair touching that residue.
pub struct HBondSlots {
    pub co_partner: Vec<Option<usize>>,
    pub hn_partner: Vec<Option<usize>>,
    pub co_energy: Vec<f64>,
    pub hn_energy: Vec<f64>,
}

impl HBondSlots {
    fn new(aa_count: usize) -> HBondSlots {
        HBondSlots {
            co_partner: vec![None; aa_count],
            hn_partner: vec![None; aa_count],
            co_energy: vec![INITIAL_ENERGY; aa_count],
            hn_energy: vec![INITIAL_ENERGY; aa_count],
        }
    }

    /// Diagnostic iterator over every retained C=O-donor bond (`i -> co_partner[i]`).
    pub fn co_bonds(&self) -> impl Iterator<Item = HBondDiagnostic> + '_ {
        self.co_partner.iter().enumerate().filter_map(|(i, partner)| {
            partner.map(|j| HBondDiagnostic { donor_aa: i, acceptor_aa: j, energy: self.co_energy[i] })
        })
    }

    /// Diagnostic iterator over every retained N-H-acceptor bond (`hn_partner[i] -> i`).
    ///
    /// Distinct from [`HBondSlots::co_bonds`]: the two slots are filled independently (see
    /// [`evaluate_h_bonds`]), so a pair can clear one slot's energy without clearing the other's.
    pub fn hn_bonds(&self) -> impl Iterator<Item = HBondDiagnostic> + '_ {
        self.hn_partner.iter().enumerate().filter_map(|(i, partner)| {
            partner.map(|j| HBondDiagnostic { donor_aa: j, acceptor_aa: i, energy: self.hn_energy[i] })
        })
    }

    /// The bond retained in residue `aa_index`'s C=O-donor slot, if any.
    pub fn co_bond_of(&self, aa_index: usize) -> Option<HBondDiagnostic> {
        self.co_partner[aa_index].map(|j| HBondDiagnostic { donor_aa: aa_index, acceptor_aa: j, energy: self.co_energy[aa_index] })
    }

    /// The bond retained in residue `aa_index`'s N-H-acceptor slot, if any.
    pub fn hn_bond_of(&self, aa_index: usize) -> Option<HBondDiagnostic> {
        self.hn_partner[aa_index].map(|j| HBondDiagnostic { donor_aa: j, acceptor_aa: aa_index, energy: self.hn_energy[aa_index] })
    }
}

/// Evaluates every candidate pair in both donor/acceptor directions and keeps, per slot, only
/// the lowest-energy bond that clears [`H_BOND_ENERGY_THRESHOLD`].
///
/// `n`, `h`, `c`, `o` are per-AA backbone coordinates (`None` where the geometry resolver could
/// not locate the atom for that residue, per the `MissingBackboneAtom` tolerance).
///
/// This reduction is commutative per slot (the minimum of a set does not depend on the order in
/// which the set is visited), so shuffling `candidate_pairs` never changes the result — this is
/// what makes the engine's output independent of the octree's (unspecified) pair-enumeration
/// order. The same property is also what would make it safe to evaluate candidate pairs across
/// a thread pool, as long as the `min`-update for a given slot is serialized (a per-index lock,
/// or a per-worker local reduction merged at the end); this crate does not do so, since the
/// reference engine is itself sequential.
pub fn evaluate_h_bonds(
    n: &[Option<Vec3>],
    h: &[Option<Vec3>],
    c: &[Option<Vec3>],
    o: &[Option<Vec3>],
    candidate_pairs: &[(usize, usize)],
) -> HBondSlots {
    let aa_count = n.len();
    let mut slots = HBondSlots::new(aa_count);

    for &(i, j) in candidate_pairs {
        // donor = i, acceptor = j
        if let (Some(ni), Some(hi), Some(oj), Some(cj)) = (n[i], h[i], o[j], c[j]) {
            let e1 = dssp_energy(ni, hi, oj, cj);
            if e1 < H_BOND_ENERGY_THRESHOLD && e1 < slots.co_energy[i] {
                slots.co_partner[i] = Some(j);
                slots.hn_partner[j] = Some(i);
                slots.co_energy[i] = e1;
            }
        }
        // donor = j, acceptor = i
        if let (Some(nj), Some(hj), Some(oi), Some(ci)) = (n[j], h[j], o[i], c[i]) {
            let e2 = dssp_energy(nj, hj, oi, ci);
            if e2 < H_BOND_ENERGY_THRESHOLD && e2 < slots.hn_energy[i] {
                slots.hn_partner[i] = Some(j);
                slots.co_partner[j] = Some(i);
                slots.hn_energy[i] = e2;
            }
        }
    }

    slots
}
