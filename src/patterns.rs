//! Turn and bridge pattern classification: the bit-field per AA residue and the β-partner
//! bookkeeping that the symbol assigner consumes.

use crate::energy::HBondSlots;

/// Bits of the per-AA `pattern` bit-field.
pub const TURN_3: u8 = 1;
pub const TURN_4: u8 = 2;
pub const TURN_5: u8 = 4;
pub const ANTIPARALLEL: u8 = 8;
pub const PARALLEL: u8 = 16;

/// The outputs of pattern classification: the per-AA bit-field and the per-global-residue
/// β-partner pair.
pub struct Patterns {
    /// `pattern[i]`, indexed by AA-index.
    pub pattern: Vec<u8>,
    /// `beta1[g]`, indexed by global residue index; stores the global index of the partner.
    pub beta1: Vec<Option<usize>>,
    /// `beta2[g]`, indexed by global residue index.
    pub beta2: Vec<Option<usize>>,
}

/// Runs the n-turn and bridge classification described by the spec, then canonicalizes
/// `beta1`/`beta2` so that `beta1` consistently points to the same strand side across a sheet.
///
/// `res_pointers[aa_index]` maps an AA-index to its global residue index; `total_residues` is
/// the number of global residues (AA and non-AA) and sizes the `beta1`/`beta2` arrays.
pub fn classify_patterns(res_pointers: &[usize], hb: &HBondSlots, total_residues: usize) -> Patterns {
    let aa_count = res_pointers.len();
    let mut pattern = vec![0u8; aa_count];
    let mut beta1: Vec<Option<usize>> = vec![None; total_residues];
    let mut beta2: Vec<Option<usize>> = vec![None; total_residues];

    classify_n_turns(res_pointers, hb, &mut pattern);
    classify_antiparallel_bridges(res_pointers, hb, &mut pattern, &mut beta1, &mut beta2);
    classify_parallel_bridges(res_pointers, hb, &mut pattern, &mut beta1, &mut beta2);
    canonicalize_beta_partners(res_pointers, &mut beta1, &mut beta2);

    Patterns { pattern, beta1, beta2 }
}

fn classify_n_turns(res_pointers: &[usize], hb: &HBondSlots, pattern: &mut [u8]) {
    for i in 0..res_pointers.len() {
        if let Some(j) = hb.co_partner[i] {
            let delta = res_pointers[j] as isize - res_pointers[i] as isize;
            match delta {
                3 => pattern[i] |= TURN_3,
                4 => pattern[i] |= TURN_4,
                5 => pattern[i] |= TURN_5,
                _ => {}
            }
        }
    }
}

fn mark_bridge(
    a: usize,
    b: usize,
    flag: u8,
    res_pointers: &[usize],
    pattern: &mut [u8],
    beta1: &mut [Option<usize>],
    beta2: &mut [Option<usize>],
) {
    pattern[a] |= flag;
    pattern[b] |= flag;
    record_partner(res_pointers[a], res_pointers[b], beta1, beta2);
    record_partner(res_pointers[b], res_pointers[a], beta1, beta2);
}

fn record_partner(global_idx: usize, partner_global: usize, beta1: &mut [Option<usize>], beta2: &mut [Option<usize>]) {
    if beta1[global_idx].is_none() {
        beta1[global_idx] = Some(partner_global);
    } else if beta1[global_idx] != Some(partner_global) {
        beta2[global_idx] = Some(partner_global);
    }
}

fn classify_antiparallel_bridges(
    res_pointers: &[usize],
    hb: &HBondSlots,
    pattern: &mut [u8],
    beta1: &mut [Option<usize>],
    beta2: &mut [Option<usize>],
) {
    let aa_count = res_pointers.len();

    // Case 1 (direct): coHBonds[coHBonds[i]] == i
    for i in 0..aa_count {
        if let Some(j) = hb.co_partner[i] {
            if hb.co_partner[j] == Some(i) {
                mark_bridge(i, j, ANTIPARALLEL, res_pointers, pattern, beta1, beta2);
            }
        }
    }

    // Case 2 (offset): coHBonds[i] >= 0, hnHBonds[i+2] = k >= 0, resPointers[coHBonds[i]] - resPointers[k] == 2
    for i in 0..aa_count {
        if i + 2 >= aa_count {
            continue;
        }
        let Some(co_i) = hb.co_partner[i] else { continue };
        let Some(k) = hb.hn_partner[i + 2] else { continue };
        if res_pointers[co_i] as isize - res_pointers[k] as isize != 2 {
            continue;
        }
        if i + 1 < aa_count && k + 1 < aa_count {
            mark_bridge(i + 1, k + 1, ANTIPARALLEL, res_pointers, pattern, beta1, beta2);
        }
    }
}

fn classify_parallel_bridges(
    res_pointers: &[usize],
    hb: &HBondSlots,
    pattern: &mut [u8],
    beta1: &mut [Option<usize>],
    beta2: &mut [Option<usize>],
) {
    let aa_count = res_pointers.len();

    // Case 1: coHBonds[i-1] = k >= 0, coHBonds[k] >= 0, resPointers[coHBonds[k]] - resPointers[i] == 1
    for i in 1..aa_count {
        let Some(k) = hb.co_partner[i - 1] else { continue };
        let Some(co_k) = hb.co_partner[k] else { continue };
        if res_pointers[co_k] as isize - res_pointers[i] as isize != 1 {
            continue;
        }
        mark_bridge(i, k, PARALLEL, res_pointers, pattern, beta1, beta2);
    }

    // Case 2: hnHBonds[i] >= 0, coHBonds[i] >= 0, resPointers[coHBonds[i]] - resPointers[hnHBonds[i]] == 2
    for i in 0..aa_count {
        let Some(hn_i) = hb.hn_partner[i] else { continue };
        let Some(co_i) = hb.co_partner[i] else { continue };
        if res_pointers[co_i] as isize - res_pointers[hn_i] as isize != 2 {
            continue;
        }
        if hn_i + 1 < aa_count {
            mark_bridge(i, hn_i + 1, PARALLEL, res_pointers, pattern, beta1, beta2);
        }
    }
}

/// Walks AA-index 1..aaCount and keeps `beta1` pointing at a consistent strand side, by
/// comparing the partner it currently holds against the previous residue's (or, failing that,
/// the residue two back's) partners and swapping with `beta2` when the jump looks wrong.
fn canonicalize_beta_partners(res_pointers: &[usize], beta1: &mut [Option<usize>], beta2: &mut [Option<usize>]) {
    let aa_count = res_pointers.len();
    for i in 1..aa_count {
        let res_i = res_pointers[i];
        let Some(current) = beta1[res_i] else { continue };

        let swap = neighbor_swap_decision(current, res_pointers[i - 1], beta1, beta2)
            .or_else(|| (i >= 2).then(|| neighbor_swap_decision(current, res_pointers[i - 2], beta1, beta2)).flatten())
            .unwrap_or(false);

        if swap {
            let tmp = beta1[res_i];
            beta1[res_i] = beta2[res_i];
            beta2[res_i] = tmp;
        }
    }
}

/// Returns `Some(swap)` when the neighbor at `neighbor_global` carries a `beta1` or `beta2`
/// value to compare against, `None` when neither is set (so the caller should try the next
/// fallback neighbor).
fn neighbor_swap_decision(
    current: usize,
    neighbor_global: usize,
    beta1: &[Option<usize>],
    beta2: &[Option<usize>],
) -> Option<bool> {
    if let Some(nb1) = beta1[neighbor_global] {
        let delta = (current as isize - nb1 as isize).abs();
        return Some(delta > 2);
    }
    if let Some(nb2) = beta2[neighbor_global] {
        let delta = (current as isize - nb2 as isize).abs();
        return Some(delta <= 2);
    }
    None
}
