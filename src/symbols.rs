//! The multi-pass state machine that turns turn/bridge patterns into the extended 8-symbol
//! alphabet: `' '` (unassigned AA), `'-'` (non-AA), `h`/`H` (4-helix), `e`/`E` (strand),
//! `g`/`G` (3-helix), `i`/`I` (5-helix), `t`/`T` (turn). Lowercase marks the first residue of a
//! run, uppercase the residues that continue it.

use crate::patterns::{Patterns, TURN_3, TURN_4, TURN_5};

/// Builds the initial `ssFlags` array: `' '` for every amino acid, `'-'` for everything else.
pub fn initial_symbols(is_amino_acid: &[bool]) -> Vec<char> {
    is_amino_acid.iter().map(|&aa| if aa { ' ' } else { '-' }).collect()
}

/// Runs all eight passes of §4.6 over `ss_flags` in place.
pub fn assign_symbols(res_pointers: &[usize], patterns: &Patterns, ss_flags: &mut [char]) {
    let aa_count = res_pointers.len();

    mark_n_helix(aa_count, TURN_4, 'h', 'H', 4, &patterns.pattern, res_pointers, ss_flags);

    strand_pass(aa_count, res_pointers, &patterns.beta1, ss_flags);
    strand_pass(aa_count, res_pointers, &patterns.beta2, ss_flags);

    mark_n_helix(aa_count, TURN_5, 'i', 'I', 5, &patterns.pattern, res_pointers, ss_flags);
    mark_n_helix(aa_count, TURN_3, 'g', 'G', 3, &patterns.pattern, res_pointers, ss_flags);

    demote_singlet_short_helices(ss_flags);

    single_turn_pass(aa_count, TURN_5, 5, &patterns.pattern, res_pointers, ss_flags);
    single_turn_pass(aa_count, TURN_4, 4, &patterns.pattern, res_pointers, ss_flags);
    single_turn_pass(aa_count, TURN_3, 3, &patterns.pattern, res_pointers, ss_flags);
}

/// Pass 1 (4-helix), pass 3 (5-helix) and pass 4 (3-helix): for every `i` where residue `i` and
/// `i+1` both carry `turn_bit`, mark a run of `width` residues starting at `i+1`. The first
/// residue of the run gets `first_symbol` unless it is already the continuation symbol of the
/// same class (i.e. this run is extending one already laid down by a previous `i`); the
/// remaining `width - 1` residues always get `cont_symbol`.
fn mark_n_helix(
    aa_count: usize,
    turn_bit: u8,
    first_symbol: char,
    cont_symbol: char,
    width: usize,
    pattern: &[u8],
    res_pointers: &[usize],
    ss_flags: &mut [char],
) {
    if aa_count < 2 {
        return;
    }
    for i in 0..(aa_count - 1) {
        if pattern[i] & turn_bit == 0 || pattern[i + 1] & turn_bit == 0 {
            continue;
        }
        let g1 = res_pointers[i + 1];
        if ss_flags[g1] != cont_symbol {
            ss_flags[g1] = first_symbol;
        }
        for offset in 2..=width {
            let idx = i + offset;
            if idx < aa_count {
                ss_flags[res_pointers[idx]] = cont_symbol;
            }
        }
    }
}

/// Pass 2: one sweep over `beta`, either `beta1` or `beta2`. From every AA-index `i` with a
/// partner recorded, walks forward tolerating the small bulges the reference ladder allows
/// (a one-residue gap, or a two-residue gap) before giving up; if the run's endpoints still
/// point at partners within 3 residues of each other, the whole run is upgraded towards a
/// strand symbol.
fn strand_pass(aa_count: usize, res_pointers: &[usize], beta: &[Option<usize>], ss_flags: &mut [char]) {
    for i in 0..aa_count {
        let Some(partner_i) = beta[res_pointers[i]] else { continue };
        let j = walk_strand_run(i, aa_count, res_pointers, beta);
        let Some(partner_j) = beta[res_pointers[j]] else { continue };

        let dist = (partner_i as isize - partner_j as isize).abs();
        if dist > 3 {
            continue;
        }
        for k in i..=j {
            let g = res_pointers[k];
            ss_flags[g] = upgrade_strand_symbol(ss_flags[g]);
        }
    }
}

fn walk_strand_run(i: usize, aa_count: usize, res_pointers: &[usize], beta: &[Option<usize>]) -> usize {
    let mut j = i;
    loop {
        let step1 = j + 1;
        if step1 < aa_count && beta[res_pointers[step1]].is_some() {
            j = step1;
            continue;
        }
        let step2 = j + 2;
        if step2 < aa_count && beta[res_pointers[step2]].is_some() {
            j = step2;
            continue;
        }
        let step3 = j + 3;
        if step3 < aa_count && beta[res_pointers[step3]].is_some() {
            j = step3;
            continue;
        }
        break;
    }
    j
}

fn upgrade_strand_symbol(current: char) -> char {
    match current {
        ' ' => 'e',
        'e' => 'E',
        'E' => 'E',
        other => other,
    }
}

fn is_g_family(c: char) -> bool {
    c == 'g' || c == 'G'
}

fn is_i_family(c: char) -> bool {
    c == 'i' || c == 'I'
}

/// Pass 5: a 3-helix or 5-helix residue with no same-family neighbor on either side is demoted
/// to a plain turn. An out-of-range neighbor is treated as "not the same class", per §4.6.
fn demote_singlet_short_helices(ss_flags: &mut [char]) {
    let n = ss_flags.len();
    for g in 0..n {
        let c = ss_flags[g];
        if !is_g_family(c) && !is_i_family(c) {
            continue;
        }
        let same_family = |other: char| (is_g_family(c) && is_g_family(other)) || (is_i_family(c) && is_i_family(other));
        let left_same = g > 0 && same_family(ss_flags[g - 1]);
        let right_same = g + 1 < n && same_family(ss_flags[g + 1]);
        if !left_same && !right_same {
            ss_flags[g] = 't';
        }
    }
}

/// Passes 6-8: an isolated `turn_bit` (neither chain neighbor also carries it, so it was not
/// already absorbed by [`mark_n_helix`]) paints a turn of `width` residues into whatever cells
/// are still unassigned (`' '`); already-assigned cells are left untouched.
fn single_turn_pass(aa_count: usize, turn_bit: u8, width: usize, pattern: &[u8], res_pointers: &[usize], ss_flags: &mut [char]) {
    for i in 0..aa_count {
        if pattern[i] & turn_bit == 0 {
            continue;
        }
        let left_set = i > 0 && pattern[i - 1] & turn_bit != 0;
        let right_set = i + 1 < aa_count && pattern[i + 1] & turn_bit != 0;
        if left_set || right_set {
            continue;
        }
        for offset in 1..=width {
            let idx = i + offset;
            if idx >= aa_count {
                break;
            }
            let g = res_pointers[idx];
            if ss_flags[g] == ' ' {
                ss_flags[g] = if offset == 1 { 't' } else { 'T' };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::evaluate_h_bonds;
    use crate::patterns::classify_patterns;

    #[test]
    fn initial_symbols_split_aa_from_non_aa() {
        let flags = initial_symbols(&[true, false, true]);
        assert_eq!(flags, vec![' ', '-', ' ']);
    }

    #[test]
    fn continuous_four_turn_run_yields_one_lowercase_then_uppercase() {
        // 8 AAs where coHBonds[i] = i + 4 for i in 0..4, giving a 4TURN bit on residues 0..=3
        let res_pointers: Vec<usize> = (0..8).collect();
        let mut hb = evaluate_h_bonds(&vec![None; 8], &vec![None; 8], &vec![None; 8], &vec![None; 8], &[]);
        for i in 0..4 {
            hb.co_partner[i] = Some(i + 4);
        }
        let patterns = classify_patterns(&res_pointers, &hb, 8);
        assert_eq!(patterns.pattern[0] & TURN_4, TURN_4);

        let mut ss_flags = initial_symbols(&[true; 8]);
        assign_symbols(&res_pointers, &patterns, &mut ss_flags);

        // residue 1 starts the run ('h'); residues 2..=4 continue it ('H')
        assert_eq!(ss_flags[1], 'h');
        assert_eq!(ss_flags[2], 'H');
        assert_eq!(ss_flags[3], 'H');
        assert_eq!(ss_flags[4], 'H');
    }

    #[test]
    fn isolated_four_turn_is_painted_as_a_turn_not_a_helix() {
        let res_pointers: Vec<usize> = (0..8).collect();
        let mut hb = evaluate_h_bonds(&vec![None; 8], &vec![None; 8], &vec![None; 8], &vec![None; 8], &[]);
        hb.co_partner[0] = Some(4); // only residue 0 has a 4-turn; residue 1 does not
        let patterns = classify_patterns(&res_pointers, &hb, 8);

        let mut ss_flags = initial_symbols(&[true; 8]);
        assign_symbols(&res_pointers, &patterns, &mut ss_flags);

        assert_eq!(ss_flags[1], 't');
        assert_eq!(ss_flags[2], 'T');
        assert_eq!(ss_flags[3], 'T');
        assert_eq!(ss_flags[4], 'T');
        assert_ne!(ss_flags[1], 'h');
    }

    #[test]
    fn singlet_3_helix_with_no_matching_neighbor_is_demoted_to_turn() {
        let mut ss_flags = vec![' ', 'g', ' '];
        demote_singlet_short_helices(&mut ss_flags);
        assert_eq!(ss_flags[1], 't');
    }

    #[test]
    fn paired_3_helix_neighbors_survive_demotion() {
        let mut ss_flags = vec!['g', 'g', ' '];
        demote_singlet_short_helices(&mut ss_flags);
        assert_eq!(ss_flags[0], 'g');
        assert_eq!(ss_flags[1], 'g');
    }

    #[test]
    fn strand_pass_upgrades_bridged_run_from_space_to_e() {
        let res_pointers: Vec<usize> = (0..4).collect();
        let beta1 = vec![Some(10), Some(10), None, None];
        let mut ss_flags = vec![' '; 4];
        strand_pass(4, &res_pointers, &beta1, &mut ss_flags);
        assert_eq!(ss_flags[0], 'e');
        assert_eq!(ss_flags[1], 'e');
    }
}
