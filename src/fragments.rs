//! Reinterprets the extended 8-symbol alphabet into the coarse set §4.7 extracts fragments from,
//! then walks it into disjoint, chain-bounded, gap-free [`Fragment`]s.

use crate::constants::{GAP_SPLIT_THRESHOLD, MIN_SS_FRAGMENT_LENGTH};
use crate::structure::Structure;
use crate::vec3::Vec3;

/// The coarse secondary-structure classification published for a fragment. Non-amino-acid
/// residues (`'-'`, and this crate's own `'?'` for unresolved backbone geometry) are never
/// published as a fragment at all — see [`classify_symbol`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentType {
    Coil,
    Turn,
    Helix,
    Strand,
    /// A degenerate residue left over from [`split_at_gaps`]: too short to stand on its own and
    /// with no gap-free neighbor to absorb it into. Marks an unusable stretch, not a real
    /// conformation.
    None,
    /// Sentinel value for a freshly constructed [`Fragment`] that has not yet been classified.
    /// Never produced by [`extract_fragments`] itself.
    UndefinedConformation,
}

impl Default for ComponentType {
    fn default() -> ComponentType {
        ComponentType::UndefinedConformation
    }
}

/// One contiguous run of a single [`ComponentType`] within one chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub component: ComponentType,
    pub chain_id: String,
    /// Inclusive global residue index of the first residue in the fragment.
    pub start_global: usize,
    /// Inclusive global residue index of the last residue in the fragment.
    pub end_global: usize,
}

impl Fragment {
    pub fn len(&self) -> usize {
        self.end_global - self.start_global + 1
    }
}

fn simplify_alphabet(c: char) -> char {
    match c {
        'i' | 'I' | 'b' | 'B' => ' ',
        'g' => 'h',
        'G' => 'H',
        other => other,
    }
}

fn is_turn_symbol(c: char) -> bool {
    c == 'T' || c == 't'
}

fn is_gap_symbol(c: char) -> bool {
    c == '-'
}

/// A space flanked by turns becomes a turn itself; at the first or last position, "flanked" is
/// judged against the single neighbor that exists.
fn mark_space_between_turns(out: &mut [char]) {
    let snapshot = out.to_vec();
    let n = snapshot.len();
    for g in 0..n {
        if snapshot[g] != ' ' {
            continue;
        }
        let left_is_turn = g > 0 && is_turn_symbol(snapshot[g - 1]);
        let right_is_turn = g + 1 < n && is_turn_symbol(snapshot[g + 1]);
        let qualifies = if g == 0 {
            right_is_turn
        } else if g + 1 == n {
            left_is_turn
        } else {
            left_is_turn && right_is_turn
        };
        if qualifies {
            out[g] = 'T';
        }
    }
}

fn mark_turn_after_turn(out: &mut [char]) {
    for g in 1..out.len() {
        if out[g] == 't' && out[g - 1] == 'T' {
            out[g] = 'T';
        }
    }
}

fn demote_short_helix_or_strand_runs(out: &mut [char]) {
    demote_runs_matching(out, |c| c == 'h' || c == 'H');
    demote_runs_matching(out, |c| c == 'e' || c == 'E');
}

fn demote_runs_matching(out: &mut [char], matches_class: impl Fn(char) -> bool) {
    let n = out.len();
    let mut i = 0;
    while i < n {
        if !matches_class(out[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < n && matches_class(out[i]) {
            i += 1;
        }
        if i - start < MIN_SS_FRAGMENT_LENGTH {
            for slot in out.iter_mut().take(i).skip(start) {
                *slot = ' ';
            }
        }
    }
}

fn absorb_isolated_aa_into_gap(out: &mut [char]) {
    let snapshot = out.to_vec();
    let n = snapshot.len();
    for g in 0..n {
        if is_gap_symbol(snapshot[g]) {
            continue;
        }
        let left_gap = g > 0 && is_gap_symbol(snapshot[g - 1]);
        let right_gap = g + 1 < n && is_gap_symbol(snapshot[g + 1]);
        if left_gap && right_gap {
            out[g] = '-';
        }
    }
}

/// Applies every rewrite rule of §4.7's "Reinterpretation" step, in order, to a raw extended-
/// alphabet trace (as produced by [`crate::symbols::assign_symbols`]).
pub fn reinterpret(ss_flags: &[char]) -> Vec<char> {
    let mut out: Vec<char> = ss_flags.iter().copied().map(simplify_alphabet).collect();
    mark_space_between_turns(&mut out);
    mark_turn_after_turn(&mut out);
    demote_short_helix_or_strand_runs(&mut out);
    absorb_isolated_aa_into_gap(&mut out);
    out
}

/// `None` means "not published as a fragment" — non-AA residues (`'-'`) and amino acids whose
/// backbone geometry never resolved (this crate's own `'?'` sentinel) fall here.
fn classify_symbol(c: char) -> Option<ComponentType> {
    match c {
        ' ' => Some(ComponentType::Coil),
        'T' | 't' => Some(ComponentType::Turn),
        'H' | 'h' => Some(ComponentType::Helix),
        'E' | 'e' => Some(ComponentType::Strand),
        _ => None,
    }
}

/// Walks `ss_flags` (one entry per global residue, in [`Structure`] order, in the raw extended
/// alphabet) into disjoint [`Fragment`]s.
///
/// A run closes — and, if one was open, is emitted — whenever the reinterpreted class changes,
/// the chain changes, or an unpublishable residue (`'-'`/`'?'`) is reached; a chain change forces
/// a close even if the class on both sides happens to match. Each closed fragment is then split
/// at any internal Cα-Cα gap wider than [`GAP_SPLIT_THRESHOLD`], and finally any Helix or Strand
/// fragment shorter than [`MIN_SS_FRAGMENT_LENGTH`] is demoted to Coil.
pub fn extract_fragments(structure: &Structure, ss_flags: &[char]) -> Vec<Fragment> {
    let residues = structure.residues();
    let reinterpreted = reinterpret(ss_flags);
    let mut fragments = Vec::new();
    let mut current: Option<(ComponentType, usize)> = None;

    for g in 0..residues.len() {
        let chain_changed = g > 0 && residues[g].chain_id != residues[g - 1].chain_id;
        if chain_changed {
            if let Some((cls, start)) = current.take() {
                fragments.push(raw_fragment(residues, cls, start, g - 1));
            }
        }

        match classify_symbol(reinterpreted[g]) {
            None => {
                if let Some((cls, start)) = current.take() {
                    fragments.push(raw_fragment(residues, cls, start, g - 1));
                }
            }
            Some(cls) => match current {
                Some((cur_cls, _)) if cur_cls == cls => {}
                Some((cur_cls, start)) => {
                    fragments.push(raw_fragment(residues, cur_cls, start, g - 1));
                    current = Some((cls, g));
                }
                None => current = Some((cls, g)),
            },
        }
    }
    if let Some((cls, start)) = current {
        fragments.push(raw_fragment(residues, cls, start, residues.len() - 1));
    }

    split_at_gaps(fragments, residues).into_iter().map(demote_if_too_short).collect()
}

fn raw_fragment(residues: &[crate::structure::Residue], component: ComponentType, start: usize, end: usize) -> Fragment {
    Fragment { component, chain_id: residues[start].chain_id.clone(), start_global: start, end_global: end }
}

/// One gap-split piece before the absorption/`NONE` decision below is made: a contiguous slice
/// of a single raw fragment, tagged with whether its start boundary was opened by an internal
/// Cα-Cα gap (as opposed to being the first piece of its raw fragment).
struct GapPiece {
    component: ComponentType,
    chain_id: String,
    start: usize,
    end: usize,
    opened_by_gap: bool,
}

impl GapPiece {
    fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Splits every raw (class-bounded) fragment at its internal Cα-Cα distances exceeding
/// [`GAP_SPLIT_THRESHOLD`], then resolves each one-residue gap remnant per §4.7: absorbed into
/// the immediately following fragment when that boundary is itself gap-free, else published as
/// its own degenerate [`ComponentType::None`] fragment. A gap stretch is never emitted as a
/// fragment; it becomes an implicit break between pieces.
fn split_at_gaps(raw_fragments: Vec<Fragment>, residues: &[crate::structure::Residue]) -> Vec<Fragment> {
    let mut pieces: Vec<GapPiece> = Vec::new();
    for fragment in &raw_fragments {
        let mut piece_start = fragment.start_global;
        let mut opened_by_gap = false;
        for g in fragment.start_global..fragment.end_global {
            if gap_between(residues[g].alpha_coordinate(), residues[g + 1].alpha_coordinate()) {
                pieces.push(GapPiece { component: fragment.component, chain_id: fragment.chain_id.clone(), start: piece_start, end: g, opened_by_gap });
                piece_start = g + 1;
                opened_by_gap = true;
            }
        }
        pieces.push(GapPiece { component: fragment.component, chain_id: fragment.chain_id.clone(), start: piece_start, end: fragment.end_global, opened_by_gap });
    }

    let mut out = Vec::new();
    let mut i = 0;
    while i < pieces.len() {
        let needs_resolution = pieces[i].opened_by_gap && pieces[i].len() == 1;
        if !needs_resolution {
            let p = &pieces[i];
            out.push(Fragment { component: p.component, chain_id: p.chain_id.clone(), start_global: p.start, end_global: p.end });
            i += 1;
            continue;
        }

        let (chain_id, start, end) = (pieces[i].chain_id.clone(), pieces[i].start, pieces[i].end);
        let absorbs_into_next = match pieces.get(i + 1) {
            Some(next) => {
                next.chain_id == chain_id
                    && next.start == end + 1
                    && !gap_between(residues[end].alpha_coordinate(), residues[next.start].alpha_coordinate())
            }
            None => false,
        };

        if absorbs_into_next {
            // The residue has no viable fragment of its own (the gap that isolated it leaves it
            // too short), but the next fragment starts right where it ends with no gap between
            // them, so it is absorbed into that fragment rather than marked degenerate.
            pieces[i + 1].start = start;
        } else {
            // Flanked by a gap on one side and either the end of the chain or another gap on
            // the other: truly degenerate, nothing to absorb it into.
            out.push(Fragment { component: ComponentType::None, chain_id, start_global: start, end_global: end });
        }
        i += 1;
    }
    out
}

fn gap_between(a: Option<Vec3>, b: Option<Vec3>) -> bool {
    match (a, b) {
        (Some(pa), Some(pb)) => pa.dist(&pb) > GAP_SPLIT_THRESHOLD,
        _ => false,
    }
}

fn demote_if_too_short(fragment: Fragment) -> Fragment {
    if matches!(fragment.component, ComponentType::Helix | ComponentType::Strand) && fragment.len() < MIN_SS_FRAGMENT_LENGTH {
        Fragment { component: ComponentType::Coil, ..fragment }
    } else {
        fragment
    }
}
