//! Text segmentation by breaking on grapheme cluster boundaries, using the
//! property values and rules from [UAX #29: Unicode Text Segmentation],
//! Unicode 15.1.0, revision 43. The implementation is conformant to
//! UAX29-C1-1, the extended (non-legacy) ruleset.
//!
//! Alongside the cluster boundaries, the segmenter accumulates an estimate
//! of how visually wide the string will appear on a monospaced display,
//! based on [UAX #11: East Asian Width]. That estimate can only ever be a
//! rough guess: a terminal may not interpret an emoji modifier sequence,
//! for example, and print the component glyphs instead of one whole glyph.
//!
//! [UAX #29: Unicode Text Segmentation]: https://www.unicode.org/reports/tr29/
//! [UAX #11: East Asian Width]: https://www.unicode.org/reports/tr11/

use alloc::vec::Vec;

use thiserror::Error;

use crate::decode::{DecodeError, decode_rune};
use crate::properties;

/// One grapheme cluster of a segmented string, as produced by
/// [`decode_grapheme_clusters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphemeCluster {
    /// Offset in bytes from the start of the input at which the cluster
    /// begins. Always the start of a valid UTF-8 sequence.
    pub byte_index: usize,
    /// Zero-based ordinal of the cluster's first rune.
    pub rune_index: usize,
    /// Estimated monospaced display width of the cluster, in cells
    /// (0, 1, or 2).
    pub width: usize,
}

/// The running totals reported by [`grapheme_count`] and
/// [`decode_grapheme_clusters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentTotals {
    /// Number of scalar values successfully decoded.
    pub runes: usize,
    /// Number of grapheme clusters begun.
    pub graphemes: usize,
    /// Estimated monospaced display width of the whole input, in cells.
    pub width: usize,
}

/// A fully segmented string: per-cluster records in source order plus the
/// totals over the whole input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segmentation {
    /// One record per grapheme cluster, in reading order. Record `k`
    /// describes the `k`-th cluster of the input.
    pub clusters: Vec<GraphemeCluster>,
    /// The totals over the whole input. Always equal to what
    /// [`grapheme_count`] reports for the same bytes.
    pub totals: SegmentTotals,
}

/// Malformed UTF-8 encountered mid-segmentation.
///
/// Segmentation halts at the first ill-formed sequence; nothing is replaced
/// with U+FFFD and nothing past the failure is examined. The error carries
/// everything accumulated up to (but not including) the failing sequence,
/// so a caller that wants partial results still gets them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error} at byte offset {byte_index}")]
pub struct SegmentError {
    /// What was wrong with the input.
    #[source]
    pub error: DecodeError,
    /// Byte offset at which the rejected sequence starts.
    pub byte_index: usize,
    /// Totals accumulated through the previous successful rune.
    pub totals: SegmentTotals,
    /// Cluster records produced so far. Empty when the error comes from
    /// [`grapheme_count`], which does not record clusters.
    pub clusters: Vec<GraphemeCluster>,
}

/// The cross-rune context required by the stateful rules: GB9c carries an
/// Indic conjunct across its linkers, GB11 carries an emoji across ZWJ,
/// and GB12/GB13 count regional indicator pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sequence {
    None,
    Indic,
    Emoji,
    Regional,
}

/// Transient segmentation state, created on entry and discarded on return.
///
/// The rule block ([`ClusterState::apply_rules`]) decides only whether the
/// incoming rune opens a new cluster; every other piece of bookkeeping is
/// deferred to [`ClusterState::finalize`], which runs once per rune on
/// every rule path.
#[derive(Debug)]
struct ClusterState {
    rune_count: usize,
    grapheme_count: usize,
    width: usize,

    /// The previously decoded scalar value; NUL before any. NUL satisfies
    /// none of the predicates the rules consult for the previous rune, so
    /// the start-of-text case needs no special handling here.
    last_rune: char,
    /// The previous rune was a control and forces a break after itself.
    last_rune_breaks_forward: bool,

    /// Totals as of the previous rune, used to detect that a new cluster
    /// just began.
    last_width: usize,
    last_grapheme_count: usize,

    /// The current rune follows a control or Prepend rune; skip most rule
    /// evaluation for it.
    bypass_next_rune: bool,

    /// Consecutive regional indicators since the sequence began; its
    /// parity decides GB12/GB13.
    regional_indicator_counter: usize,

    current_sequence: Sequence,
    /// Set by a rule that consumed this rune as part of the ongoing
    /// sequence; cleared again before the next rune is examined.
    continue_sequence: bool,
}

impl ClusterState {
    fn new() -> Self {
        ClusterState {
            rune_count: 0,
            grapheme_count: 0,
            width: 0,
            last_rune: '\0',
            last_rune_breaks_forward: false,
            last_width: 0,
            last_grapheme_count: 0,
            bypass_next_rune: false,
            regional_indicator_counter: 0,
            current_sequence: Sequence::None,
            continue_sequence: false,
        }
    }

    fn totals(&self) -> SegmentTotals {
        SegmentTotals {
            runes: self.rune_count,
            graphemes: self.grapheme_count,
            width: self.width,
        }
    }

    /// The boundary rules, first match wins. Increments `grapheme_count`
    /// exactly when `this` starts a new cluster.
    fn apply_rules(&mut self, this: char) {
        use crate::properties::*;

        // "Do not break between a CR and LF. Otherwise, break before and
        //  after controls."
        //
        // GB3:                 CR   ×   LF
        // GB4: (Control | CR | LF)  ÷
        // GB5:                      ÷  (Control | CR | LF)
        if this == '\n' && self.last_rune == '\r' {
            self.last_rune_breaks_forward = false;
            self.bypass_next_rune = false;
            return;
        }

        if is_control(this) {
            self.grapheme_count += 1;
            self.last_rune_breaks_forward = true;
            self.bypass_next_rune = true;
            return;
        }

        // (This check is for rules that work forwards instead of
        // backwards: GB4's break-after is discharged here, on the rune
        // following the control, and GB9b's no-break-after swallows the
        // rune following the Prepend.)
        if self.bypass_next_rune {
            if self.last_rune_breaks_forward {
                self.grapheme_count += 1;
                self.last_rune_breaks_forward = false;
            }
            self.bypass_next_rune = false;
            return;
        }

        // (Optimization 1: prevent low runes from proceeding further.
        // U+00A9 and U+00AE are in the Extended_Pictographic ranges,
        // which GB11 checks later.)
        if this != '\u{A9}' && this != '\u{AE}' && this <= '\u{2FF}' {
            self.grapheme_count += 1;
            return;
        }

        // (Optimization 2: check that the rune is in the Hangul space
        // before getting specific.)
        if ('\u{1100}'..='\u{D7FB}').contains(&this) {
            // "Do not break Hangul syllable sequences."
            //
            // GB6:        L   ×  (L | V | LV | LVT)
            // GB7:  (LV | V)  ×  (V | T)
            // GB8: (LVT | T)  ×   T
            if is_hangul_syllable_leading(this)
                || is_hangul_syllable_lv(this)
                || is_hangul_syllable_lvt(this)
            {
                if !is_hangul_syllable_leading(self.last_rune) {
                    self.grapheme_count += 1;
                }
                return;
            }

            if is_hangul_syllable_vowel(this) {
                if !(is_hangul_syllable_leading(self.last_rune)
                    || is_hangul_syllable_vowel(self.last_rune)
                    || is_hangul_syllable_lv(self.last_rune))
                {
                    self.grapheme_count += 1;
                }
                return;
            }

            if is_hangul_syllable_trailing(this) {
                if !(is_hangul_syllable_trailing(self.last_rune)
                    || is_hangul_syllable_lvt(self.last_rune)
                    || is_hangul_syllable_lv(self.last_rune)
                    || is_hangul_syllable_vowel(self.last_rune))
                {
                    self.grapheme_count += 1;
                }
                return;
            }
        }

        // "Do not break before extending characters or ZWJ."
        //
        // GB9:  ×  (Extend | ZWJ)
        if this == ZERO_WIDTH_JOINER {
            self.continue_sequence = true;
            return;
        }

        if is_extend_class(this) {
            // (Support for GB9c: an extending rune keeps an Indic
            // conjunct alive only along a valid linker chain.)
            if self.current_sequence == Sequence::Indic {
                if is_indic_conjunct_break_extend(this)
                    && (is_indic_conjunct_break_linker(self.last_rune)
                        || is_indic_conjunct_break_consonant(self.last_rune))
                {
                    self.continue_sequence = true;
                    return;
                }

                if is_indic_conjunct_break_linker(this)
                    && (is_indic_conjunct_break_linker(self.last_rune)
                        || is_indic_conjunct_break_extend(self.last_rune)
                        || is_indic_conjunct_break_consonant(self.last_rune))
                {
                    self.continue_sequence = true;
                    return;
                }

                return;
            }

            // (Support for GB11: Extend* between the pictograph and the
            // ZWJ keeps the emoji sequence alive.)
            if self.current_sequence == Sequence::Emoji
                && (is_extend_class(self.last_rune)
                    || is_extended_pictographic(self.last_rune))
            {
                self.continue_sequence = true;
            }

            return;
        }

        // "Do not break before SpacingMarks, or after Prepend characters."
        //
        // GB9a:          ×  SpacingMark
        // GB9b: Prepend  ×
        if is_spacing_mark(this) {
            return;
        }

        if is_prepend_class(this) {
            self.grapheme_count += 1;
            self.bypass_next_rune = true;
            return;
        }

        // "Do not break within certain combinations with
        //  Indic_Conjunct_Break (InCB)=Linker."
        //
        // GB9c: \p{InCB=Consonant} [\p{InCB=Extend} \p{InCB=Linker}]*
        //       \p{InCB=Linker} [\p{InCB=Extend} \p{InCB=Linker}]*
        //       ×  \p{InCB=Consonant}
        if is_indic_conjunct_break_consonant(this) {
            if self.current_sequence == Sequence::Indic {
                if self.last_rune == ZERO_WIDTH_JOINER
                    || is_indic_conjunct_break_linker(self.last_rune)
                {
                    self.continue_sequence = true;
                } else {
                    // A consonant that does not chain starts a new
                    // cluster; the Indic context stays in place.
                    self.grapheme_count += 1;
                }
            } else {
                self.grapheme_count += 1;
                self.current_sequence = Sequence::Indic;
                self.continue_sequence = true;
            }
            return;
        }

        if is_indic_conjunct_break_extend(this) {
            if self.current_sequence == Sequence::Indic {
                if is_indic_conjunct_break_consonant(self.last_rune)
                    || is_indic_conjunct_break_linker(self.last_rune)
                {
                    self.continue_sequence = true;
                } else {
                    self.grapheme_count += 1;
                }
            }
            return;
        }

        if is_indic_conjunct_break_linker(this) {
            if self.current_sequence == Sequence::Indic {
                if is_indic_conjunct_break_extend(self.last_rune)
                    || is_indic_conjunct_break_linker(self.last_rune)
                {
                    self.continue_sequence = true;
                } else {
                    self.grapheme_count += 1;
                }
            }
            return;
        }

        //
        // (Curiously, there is no GB10.)
        //

        // "Do not break within emoji modifier sequences or emoji zwj
        //  sequences."
        //
        // GB11: \p{Extended_Pictographic} Extend* ZWJ  ×  \p{Extended_Pictographic}
        if is_extended_pictographic(this) {
            if self.current_sequence != Sequence::Emoji || self.last_rune != ZERO_WIDTH_JOINER {
                self.grapheme_count += 1;
            }
            self.current_sequence = Sequence::Emoji;
            self.continue_sequence = true;
            return;
        }

        // "Do not break within emoji flag sequences. That is, do not break
        //  between regional indicator (RI) symbols if there is an odd
        //  number of RI characters before the break point."
        //
        // GB12:   sot (RI RI)* RI  ×  RI
        // GB13: [^RI] (RI RI)* RI  ×  RI
        if is_regional_indicator(this) {
            if self.regional_indicator_counter % 2 == 0 {
                self.grapheme_count += 1;
            }
            self.current_sequence = Sequence::Regional;
            self.continue_sequence = true;
            self.regional_indicator_counter += 1;
            return;
        }

        // "Otherwise, break everywhere."
        //
        // GB999: Any ÷ Any
        self.grapheme_count += 1;
    }

    /// Deferred bookkeeping, common to every rule path.
    fn finalize(
        &mut self,
        records: Option<&mut Vec<GraphemeCluster>>,
        byte_index: usize,
        this: char,
    ) {
        // "Break at the start and end of text, unless the text is empty."
        //
        // GB1: sot  ÷  Any
        // GB2: Any  ÷  eot
        if self.rune_count == 0 && self.grapheme_count == 0 {
            self.grapheme_count += 1;
        }

        if self.grapheme_count > self.last_grapheme_count {
            self.width += properties::normalized_east_asian_width(this);

            if let Some(records) = records {
                records.push(GraphemeCluster {
                    byte_index,
                    rune_index: self.rune_count,
                    width: self.width - self.last_width,
                });
            }

            self.last_grapheme_count = self.grapheme_count;
            self.last_width = self.width;
        }

        self.last_rune = this;
        self.rune_count += 1;

        if !self.continue_sequence {
            self.current_sequence = Sequence::None;
            self.regional_indicator_counter = 0;
        }
        self.continue_sequence = false;
    }
}

fn run(
    bytes: &[u8],
    mut records: Option<&mut Vec<GraphemeCluster>>,
) -> Result<SegmentTotals, SegmentError> {
    let mut state = ClusterState::new();
    let mut cursor = 0;

    while cursor < bytes.len() {
        let byte_index = cursor;
        let this = match decode_rune(bytes, &mut cursor) {
            Ok(rune) => rune,
            Err(error) => {
                return Err(SegmentError {
                    error,
                    byte_index,
                    totals: state.totals(),
                    clusters: Vec::new(),
                });
            }
        };

        state.apply_rules(this);
        state.finalize(records.as_deref_mut(), byte_index, this);
    }

    Ok(state.totals())
}

/// Counts the runes, grapheme clusters, and estimated display width of a
/// UTF-8 byte string without allocating.
///
/// Equivalent to [`decode_grapheme_clusters`] with the per-cluster records
/// discarded; the totals are identical.
pub fn grapheme_count(bytes: &[u8]) -> Result<SegmentTotals, SegmentError> {
    run(bytes, None)
}

/// Segments a UTF-8 byte string into extended grapheme clusters, producing
/// one [`GraphemeCluster`] record per cluster in reading order along with
/// the totals.
///
/// On malformed input the returned [`SegmentError`] carries the records
/// and totals accumulated through the previous successful rune.
pub fn decode_grapheme_clusters(bytes: &[u8]) -> Result<Segmentation, SegmentError> {
    let mut clusters = Vec::new();
    match run(bytes, Some(&mut clusters)) {
        Ok(totals) => Ok(Segmentation { clusters, totals }),
        Err(mut error) => {
            error.clusters = clusters;
            Err(error)
        }
    }
}
