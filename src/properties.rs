//! Classification of scalar values against the Unicode 15.1.0 character
//! database.
//!
//! Each predicate corresponds to one Unicode property consulted by the
//! segmentation rules. Small fixed sets are tested directly; everything
//! else is a binary search over the sorted tables in [`table`]. The
//! predicates are public because they are useful on their own, independent
//! of segmentation.

mod table;

pub(crate) const ZERO_WIDTH_SPACE: char = '\u{200B}';
pub(crate) const ZERO_WIDTH_NON_JOINER: char = '\u{200C}';
pub(crate) const ZERO_WIDTH_JOINER: char = '\u{200D}';
pub(crate) const WORD_JOINER: char = '\u{2060}';
pub(crate) const ZERO_WIDTH_NO_BREAK_SPACE: char = '\u{FEFF}';

/// Binary search over a flat table of entries `stride` values wide, sorted
/// ascending on each entry's first value. Returns the offset of the entry
/// with the greatest first value not exceeding `value`, or `None` if every
/// entry starts above it. The caller is responsible for checking the
/// entry's upper bound.
fn table_search(value: u32, table: &[u32], stride: usize) -> Option<usize> {
    let mut n = table.len() / stride;
    let mut t = 0;
    while n > 1 {
        let m = n / 2;
        let p = t + m * stride;
        if value >= table[p] {
            t = p;
            n -= m;
        } else {
            n = m;
        }
    }
    (n != 0 && value >= table[t]).then_some(t)
}

/// Membership test against a table of `lo, hi` pairs.
fn in_ranges(c: char, table: &[u32]) -> bool {
    let value = c as u32;
    match table_search(value, table, 2) {
        Some(p) => value <= table[p + 1],
        None => false,
    }
}

/// Membership test against a table of single scalar values.
fn in_singletons(c: char, table: &[u32]) -> bool {
    let value = c as u32;
    matches!(table_search(value, table, 1), Some(p) if table[p] == value)
}

/// The control characters relevant to rules GB4 and GB5: C0 controls
/// (including CR and LF), DEL, and the C1 controls.
pub fn is_control(c: char) -> bool {
    c <= '\u{1F}' || ('\u{7F}'..='\u{9F}').contains(&c)
}

/// Emoji_Modifier (the skin tone modifiers).
pub fn is_emoji_modifier(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

/// Regional_Indicator.
pub fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

/// General_Category=Enclosing_Mark.
pub fn is_enclosing_mark(c: char) -> bool {
    matches!(c, '\u{0488}' | '\u{0489}' | '\u{1ABE}')
        || ('\u{20DD}'..='\u{20E0}').contains(&c)
        || ('\u{20E2}'..='\u{20E4}').contains(&c)
        || ('\u{A670}'..='\u{A672}').contains(&c)
}

/// Prepended_Concatenation_Mark.
pub fn is_prepended_concatenation_mark(c: char) -> bool {
    matches!(
        c,
        '\u{06DD}' | '\u{070F}' | '\u{08E2}' | '\u{110BD}' | '\u{110CD}'
    ) || ('\u{0600}'..='\u{0605}').contains(&c)
        || ('\u{0890}'..='\u{0891}').contains(&c)
}

/// General_Category=Spacing_Mark, filtered as in GraphemeBreakProperty.txt.
pub fn is_spacing_mark(c: char) -> bool {
    in_ranges(c, &table::SPACING_MARK_RANGES)
}

/// General_Category=Nonspacing_Mark.
pub fn is_nonspacing_mark(c: char) -> bool {
    in_ranges(c, &table::NONSPACING_MARK_RANGES)
}

/// Extended_Pictographic, from the emoji character tables.
pub fn is_extended_pictographic(c: char) -> bool {
    in_ranges(c, &table::EXTENDED_PICTOGRAPHIC_RANGES)
}

/// Grapheme_Extend.
pub fn is_grapheme_extend(c: char) -> bool {
    in_ranges(c, &table::GRAPHEME_EXTEND_RANGES)
}

/// Hangul_Syllable_Type=Leading_Jamo.
pub fn is_hangul_syllable_leading(c: char) -> bool {
    ('\u{1100}'..='\u{115F}').contains(&c) || ('\u{A960}'..='\u{A97C}').contains(&c)
}

/// Hangul_Syllable_Type=Vowel_Jamo.
pub fn is_hangul_syllable_vowel(c: char) -> bool {
    ('\u{1160}'..='\u{11A7}').contains(&c) || ('\u{D7B0}'..='\u{D7C6}').contains(&c)
}

/// Hangul_Syllable_Type=Trailing_Jamo.
pub fn is_hangul_syllable_trailing(c: char) -> bool {
    ('\u{11A8}'..='\u{11FF}').contains(&c) || ('\u{D7CB}'..='\u{D7FB}').contains(&c)
}

/// Hangul_Syllable_Type=LV_Syllable.
pub fn is_hangul_syllable_lv(c: char) -> bool {
    in_singletons(c, &table::HANGUL_SYLLABLE_LV_SINGLETONS)
}

/// Hangul_Syllable_Type=LVT_Syllable.
pub fn is_hangul_syllable_lvt(c: char) -> bool {
    in_ranges(c, &table::HANGUL_SYLLABLE_LVT_RANGES)
}

/// Indic_Syllabic_Category=Consonant_Preceding_Repha.
pub fn is_indic_consonant_preceding_repha(c: char) -> bool {
    matches!(c, '\u{0D4E}' | '\u{11941}' | '\u{11D46}' | '\u{11F02}')
}

/// Indic_Syllabic_Category=Consonant_Prefixed.
pub fn is_indic_consonant_prefixed(c: char) -> bool {
    matches!(c, '\u{1193F}' | '\u{11A3A}')
        || ('\u{111C2}'..='\u{111C3}').contains(&c)
        || ('\u{11A84}'..='\u{11A89}').contains(&c)
}

/// Indic_Conjunct_Break=Linker (the viramas of the conjunct-forming
/// scripts).
pub fn is_indic_conjunct_break_linker(c: char) -> bool {
    matches!(
        c,
        '\u{094D}' | '\u{09CD}' | '\u{0ACD}' | '\u{0B4D}' | '\u{0C4D}' | '\u{0D4D}'
    )
}

/// Indic_Conjunct_Break=Consonant.
pub fn is_indic_conjunct_break_consonant(c: char) -> bool {
    in_ranges(c, &table::INDIC_CONJUNCT_BREAK_CONSONANT_RANGES)
}

/// Indic_Conjunct_Break=Extend.
pub fn is_indic_conjunct_break_extend(c: char) -> bool {
    in_ranges(c, &table::INDIC_CONJUNCT_BREAK_EXTEND_RANGES)
}

/// The Prepend class of the grapheme cluster boundary rules:
///
/// ```text
/// Indic_Syllabic_Category = Consonant_Preceding_Repha, or
/// Indic_Syllabic_Category = Consonant_Prefixed, or
/// Prepended_Concatenation_Mark = Yes
/// ```
pub fn is_prepend_class(c: char) -> bool {
    is_indic_consonant_preceding_repha(c)
        || is_indic_consonant_prefixed(c)
        || is_prepended_concatenation_mark(c)
}

/// The Extend class of the grapheme cluster boundary rules:
///
/// ```text
/// Grapheme_Extend = Yes, or
/// Emoji_Modifier = Yes
/// ```
///
/// By definition this already covers General_Category=Nonspacing_Mark,
/// General_Category=Enclosing_Mark, U+200C ZERO WIDTH NON-JOINER, and the
/// few spacing marks needed for canonical equivalence.
pub fn is_extend_class(c: char) -> bool {
    is_grapheme_extend(c) || is_emoji_modifier(c)
}

/// Estimated monospaced display width of a scalar value, in cells:
///
/// - 2 if East_Asian_Width is Fullwidth or Wide,
/// - 0 if non-printable or zero-width,
/// - 1 in all other cases.
///
/// This can only ever be a rough guess; what a terminal actually draws
/// depends on its fonts and on how faithfully it interprets codepoint
/// sequences. A zero-width-space grapheme cluster legitimately reports a
/// width of zero.
pub fn normalized_east_asian_width(c: char) -> usize {
    if is_control(c) {
        return 0;
    }
    if c <= '\u{10FF}' {
        // Easy early out for low runes.
        return 1;
    }

    // A BOM in the middle of text is read as ZERO WIDTH NO-BREAK SPACE.
    if matches!(
        c,
        ZERO_WIDTH_SPACE
            | ZERO_WIDTH_NON_JOINER
            | ZERO_WIDTH_JOINER
            | WORD_JOINER
            | ZERO_WIDTH_NO_BREAK_SPACE
    ) {
        return 0;
    }

    let value = c as u32;
    let table = &table::EAST_ASIAN_WIDTH_RANGES;
    match table_search(value, table, 3) {
        Some(p) if value <= table[p + 1] => table[p + 2] as usize,
        _ => 1,
    }
}
