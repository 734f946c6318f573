//! An implementation of the Grapheme Cluster portion of
//! [UAX #29: Unicode Text Segmentation](https://www.unicode.org/reports/tr29/)
//! for UTF-8 byte strings, paired with a monospaced display width estimate
//! based on [UAX #11: East Asian Width](https://www.unicode.org/reports/tr11/).
//!
//! This library implements the segmentation algorithm as of Unicode 15.1.0
//! (revision 43 of the annex, ruleset UAX29-C1-1, the extended non-legacy
//! rules), using the character database tables from that release.
//!
//! Feed [`decode_grapheme_clusters`] a byte string and it returns one record
//! per grapheme cluster (the byte offset where the cluster begins, the
//! ordinal of its first rune, and its estimated cell width) plus the totals
//! over the whole input. [`grapheme_count`] computes just the totals
//! without allocating. That's all there is to it!
//!
//! ```
//! let seg = grapheme_tally::decode_grapheme_clusters("e\u{0301}🇺🇸".as_bytes()).unwrap();
//!
//! // "é" plus one flag: four runes, but only two user-perceived characters.
//! assert_eq!(seg.totals.runes, 4);
//! assert_eq!(seg.totals.graphemes, 2);
//! assert_eq!(seg.totals.width, 3);
//!
//! let flag = seg.clusters[1];
//! assert_eq!((flag.byte_index, flag.rune_index, flag.width), (3, 2, 2));
//! ```
//!
//! Input is taken as raw bytes rather than `&str` because the library does
//! its own strict UTF-8 validation: segmentation halts at the first
//! ill-formed sequence and reports it as a [`SegmentError`] carrying the
//! partial results, instead of substituting U+FFFD. Callers who want lossy
//! behavior must sanitize their input first. [`decode_rune`], the decoder
//! the segmenter is built on, and the per-property predicates in
//! [`properties`] are exposed for downstream use.
//!
//! The width estimate deserves a caveat: how wide a cluster renders is
//! ultimately an implementation detail of the display (which fonts are in
//! use, whether codepoint sequences are interpreted correctly, and so on).
//! The value reported here is the conventional terminal-cell estimate
//! (0 for controls and invisible joiners, 2 for East Asian Wide and
//! Fullwidth characters and for emoji presentation, 1 otherwise), with a
//! cluster taking the width of the rune that opened it.
//!
//! Everything in this crate is a pure, synchronous computation over
//! read-only tables: no I/O, no global state, and safe to call from any
//! number of threads at once. The crate is `no_std` (with `alloc` for the
//! cluster records).

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod decode;
pub mod properties;
mod segment;

pub use decode::{DecodeError, decode_rune};
pub use segment::{
    GraphemeCluster, SegmentError, SegmentTotals, Segmentation, decode_grapheme_clusters,
    grapheme_count,
};
