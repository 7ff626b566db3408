//! # Text Folding and Alias Tables
//!
//! Free-form labels coming from upstream producers ("Hébergé gratuitement",
//! "prime d'activité", "Conjointe") are matched against closed vocabularies
//! through one generic utility: normalize, look up in an alias table, then
//! fall back to ordered substring heuristics.
//!
//! Tables are pure data (`static` slices). Variants are stored already in
//! normalized form; each table's test module checks that invariant.

use unicode_normalization::UnicodeNormalization;

/// How a raw label is folded before lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folding {
    /// Lowercase, strip diacritics, collapse non-alphanumerics to a single
    /// space, trim. `"Prime d'Activité"` → `"prime d activite"`.
    Spaced,
    /// Same, but collapsing to `_`. `"Hébergé gratuitement"` →
    /// `"heberge_gratuitement"`.
    Underscored,
}

impl Folding {
    fn separator(self) -> char {
        match self {
            Self::Spaced => ' ',
            Self::Underscored => '_',
        }
    }
}

/// Remove combining marks after canonical decomposition (NFD).
pub fn strip_diacritics(s: &str) -> String {
    s.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// Fold a label according to `folding`.
pub fn fold(s: &str, folding: Folding) -> String {
    let sep = folding.separator();
    let lowered = s.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_sep = false;
    for c in strip_diacritics(&lowered).chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push(sep);
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    out
}

/// A substring heuristic: matches when the folded label contains every
/// fragment of `all_of` and, if non-empty, at least one of `any_of`.
#[derive(Debug, Clone, Copy)]
pub struct Heuristic {
    /// Fragments that must all be present.
    pub all_of: &'static [&'static str],
    /// Fragments of which at least one must be present (ignored when empty).
    pub any_of: &'static [&'static str],
    /// Canonical value produced on match.
    pub canonical: &'static str,
}

impl Heuristic {
    fn matches(&self, folded: &str) -> bool {
        self.all_of.iter().all(|f| folded.contains(f))
            && (self.any_of.is_empty() || self.any_of.iter().any(|f| folded.contains(f)))
    }
}

/// An alias table: canonical values with their accepted variants, plus
/// ordered heuristics consulted when no alias matches.
#[derive(Debug, Clone, Copy)]
pub struct AliasTable {
    /// Folding applied to the label before lookup.
    pub folding: Folding,
    /// `(canonical, variants)`, checked in order. A folded label equal to
    /// the canonical value itself also matches.
    pub entries: &'static [(&'static str, &'static [&'static str])],
    /// Fallback heuristics, checked in order.
    pub heuristics: &'static [Heuristic],
}

impl AliasTable {
    /// Resolve a raw label to its canonical value.
    pub fn resolve(&self, raw: &str) -> Option<&'static str> {
        let folded = fold(raw, self.folding);
        if folded.is_empty() {
            return None;
        }
        self.lookup_folded(&folded)
            .or_else(|| self.heuristic(&folded))
    }

    /// Exact alias lookup on an already-folded label.
    pub fn lookup_folded(&self, folded: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(canonical, variants)| *canonical == folded || variants.contains(&folded))
            .map(|(canonical, _)| *canonical)
    }

    fn heuristic(&self, folded: &str) -> Option<&'static str> {
        self.heuristics
            .iter()
            .find(|h| h.matches(folded))
            .map(|h| h.canonical)
    }

    /// Variants that are not already in folded form. Used by table tests.
    pub fn unfolded_variants(&self) -> Vec<&'static str> {
        self.entries
            .iter()
            .flat_map(|(_, variants)| variants.iter().copied())
            .filter(|v| fold(v, self.folding) != *v)
            .collect()
    }
}
