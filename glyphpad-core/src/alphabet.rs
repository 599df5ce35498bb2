//! The fixed reference alphabet of recognizable glyphs.
//!
//! Display data only: server responses are never validated against it.

use serde::Serialize;

/// One recognizable glyph: its symbol and lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlyphEntry {
    /// The glyph itself.
    pub symbol: char,
    /// Lowercase name, as the classifier reports labels.
    pub name: &'static str,
}

impl GlyphEntry {
    /// The name with its first letter capitalized, for display.
    #[must_use]
    pub fn display_name(&self) -> String {
        capitalize(self.name)
    }
}

/// The 24 letters of the Greek alphabet, in order.
pub const ALPHABET: [GlyphEntry; 24] = [
    GlyphEntry { symbol: 'α', name: "alpha" },
    GlyphEntry { symbol: 'β', name: "beta" },
    GlyphEntry { symbol: 'γ', name: "gamma" },
    GlyphEntry { symbol: 'δ', name: "delta" },
    GlyphEntry { symbol: 'ε', name: "epsilon" },
    GlyphEntry { symbol: 'ζ', name: "zeta" },
    GlyphEntry { symbol: 'η', name: "eta" },
    GlyphEntry { symbol: 'θ', name: "theta" },
    GlyphEntry { symbol: 'ι', name: "iota" },
    GlyphEntry { symbol: 'κ', name: "kappa" },
    GlyphEntry { symbol: 'λ', name: "lambda" },
    GlyphEntry { symbol: 'μ', name: "mu" },
    GlyphEntry { symbol: 'ν', name: "nu" },
    GlyphEntry { symbol: 'ξ', name: "xi" },
    GlyphEntry { symbol: 'ο', name: "omicron" },
    GlyphEntry { symbol: 'π', name: "pi" },
    GlyphEntry { symbol: 'ρ', name: "rho" },
    GlyphEntry { symbol: 'σ', name: "sigma" },
    GlyphEntry { symbol: 'τ', name: "tau" },
    GlyphEntry { symbol: 'υ', name: "upsilon" },
    GlyphEntry { symbol: 'φ', name: "phi" },
    GlyphEntry { symbol: 'χ', name: "chi" },
    GlyphEntry { symbol: 'ψ', name: "psi" },
    GlyphEntry { symbol: 'ω', name: "omega" },
];

/// Look up an alphabet entry by name, case-insensitively.
///
/// Returns `None` for labels outside the alphabet; callers fall back to
/// displaying the raw label.
#[must_use]
pub fn find(name: &str) -> Option<&'static GlyphEntry> {
    ALPHABET.iter().find(|e| e.name.eq_ignore_ascii_case(name))
}

/// Capitalize the first letter of a label, lowercasing the rest.
#[must_use]
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
