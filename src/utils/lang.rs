// src/utils/lang.rs

//! Script detection for the language-mismatch rule.
//!
//! Counting Latin versus Cyrillic letters is enough to tell an English
//! description from a Russian one; everything else (digits, punctuation,
//! shared symbols) is ignored.

use crate::models::Locale;

/// Dominant alphabet of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Latin,
    Cyrillic,
    /// No Latin or Cyrillic letters at all
    Unknown,
}

impl Script {
    /// The script a locale's pages are expected to be written in.
    pub fn expected_for(locale: Locale) -> Script {
        match locale {
            Locale::En => Script::Latin,
            Locale::Ru => Script::Cyrillic,
        }
    }
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, '\u{0400}'..='\u{04FF}' | '\u{0500}'..='\u{052F}')
}

fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '\u{00C0}'..='\u{024F}')
}

/// Detect the dominant script of a text by letter count. Ties go to Latin,
/// which matches how mixed product names ("Word Counter — счётчик слов")
/// read on the English side.
pub fn dominant_script(text: &str) -> Script {
    let mut latin = 0usize;
    let mut cyrillic = 0usize;
    for c in text.chars() {
        if is_cyrillic(c) {
            cyrillic += 1;
        } else if is_latin(c) {
            latin += 1;
        }
    }

    if latin == 0 && cyrillic == 0 {
        Script::Unknown
    } else if cyrillic > latin {
        Script::Cyrillic
    } else {
        Script::Latin
    }
}
