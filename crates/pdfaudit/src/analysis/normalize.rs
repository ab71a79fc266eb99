//! Canonical text form used for comparing the embedded text layer with OCR
//! output.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

use crate::config::NormalizationConfig;

/// Maps raw text to its comparison form.
///
/// Steps, in order: NFKC compatibility folding (ligatures such as `ﬁ`,
/// full-width digits, non-breaking spaces), lower-casing, removal of the
/// configured punctuation characters, then whitespace collapsing with
/// trimming, followed by canonical recomposition. Normalizing twice is the
/// same as normalizing once.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    punctuation: HashSet<char>,
}

impl TextNormalizer {
    pub fn new(config: &NormalizationConfig) -> Self {
        Self::with_punctuation(&config.punctuation)
    }

    pub fn with_punctuation(punctuation: &str) -> Self {
        Self {
            punctuation: punctuation.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        let folded: String = text.nfkc().collect::<String>().to_lowercase();

        let mut out = String::with_capacity(folded.len());
        let mut pending_space = false;

        for c in folded.chars() {
            if self.punctuation.contains(&c) || (c.is_control() && !c.is_whitespace()) {
                continue;
            }
            if c.is_whitespace() {
                pending_space = true;
                continue;
            }
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }

        // Dropping a character can leave a base letter next to a combining
        // mark it was separated from; recompose so a second pass is a no-op.
        out.nfc().collect()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(&NormalizationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        TextNormalizer::default().normalize(text)
    }

    #[test]
    fn test_collapses_whitespace_and_trims() {
        assert_eq!(normalize("  Hello \n\n  World\t "), "hello world");
        assert_eq!(normalize("line one\r\nline two"), "line one line two");
    }

    #[test]
    fn test_lowercases() {
        assert_eq!(normalize("INVOICE Total"), "invoice total");
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(normalize("Total: $500.00"), "total 50000");
        assert_eq!(normalize("Total: $5,000.00"), "total 500000");
        assert_eq!(normalize("\u{201C}quoted\u{201D} \u{2014} text"), "quoted text");
    }

    #[test]
    fn test_folds_ligatures_and_nbsp() {
        assert_eq!(normalize("\u{FB01}nal\u{00A0}report"), "final report");
        assert_eq!(normalize("\u{FF21}\u{FF22}\u{FF23} \u{FF11}\u{FF12}"), "abc 12");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
        assert_eq!(normalize("...!!!"), "");
    }

    #[test]
    fn test_layout_differences_do_not_matter() {
        let embedded = "Invoice No. 221\nTotal due: 500";
        let ocr = "Invoice  No 221 Total\n\ndue 500";
        assert_eq!(normalize(embedded), normalize(ocr));
    }

    #[test]
    fn test_custom_punctuation_set() {
        let normalizer = TextNormalizer::with_punctuation(":");
        assert_eq!(normalizer.normalize("Total: $5.00"), "total $5.00");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            "Hello, World!",
            "Total: $5,000.00",
            "\u{FB01}\u{FB02} ligatures",
            "\u{2126}hm \u{212B}ngstr\u{00F6}m",
            "\u{0130}stanbul \u{1E9E}tra\u{00DF}e",
            "\u{210C}ilbert \u{00BD} \u{2460}",
            "tab\tseparated\u{000B}vertical\u{000C}feed",
            "mixed\u{0000}control\u{0007}chars",
            "cafe.\u{0301} split accent",
            "日本語のテキスト　全角",
            "Ünïcödé çhàrâctérs",
        ];

        let normalizer = TextNormalizer::default();
        for sample in samples {
            let once = normalizer.normalize(sample);
            let twice = normalizer.normalize(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", sample);
        }
    }
}
