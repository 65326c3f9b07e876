/// Decides whether a content block is metadata noise (running headers,
/// page numbers, stamps) that must not be scanned for speaker patterns.
pub trait NoiseClassifier {
    fn is_noise(&self, text: &str) -> bool;
}

/// Thresholds for the character-ratio classifier
#[derive(Debug, Clone)]
pub struct NoiseConfig {
    /// Blocks whose letter/space ratio is below this may be noise
    pub min_ratio: f64,
    /// Only blocks shorter than this many characters may be noise
    pub max_len: usize,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            min_ratio: 0.85,
            max_len: 150,
        }
    }
}

/// Crude heuristic: a block is noise when it is short and mostly made of
/// non-alphabetic characters.
#[derive(Debug, Clone, Default)]
pub struct RatioClassifier {
    pub config: NoiseConfig,
}

impl RatioClassifier {
    pub fn new(config: NoiseConfig) -> Self {
        Self { config }
    }
}

impl NoiseClassifier for RatioClassifier {
    fn is_noise(&self, text: &str) -> bool {
        let total = text.chars().count();
        if total == 0 || text.trim().is_empty() {
            return false;
        }

        let alphabetic = text.chars().filter(|&c| is_letter_or_space(c)).count();
        let ratio = alphabetic as f64 / total as f64;

        ratio < self.config.min_ratio && total < self.config.max_len
    }
}

/// ASCII letters, the Swedish å/ä/ö in both cases, and the plain space
fn is_letter_or_space(c: char) -> bool {
    c.is_ascii_alphabetic() || c == ' ' || matches!(c, 'å' | 'ä' | 'ö' | 'Å' | 'Ä' | 'Ö')
}

/// Classify with the default thresholds
pub fn is_metadata_block(text: &str) -> bool {
    RatioClassifier::default().is_noise(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `letters` letters followed by digits up to `total` characters
    fn block(letters: usize, total: usize) -> String {
        let mut s = "a".repeat(letters);
        s.push_str(&"1".repeat(total - letters));
        s
    }

    #[test]
    fn test_length_boundary() {
        // ratio 0.8 in both cases
        let short = block(119, 149);
        assert!(119.0 / 149.0 < 0.85);
        assert!(is_metadata_block(&short));

        let long = block(120, 150);
        assert!(!is_metadata_block(&long));
    }

    #[test]
    fn test_digits_only_is_noise() {
        assert!(is_metadata_block("1234567890"));
        assert!(is_metadata_block("— 12 —"));
    }

    #[test]
    fn test_prose_is_not_noise() {
        assert!(!is_metadata_block("Herr talman Jag yrkar bifall till utskottets förslag"));
    }

    #[test]
    fn test_swedish_letters_count_as_letters() {
        assert!(!is_metadata_block("Åsa Öberg är här"));
    }

    #[test]
    fn test_empty_and_blank_are_not_noise() {
        assert!(!is_metadata_block(""));
        assert!(!is_metadata_block(" \n\t "));
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier = RatioClassifier::new(NoiseConfig {
            min_ratio: 0.5,
            max_len: 1000,
        });
        assert!(!classifier.is_noise("abc12"));
        assert!(classifier.is_noise("ab123"));
    }
}
