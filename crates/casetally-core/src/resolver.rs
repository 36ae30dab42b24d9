use once_cell::sync::Lazy;
use serde::Serialize;

use crate::normalize::{squash, transliterate};
use crate::regions::{BARE_ALIAS, CITY_LABEL, PROVINCE_LABEL, RegionSet};
use crate::similarity::similarity;

static DEFAULT_RESOLVER: Lazy<RegionResolver> =
    Lazy::new(|| RegionResolver::new(RegionSet::argentina().clone()));

/// Best canonical region for a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub region: String,
    /// Similarity in `[0, 1]`; exactly 1.0 for the Buenos Aires short-circuit.
    pub confidence: f64,
}

/// Maps free-text place names to the closest label of a [`RegionSet`].
///
/// Always returns a best-effort match, however weak. Callers that need a
/// quality gate compare [`Resolution::confidence`] against their own cutoff.
#[derive(Debug, Clone)]
pub struct RegionResolver {
    regions: RegionSet,
    /// `(label, transliterated label)` in set order.
    targets: Vec<(String, String)>,
}

impl Default for RegionResolver {
    fn default() -> Self {
        DEFAULT_RESOLVER.clone()
    }
}

impl RegionResolver {
    pub fn new(regions: RegionSet) -> Self {
        let targets = regions
            .iter()
            .map(|label| (label.to_string(), transliterate(label)))
            .collect();
        Self { regions, targets }
    }

    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }

    /// Resolve `text` to a canonical region.
    pub fn resolve(&self, text: &str) -> Resolution {
        if let Some(resolution) = buenos_aires_shortcut(text) {
            return resolution;
        }

        let query = transliterate(text);
        let mut best: Option<(&str, f64)> = None;
        for (label, target) in &self.targets {
            let score = similarity(&query, target);
            // Strictly greater: ties keep the earliest region.
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((label, score));
            }
        }

        // RegionSet is never empty, so `best` is always set.
        let (label, confidence) = best.unwrap_or((PROVINCE_LABEL, 0.0));
        let region = if label == BARE_ALIAS {
            PROVINCE_LABEL
        } else {
            label
        };

        Resolution {
            region: region.to_string(),
            confidence,
        }
    }
}

/// The two Buenos Aires jurisdictions are named too loosely for fuzzy
/// matching; any mention of "Buenos Aires" is decided by the word "ciudad".
fn buenos_aires_shortcut(text: &str) -> Option<Resolution> {
    if !squash(text).contains("buenosaires") {
        return None;
    }
    let region = if text.to_lowercase().contains("ciudad") {
        CITY_LABEL
    } else {
        PROVINCE_LABEL
    };
    Some(Resolution {
        region: region.to_string(),
        confidence: 1.0,
    })
}

/// Resolve `text` against the Argentine jurisdictions.
pub fn resolve(text: &str) -> Resolution {
    DEFAULT_RESOLVER.resolve(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_shortcut() {
        for text in [
            "Ciudad de Buenos Aires",
            "CIUDAD AUTONOMA DE BUENOS AIRES",
            "Ciudad Autónoma de Buenos   Aires",
            "ciudad buenosaires",
        ] {
            let r = resolve(text);
            assert_eq!(r.region, CITY_LABEL, "input {text:?}");
            assert_eq!(r.confidence, 1.0);
        }
    }

    #[test]
    fn test_province_shortcut() {
        for text in ["Buenos Aires", "Provincia de Buenos Aires", "Pcia de BUENOS AIRES"] {
            let r = resolve(text);
            assert_eq!(r.region, PROVINCE_LABEL, "input {text:?}");
            assert_eq!(r.confidence, 1.0);
        }
    }

    #[test]
    fn test_exact_region_scores_one() {
        let r = resolve("Salta");
        assert_eq!(r.region, "Salta");
        assert_eq!(r.confidence, 1.0);
    }

    #[test]
    fn test_accents_are_irrelevant() {
        let accented = resolve("Córdoba");
        let plain = resolve("Cordoba");
        assert_eq!(accented.region, "Córdoba");
        assert_eq!(plain.region, "Córdoba");
        assert_eq!(accented.confidence, 1.0);
        assert_eq!(plain.confidence, 1.0);
    }

    #[test]
    fn test_separated_accent_from_pdf() {
        let r = resolve("Neuque ´n");
        assert_eq!(r.region, "Neuquén");
        assert_eq!(r.confidence, 1.0);
    }

    #[test]
    fn test_fuzzy_match() {
        assert_eq!(resolve("Tierra del Fuego AIAS").region, "Tierra del Fuego");
        assert_eq!(resolve("Santiago Del Estero").region, "Santiago del Estero");
        assert_eq!(resolve("Rio Negro").region, "Río Negro");
        assert_eq!(resolve("Entre Rios").region, "Entre Ríos");
    }

    #[test]
    fn test_low_quality_match_still_returned() {
        let r = resolve("xqz");
        assert!(RegionSet::argentina().contains(&r.region));
        assert!(r.confidence < 0.2);
    }

    #[test]
    fn test_ties_go_to_first_region() {
        // "a" overlaps "ab" and "ba" equally: 1 / 3.
        let resolver = RegionResolver::new(RegionSet::new(["Ab", "Ba"]).unwrap());
        assert_eq!(resolver.resolve("a").region, "Ab");
        let resolver = RegionResolver::new(RegionSet::new(["Ba", "Ab"]).unwrap());
        assert_eq!(resolver.resolve("a").region, "Ba");

        let r = resolver.resolve("q");
        assert_eq!(r.region, "Ba");
        assert_eq!(r.confidence, 0.0);
    }

    #[test]
    fn test_bare_alias_remapped_to_province() {
        let regions = RegionSet::new([BARE_ALIAS, "Salta"]).unwrap();
        let resolver = RegionResolver::new(regions);
        // Misspelled so the shortcut does not fire; the fuzzy winner is the alias.
        let r = resolver.resolve("Buenos Aries");
        assert_eq!(r.region, PROVINCE_LABEL);
        assert!(r.confidence > 0.5);
    }

    #[test]
    fn test_empty_text() {
        let r = resolve("");
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.region, CITY_LABEL);
    }
}
