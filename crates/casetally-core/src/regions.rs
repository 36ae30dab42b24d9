use once_cell::sync::Lazy;

use crate::CoreError;

/// Label returned for the autonomous city of Buenos Aires.
pub const CITY_LABEL: &str = "Ciudad Autonoma de Buenos Aires";

/// Label returned for the province of Buenos Aires.
pub const PROVINCE_LABEL: &str = "Provincia de Buenos Aires";

/// Ambiguous alias some region lists carry; it always means the province.
pub const BARE_ALIAS: &str = "Buenos Aires";

/// The 24 Argentine jurisdictions, in report order.
pub const ARGENTINE_REGIONS: &[&str] = &[
    CITY_LABEL,
    PROVINCE_LABEL,
    "Catamarca",
    "Chaco",
    "Chubut",
    "Córdoba",
    "Corrientes",
    "Entre Ríos",
    "Formosa",
    "Jujuy",
    "La Pampa",
    "La Rioja",
    "Mendoza",
    "Misiones",
    "Neuquén",
    "Río Negro",
    "Salta",
    "San Juan",
    "San Luis",
    "Santa Cruz",
    "Santa Fe",
    "Santiago del Estero",
    "Tierra del Fuego",
    "Tucumán",
];

static DEFAULT_REGIONS: Lazy<RegionSet> = Lazy::new(|| RegionSet {
    labels: ARGENTINE_REGIONS.iter().map(|s| s.to_string()).collect(),
});

/// Ordered, immutable set of canonical region labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSet {
    labels: Vec<String>,
}

impl RegionSet {
    /// Build a region set from `labels`, keeping their order.
    ///
    /// Duplicate labels are dropped (first occurrence kept). An empty list is
    /// rejected with [`CoreError::EmptyRegionSet`].
    pub fn new<I, S>(labels: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !unique.contains(&label) {
                unique.push(label);
            }
        }
        if unique.is_empty() {
            return Err(CoreError::EmptyRegionSet);
        }
        Ok(Self { labels: unique })
    }

    /// The process-wide set of Argentine jurisdictions.
    pub fn argentina() -> &'static RegionSet {
        &DEFAULT_REGIONS
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false: construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

impl Default for RegionSet {
    fn default() -> Self {
        DEFAULT_REGIONS.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set_has_all_jurisdictions() {
        let set = RegionSet::argentina();
        assert_eq!(set.len(), 24);
        assert!(set.contains(CITY_LABEL));
        assert!(set.contains(PROVINCE_LABEL));
        assert!(set.contains("Tierra del Fuego"));
        assert!(!set.contains(BARE_ALIAS));
    }

    #[test]
    fn test_order_is_preserved() {
        let set = RegionSet::new(["Salta", "Jujuy", "Chaco"]).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Salta", "Jujuy", "Chaco"]);
    }

    #[test]
    fn test_duplicates_dropped() {
        let set = RegionSet::new(["Salta", "Jujuy", "Salta"]).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_empty_set_rejected() {
        let result = RegionSet::new(Vec::<String>::new());
        assert!(matches!(result, Err(CoreError::EmptyRegionSet)));
    }

    #[test]
    fn test_default_matches_static() {
        assert_eq!(&RegionSet::default(), RegionSet::argentina());
    }
}
