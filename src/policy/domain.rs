use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

pub const FEATURE_COUNT: usize = 9;
pub const SOURCE_COUNT: usize = 5;

/// The measured inputs to the impact model, in coefficient order.
///
/// This ordering is the single schema shared by the model artifact, feature
/// vectors, and sensitivity weights; the artifact is validated against it at
/// startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    Pm25,
    Pm10,
    No2,
    So2,
    Co,
    O3,
    Temperature,
    Humidity,
    WindSpeed,
}

impl FeatureName {
    pub const fn ordered() -> [Self; FEATURE_COUNT] {
        [
            Self::Pm25,
            Self::Pm10,
            Self::No2,
            Self::So2,
            Self::Co,
            Self::O3,
            Self::Temperature,
            Self::Humidity,
            Self::WindSpeed,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Pm25 => "pm25",
            Self::Pm10 => "pm10",
            Self::No2 => "no2",
            Self::So2 => "so2",
            Self::Co => "co",
            Self::O3 => "o3",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::WindSpeed => "wind_speed",
        }
    }

    /// Field name used by the live feed. Weather variables are abbreviated
    /// upstream; pollutants match the canonical key.
    pub const fn feed_key(self) -> &'static str {
        match self {
            Self::Temperature => "t",
            Self::Humidity => "h",
            Self::WindSpeed => "w",
            other => other.key(),
        }
    }

    /// Documented default applied when the live feed omits the field.
    pub const fn fallback(self) -> f64 {
        match self {
            Self::Temperature => 25.0,
            Self::Humidity => 50.0,
            Self::WindSpeed => 2.0,
            _ => 0.0,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Current readings for every feature, in schema order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn from_fn<F>(mut value_for: F) -> Self
    where
        F: FnMut(FeatureName) -> f64,
    {
        let mut values = [0.0; FEATURE_COUNT];
        for feature in FeatureName::ordered() {
            values[feature.index()] = value_for(feature);
        }
        Self { values }
    }

    pub fn get(&self, feature: FeatureName) -> f64 {
        self.values[feature.index()]
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f64)> + '_ {
        FeatureName::ordered()
            .into_iter()
            .map(|feature| (feature, self.values[feature.index()]))
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_feature_map(&self.values, serializer)
    }
}

/// Normalized sensitivity of the predicted AQI change to each feature.
///
/// Invariant: every weight is non-negative and the weights sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightVector {
    values: [f64; FEATURE_COUNT],
}

impl WeightVector {
    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, feature: FeatureName) -> f64 {
        self.values[feature.index()]
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f64)> + '_ {
        FeatureName::ordered()
            .into_iter()
            .map(|feature| (feature, self.values[feature.index()]))
    }
}

impl Serialize for WeightVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_feature_map(&self.values, serializer)
    }
}

fn serialize_feature_map<S: Serializer>(
    values: &[f64; FEATURE_COUNT],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
    for feature in FeatureName::ordered() {
        map.serialize_entry(feature.key(), &values[feature.index()])?;
    }
    map.end()
}

/// Named emission categories the attribution model scores, in ranking order.
/// Declaration order doubles as the tie-break for equal projected changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionSource {
    Traffic,
    Construction,
    RoadDust,
    Industry,
    Stubble,
}

impl EmissionSource {
    pub const fn ordered() -> [Self; SOURCE_COUNT] {
        [
            Self::Traffic,
            Self::Construction,
            Self::RoadDust,
            Self::Industry,
            Self::Stubble,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Traffic => "traffic",
            Self::Construction => "construction",
            Self::RoadDust => "road_dust",
            Self::Industry => "industry",
            Self::Stubble => "stubble",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Traffic => "Traffic",
            Self::Construction => "Construction",
            Self::RoadDust => "Road Dust",
            Self::Industry => "Industry",
            Self::Stubble => "Stubble Burning",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Share of current pollution attributed to each source, as percentages.
///
/// Shares are independent attributions; they carry no sum invariant. A source
/// missing from the provider response is treated as 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceAttribution {
    shares: [f64; SOURCE_COUNT],
}

impl SourceAttribution {
    pub const fn new(shares: [f64; SOURCE_COUNT]) -> Self {
        Self { shares }
    }

    pub fn from_fn<F>(mut share_for: F) -> Self
    where
        F: FnMut(EmissionSource) -> f64,
    {
        let mut shares = [0.0; SOURCE_COUNT];
        for source in EmissionSource::ordered() {
            shares[source.index()] = share_for(source);
        }
        Self { shares }
    }

    pub fn share(&self, source: EmissionSource) -> f64 {
        self.shares[source.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (EmissionSource, f64)> + '_ {
        EmissionSource::ordered()
            .into_iter()
            .map(|source| (source, self.shares[source.index()]))
    }
}

impl Serialize for SourceAttribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SOURCE_COUNT))?;
        for source in EmissionSource::ordered() {
            map.serialize_entry(source.key(), &self.shares[source.index()])?;
        }
        map.end()
    }
}

/// Projected effect of eliminating one source's attributed share.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolicyOutcome {
    pub aqi_change: f64,
    pub estimated_aqi: f64,
}

/// Outcomes for every source, keyed by `EmissionSource` declaration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyResults {
    outcomes: [PolicyOutcome; SOURCE_COUNT],
}

impl PolicyResults {
    pub const fn new(outcomes: [PolicyOutcome; SOURCE_COUNT]) -> Self {
        Self { outcomes }
    }

    pub fn outcome(&self, source: EmissionSource) -> PolicyOutcome {
        self.outcomes[source.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (EmissionSource, PolicyOutcome)> + '_ {
        EmissionSource::ordered()
            .into_iter()
            .map(|source| (source, self.outcomes[source.index()]))
    }

    /// All outcomes ordered by projected change, best improvement first.
    /// Ties keep declaration order.
    pub fn ranked(&self) -> Vec<(EmissionSource, PolicyOutcome)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|(_, a), (_, b)| {
            a.aqi_change
                .partial_cmp(&b.aqi_change)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        entries
    }
}

impl Serialize for PolicyResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SOURCE_COUNT))?;
        for source in EmissionSource::ordered() {
            map.serialize_entry(source.key(), &self.outcomes[source.index()])?;
        }
        map.end()
    }
}

/// The single best policy among the evaluated sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolicyRecommendation {
    pub policy: EmissionSource,
    pub expected_change: f64,
    pub estimated_aqi: f64,
}

/// Full result of one what-if evaluation: every outcome plus the top pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyAssessment {
    pub results: PolicyResults,
    pub recommendation: PolicyRecommendation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_schema_is_stable() {
        let ordered = FeatureName::ordered();
        assert_eq!(ordered.len(), FEATURE_COUNT);
        assert_eq!(ordered[0].key(), "pm25");
        assert_eq!(ordered[8].key(), "wind_speed");
        for (position, feature) in ordered.into_iter().enumerate() {
            assert_eq!(feature.index(), position);
        }
    }

    #[test]
    fn weather_fields_use_abbreviated_feed_keys() {
        assert_eq!(FeatureName::Temperature.feed_key(), "t");
        assert_eq!(FeatureName::Humidity.feed_key(), "h");
        assert_eq!(FeatureName::WindSpeed.feed_key(), "w");
        assert_eq!(FeatureName::Pm25.feed_key(), "pm25");
    }

    #[test]
    fn fallbacks_match_documented_table() {
        assert_eq!(FeatureName::Pm25.fallback(), 0.0);
        assert_eq!(FeatureName::O3.fallback(), 0.0);
        assert_eq!(FeatureName::Temperature.fallback(), 25.0);
        assert_eq!(FeatureName::Humidity.fallback(), 50.0);
        assert_eq!(FeatureName::WindSpeed.fallback(), 2.0);
    }

    #[test]
    fn feature_vector_serializes_in_schema_order() {
        let vector = FeatureVector::from_fn(|feature| feature.index() as f64);
        let json = serde_json::to_string(&vector).expect("vector serializes");
        assert!(json.starts_with("{\"pm25\":0.0"));
        assert!(json.ends_with("\"wind_speed\":8.0}"));
    }

    #[test]
    fn attribution_serializes_all_sources() {
        let attribution = SourceAttribution::new([40.0, 10.0, 5.0, 20.0, 5.0]);
        let value = serde_json::to_value(attribution).expect("attribution serializes");
        assert_eq!(value["traffic"], 40.0);
        assert_eq!(value["stubble"], 5.0);
        assert_eq!(
            value.as_object().expect("object").len(),
            SOURCE_COUNT,
            "every source appears"
        );
    }

    #[test]
    fn ranked_orders_by_change_and_keeps_declaration_order_on_ties() {
        let outcome = |change: f64| PolicyOutcome {
            aqi_change: change,
            estimated_aqi: 100.0 + change,
        };
        let results = PolicyResults::new([
            outcome(-10.0),
            outcome(-25.0),
            outcome(-10.0),
            outcome(-40.0),
            outcome(0.0),
        ]);

        let ranked = results.ranked();
        let order: Vec<_> = ranked.iter().map(|(source, _)| *source).collect();
        assert_eq!(
            order,
            vec![
                EmissionSource::Industry,
                EmissionSource::Construction,
                EmissionSource::Traffic,
                EmissionSource::RoadDust,
                EmissionSource::Stubble,
            ]
        );
    }
}
