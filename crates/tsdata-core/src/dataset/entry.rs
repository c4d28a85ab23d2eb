//! A single time series record.

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeSeq;

use super::Timestamp;

/// One line of a JSON-lines dataset file.
///
/// Missing observations may be written as `"NaN"` or `null` and are loaded
/// as `f32::NAN`. Keys other than the ones below are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    /// Timestamp of the first observation.
    pub start: Timestamp,

    /// Observed values.
    #[serde(with = "values")]
    pub target: Vec<f32>,

    /// Optional identifier; numeric ids are kept as their decimal string.
    #[serde(
        default,
        deserialize_with = "item_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub item_id: Option<String>,

    /// Static categorical features.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feat_static_cat: Vec<u64>,

    /// Static real-valued features.
    #[serde(default, with = "values", skip_serializing_if = "Vec::is_empty")]
    pub feat_static_real: Vec<f32>,

    /// Dynamic real-valued features, one row per feature.
    #[serde(default, with = "rows", skip_serializing_if = "Vec::is_empty")]
    pub feat_dynamic_real: Vec<Vec<f32>>,
}

impl TimeSeries {
    /// Creates a series with no features.
    #[must_use]
    pub fn new(start: Timestamp, target: Vec<f32>) -> Self {
        Self {
            start,
            target,
            item_id: None,
            feat_static_cat: Vec::new(),
            feat_static_real: Vec::new(),
            feat_dynamic_real: Vec::new(),
        }
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.target.len()
    }

    /// Returns `true` if the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Number of `NaN` observations.
    #[must_use]
    pub fn missing_values(&self) -> usize {
        self.target.iter().filter(|v| v.is_nan()).count()
    }

    /// Returns a copy with the last `n` observations removed.
    ///
    /// Dynamic features longer than the shortened target are cut to the same
    /// length. The start timestamp is unchanged.
    #[must_use]
    pub fn truncated(&self, n: usize) -> Self {
        let keep = self.target.len().saturating_sub(n);
        let mut series = self.clone();
        series.target.truncate(keep);
        for row in &mut series.feat_dynamic_real {
            row.truncate(keep);
        }
        series
    }
}

fn item_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(s) => s,
        Id::Signed(n) => n.to_string(),
        Id::Unsigned(n) => n.to_string(),
    }))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

fn to_f32<E: serde::de::Error>(raw: Option<RawValue>) -> Result<f32, E> {
    match raw {
        None => Ok(f32::NAN),
        #[allow(clippy::cast_possible_truncation)]
        Some(RawValue::Number(n)) => Ok(n as f32),
        Some(RawValue::Text(s)) => s
            .trim()
            .parse::<f32>()
            .map_err(|_| E::custom(format!("invalid number {s:?}"))),
    }
}

/// JSON has no literal for non-finite numbers, so they go out as strings.
struct Value(f32);

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.is_nan() {
            serializer.serialize_str("NaN")
        } else if v.is_infinite() {
            serializer.serialize_str(if v > 0.0 { "Infinity" } else { "-Infinity" })
        } else {
            serializer.serialize_f32(v)
        }
    }
}

struct Values<'a>(&'a [f32]);

impl Serialize for Values<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for v in self.0 {
            seq.serialize_element(&Value(*v))?;
        }
        seq.end()
    }
}

struct OwnedValues(Vec<f32>);

impl<'de> Deserialize<'de> for OwnedValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Option<RawValue>>::deserialize(deserializer)?
            .into_iter()
            .map(to_f32)
            .collect::<Result<_, _>>()
            .map(OwnedValues)
    }
}

mod values {
    use super::*;

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(v: &Vec<f32>, serializer: S) -> Result<S::Ok, S::Error> {
        Values(v).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f32>, D::Error> {
        OwnedValues::deserialize(deserializer).map(|v| v.0)
    }
}

mod rows {
    use super::*;

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(rows: &Vec<Vec<f32>>, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(rows.len()))?;
        for row in rows {
            seq.serialize_element(&Values(row))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<f32>>, D::Error> {
        Ok(Vec::<OwnedValues>::deserialize(deserializer)?
            .into_iter()
            .map(|v| v.0)
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_line() {
        let ts: TimeSeries =
            serde_json::from_str(r#"{"start": "2012-01-01", "target": [1, 2.5, 3]}"#).unwrap();
        assert_eq!(ts.target, vec![1.0, 2.5, 3.0]);
        assert_eq!(ts.start.to_string(), "2012-01-01 00:00:00");
        assert!(ts.item_id.is_none());
        assert!(ts.feat_dynamic_real.is_empty());
    }

    #[test]
    fn test_missing_values() {
        let ts: TimeSeries =
            serde_json::from_str(r#"{"start": "2012-01-01", "target": [1, "NaN", null, "nan"]}"#)
                .unwrap();
        assert_eq!(ts.len(), 4);
        assert_eq!(ts.missing_values(), 3);
    }

    #[test]
    fn test_bad_value_rejected() {
        let result =
            serde_json::from_str::<TimeSeries>(r#"{"start": "2012-01-01", "target": [1, "x"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_item_id_and_unknown_keys() {
        let ts: TimeSeries = serde_json::from_str(
            r#"{"start": "2012-01-01", "target": [1], "item_id": 42, "source": "wiki"}"#,
        )
        .unwrap();
        assert_eq!(ts.item_id.as_deref(), Some("42"));

        let ts: TimeSeries =
            serde_json::from_str(r#"{"start": "2012-01-01", "target": [1], "item_id": "A"}"#)
                .unwrap();
        assert_eq!(ts.item_id.as_deref(), Some("A"));
    }

    #[test]
    fn test_features() {
        let ts: TimeSeries = serde_json::from_str(
            r#"{"start": "2012-01-01 00:00:00", "target": [1, 2],
                "feat_static_cat": [3, 0], "feat_static_real": [0.5],
                "feat_dynamic_real": [[1, 2], [3, "NaN"]]}"#,
        )
        .unwrap();
        assert_eq!(ts.feat_static_cat, vec![3, 0]);
        assert_eq!(ts.feat_static_real, vec![0.5]);
        assert_eq!(ts.feat_dynamic_real.len(), 2);
        assert!(ts.feat_dynamic_real[1][1].is_nan());
    }

    #[test]
    fn test_serialize_writes_nan_as_string() {
        let mut ts = TimeSeries::new("2012-01-01".parse().unwrap(), vec![1.0, f32::NAN]);
        ts.item_id = Some("a".to_string());
        let line = serde_json::to_string(&ts).unwrap();
        assert_eq!(
            line,
            r#"{"start":"2012-01-01 00:00:00","target":[1.0,"NaN"],"item_id":"a"}"#
        );

        let back: TimeSeries = serde_json::from_str(&line).unwrap();
        assert_eq!(back.target[0], 1.0);
        assert!(back.target[1].is_nan());
    }

    #[test]
    fn test_truncated() {
        let mut ts = TimeSeries::new("2012-01-01".parse().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        ts.feat_dynamic_real = vec![vec![0.0, 1.0, 2.0, 3.0]];

        let short = ts.truncated(2);
        assert_eq!(short.target, vec![1.0, 2.0]);
        assert_eq!(short.feat_dynamic_real, vec![vec![0.0, 1.0]]);
        assert_eq!(short.start, ts.start);
        assert_eq!(ts.len(), 4);
    }
}
