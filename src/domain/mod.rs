/// Domain models for the application
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_LIMIT: i64 = 20;

/// A celestial body: a star, cluster, nebula or galaxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Body {
    pub uid: Uuid,
    pub name: String,
    pub iau: Option<String>,
    #[sqlx(rename = "right_ascension")]
    pub ra: Option<f64>,
    #[sqlx(rename = "declination")]
    pub dec: Option<f64>,
    pub constellation: Option<String>,
    #[serde(rename = "type")]
    pub object_type: Option<String>,
    #[serde(rename = "m")]
    pub apparent_magnitude: Option<f64>,
    #[serde(rename = "M")]
    pub absolute_magnitude: Option<f64>,
    #[serde(rename = "d")]
    pub distance: Option<f64>,
    pub hd: Option<String>,
    pub hr: Option<String>,
    pub hip: Option<String>,
    pub bd: Option<String>,
    pub flamsteed: Option<String>,
    pub messier: Option<String>,
    pub ngc: Option<String>,
    pub ic: Option<String>,
    pub simbad: Option<String>,
}

/// Write-path input for a body; the uid is assigned on creation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBody {
    pub name: String,
    pub iau: Option<String>,
    pub ra: Option<f64>,
    pub dec: Option<f64>,
    pub constellation: Option<String>,
    #[serde(rename = "type")]
    pub object_type: Option<String>,
    #[serde(rename = "m")]
    pub apparent_magnitude: Option<f64>,
    #[serde(rename = "M")]
    pub absolute_magnitude: Option<f64>,
    #[serde(rename = "d")]
    pub distance: Option<f64>,
    pub hd: Option<String>,
    pub hr: Option<String>,
    pub hip: Option<String>,
    pub bd: Option<String>,
    pub flamsteed: Option<String>,
    pub messier: Option<String>,
    pub ngc: Option<String>,
    pub ic: Option<String>,
    pub simbad: Option<String>,
}

impl NewBody {
    pub fn into_body(self, uid: Uuid) -> Body {
        Body {
            uid,
            name: self.name,
            iau: self.iau,
            ra: self.ra,
            dec: self.dec,
            constellation: self.constellation,
            object_type: self.object_type,
            apparent_magnitude: self.apparent_magnitude,
            absolute_magnitude: self.absolute_magnitude,
            distance: self.distance,
            hd: self.hd,
            hr: self.hr,
            hip: self.hip,
            bd: self.bd,
            flamsteed: self.flamsteed,
            messier: self.messier,
            ngc: self.ngc,
            ic: self.ic,
            simbad: self.simbad,
        }
    }
}

/// Search criteria for listing bodies. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BodyQuery {
    pub limit: Option<i64>,
    pub ra: Option<f64>,
    pub dec: Option<f64>,
    pub radius: Option<f64>,
    pub name: Option<String>,
    pub constellation: Option<String>,
    #[serde(rename = "type")]
    pub object_type: Option<String>,
    pub catalogue: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub datetime: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl BodyQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    /// Non-null parameters in a fixed order, `limit` always included.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit().to_string())];

        let numbers = [("ra", self.ra), ("dec", self.dec), ("radius", self.radius)];
        pairs.extend(numbers.iter().filter_map(|(k, v)| v.map(|v| (*k, v.to_string()))));

        let texts = [
            ("name", &self.name),
            ("constellation", &self.constellation),
            ("type", &self.object_type),
            ("catalogue", &self.catalogue),
        ];
        pairs.extend(texts.iter().filter_map(|(k, v)| v.as_ref().map(|v| (*k, v.clone()))));

        let observer = [("latitude", self.latitude), ("longitude", self.longitude)];
        pairs.extend(observer.iter().filter_map(|(k, v)| v.map(|v| (*k, v.to_string()))));

        let times = [
            ("datetime", &self.datetime),
            ("start", &self.start),
            ("end", &self.end),
        ];
        pairs.extend(times.iter().filter_map(|(k, v)| v.as_ref().map(|v| (*k, v.clone()))));

        pairs
    }
}

/// A page of results with navigation links
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub count: i64,
    pub next_page: Option<String>,
    pub previous_page: Option<String>,
    pub results: Vec<T>,
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}

/// API root description
#[derive(Debug, Serialize)]
pub struct ApiIndex {
    pub name: String,
    pub description: &'static str,
    pub endpoint: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_always_echo_limit() {
        let query = BodyQuery::default();
        assert_eq!(query.query_pairs(), vec![("limit", "20".to_string())]);
    }

    #[test]
    fn test_query_pairs_fixed_order() {
        let query = BodyQuery {
            end: Some("2024-01-02T00:00:00Z".into()),
            name: Some("M31".into()),
            ra: Some(2.294522),
            limit: Some(5),
            latitude: Some(51.5),
            ..Default::default()
        };
        let keys: Vec<&str> = query.query_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["limit", "ra", "name", "latitude", "end"]);
    }

    #[test]
    fn test_body_serializes_public_field_names() {
        let body = NewBody {
            name: "Vega".into(),
            object_type: Some("*".into()),
            apparent_magnitude: Some(0.03),
            ..Default::default()
        }
        .into_body(Uuid::nil());
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["type"], "*");
        assert_eq!(json["m"], 0.03);
        assert!(json["M"].is_null());
        assert!(json.get("object_type").is_none());
    }
}
