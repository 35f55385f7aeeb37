//! Result ordering: object-type bucket, then brightness, then uid.

use std::cmp::Ordering;

use crate::domain::Body;

/// Stand-in magnitude for bodies without one, so they sort last.
pub const UNKNOWN_MAGNITUDE: f64 = 99999.0;

/// Bucket for any type missing from [`TYPE_RANKS`].
pub const OTHER_RANK: i32 = 5;

/// Lower-cased object types and their bucket.
pub const TYPE_RANKS: &[(&str, i32)] = &[
    ("nebula", 1),
    ("diffuse nebula", 1),
    ("emission nebula", 1),
    ("reflection nebula", 1),
    ("dark nebula", 1),
    ("planetary nebula", 1),
    ("supernova remnant", 1),
    ("hii region", 1),
    ("cluster with nebulosity", 1),
    ("cluster and nebula", 1),
    ("open cluster", 2),
    ("globular cluster", 2),
    ("asterism", 2),
    ("star cloud", 2),
    ("galaxy", 3),
    ("spiral galaxy", 3),
    ("barred spiral galaxy", 3),
    ("elliptical galaxy", 3),
    ("lenticular galaxy", 3),
    ("irregular galaxy", 3),
    ("dwarf galaxy", 3),
    ("double star", 4),
    ("multiple star", 4),
    ("**", 4),
    ("other", OTHER_RANK),
];

pub fn type_rank(object_type: Option<&str>) -> i32 {
    let Some(object_type) = object_type else {
        return OTHER_RANK;
    };
    let key = object_type.to_lowercase();
    TYPE_RANKS
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(OTHER_RANK, |(_, rank)| *rank)
}

/// `ORDER BY` clause equivalent to [`compare`].
pub fn order_by_sql() -> String {
    let cases: String = TYPE_RANKS
        .iter()
        .map(|(name, rank)| format!(" WHEN '{name}' THEN {rank}"))
        .collect();

    format!(
        " ORDER BY CASE lower(object_type){cases} ELSE {OTHER_RANK} END, \
         COALESCE(apparent_magnitude, {UNKNOWN_MAGNITUDE:.1}), uid"
    )
}

pub fn compare(a: &Body, b: &Body) -> Ordering {
    let magnitude = |body: &Body| body.apparent_magnitude.unwrap_or(UNKNOWN_MAGNITUDE);

    type_rank(a.object_type.as_deref())
        .cmp(&type_rank(b.object_type.as_deref()))
        .then_with(|| magnitude(a).total_cmp(&magnitude(b)))
        .then_with(|| a.uid.cmp(&b.uid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewBody;
    use uuid::Uuid;

    fn body(object_type: Option<&str>, magnitude: Option<f64>, uid: u128) -> Body {
        NewBody {
            name: format!("body-{uid}"),
            object_type: object_type.map(str::to_string),
            apparent_magnitude: magnitude,
            ..Default::default()
        }
        .into_body(Uuid::from_u128(uid))
    }

    #[test]
    fn test_type_rank_buckets() {
        assert_eq!(type_rank(Some("Planetary Nebula")), 1);
        assert_eq!(type_rank(Some("Open Cluster")), 2);
        assert_eq!(type_rank(Some("SPIRAL GALAXY")), 3);
        assert_eq!(type_rank(Some("Double Star")), 4);
        assert_eq!(type_rank(Some("*")), OTHER_RANK);
        assert_eq!(type_rank(None), OTHER_RANK);
    }

    #[test]
    fn test_compare_bucket_before_magnitude() {
        let nebula = body(Some("Diffuse Nebula"), Some(8.0), 1);
        let star = body(Some("*"), Some(-1.46), 2);
        assert_eq!(compare(&nebula, &star), Ordering::Less);
    }

    #[test]
    fn test_compare_unknown_magnitude_sorts_last() {
        let dim = body(Some("*"), Some(12.0), 1);
        let unknown = body(Some("*"), None, 2);
        assert_eq!(compare(&dim, &unknown), Ordering::Less);
    }

    #[test]
    fn test_compare_ties_fall_back_to_uid() {
        let a = body(Some("*"), Some(2.0), 1);
        let b = body(Some("*"), Some(2.0), 2);
        assert_eq!(compare(&a, &b), Ordering::Less);
        assert_eq!(compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_order_by_sql_covers_table() {
        let sql = order_by_sql();
        assert!(sql.starts_with(" ORDER BY CASE lower(object_type) WHEN 'nebula' THEN 1"));
        assert!(sql.contains(" WHEN '**' THEN 4"));
        assert!(sql.ends_with("ELSE 5 END, COALESCE(apparent_magnitude, 99999.0), uid"));
    }
}
