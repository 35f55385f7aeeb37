//! Postgres rendering of a [`FilterSet`].

use sqlx::{Postgres, QueryBuilder};

use super::{order, pattern, FilterSet, NameToken, Predicate, MIN_ALTITUDE};

pub const BODY_COLUMNS: &str = "uid, name, iau, right_ascension, declination, constellation, \
     object_type, apparent_magnitude, absolute_magnitude, distance, hd, hr, hip, bd, \
     flamsteed, messier, ngc, ic, simbad";

impl Predicate {
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Predicate::WithinRadius { ra, dec, radius } => {
                qb.push("sqrt(power(right_ascension - ")
                    .push_bind(*ra)
                    .push(", 2) + power(declination - ")
                    .push_bind(*dec)
                    .push(", 2)) < ")
                    .push_bind(*radius);
            }
            Predicate::NameMatches(token) => match (token, token.catalogue_number()) {
                (_, Some((catalogue, number))) => {
                    qb.push(format!(
                        "substring({} from '[0-9]+$')::numeric = ",
                        catalogue.column()
                    ))
                    .push_bind(number);
                }
                (NameToken::Plain(text), None) => {
                    let like = pattern::contains_pattern(text);
                    qb.push("(name ILIKE ")
                        .push_bind(like.clone())
                        .push(" OR iau ILIKE ")
                        .push_bind(like)
                        .push(")");
                }
                (_, None) => {
                    qb.push("FALSE");
                }
            },
            Predicate::ConstellationLike(like) => {
                qb.push("constellation ILIKE ").push_bind(like.clone());
            }
            Predicate::TypeLike(like) => {
                qb.push("object_type ILIKE ").push_bind(like.clone());
            }
            Predicate::HasCatalogue(catalogue) => {
                qb.push(format!("{} IS NOT NULL", catalogue.column()));
            }
            Predicate::AboveHorizon { lst, latitude } => {
                push_altitude(qb, *lst, *latitude);
                qb.push(" > ").push_bind(MIN_ALTITUDE);
            }
            Predicate::AnyOf(predicates) => {
                if predicates.is_empty() {
                    qb.push("FALSE");
                    return;
                }
                qb.push("(");
                for (i, predicate) in predicates.iter().enumerate() {
                    if i > 0 {
                        qb.push(" OR ");
                    }
                    predicate.push_sql(qb);
                }
                qb.push(")");
            }
        }
    }
}

/// Altitude in degrees of the row's `right_ascension`/`declination`, the SQL
/// twin of [`crate::astro::altitude`].
pub fn push_altitude(qb: &mut QueryBuilder<'_, Postgres>, lst: f64, latitude: f64) {
    qb.push(
        "degrees(asin(least(1.0, greatest(-1.0, \
         sin(radians(declination)) * sin(radians(",
    )
    .push_bind(latitude)
    .push(")) + cos(radians(declination)) * cos(radians(")
    .push_bind(latitude)
    .push(")) * cos(radians(")
    .push_bind(lst)
    .push(" - right_ascension))))))");
}

impl FilterSet {
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for (i, predicate) in self.predicates().iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            predicate.push_sql(qb);
        }
    }
}

/// `SELECT count(*)` over the filtered set.
pub fn count_query(filters: &FilterSet) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT count(*) FROM bodies");
    filters.push_where(&mut qb);
    qb
}

/// Ordered page of the filtered set.
pub fn page_query(filters: &FilterSet, skip: i64, limit: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {BODY_COLUMNS} FROM bodies"));
    filters.push_where(&mut qb);
    qb.push(order::order_by_sql());
    qb.push(" LIMIT ").push_bind(limit.max(0));
    qb.push(" OFFSET ").push_bind(skip.max(0));
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BodyQuery;
    use crate::query::Catalogue;

    fn sql_for(query: &BodyQuery) -> String {
        count_query(&FilterSet::from_query(query)).sql().to_string()
    }

    #[test]
    fn test_count_without_filters() {
        assert_eq!(sql_for(&BodyQuery::default()), "SELECT count(*) FROM bodies");
    }

    #[test]
    fn test_radial_sql() {
        let sql = sql_for(&BodyQuery {
            ra: Some(2.294522),
            dec: Some(59.14978),
            ..Default::default()
        });
        assert_eq!(
            sql,
            "SELECT count(*) FROM bodies WHERE sqrt(power(right_ascension - $1, 2) \
             + power(declination - $2, 2)) < $3"
        );
    }

    #[test]
    fn test_messier_shorthand_sql() {
        let sql = sql_for(&BodyQuery {
            name: Some("M31".into()),
            ..Default::default()
        });
        assert_eq!(
            sql,
            "SELECT count(*) FROM bodies WHERE substring(messier from '[0-9]+$')::numeric = $1"
        );
    }

    #[test]
    fn test_plain_name_sql() {
        let sql = sql_for(&BodyQuery {
            name: Some("vega".into()),
            ..Default::default()
        });
        assert!(sql.ends_with("WHERE (name ILIKE $1 OR iau ILIKE $2)"));
    }

    #[test]
    fn test_conjunction_and_interval_sql() {
        let sql = sql_for(&BodyQuery {
            constellation: Some("orion".into()),
            catalogue: Some("messier".into()),
            latitude: Some(51.5),
            longitude: Some(0.0),
            start: Some("2024-06-21T00:00:00Z".into()),
            end: Some("2024-12-21T00:00:00Z".into()),
            ..Default::default()
        });
        assert!(sql.contains("WHERE constellation ILIKE $1 AND messier IS NOT NULL AND ("));
        assert!(sql.contains(" OR degrees(asin("));
        assert_eq!(sql.matches("> $").count(), 2);
        assert!(sql.ends_with(")"));
    }

    // Needs a reachable Postgres in DATABASE_URL; skipped otherwise.
    #[tokio::test]
    async fn test_altitude_sql_agrees_with_astro() {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return;
        };
        let pool = sqlx::PgPool::connect(&url).await.unwrap();

        let cases = [
            (89.9296, 88.7929, 7.4071, 51.5074),
            (89.9296, 83.0017, -0.2991, 51.5074),
            (0.0, 37.9546, 89.2641, 51.5074),
            (180.0, 101.2872, -16.7161, -33.8688),
            (45.0, 30.0, 60.0, 70.0),
            (10.0, 190.0, -60.0, 0.0),
        ];

        for (lst, ra, dec, latitude) in cases {
            let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
            push_altitude(&mut qb, lst, latitude);
            qb.push(" FROM (SELECT ")
                .push_bind(ra)
                .push("::float8 AS right_ascension, ")
                .push_bind(dec)
                .push("::float8 AS declination) AS body");

            let in_sql: f64 = qb.build_query_scalar().fetch_one(&pool).await.unwrap();
            let in_process = crate::astro::altitude(lst, ra, dec, latitude);
            assert!(
                (in_sql - in_process).abs() < 1e-6,
                "lst={lst} ra={ra} dec={dec}: {in_sql} vs {in_process}"
            );
        }
    }

    #[test]
    fn test_page_sql_orders_then_limits() {
        let filters = FilterSet::default().and(Predicate::HasCatalogue(Catalogue::Ngc));
        let qb = page_query(&filters, 40, 20);
        let sql = qb.sql();
        assert!(sql.starts_with("SELECT uid, name, iau, right_ascension"));
        assert!(sql.contains("FROM bodies WHERE ngc IS NOT NULL ORDER BY CASE lower(object_type)"));
        assert!(sql.ends_with("uid LIMIT $1 OFFSET $2"));
    }
}
