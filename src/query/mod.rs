//! Filter pipeline for body searches.
//!
//! Each stage reads the parameters it cares about from a [`BodyQuery`] and
//! either returns the [`FilterSet`] untouched or adds one conjunctive
//! [`Predicate`]. A predicate renders to SQL (see [`sql`]) and evaluates in
//! process ([`Predicate::matches`]); both forms compute the same thing.
//!
//! Known approximations:
//! - radial search uses planar distance in (ra, dec), not great-circle
//!   distance, so it is off near the poles and for large radii;
//! - interval visibility only checks the two ends of the interval.

pub mod name;
pub mod order;
pub mod pattern;
pub mod sql;

use crate::astro;
use crate::domain::{Body, BodyQuery};

pub use name::NameToken;

/// Radius used when `ra` and `dec` are given without one.
pub const DEFAULT_RADIUS: f64 = 10.0;

/// Bodies must be strictly higher than this to count as visible.
pub const MIN_ALTITUDE: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalogue {
    Messier,
    Ngc,
    Ic,
    Hd,
    Hr,
    Hip,
    Bd,
    Flamsteed,
}

impl Catalogue {
    const ALL: [Catalogue; 8] = [
        Catalogue::Messier,
        Catalogue::Ngc,
        Catalogue::Ic,
        Catalogue::Hd,
        Catalogue::Hr,
        Catalogue::Hip,
        Catalogue::Bd,
        Catalogue::Flamsteed,
    ];

    /// Column name, which is also the accepted `catalogue` value.
    pub fn column(self) -> &'static str {
        match self {
            Catalogue::Messier => "messier",
            Catalogue::Ngc => "ngc",
            Catalogue::Ic => "ic",
            Catalogue::Hd => "hd",
            Catalogue::Hr => "hr",
            Catalogue::Hip => "hip",
            Catalogue::Bd => "bd",
            Catalogue::Flamsteed => "flamsteed",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.column().eq_ignore_ascii_case(text))
    }

    pub fn identifier(self, body: &Body) -> Option<&str> {
        let field = match self {
            Catalogue::Messier => &body.messier,
            Catalogue::Ngc => &body.ngc,
            Catalogue::Ic => &body.ic,
            Catalogue::Hd => &body.hd,
            Catalogue::Hr => &body.hr,
            Catalogue::Hip => &body.hip,
            Catalogue::Bd => &body.bd,
            Catalogue::Flamsteed => &body.flamsteed,
        };
        field.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Planar distance in degrees from (ra, dec) is below `radius`.
    WithinRadius { ra: f64, dec: f64, radius: f64 },
    NameMatches(NameToken),
    /// `constellation ILIKE pattern`
    ConstellationLike(String),
    /// `object_type ILIKE pattern`
    TypeLike(String),
    HasCatalogue(Catalogue),
    /// Altitude above [`MIN_ALTITUDE`] at the given local sidereal time.
    AboveHorizon { lst: f64, latitude: f64 },
    AnyOf(Vec<Predicate>),
}

impl Predicate {
    pub fn matches(&self, body: &Body) -> bool {
        match self {
            Predicate::WithinRadius { ra, dec, radius } => match (body.ra, body.dec) {
                (Some(body_ra), Some(body_dec)) => {
                    ((body_ra - ra).powi(2) + (body_dec - dec).powi(2)).sqrt() < *radius
                }
                _ => false,
            },
            Predicate::NameMatches(token) => match token.catalogue_number() {
                Some((catalogue, number)) => catalogue
                    .identifier(body)
                    .and_then(pattern::trailing_number)
                    == Some(number),
                None => {
                    let NameToken::Plain(text) = token else {
                        return false;
                    };
                    let like = pattern::contains_pattern(text);
                    pattern::ilike(&body.name, &like)
                        || body.iau.as_deref().is_some_and(|iau| pattern::ilike(iau, &like))
                }
            },
            Predicate::ConstellationLike(like) => body
                .constellation
                .as_deref()
                .is_some_and(|c| pattern::ilike(c, like)),
            Predicate::TypeLike(like) => body
                .object_type
                .as_deref()
                .is_some_and(|t| pattern::ilike(t, like)),
            Predicate::HasCatalogue(catalogue) => catalogue.identifier(body).is_some(),
            Predicate::AboveHorizon { lst, latitude } => match (body.ra, body.dec) {
                (Some(ra), Some(dec)) => astro::altitude(*lst, ra, dec, *latitude) > MIN_ALTITUDE,
                _ => false,
            },
            Predicate::AnyOf(predicates) => predicates.iter().any(|p| p.matches(body)),
        }
    }
}

/// Conjunction of predicates, in the order the stages added them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
}

pub type Stage = fn(FilterSet, &BodyQuery) -> FilterSet;

/// Filter stages in application order.
pub const STAGES: [Stage; 6] = [
    radial_search,
    name_search,
    constellation_search,
    type_search,
    catalogue_search,
    horizon_search,
];

impl FilterSet {
    pub fn from_query(query: &BodyQuery) -> Self {
        STAGES
            .iter()
            .fold(FilterSet::default(), |filters, stage| stage(filters, query))
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, body: &Body) -> bool {
        self.predicates.iter().all(|p| p.matches(body))
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn radial_search(filters: FilterSet, query: &BodyQuery) -> FilterSet {
    let (Some(ra), Some(dec)) = (finite(query.ra), finite(query.dec)) else {
        return filters;
    };
    let radius = finite(query.radius).unwrap_or(DEFAULT_RADIUS);

    filters.and(Predicate::WithinRadius { ra, dec, radius })
}

pub fn name_search(filters: FilterSet, query: &BodyQuery) -> FilterSet {
    match non_blank(&query.name) {
        Some(name) => filters.and(Predicate::NameMatches(NameToken::parse(name))),
        None => filters,
    }
}

pub fn constellation_search(filters: FilterSet, query: &BodyQuery) -> FilterSet {
    match non_blank(&query.constellation) {
        Some(constellation) => filters.and(Predicate::ConstellationLike(
            pattern::contains_pattern(constellation),
        )),
        None => filters,
    }
}

pub fn type_search(filters: FilterSet, query: &BodyQuery) -> FilterSet {
    match non_blank(&query.object_type) {
        Some(object_type) => filters.and(Predicate::TypeLike(pattern::user_pattern(object_type))),
        None => filters,
    }
}

/// `all` and unknown catalogue names leave the set unfiltered.
pub fn catalogue_search(filters: FilterSet, query: &BodyQuery) -> FilterSet {
    match non_blank(&query.catalogue).and_then(Catalogue::parse) {
        Some(catalogue) => filters.and(Predicate::HasCatalogue(catalogue)),
        None => filters,
    }
}

/// Point-in-time visibility for `datetime`, endpoint visibility for
/// `start`/`end`. Unparseable or half-given times skip their sub-filter.
pub fn horizon_search(filters: FilterSet, query: &BodyQuery) -> FilterSet {
    let (Some(latitude), Some(longitude)) = (finite(query.latitude), finite(query.longitude))
    else {
        return filters;
    };

    let above_at = |text: &str| {
        astro::parse_instant(text).map(|instant| Predicate::AboveHorizon {
            lst: astro::local_sidereal_time(instant, latitude, longitude),
            latitude,
        })
    };

    let mut filters = filters;

    if let Some(at) = query.datetime.as_deref().and_then(above_at) {
        filters = filters.and(at);
    }

    let start = query.start.as_deref().and_then(above_at);
    let end = query.end.as_deref().and_then(above_at);
    if let (Some(start), Some(end)) = (start, end) {
        filters = filters.and(Predicate::AnyOf(vec![start, end]));
    }

    filters
}
