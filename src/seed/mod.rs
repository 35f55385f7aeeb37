/// Catalogue seeding and flushing
use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::NewBody;
use crate::repo::BodyRepository;
use crate::utils::{n_pick, s_pick};

pub const MESSIER_FILE: &str = "objects/messier.json";
pub const STAR_FILES: [&str; 3] = [
    "stars/majorStars.json",
    "stars/minorStars.json",
    "stars/peripheralStars.json",
];

/// Normalised star records written by [`dump_stars`]
pub const DUMP_FILE: &str = "stars/stars.json";

/// Type recorded for single stars
pub const STAR_TYPE: &str = "*";

/// Map a star record (`bayer`, `apparentMagnitude`, `dm`, ...) to a body.
pub fn star_from_json(record: &Value) -> Option<NewBody> {
    Some(NewBody {
        name: s_pick(record, &["bayer", "iau", "name"])?,
        iau: s_pick(record, &["iau"]),
        ra: n_pick(record, &["ra"]),
        dec: n_pick(record, &["dec"]),
        constellation: s_pick(record, &["constellation"]),
        object_type: Some(STAR_TYPE.to_string()),
        apparent_magnitude: n_pick(record, &["apparentMagnitude"]),
        absolute_magnitude: n_pick(record, &["absoluteMagnitude"]),
        distance: n_pick(record, &["d"]),
        hd: s_pick(record, &["hd"]),
        hr: s_pick(record, &["hr"]),
        hip: s_pick(record, &["hip"]),
        bd: s_pick(record, &["dm"]),
        flamsteed: s_pick(record, &["flamsteed"]),
        simbad: s_pick(record, &["query"]),
        ..Default::default()
    })
}

/// Map a Messier record (`name`, `type`, `m`, `M`, ...) to a body.
pub fn messier_from_json(record: &Value) -> Option<NewBody> {
    Some(NewBody {
        name: s_pick(record, &["name", "iau", "messier"])?,
        iau: s_pick(record, &["iau"]),
        ra: n_pick(record, &["ra"]),
        dec: n_pick(record, &["dec"]),
        constellation: s_pick(record, &["constellation"]),
        object_type: s_pick(record, &["type"]),
        apparent_magnitude: n_pick(record, &["m"]),
        absolute_magnitude: n_pick(record, &["M"]),
        distance: n_pick(record, &["d"]),
        messier: s_pick(record, &["messier"]),
        ngc: s_pick(record, &["ngc"]),
        ic: s_pick(record, &["ic"]),
        simbad: s_pick(record, &["simbad"]),
        ..Default::default()
    })
}

/// Parse a JSON array of records, skipping the ones that cannot be mapped.
pub fn load_records(json: &str, map: fn(&Value) -> Option<NewBody>) -> anyhow::Result<Vec<NewBody>> {
    let records: Vec<Value> = serde_json::from_str(json).context("expected a JSON array")?;

    Ok(records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| {
            let body = map(record);
            if body.is_none() {
                warn!("Skipping record {} without a usable name", i);
            }
            body
        })
        .collect())
}

pub fn load_stars(json: &str) -> anyhow::Result<Vec<NewBody>> {
    load_records(json, star_from_json)
}

pub fn load_messier(json: &str) -> anyhow::Result<Vec<NewBody>> {
    load_records(json, messier_from_json)
}

async fn create_all(repo: &dyn BodyRepository, bodies: Vec<NewBody>) -> anyhow::Result<usize> {
    let mut written = 0;
    for body in bodies {
        let name = body.name.clone();
        repo.create(body)
            .await
            .with_context(|| format!("failed to store {name}"))?;
        written += 1;
    }
    Ok(written)
}

/// Load the Messier objects, then every star file present under `data_dir`.
pub async fn seed_catalogue(repo: &dyn BodyRepository, data_dir: &Path) -> anyhow::Result<usize> {
    info!("Seeding catalogue from {}", data_dir.display());

    let messier_path = data_dir.join(MESSIER_FILE);
    let json = tokio::fs::read_to_string(&messier_path)
        .await
        .with_context(|| format!("cannot read {}", messier_path.display()))?;
    let objects = create_all(repo, load_messier(&json)?).await?;
    info!("Populated catalogue w/{} objects", objects);

    let mut stars = 0;
    for file in STAR_FILES {
        let path = data_dir.join(file);
        if !path.exists() {
            continue;
        }
        let json = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;
        stars += create_all(repo, load_stars(&json)?).await?;
    }
    info!("Populated catalogue w/{} stars", stars);

    Ok(objects + stars)
}

/// Map every star file present under `data_dir` and write the result to
/// [`DUMP_FILE`] in the body wire format.
pub async fn dump_stars(data_dir: &Path) -> anyhow::Result<usize> {
    let mut stars = Vec::new();
    for file in STAR_FILES {
        let path = data_dir.join(file);
        if !path.exists() {
            continue;
        }
        let json = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;
        stars.extend(load_stars(&json)?);
    }

    let target = data_dir.join(DUMP_FILE);
    tokio::fs::write(&target, serde_json::to_vec(&stars)?)
        .await
        .with_context(|| format!("cannot write {}", target.display()))?;
    info!("Dumped {} stars to {}", stars.len(), target.display());

    Ok(stars.len())
}

/// Remove every body from the catalogue.
pub async fn flush(repo: &dyn BodyRepository) -> anyhow::Result<u64> {
    let removed = repo.delete_all().await?;
    info!("Flushed {} bodies", removed);
    Ok(removed)
}
