//! Shared test fixtures: keyframe curves and tool configurations stored as
//! JSON under `fixtures/` and indexed by `fixtures/manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    curves: HashMap<String, String>,
    configs: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Tangent as a host reports it: flat fields, type names as strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FixtureTangent {
    pub in_angle: f64,
    pub out_angle: f64,
    pub in_weight: f64,
    pub out_weight: f64,
    pub in_type: String,
    pub out_type: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FixtureKey {
    pub time: f64,
    pub value: f64,
    #[serde(default)]
    pub tangent: Option<FixtureTangent>,
}

/// One animated channel on one object, with an optional key selection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurveFixture {
    pub object: String,
    pub attribute: String,
    pub keys: Vec<FixtureKey>,
    #[serde(default)]
    pub selected: Vec<usize>,
}

pub mod curves {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.curves.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.curves, "curve", name)?;
        read_to_string(rel)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.curves, "curve", name)?;
        super::load_json(rel)
    }

    /// Typed curve fixture.
    pub fn fixture(name: &str) -> Result<CurveFixture> {
        load(name)
    }
}

pub mod configs {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.configs.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.configs, "config", name)?;
        read_to_string(rel)
    }
}
