//! Index definition types.
//!
//! An index is created once with a fixed dimension, graph parameters, a
//! distance metric and a quantization type. The store owns the persisted
//! state; these types only describe what to ask for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::arg::{Arg, ExtraArgs};
use crate::error::ConfigError;

/// Default graph fan-out (`m`).
pub const DEFAULT_M: usize = 10;

/// Default construction search width (`efcon`).
pub const DEFAULT_EFCON: usize = 128;

/// Distance metric used to rank vectors during search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Euclidean distance
    #[serde(rename = "L2", alias = "EUCLIDEAN")]
    L2,
    /// Inner product
    #[default]
    #[serde(rename = "IP")]
    InnerProduct,
    #[serde(rename = "JACCARD")]
    Jaccard,
    #[serde(rename = "COS")]
    Cosine,
    /// Squared Euclidean distance
    #[serde(rename = "L2SQ")]
    L2Sq,
    #[serde(rename = "PEARSON")]
    Pearson,
    #[serde(rename = "HAVERSINE")]
    Haversine,
    #[serde(rename = "HAMMING")]
    Hamming,
    #[serde(rename = "TANIMOTO")]
    Tanimoto,
    #[serde(rename = "SORENSEN")]
    Sorensen,
}

impl DistanceMetric {
    /// Alias kept for callers that think in terms of Euclidean distance.
    pub const EUCLIDEAN: DistanceMetric = DistanceMetric::L2;

    pub const ALL: [DistanceMetric; 10] = [
        DistanceMetric::L2,
        DistanceMetric::InnerProduct,
        DistanceMetric::Jaccard,
        DistanceMetric::Cosine,
        DistanceMetric::L2Sq,
        DistanceMetric::Pearson,
        DistanceMetric::Haversine,
        DistanceMetric::Hamming,
        DistanceMetric::Tanimoto,
        DistanceMetric::Sorensen,
    ];

    /// Wire value sent in `USEARCH.INDEX.CREATE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::L2 => "L2",
            DistanceMetric::InnerProduct => "IP",
            DistanceMetric::Jaccard => "JACCARD",
            DistanceMetric::Cosine => "COS",
            DistanceMetric::L2Sq => "L2SQ",
            DistanceMetric::Pearson => "PEARSON",
            DistanceMetric::Haversine => "HAVERSINE",
            DistanceMetric::Hamming => "HAMMING",
            DistanceMetric::Tanimoto => "TANIMOTO",
            DistanceMetric::Sorensen => "SORENSEN",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = ConfigError;

    /// Accepts wire names in any case plus the long aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let metric = match upper.as_str() {
            "L2" | "EUCLIDEAN" => DistanceMetric::L2,
            "IP" | "INNER_PRODUCT" | "INNERPRODUCT" => DistanceMetric::InnerProduct,
            "JACCARD" => DistanceMetric::Jaccard,
            "COS" | "COSINE" => DistanceMetric::Cosine,
            "L2SQ" => DistanceMetric::L2Sq,
            "PEARSON" => DistanceMetric::Pearson,
            "HAVERSINE" => DistanceMetric::Haversine,
            "HAMMING" => DistanceMetric::Hamming,
            "TANIMOTO" => DistanceMetric::Tanimoto,
            "SORENSEN" => DistanceMetric::Sorensen,
            _ => {
                return Err(ConfigError::InvalidInput(format!(
                    "unknown distance metric: {}",
                    s
                )))
            }
        };
        Ok(metric)
    }
}

impl From<DistanceMetric> for Arg {
    fn from(value: DistanceMetric) -> Self {
        Arg::Str(value.as_str().to_string())
    }
}

/// On-disk precision of stored vector components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Quantization {
    F64,
    #[default]
    F32,
    F16,
    I8,
    /// One bit per component; vectors must be binary
    B1,
}

impl Quantization {
    pub const ALL: [Quantization; 5] = [
        Quantization::F64,
        Quantization::F32,
        Quantization::F16,
        Quantization::I8,
        Quantization::B1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quantization::F64 => "F64",
            Quantization::F32 => "F32",
            Quantization::F16 => "F16",
            Quantization::I8 => "I8",
            Quantization::B1 => "B1",
        }
    }

    /// Whether vectors for this quantization use the binary `0`/`1` literal.
    pub fn is_binary(&self) -> bool {
        matches!(self, Quantization::B1)
    }
}

impl fmt::Display for Quantization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quantization {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantization::ALL
            .into_iter()
            .find(|q| q.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::InvalidInput(format!("unknown quantization: {}", s)))
    }
}

impl From<Quantization> for Arg {
    fn from(value: Quantization) -> Self {
        Arg::Str(value.as_str().to_string())
    }
}

/// Everything needed to create an index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSpec {
    /// Index name, unique within the store
    pub name: String,
    /// Vector dimensionality, fixed at creation
    pub dim: usize,
    /// Graph fan-out factor
    pub m: usize,
    /// Construction search width
    pub efcon: usize,
    pub metric: DistanceMetric,
    pub quantization: Quantization,
    /// Options passed through verbatim after the fixed parameters
    pub extra: ExtraArgs,
}

impl IndexSpec {
    /// Index description with default graph parameters, `IP` metric and `F32` quantization.
    pub fn new(name: impl Into<String>, dim: usize) -> Self {
        Self {
            name: name.into(),
            dim,
            m: DEFAULT_M,
            efcon: DEFAULT_EFCON,
            metric: DistanceMetric::default(),
            quantization: Quantization::default(),
            extra: ExtraArgs::new(),
        }
    }

    pub fn with_m(mut self, m: usize) -> Self {
        self.m = m;
        self
    }

    pub fn with_efcon(mut self, efcon: usize) -> Self {
        self.efcon = efcon;
        self
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_quantization(mut self, quantization: Quantization) -> Self {
        self.quantization = quantization;
        self
    }

    /// Append one extra option.
    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<Arg>) -> Self {
        self.extra.push(name, value);
        self
    }

    /// Replace all extra options.
    pub fn with_extras(mut self, extra: ExtraArgs) -> Self {
        self.extra = extra;
        self
    }

    /// Whether vectors for this index are encoded in binary form.
    pub fn is_binary(&self) -> bool {
        self.quantization.is_binary()
    }
}
