//! Central configuration for insider-lateral runs.
//!
//! Values come from [`LateralConfig::default`], optionally overridden by a
//! TOML file, then by command-line flags or `LATERAL_*` environment variables.

use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use types::MetricType;

/// Which similarity metric builds the distance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// EWMA correlation of close returns, decayed with `span`.
    #[default]
    Ewma,
    /// Maximum canonical correlation of high/low/close returns.
    Canonical,
}

/// Master configuration for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LateralConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Distances
    // ─────────────────────────────────────────────────────────────────────────
    /// Decay span of the pairwise EWMA metric.
    pub span: u32,
    /// Decay span of the panel correlation matrix.
    pub panel_span: u32,
    /// Similarity metric used for neighborhoods.
    pub metric: MetricKind,
    /// Keep pairwise evaluation on one thread.
    pub force_sequential: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Neighborhoods and screening
    // ─────────────────────────────────────────────────────────────────────────
    /// Neighbors per target ticker.
    pub neighbors: usize,
    /// Days added to the latest first-available date of the universe.
    pub start_date_pad_days: u64,
    /// Sessions after the event included in an event window.
    pub days_fwd: usize,
}

impl Default for LateralConfig {
    fn default() -> Self {
        Self {
            span: MetricType::DEFAULT_SPAN,
            panel_span: 20,
            metric: MetricKind::Ewma,
            force_sequential: false,

            neighbors: 4,
            start_date_pad_days: 30,
            days_fwd: 10,
        }
    }
}

impl LateralConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Metric with its span resolved.
    pub fn metric_type(&self) -> MetricType {
        match self.metric {
            MetricKind::Ewma => MetricType::Ewma { span: self.span },
            MetricKind::Canonical => MetricType::Canonical,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder-style setters for fluent configuration
    // ─────────────────────────────────────────────────────────────────────────

    pub fn span(mut self, span: u32) -> Self {
        self.span = span;
        self
    }

    pub fn panel_span(mut self, span: u32) -> Self {
        self.panel_span = span;
        self
    }

    pub fn metric(mut self, metric: MetricKind) -> Self {
        self.metric = metric;
        self
    }

    pub fn force_sequential(mut self, force: bool) -> Self {
        self.force_sequential = force;
        self
    }

    pub fn neighbors(mut self, k: usize) -> Self {
        self.neighbors = k;
        self
    }

    pub fn start_date_pad_days(mut self, days: u64) -> Self {
        self.start_date_pad_days = days;
        self
    }

    pub fn days_fwd(mut self, days: usize) -> Self {
        self.days_fwd = days;
        self
    }
}
