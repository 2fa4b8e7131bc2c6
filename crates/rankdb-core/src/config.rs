//! Lightweight configuration loader, typed settings and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    /// Build a config from an in-memory TOML document (no files, no env).
    pub fn from_toml_str(toml: &str) -> Self {
        Self { figment: Figment::new().merge(Toml::string(toml)) }
    }

    /// Extract and validate the typed settings tree. Missing sections take defaults.
    pub fn settings(&self) -> crate::error::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FusionMode {
    #[default]
    Weighted,
    Rrf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RerankerKind {
    #[default]
    None,
    Penalty,
    Mmr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Dense weight in the weighted merge, clamped to [0, 1] by the retriever.
    pub alpha: f32,
    pub top_k: usize,
    /// Candidates fetched before reranking = `top_k * candidate_multiplier`.
    pub candidate_multiplier: usize,
    pub fusion: FusionMode,
    pub rrf_k: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { alpha: 0.5, top_k: 5, candidate_multiplier: 2, fusion: FusionMode::Weighted, rrf_k: 60.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankSettings {
    pub kind: RerankerKind,
    pub length_penalty: f32,
    pub mmr_lambda: f32,
}

impl Default for RerankSettings {
    fn default() -> Self { Self { kind: RerankerKind::None, length_penalty: 0.0, mmr_lambda: 0.5 } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionSettings {
    pub prf_top_docs: usize,
    pub prf_top_terms: usize,
}

impl Default for ExpansionSettings {
    fn default() -> Self { Self { prf_top_docs: 5, prf_top_terms: 5 } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SegmenterKind {
    #[default]
    Token,
    Sentence,
    Markdown,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentSettings {
    pub kind: SegmenterKind,
    /// Word window for `token` and `html`.
    pub max_tokens: usize,
    pub overlap: usize,
    /// Character budget per `sentence` fragment (raised to at least 64).
    pub max_chars: usize,
    pub min_sentences: usize,
    /// Word budget per `markdown` section fragment.
    pub max_section_tokens: usize,
}

impl Default for SegmentSettings {
    fn default() -> Self {
        Self { kind: SegmenterKind::Token, max_tokens: 200, overlap: 20, max_chars: 800, min_sentences: 1, max_section_tokens: 400 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedSettings {
    pub dim: usize,
    /// Hash seed of the bundled hashing embedder.
    pub seed: u64,
}

impl Default for EmbedSettings {
    fn default() -> Self { Self { dim: 256, seed: 0 } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub raw_txt_dir: String,
    pub snapshot_path: Option<String>,
}

impl Default for DataSettings {
    fn default() -> Self { Self { raw_txt_dir: "./data/txt".to_string(), snapshot_path: None } }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub retrieval: RetrievalSettings,
    pub rerank: RerankSettings,
    pub expansion: ExpansionSettings,
    pub segment: SegmentSettings,
    pub embed: EmbedSettings,
    pub data: DataSettings,
}

impl Settings {
    pub fn validate(&self) -> crate::error::Result<()> {
        let invalid = |msg: &str| Err(Error::InvalidConfig(msg.to_string()));
        if self.retrieval.top_k == 0 { return invalid("retrieval.top_k must be at least 1"); }
        if self.retrieval.candidate_multiplier == 0 { return invalid("retrieval.candidate_multiplier must be at least 1"); }
        if !self.retrieval.alpha.is_finite() { return invalid("retrieval.alpha must be finite"); }
        if !self.retrieval.rrf_k.is_finite() || self.retrieval.rrf_k < 0.0 { return invalid("retrieval.rrf_k must be a non-negative number"); }
        if !self.rerank.length_penalty.is_finite() { return invalid("rerank.length_penalty must be finite"); }
        if !self.rerank.mmr_lambda.is_finite() { return invalid("rerank.mmr_lambda must be finite"); }
        if self.segment.max_tokens == 0 { return invalid("segment.max_tokens must be at least 1"); }
        if self.segment.overlap >= self.segment.max_tokens { return invalid("segment.overlap must be smaller than segment.max_tokens"); }
        if self.segment.max_section_tokens == 0 { return invalid("segment.max_section_tokens must be at least 1"); }
        if self.embed.dim == 0 { return invalid("embed.dim must be at least 1"); }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
