//! Runner configuration

use serde::{Deserialize, Serialize};

use crate::{Result, ScratchpadError};

/// Text reported as the output of a successful run that printed nothing.
pub const NO_OUTPUT_PLACEHOLDER: &str = "(출력 없음)";

/// Per-loop iteration bound applied by [`RunnerConfig::default`].
pub const DEFAULT_LOOP_ITERATION_LIMIT: u64 = 1_000_000_000;

/// Call-depth bound applied by [`RunnerConfig::default`], close to what a
/// browser allows.
pub const DEFAULT_RECURSION_LIMIT: usize = 10_000;

/// VM value-stack bound applied by [`RunnerConfig::default`]. Sized so the
/// recursion bound is reached first for ordinary functions.
pub const DEFAULT_STACK_SIZE_LIMIT: usize = 1 << 20;

/// Configuration for one runner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunnerConfig {
    /// Rewrite stdin idioms before executing
    pub preprocess: bool,

    /// Maximum iterations of any single loop, `None` for no bound
    pub loop_iteration_limit: Option<u64>,

    /// Maximum call depth, `None` for no bound
    pub recursion_limit: Option<usize>,

    /// Maximum VM value-stack size, `None` for no bound
    pub stack_size_limit: Option<usize>,

    /// Output reported when a successful run captured nothing
    pub empty_output_placeholder: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            preprocess: true,
            loop_iteration_limit: Some(DEFAULT_LOOP_ITERATION_LIMIT),
            recursion_limit: Some(DEFAULT_RECURSION_LIMIT),
            stack_size_limit: Some(DEFAULT_STACK_SIZE_LIMIT),
            empty_output_placeholder: NO_OUTPUT_PLACEHOLDER.to_string(),
        }
    }
}

impl RunnerConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> RunnerConfigBuilder {
        RunnerConfigBuilder::default()
    }

    /// A config without any engine bounds. A non-terminating script blocks
    /// the caller forever.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            loop_iteration_limit: None,
            recursion_limit: None,
            stack_size_limit: None,
            ..Self::default()
        }
    }

    /// Default config with bounds overridden from the environment
    ///
    /// Reads `SCRATCHPAD_LOOP_LIMIT`, `SCRATCHPAD_RECURSION_LIMIT` and
    /// `SCRATCHPAD_STACK_LIMIT`. `0` or `none` disables the bound.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(LOOP_LIMIT_VAR) {
            config.loop_iteration_limit = parse_limit(LOOP_LIMIT_VAR, &raw)?;
        }
        if let Some(raw) = lookup(RECURSION_LIMIT_VAR) {
            config.recursion_limit = parse_limit(RECURSION_LIMIT_VAR, &raw)?;
        }
        if let Some(raw) = lookup(STACK_LIMIT_VAR) {
            config.stack_size_limit = parse_limit(STACK_LIMIT_VAR, &raw)?;
        }

        Ok(config)
    }
}

const LOOP_LIMIT_VAR: &str = "SCRATCHPAD_LOOP_LIMIT";
const RECURSION_LIMIT_VAR: &str = "SCRATCHPAD_RECURSION_LIMIT";
const STACK_LIMIT_VAR: &str = "SCRATCHPAD_STACK_LIMIT";

fn parse_limit<T>(var: &str, raw: &str) -> Result<Option<T>>
where
    T: std::str::FromStr + PartialEq + Default,
{
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    let value: T = raw
        .parse()
        .map_err(|_| ScratchpadError::Config(format!("{var} must be a number, got {raw:?}")))?;

    if value == T::default() {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}

/// Builder for RunnerConfig
#[derive(Debug, Default)]
pub struct RunnerConfigBuilder {
    config: RunnerConfig,
}

impl RunnerConfigBuilder {
    /// Start from an existing config instead of the default
    #[must_use]
    pub fn from_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn preprocess(mut self, enabled: bool) -> Self {
        self.config.preprocess = enabled;
        self
    }

    #[must_use]
    pub fn loop_iteration_limit(mut self, limit: Option<u64>) -> Self {
        self.config.loop_iteration_limit = limit;
        self
    }

    #[must_use]
    pub fn recursion_limit(mut self, limit: Option<usize>) -> Self {
        self.config.recursion_limit = limit;
        self
    }

    #[must_use]
    pub fn stack_size_limit(mut self, limit: Option<usize>) -> Self {
        self.config.stack_size_limit = limit;
        self
    }

    #[must_use]
    pub fn empty_output_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.empty_output_placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn build(self) -> RunnerConfig {
        self.config
    }
}
