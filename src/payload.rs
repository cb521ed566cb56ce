//! Compile-once, render-many payload generation.

use crate::config::PayloadConfig;
use anyhow::Context;
use payload_core::{RawValue, RenderContext, RenderedValue};
use payload_generator::{builtin_registry, Profile, RandomSource};
use payload_template::{compile_with, CompileError, CompileOptions, RenderError, Slot};
use std::iter::FusedIterator;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

/// Generates request payloads from one compiled payload tree.
///
/// Cloning is cheap and clones share the same random source. Use
/// [`fork`](Self::fork) to give a worker its own source instead.
#[derive(Debug, Clone)]
pub struct PayloadFactory {
    raw: Arc<RawValue>,
    options: CompileOptions,
    profile: Profile,
    source: Arc<RandomSource>,
    slot: Arc<Slot>,
}

impl PayloadFactory {
    /// Compile the payload of `config`. Fails on the first invalid template.
    pub fn new(config: &PayloadConfig) -> Result<Self, CompileError> {
        let source = match config.seed {
            Some(seed) => RandomSource::from_seed(seed),
            None => RandomSource::from_time(),
        };
        Self::with_source(config, Arc::new(source))
    }

    /// Compile the payload of `config` against an existing random source.
    /// The `seed` of `config` is ignored.
    pub fn with_source(
        config: &PayloadConfig,
        source: Arc<RandomSource>,
    ) -> Result<Self, CompileError> {
        Self::build(
            Arc::new(config.payload.clone()),
            config.compile_options(),
            config.profile,
            source,
        )
    }

    /// Load a configuration file and compile its payload.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config = PayloadConfig::from_file(path)
            .with_context(|| format!("Failed to load payload config {}", path.display()))?;
        Self::new(&config)
            .with_context(|| format!("Failed to compile payload from {}", path.display()))
    }

    fn build(
        raw: Arc<RawValue>,
        options: CompileOptions,
        profile: Profile,
        source: Arc<RandomSource>,
    ) -> Result<Self, CompileError> {
        let registry = builtin_registry(Arc::clone(&source), profile);
        let slot = compile_with(&raw, &registry, &options)?;
        debug!(
            templates = slot.template_count(),
            profile = %profile,
            seed = ?source.seed(),
            "Compiled payload"
        );
        Ok(Self {
            raw,
            options,
            profile,
            source,
            slot: Arc::new(slot),
        })
    }

    /// A factory for the same payload drawing from an independently seeded
    /// child of this factory's random source.
    pub fn fork(&self) -> Result<Self, CompileError> {
        Self::build(
            Arc::clone(&self.raw),
            self.options,
            self.profile,
            Arc::new(self.source.fork()),
        )
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Seed of the random source, if it was created from one.
    pub fn seed(&self) -> Option<u64> {
        self.source.seed()
    }

    /// Number of template leaves in the compiled payload.
    pub fn template_count(&self) -> usize {
        self.slot.template_count()
    }

    /// Render one payload.
    pub fn generate(&self, ctx: &RenderContext) -> Result<RenderedValue, RenderError> {
        let payload = self.slot.render(ctx)?;
        trace!(payload = ?payload, "Generated payload");
        Ok(payload)
    }

    /// Render one payload as a JSON value.
    pub fn generate_json(&self, ctx: &RenderContext) -> Result<serde_json::Value, RenderError> {
        self.generate(ctx).map(serde_json::Value::from)
    }

    /// Render one payload as a serialized JSON request body.
    pub fn generate_body(&self, ctx: &RenderContext) -> Result<Vec<u8>, RenderError> {
        self.generate_json(ctx)
            .map(|value| value.to_string().into_bytes())
    }

    /// Lazily render `count` payloads.
    pub fn payloads<'a>(&'a self, ctx: &'a RenderContext, count: usize) -> Payloads<'a> {
        Payloads {
            factory: self,
            ctx,
            remaining: count,
        }
    }
}

/// Iterator returned by [`PayloadFactory::payloads`].
#[derive(Debug)]
pub struct Payloads<'a> {
    factory: &'a PayloadFactory,
    ctx: &'a RenderContext,
    remaining: usize,
}

impl Iterator for Payloads<'_> {
    type Item = Result<RenderedValue, RenderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.factory.generate(self.ctx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Payloads<'_> {}

impl FusedIterator for Payloads<'_> {}
