//! The compiled payload tree.
//!
//! Compilation mirrors the shape of the declarative payload: every mapping
//! and sequence becomes a container renderer, every string becomes a
//! template renderer and every other scalar becomes a native renderer.
//! Values the compiler does not recognize are kept verbatim as
//! pass-through slots.

use crate::error::{PathSegment, RenderError};
use crate::template::Template;
use payload_core::{RawValue, RenderContext, RenderedValue};
use std::collections::BTreeMap;

/// One position in the compiled tree.
#[derive(Debug, Clone)]
pub enum Slot {
    Compiled(Renderer),
    /// Copied into every render unchanged.
    Passthrough(RawValue),
}

impl Slot {
    /// Produce a fresh rendered value. Stops at the first failing template.
    pub fn render(&self, ctx: &RenderContext) -> Result<RenderedValue, RenderError> {
        match self {
            Self::Compiled(renderer) => renderer.render(ctx),
            Self::Passthrough(raw) => Ok(RenderedValue::from(raw.clone())),
        }
    }

    /// Number of template leaves below this slot.
    pub fn template_count(&self) -> usize {
        match self {
            Self::Compiled(renderer) => renderer.template_count(),
            Self::Passthrough(_) => 0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Renderer {
    Map(BTreeMap<String, Slot>),
    Sequence(Vec<Slot>),
    Template(TemplateRenderer),
    Native(NativeValue),
}

impl Renderer {
    pub fn render(&self, ctx: &RenderContext) -> Result<RenderedValue, RenderError> {
        match self {
            Self::Map(fields) => {
                let mut out = BTreeMap::new();
                for (key, slot) in fields {
                    let value = slot
                        .render(ctx)
                        .map_err(|e| e.within(PathSegment::Key(key.clone())))?;
                    out.insert(key.clone(), value);
                }
                Ok(RenderedValue::Mapping(out))
            }
            Self::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(index, slot)| {
                    slot.render(ctx)
                        .map_err(|e| e.within(PathSegment::Index(index)))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(RenderedValue::Sequence),
            Self::Template(template) => template.render(ctx),
            Self::Native(value) => Ok(value.render()),
        }
    }

    pub fn template_count(&self) -> usize {
        match self {
            Self::Map(fields) => fields.values().map(Slot::template_count).sum(),
            Self::Sequence(items) => items.iter().map(Slot::template_count).sum(),
            Self::Template(_) => 1,
            Self::Native(_) => 0,
        }
    }
}

/// A string leaf, rendered by executing its template.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    template: Template,
}

impl TemplateRenderer {
    pub fn new(template: Template) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn render(&self, ctx: &RenderContext) -> Result<RenderedValue, RenderError> {
        self.template
            .execute(ctx)
            .map(RenderedValue::String)
            .map_err(|source| RenderError::Template {
                path: Default::default(),
                source,
            })
    }
}

/// A non-string scalar leaf, reproduced as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl NativeValue {
    pub fn render(&self) -> RenderedValue {
        match *self {
            Self::Bool(b) => RenderedValue::Bool(b),
            Self::Int(i) => RenderedValue::Int(i),
            Self::Float(f) => RenderedValue::Float(f),
        }
    }
}
