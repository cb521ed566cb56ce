//! Compile a declarative payload into a renderer tree.

use crate::error::{CompileError, FieldPath, PathSegment};
use crate::renderer::{NativeValue, Renderer, Slot, TemplateRenderer};
use crate::template::{MissingVariable, Template};
use payload_core::{FunctionRegistry, RawValue};

/// Knobs applied to every template in a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub missing_variable: MissingVariable,
}

/// Compile `raw` with the default options.
pub fn compile(raw: &RawValue, registry: &FunctionRegistry) -> Result<Slot, CompileError> {
    compile_with(raw, registry, &CompileOptions::default())
}

/// Compile `raw`, resolving every function name against `registry`.
///
/// The first invalid template aborts compilation; the error names the
/// field it was found in.
pub fn compile_with(
    raw: &RawValue,
    registry: &FunctionRegistry,
    options: &CompileOptions,
) -> Result<Slot, CompileError> {
    let renderer = match raw {
        RawValue::Mapping(fields) => Renderer::Map(
            fields
                .iter()
                .map(|(key, value)| {
                    compile_with(value, registry, options)
                        .map(|slot| (key.clone(), slot))
                        .map_err(|e| e.within(PathSegment::Key(key.clone())))
                })
                .collect::<Result<_, _>>()?,
        ),
        RawValue::Sequence(items) => Renderer::Sequence(
            items
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    compile_with(value, registry, options)
                        .map_err(|e| e.within(PathSegment::Index(index)))
                })
                .collect::<Result<_, _>>()?,
        ),
        RawValue::String(source) => {
            let template = Template::parse_with(source, registry, options.missing_variable)
                .map_err(|source| CompileError::Template {
                    path: FieldPath::root(),
                    source,
                })?;
            Renderer::Template(TemplateRenderer::new(template))
        }
        RawValue::Bool(b) => Renderer::Native(NativeValue::Bool(*b)),
        RawValue::Int(i) => Renderer::Native(NativeValue::Int(*i)),
        RawValue::Float(f) => Renderer::Native(NativeValue::Float(*f)),
        RawValue::Null => return Ok(Slot::Passthrough(RawValue::Null)),
    };
    Ok(Slot::Compiled(renderer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use payload_core::{RenderContext, RenderedValue, TemplateValue};

    fn registry() -> FunctionRegistry {
        let mut registry = FunctionRegistry::new();
        registry.register("kupo", 0, |_| Ok(TemplateValue::from("kupo")));
        registry
    }

    fn raw(yaml: &str) -> RawValue {
        RawValue::from_yaml(&serde_yaml::from_str(yaml).unwrap()).unwrap()
    }

    #[test]
    fn test_compile_mirrors_shape() {
        let slot = compile(
            &raw("name: '{{ kupo }}'\ncount: 3\nratio: 0.5\nflag: true\nnothing: null\nlist: [a, 1]"),
            &registry(),
        )
        .unwrap();
        let Slot::Compiled(Renderer::Map(fields)) = &slot else {
            panic!("Expected Map");
        };
        assert!(matches!(fields["name"], Slot::Compiled(Renderer::Template(_))));
        assert!(matches!(fields["count"], Slot::Compiled(Renderer::Native(NativeValue::Int(3)))));
        assert!(matches!(fields["flag"], Slot::Compiled(Renderer::Native(NativeValue::Bool(true)))));
        assert!(matches!(fields["nothing"], Slot::Passthrough(RawValue::Null)));
        assert!(matches!(fields["list"], Slot::Compiled(Renderer::Sequence(_))));
        assert_eq!(slot.template_count(), 2);
    }

    #[test]
    fn test_compile_then_render() {
        let slot = compile(&raw("a: ['x-{{ kupo }}', 2.5, null]"), &registry()).unwrap();
        let out = slot.render(&RenderContext::new()).unwrap();
        assert_eq!(
            out.get("a").and_then(RenderedValue::as_sequence).unwrap(),
            &[
                RenderedValue::String("x-kupo".to_string()),
                RenderedValue::Float(2.5),
                RenderedValue::Null,
            ]
        );
    }

    #[test]
    fn test_empty_containers() {
        let slot = compile(&raw("{}"), &registry()).unwrap();
        assert_eq!(slot.template_count(), 0);
        assert_eq!(
            slot.render(&RenderContext::new()).unwrap(),
            RenderedValue::Mapping(Default::default())
        );

        let slot = compile(&RawValue::Sequence(Vec::new()), &registry()).unwrap();
        assert_eq!(
            slot.render(&RenderContext::new()).unwrap(),
            RenderedValue::Sequence(Vec::new())
        );
    }

    #[test]
    fn test_invalid_template_reports_path() {
        let err = compile(&raw("tx:\n  outputs:\n    - ok\n    - '{{ nope }}'"), &registry())
            .unwrap_err();
        assert_eq!(err.path().to_string(), "$.tx.outputs[1]");
        assert!(err.to_string().contains("function \"nope\" not defined"), "{err}");
    }

    #[test]
    fn test_top_level_string_is_a_template() {
        let slot = compile(&RawValue::from("{{ kupo }}!"), &registry()).unwrap();
        assert_eq!(
            slot.render(&RenderContext::new()).unwrap(),
            RenderedValue::String("kupo!".to_string())
        );
    }

    #[test]
    fn test_options_apply_to_every_template() {
        let options = CompileOptions {
            missing_variable: MissingVariable::Empty,
        };
        let slot = compile_with(&raw("a: '[{{ .x }}]'"), &registry(), &options).unwrap();
        let out = slot.render(&RenderContext::new()).unwrap();
        assert_eq!(out.get("a").and_then(RenderedValue::as_str), Some("[]"));

        let strict = compile(&raw("a: '[{{ .x }}]'"), &registry()).unwrap();
        let err = strict.render(&RenderContext::new()).unwrap_err();
        assert_eq!(err.path().to_string(), "$.a");
    }
}
