use log::{debug, info, trace};

use crate::error::{GenerateError, Result, UNNAMED};
use crate::models::{MethodDescriptor, Parameter};
use crate::return_type::{ReturnKind, VoidDetection};

pub mod c;
pub mod class;
pub mod interface;
pub mod text;

/// Highest parameter count generated code consumers are built to accept.
pub const MAX_ARITY: usize = 16;

/// `"T0 n0, T1 n1, ..."`, in declaration order.
pub fn expand_signature(params: &[Parameter]) -> String {
    join_params(params, |p| format!("{} {}", p.ty, p.name))
}

/// `"n0, n1, ..."`, in declaration order.
pub fn expand_names(params: &[Parameter]) -> String {
    join_params(params, |p| p.name.clone())
}

fn join_params<F>(params: &[Parameter], render: F) -> String
where
    F: Fn(&Parameter) -> String,
{
    params.iter()
        .map(render)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Glue between an implicit leading receiver and the expanded parameters.
pub fn separator(param_count: usize) -> &'static str {
    if param_count > 0 {
        ","
    } else {
        ""
    }
}

/// Values computed from one descriptor right before its template runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedFields {
    pub return_kind: ReturnKind,
    pub separator: &'static str,
    pub signature: String,
    pub names: String,
}

impl DerivedFields {
    pub fn derive(method: &MethodDescriptor, void_detection: &VoidDetection) -> Self {
        Self {
            return_kind: void_detection.classify(&method.return_type),
            separator: separator(method.arity()),
            signature: expand_signature(&method.params),
            names: expand_names(&method.params),
        }
    }

    pub fn return_statement(&self) -> &'static str {
        self.return_kind.return_statement()
    }
}

/// Everything a template gets to see for one method.
///
/// The six text fields are the whole contract; `method` is there for templates
/// that need the parameters one by one.
#[derive(Clone, Copy, Debug)]
pub struct TemplateCall<'a> {
    pub return_statement: &'a str,
    pub return_type: &'a str,
    pub name: &'a str,
    pub separator: &'a str,
    pub signature: &'a str,
    pub names: &'a str,
    pub method: &'a MethodDescriptor,
}

impl<'a> TemplateCall<'a> {
    pub fn is_void(&self) -> bool {
        self.return_statement.is_empty()
    }
}

pub trait GenerationTemplate {
    fn render(&self, call: &TemplateCall<'_>) -> anyhow::Result<String>;
}

impl<F> GenerationTemplate for F
where
    F: Fn(&TemplateCall<'_>) -> String,
{
    fn render(&self, call: &TemplateCall<'_>) -> anyhow::Result<String> {
        Ok(self(call))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// `None` lifts the limit.
    pub max_arity: Option<usize>,
    pub void_detection: VoidDetection,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            max_arity: Some(MAX_ARITY),
            void_detection: VoidDetection::Literal,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Generator {
    options: GeneratorOptions,
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Runs `template` once per method and concatenates the results in list order.
    pub fn generate<T>(&self, methods: &[MethodDescriptor], template: &T) -> Result<String>
    where
        T: GenerationTemplate + ?Sized,
    {
        info!("Generating {} methods", methods.len());
        debug!("Void detection: {}", self.options.void_detection.describe());

        let mut out = String::new();
        for (index, method) in methods.iter().enumerate() {
            self.validate(index, method)?;

            let fields = DerivedFields::derive(method, &self.options.void_detection);
            trace!("{}: {:?}", method.name, fields);

            let call = TemplateCall {
                return_statement: fields.return_statement(),
                return_type: &method.return_type,
                name: &method.name,
                separator: fields.separator,
                signature: &fields.signature,
                names: &fields.names,
                method,
            };
            let unit = template.render(&call)
                .map_err(|source| GenerateError::Template {
                    method: method.name.clone(),
                    source,
                })?;
            out.push_str(&unit);
        }

        Ok(out)
    }

    fn validate(&self, index: usize, method: &MethodDescriptor) -> Result<()> {
        let malformed = |reason: String| GenerateError::MalformedDescriptor {
            index,
            method: if method.name.trim().is_empty() { UNNAMED.to_string() } else { method.name.clone() },
            reason,
        };

        if method.name.trim().is_empty() {
            return Err(malformed("missing method name".to_string()));
        }
        if method.return_type.trim().is_empty() {
            return Err(malformed("missing return type".to_string()));
        }
        for (i, param) in method.params.iter().enumerate() {
            if param.ty.trim().is_empty() {
                return Err(malformed(format!("parameter {} has no type", i)));
            }
            if param.name.trim().is_empty() {
                return Err(malformed(format!("parameter {} has no name", i)));
            }
        }

        if let Some(max) = self.options.max_arity {
            if method.arity() > max {
                return Err(GenerateError::ArityExceeded {
                    method: method.name.clone(),
                    count: method.arity(),
                    max,
                });
            }
        }

        Ok(())
    }
}

/// [`Generator::generate`] with the default options: literal void detection and
/// a limit of [`MAX_ARITY`] parameters.
pub fn generate<T>(methods: &[MethodDescriptor], template: &T) -> Result<String>
where
    T: GenerationTemplate + ?Sized,
{
    Generator::default().generate(methods, template)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(n: usize) -> Vec<Parameter> {
        (0..n).map(|i| Parameter::new(format!("T{}", i), format!("n{}", i))).collect()
    }

    fn method_with_arity(name: &str, n: usize) -> MethodDescriptor {
        MethodDescriptor {
            name: name.to_string(),
            return_type: "int".to_string(),
            params: params(n),
        }
    }

    fn fields_template(call: &TemplateCall<'_>) -> String {
        format!(
            "[{}|{}|{}|{}|{}|{}]",
            call.return_statement, call.return_type, call.name, call.separator, call.signature, call.names
        )
    }

    #[test]
    fn expansions_have_one_entry_per_parameter() {
        for n in 0..=MAX_ARITY {
            let params = params(n);
            let signature = expand_signature(&params);
            let names = expand_names(&params);

            if n == 0 {
                assert_eq!(signature, "");
                assert_eq!(names, "");
                continue;
            }

            let sig_entries = signature.split(", ").collect::<Vec<_>>();
            let name_entries = names.split(", ").collect::<Vec<_>>();
            assert_eq!(sig_entries.len(), n);
            assert_eq!(name_entries.len(), n);
            for i in 0..n {
                assert_eq!(sig_entries[i], format!("T{} n{}", i, i));
                assert_eq!(name_entries[i], format!("n{}", i));
            }
        }
    }

    #[test]
    fn expansions_keep_declaration_order() {
        let forward = vec![Parameter::new("int", "a"), Parameter::new("char *", "b")];
        let reversed = forward.iter().rev().cloned().collect::<Vec<_>>();

        assert_eq!(expand_signature(&forward), "int a, char * b");
        assert_eq!(expand_signature(&reversed), "char * b, int a");
        assert_eq!(expand_names(&forward), "a, b");
        assert_eq!(expand_names(&reversed), "b, a");
    }

    #[test]
    fn expansions_do_not_deduplicate() {
        let params = vec![Parameter::new("int", "x"), Parameter::new("int", "x")];
        assert_eq!(expand_signature(&params), "int x, int x");
        assert_eq!(expand_names(&params), "x, x");
    }

    #[test]
    fn separator_only_for_parameters() {
        assert_eq!(separator(0), "");
        for n in 1..=20 {
            assert_eq!(separator(n), ",");
        }
    }

    #[test]
    fn foo_and_bar_end_to_end() {
        let methods = vec![
            MethodDescriptor::new("foo", "int").param("int", "i"),
            MethodDescriptor::new("bar", "void"),
        ];

        let out = generate(&methods, &fields_template).unwrap();
        assert_eq!(out, "[return|int|foo|,|int i|i][|void|bar|||]");
    }

    #[test]
    fn derived_fields_for_foo() {
        let foo = MethodDescriptor::new("foo", "int").param("int", "i");
        let fields = DerivedFields::derive(&foo, &VoidDetection::Literal);
        assert_eq!(fields.return_statement(), "return");
        assert_eq!(fields.separator, ",");
        assert_eq!(fields.signature, "int i");
        assert_eq!(fields.names, "i");
    }

    #[test]
    fn generation_is_deterministic() {
        let methods = vec![
            method_with_arity("a", 3),
            MethodDescriptor::new("b", "void").param("float", "f"),
        ];
        let first = generate(&methods, &fields_template).unwrap();
        let second = generate(&methods, &fields_template).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn output_follows_method_order() {
        let a = MethodDescriptor::new("a", "int");
        let b = MethodDescriptor::new("b", "void");
        let name_only = |call: &TemplateCall<'_>| format!("{};", call.name);

        assert_eq!(generate(&[a.clone(), b.clone()], &name_only).unwrap(), "a;b;");
        assert_eq!(generate(&[b, a], &name_only).unwrap(), "b;a;");
    }

    #[test]
    fn empty_method_list_yields_empty_output() {
        assert_eq!(generate(&[], &fields_template).unwrap(), "");
    }

    #[test]
    fn sixteen_parameters_succeed() {
        let out = generate(&[method_with_arity("wide", 16)], &fields_template).unwrap();
        assert!(out.contains("T15 n15"));
    }

    #[test]
    fn seventeen_parameters_fail() {
        let methods = vec![method_with_arity("ok", 1), method_with_arity("too_wide", 17)];
        let err = generate(&methods, &fields_template).unwrap_err();

        match &err {
            GenerateError::ArityExceeded { method, count, max } => {
                assert_eq!(method, "too_wide");
                assert_eq!(*count, 17);
                assert_eq!(*max, 16);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(err.to_string().contains("too_wide"));
    }

    #[test]
    fn arity_limit_can_be_lifted() {
        let generator = Generator::new(GeneratorOptions {
            max_arity: None,
            ..GeneratorOptions::default()
        });
        let out = generator.generate(&[method_with_arity("huge", 40)], &fields_template).unwrap();
        assert!(out.contains("n39"));
    }

    #[test]
    fn missing_name_is_malformed() {
        let methods = vec![MethodDescriptor::new("ok", "int"), MethodDescriptor::new("", "int")];
        let err = generate(&methods, &fields_template).unwrap_err();

        match err {
            GenerateError::MalformedDescriptor { index, method, reason } => {
                assert_eq!(index, 1);
                assert_eq!(method, UNNAMED);
                assert_eq!(reason, "missing method name");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn missing_return_type_is_malformed() {
        let err = generate(&[MethodDescriptor::new("foo", " ")], &fields_template).unwrap_err();
        assert_eq!(err.method(), "foo");
        assert!(err.to_string().contains("missing return type"));
    }

    #[test]
    fn empty_parameter_is_malformed() {
        let method = MethodDescriptor::new("foo", "int").param("int", "a").param("", "b");
        let err = generate(&[method], &fields_template).unwrap_err();
        assert!(err.to_string().contains("parameter 1 has no type"));
    }

    #[test]
    fn template_errors_name_the_method() {
        struct Failing;
        impl GenerationTemplate for Failing {
            fn render(&self, call: &TemplateCall<'_>) -> anyhow::Result<String> {
                anyhow::bail!("cannot render {}", call.return_type)
            }
        }

        let err = generate(&[MethodDescriptor::new("foo", "int")], &Failing).unwrap_err();
        assert!(matches!(err, GenerateError::Template { ref method, .. } if method == "foo"));
    }

    #[test]
    fn void_alias_gets_return_in_literal_mode() {
        let methods = vec![MethodDescriptor::new("reset", "nothing_t")];
        let out = generate(&methods, &fields_template).unwrap();
        assert!(out.starts_with("[return|nothing_t|"));
    }

    #[test]
    fn void_alias_is_void_in_aliased_mode() {
        let generator = Generator::new(GeneratorOptions {
            void_detection: VoidDetection::aliased(["nothing_t"]),
            ..GeneratorOptions::default()
        });
        let out = generator.generate(&[MethodDescriptor::new("reset", "nothing_t")], &fields_template).unwrap();
        assert_eq!(out, "[|nothing_t|reset|||]");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn generator_and_builtin_templates_are_send_sync() {
        assert_send_sync::<Generator>();
        assert_send_sync::<GeneratorOptions>();
        assert_send_sync::<c::CTemplate>();
        assert_send_sync::<text::TextTemplate>();
        assert_send_sync::<interface::RustTraitMethod>();
        assert_send_sync::<class::RustProxyMethod>();
        assert_send_sync::<class::RustThunk>();
    }

    #[test]
    fn trait_objects_are_accepted() {
        let template: Box<dyn GenerationTemplate> = Box::new(fields_template);
        let out = generate(&[MethodDescriptor::new("bar", "void")], template.as_ref()).unwrap();
        assert_eq!(out, "[|void|bar|||]");
    }
}
