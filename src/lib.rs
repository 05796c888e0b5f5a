//! Expands a list of method descriptors into source text through a template.
//!
//! Each descriptor is turned into a small set of derived fields (the `return`
//! statement, the separator after an implicit receiver, the joined signature and
//! the joined parameter names) and handed to a [`GenerationTemplate`]. The
//! rendered units are concatenated in method order.
//!
//! ```
//! use methodgen::{generate, MethodDescriptor, TemplateCall};
//!
//! let methods = vec![
//!     MethodDescriptor::new("foo", "int").param("int", "i"),
//!     MethodDescriptor::new("bar", "void"),
//! ];
//! let template = |call: &TemplateCall<'_>| {
//!     format!("{} {}(void * self{} {});\n", call.return_type, call.name, call.separator, call.signature)
//! };
//!
//! let out = generate(&methods, &template).unwrap();
//! assert_eq!(out, "int foo(void * self, int i);\nvoid bar(void * self );\n");
//! ```

pub mod codegen;
pub mod error;
pub mod fmt;
pub mod models;
pub mod return_type;

pub use codegen::{
    expand_names, expand_signature, generate, separator, DerivedFields, GenerationTemplate, Generator,
    GeneratorOptions, TemplateCall, MAX_ARITY,
};
pub use error::{GenerateError, Result};
pub use models::{MethodDescriptor, Parameter, Schema};
pub use return_type::{is_void, return_statement, ReturnKind, VoidDetection};
