//! Templates for C-family object runtimes where every method takes the object
//! as an implicit first argument.

use crate::codegen::{GenerationTemplate, TemplateCall};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CStyle {
    pub receiver_type: String,
    pub receiver_name: String,
    /// Expression the thunks dispatch through, e.g. `self->vtable`.
    pub dispatch: String,
    pub thunk_prefix: String,
}

impl Default for CStyle {
    fn default() -> Self {
        Self {
            receiver_type: "void *".to_string(),
            receiver_name: "self".to_string(),
            dispatch: "self->vtable".to_string(),
            thunk_prefix: String::new(),
        }
    }
}

impl CStyle {
    /// `RECEIVER` or `RECEIVER, T0 n0, ...`
    fn parameter_list(&self, call: &TemplateCall<'_>) -> String {
        let receiver = format!("{} {}", self.receiver_type, self.receiver_name);
        append(receiver, call.separator, call.signature)
    }

    fn argument_list(&self, call: &TemplateCall<'_>) -> String {
        append(self.receiver_name.clone(), call.separator, call.names)
    }
}

fn append(mut head: String, separator: &str, tail: &str) -> String {
    head.push_str(separator);
    if !tail.is_empty() {
        head.push(' ');
        head.push_str(tail);
    }
    head
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CTemplate {
    /// `RET NAME(RECEIVER, ARGS);`
    Declaration(CStyle),
    /// `RET (*NAME)(RECEIVER, ARGS);`
    VtableSlot(CStyle),
    /// A function forwarding to `DISPATCH->NAME(SELF, NAMES)`.
    Thunk(CStyle),
}

impl CTemplate {
    fn style(&self) -> &CStyle {
        match self {
            Self::Declaration(style) | Self::VtableSlot(style) | Self::Thunk(style) => style,
        }
    }
}

impl GenerationTemplate for CTemplate {
    fn render(&self, call: &TemplateCall<'_>) -> anyhow::Result<String> {
        let style = self.style();
        let params = style.parameter_list(call);

        let out = match self {
            Self::Declaration(_) => {
                format!("{} {}({});\n", call.return_type, call.name, params)
            }
            Self::VtableSlot(_) => {
                format!("{} (*{})({});\n", call.return_type, call.name, params)
            }
            Self::Thunk(_) => {
                let ret = if call.is_void() {
                    String::new()
                } else {
                    format!("{} ", call.return_statement)
                };
                format!(
                    "{} {}{}({})\n{{\n    {}{}->{}({});\n}}\n",
                    call.return_type,
                    style.thunk_prefix,
                    call.name,
                    params,
                    ret,
                    style.dispatch,
                    call.name,
                    style.argument_list(call),
                )
            }
        };
        Ok(out)
    }
}
