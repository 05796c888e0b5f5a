use anyhow::{Context, Result};
use proc_macro2::TokenStream;
use quote::quote;
use crate::codegen::interface::{gen_method_signature, ident, method_ident, parse_type, parse_units, type_ident};
use crate::codegen::{Generator, GenerationTemplate, TemplateCall};
use crate::models::MethodDescriptor;

/// Forwarding method bodies for a proxy holding the real object in `self.inner`.
pub struct RustProxyMethod;

impl GenerationTemplate for RustProxyMethod {
    fn render(&self, call: &TemplateCall<'_>) -> Result<String> {
        let signature = gen_method_signature(call)?;
        let forward = gen_forward_call(call, quote!(self.inner))?;
        Ok(quote! {
            #signature {
                #forward
            }
        }.to_string())
    }
}

/// Free functions dispatching through a trait object, one per method.
pub struct RustThunk {
    pub trait_name: String,
}

impl GenerationTemplate for RustThunk {
    fn render(&self, call: &TemplateCall<'_>) -> Result<String> {
        let trait_ident = type_ident(&self.trait_name)?;
        let method_ident = method_ident(call.name)?;
        let params = call.method.params.iter()
            .map(|p| {
                let ident = ident(&p.name)?;
                let ty = parse_type(&p.ty)?;
                Ok(quote!(#ident: #ty))
            })
            .collect::<Result<Vec<_>>>()?;
        let return_type = if call.is_void() {
            None
        } else {
            let ty = parse_type(call.return_type)?;
            Some(quote!(-> #ty))
        };
        let forward = gen_forward_call(call, quote!(this))?;

        Ok(quote! {
            pub fn #method_ident(this: &dyn #trait_ident #(, #params)*) #return_type {
                #forward
            }
        }.to_string())
    }
}

/// `return TARGET.name(names);` or, for void methods, `TARGET.name(names);`
fn gen_forward_call(call: &TemplateCall<'_>, target: TokenStream) -> Result<TokenStream> {
    let method_ident = method_ident(call.name)?;
    let args: TokenStream = call.names.parse()
        .map_err(|e| anyhow::anyhow!("{:?}", e))
        .with_context(|| format!("Parameter names `{}` do not lex", call.names))?;

    let ret = if call.return_statement.is_empty() {
        None
    } else {
        Some(quote!(return))
    };
    Ok(quote! {
        #ret #target.#method_ident(#args);
    })
}

pub fn gen_proxy(trait_name: &str, proxy_name: &str, methods: &[MethodDescriptor], generator: &Generator) -> Result<TokenStream> {
    let trait_ident = type_ident(trait_name)?;
    let proxy_ident = type_ident(proxy_name)?;
    let methods = parse_units(generator.generate(methods, &RustProxyMethod)?)?;

    Ok(quote! {
        pub struct #proxy_ident<T> {
            pub inner: T,
        }

        impl<T> #proxy_ident<T> {
            pub fn new(inner: T) -> Self {
                Self { inner }
            }
        }

        impl<T: #trait_ident> #trait_ident for #proxy_ident<T> {
            #methods
        }
    })
}

pub fn gen_thunks(trait_name: &str, methods: &[MethodDescriptor], generator: &Generator) -> Result<TokenStream> {
    let template = RustThunk { trait_name: trait_name.to_string() };
    parse_units(generator.generate(methods, &template)?)
}
