use anyhow::{anyhow, Context, Result};
use convert_case::{Case, Casing};
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use crate::codegen::{Generator, GenerationTemplate, TemplateCall};
use crate::models::{MethodDescriptor, Parameter};

/// One `fn name(&self, ...) -> R;` per method, for the body of a trait.
pub struct RustTraitMethod;

impl GenerationTemplate for RustTraitMethod {
    fn render(&self, call: &TemplateCall<'_>) -> Result<String> {
        let method = gen_method_signature(call)?;
        Ok(quote!( #method; ).to_string())
    }
}

pub fn gen_interface(name: &str, methods: &[MethodDescriptor], generator: &Generator) -> Result<TokenStream> {
    let name_ident = type_ident(name)?;
    let methods = parse_units(generator.generate(methods, &RustTraitMethod)?)?;

    Ok(quote! {
        pub trait #name_ident {
            #methods
        }
    })
}

pub(crate) fn gen_method_signature(call: &TemplateCall<'_>) -> Result<TokenStream> {
    let mut params = vec![quote!(&self)];
    for param in &call.method.params {
        params.push(param_to_tokens(param)?);
    }

    // Void methods get no `-> T`
    let return_type = if call.is_void() {
        None
    } else {
        let ty = parse_type(call.return_type)?;
        Some(quote!(-> #ty))
    };

    let method_ident = method_ident(call.name)?;
    Ok(quote! {
        fn #method_ident(#(#params),*) #return_type
    })
}

fn param_to_tokens(parameter: &Parameter) -> Result<TokenStream> {
    let ident = ident(&parameter.name)?;
    let ty = parse_type(&parameter.ty)?;
    Ok(quote!( #ident: #ty ))
}

pub(crate) fn parse_type(ty: &str) -> Result<syn::Type> {
    syn::parse_str::<syn::Type>(ty).with_context(|| format!("`{}` is not a Rust type", ty))
}

pub(crate) fn ident(name: &str) -> Result<Ident> {
    syn::parse_str::<Ident>(name).with_context(|| format!("`{}` is not a valid identifier", name))
}

pub(crate) fn method_ident(name: &str) -> Result<Ident> {
    ident(&name.to_case(Case::Snake))
}

pub(crate) fn type_ident(name: &str) -> Result<Ident> {
    ident(&name.to_case(Case::Pascal))
}

/// Turns the concatenated output of a token template back into tokens.
pub(crate) fn parse_units(units: String) -> Result<TokenStream> {
    units.parse::<TokenStream>()
        .map_err(|e| anyhow!("Generated tokens do not lex: {:?}", e))
}
