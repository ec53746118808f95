use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote};
use syn::{parse_macro_input, FnArg, ItemFn, Pat, PatType, ReturnType, Type};

enum Parameter<'a> {
    Number(&'a syn::Ident),
    Rest(&'a syn::Ident),
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(type_path) => type_path.path.segments.last(),
        _ => None,
    }
}

fn is_f64(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|segment| segment.ident == "f64" && segment.arguments.is_none())
}

fn is_vec_f64(ty: &Type) -> bool {
    let Some(segment) = last_segment(ty) else {
        return false;
    };
    if segment.ident != "Vec" {
        return false;
    }
    match &segment.arguments {
        syn::PathArguments::AngleBracketed(generic) => {
            generic.args.len() == 1
                && matches!(generic.args.first(), Some(syn::GenericArgument::Type(inner)) if is_f64(inner))
        }
        _ => false,
    }
}

fn classify(arg: &FnArg) -> syn::Result<Parameter<'_>> {
    let FnArg::Typed(PatType { pat, ty, .. }) = arg else {
        return Err(syn::Error::new_spanned(arg, "expression functions cannot take `self`"));
    };
    let name = match &**pat {
        Pat::Ident(ident) => &ident.ident,
        other => return Err(syn::Error::new_spanned(other, "unsupported argument pattern")),
    };
    if is_f64(ty) {
        Ok(Parameter::Number(name))
    } else if is_vec_f64(ty) {
        Ok(Parameter::Rest(name))
    } else {
        Err(syn::Error::new_spanned(
            ty,
            format!("argument `{}` must be `f64`, or a single `Vec<f64>` for a variadic function", name),
        ))
    }
}

/// Turns `fn name(a: f64, b: f64) -> f64` (or `-> Result<f64, EvalError>`)
/// into an evaluator the expression registry accepts, and defines
/// `NAME_ARITY` next to it. A lone `Vec<f64>` argument collects every
/// argument and makes the function variadic.
#[proc_macro_attribute]
pub fn expr_fn(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    expand(input).unwrap_or_else(|err| err.to_compile_error()).into()
}

fn expand(input: ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let vis = &input.vis;
    let attrs = &input.attrs;
    let fn_name = &input.sig.ident;
    let fn_body = &input.block;
    let arity_name = format_ident!("{}_ARITY", fn_name.to_string().to_uppercase());

    let parameters = input
        .sig
        .inputs
        .iter()
        .map(classify)
        .collect::<syn::Result<Vec<_>>>()?;

    let variadic = match parameters.as_slice() {
        [Parameter::Rest(_)] => true,
        params if params.iter().any(|param| matches!(param, Parameter::Rest(_))) => {
            return Err(syn::Error::new_spanned(
                &input.sig.inputs,
                "a `Vec<f64>` argument must be the only argument",
            ));
        }
        _ => false,
    };

    let wraps_output = match &input.sig.output {
        ReturnType::Type(_, ty) if is_f64(ty) => true,
        ReturnType::Type(..) => false,
        ReturnType::Default => {
            return Err(syn::Error::new(
                Span::call_site(),
                "expression functions must return `f64` or `Result<f64, EvalError>`",
            ));
        }
    };

    let count = parameters.len();
    let arity = if variadic { -1 } else { count as i32 };
    let arg_extractions = parameters.iter().enumerate().map(|(i, param)| match param {
        Parameter::Number(name) => quote! {
            let #name: f64 = __call.eval(&__args[#i])?;
        },
        Parameter::Rest(name) => quote! {
            let #name: Vec<f64> = __call.eval_all(__args)?;
        },
    });

    let count_check = if variadic {
        quote! {}
    } else {
        quote! {
            if __args.len() != #count {
                return Err(::mathast_rs::error::EvalError::ArgumentCount {
                    name: __call.name().to_string(),
                    expected: #count,
                    found: __args.len(),
                });
            }
        }
    };

    let body = if wraps_output {
        quote! { Ok(#fn_body) }
    } else {
        quote! { #fn_body }
    };

    let arity_doc = format!("Arity `{}` is registered with.", fn_name);
    Ok(quote! {
        #[doc = #arity_doc]
        #vis const #arity_name: i32 = #arity;

        #(#attrs)*
        #vis fn #fn_name(
            __call: &::mathast_rs::ast::CallContext<'_>,
            __args: &[::mathast_rs::ast::ASTNode],
        ) -> Result<f64, ::mathast_rs::error::EvalError> {
            #count_check
            #(#arg_extractions)*
            #body
        }
    })
}
