//! Procedural macros for toolbelt tool declarations.
//!
//! `#[tool]` turns an ordinary function into a tool declaration without
//! changing the function itself:
//!
//! ```ignore
//! /// Add two numbers
//! #[tool(group = "math")]
//! async fn add(a: f64, b: f64) -> f64 {
//!     a + b
//! }
//!
//! // `add` is still callable directly; `add_tool()` returns its
//! // `ToolDeclaration`, and `Toolbelt::register_collected` picks it up.
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{
    Attribute, Error, Expr, ExprLit, FnArg, Ident, ItemFn, Lit, LitStr, Meta, Pat, Path,
    ReturnType, Type, parse_macro_input,
};

/// Declares a function as a tool.
///
/// Accepted options: `group = "..."` (defaults to the registry's default
/// group), `name = "..."` (defaults to the function name) and
/// `crate = "..."`, the path to `toolbelt_tools` when it is only reachable
/// through a re-export such as `toolbelt::tools`. Doc comments
/// become the tool description and parameter types map to schema types.
/// Functions returning `Result<T, E>` report `Err` values as tool errors.
#[proc_macro_attribute]
pub fn tool(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut options = ToolOptions::default();
    let parser = syn::meta::parser(|meta| options.parse(&meta));
    parse_macro_input!(attr with parser);
    let function = parse_macro_input!(item as ItemFn);

    expand(options, function)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct ToolOptions {
    group: Option<LitStr>,
    name: Option<LitStr>,
    krate: Option<Path>,
}

impl ToolOptions {
    fn krate(&self) -> TokenStream2 {
        self.krate
            .as_ref()
            .map_or_else(|| quote!(::toolbelt_tools), |path| quote!(#path))
    }
}

impl ToolOptions {
    fn parse(&mut self, meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("group") {
            self.group = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("name") {
            self.name = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("crate") {
            let path: LitStr = meta.value()?.parse()?;
            self.krate = Some(path.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported tool option, expected `group`, `name` or `crate`"))
        }
    }
}

struct Param {
    binding: Ident,
    key: String,
    descriptor: String,
    extract_ty: TokenStream2,
    by_ref: bool,
}

impl Param {
    fn from_arg(arg: &FnArg) -> syn::Result<Self> {
        let FnArg::Typed(typed) = arg else {
            return Err(Error::new(arg.span(), "tools cannot take `self`"));
        };
        let Pat::Ident(pat) = typed.pat.as_ref() else {
            return Err(Error::new(
                typed.pat.span(),
                "tool parameters must be plain identifiers",
            ));
        };
        if matches!(typed.ty.as_ref(), Type::ImplTrait(_) | Type::Infer(_)) {
            return Err(Error::new(
                typed.ty.span(),
                "tool parameters must have concrete types",
            ));
        }

        let binding = pat.ident.clone();
        let key = binding.to_string().trim_start_matches("r#").to_owned();
        let descriptor = type_descriptor(&typed.ty);
        let (extract_ty, by_ref) = match typed.ty.as_ref() {
            Type::Reference(reference) => {
                let elem = &reference.elem;
                (quote!(<#elem as ::std::borrow::ToOwned>::Owned), true)
            }
            ty => (quote!(#ty), false),
        };

        Ok(Self {
            binding,
            key,
            descriptor,
            extract_ty,
            by_ref,
        })
    }

    fn extraction(&self) -> TokenStream2 {
        let Self {
            binding,
            key,
            extract_ty,
            ..
        } = self;
        quote! { let #binding: #extract_ty = __toolbelt_args.get(#key)?; }
    }

    fn call_arg(&self) -> TokenStream2 {
        let binding = &self.binding;
        if self.by_ref {
            quote!(&#binding)
        } else {
            quote!(#binding)
        }
    }

    fn declaration(&self, krate: &TokenStream2) -> TokenStream2 {
        let Self {
            key, descriptor, ..
        } = self;
        quote! {
            .with_param(#key, #krate::ParamType::from_type_name(#descriptor))
        }
    }
}

fn expand(options: ToolOptions, function: ItemFn) -> syn::Result<TokenStream2> {
    let sig = &function.sig;
    if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
        return Err(Error::new(
            sig.generics.span(),
            "tool functions cannot be generic",
        ));
    }
    if let Some(variadic) = &sig.variadic {
        return Err(Error::new(
            variadic.span(),
            "tool functions cannot be variadic",
        ));
    }

    let krate = options.krate();
    let ident = &sig.ident;
    let vis = &function.vis;
    let constructor = format_ident!("{}_tool", ident);
    let tool_name = options
        .name
        .as_ref()
        .map_or_else(|| ident.to_string(), LitStr::value);
    let description = doc_comment(&function.attrs);
    let constructor_doc = format!("Tool declaration for [`{ident}`].");

    let params = sig
        .inputs
        .iter()
        .map(Param::from_arg)
        .collect::<syn::Result<Vec<_>>>()?;
    let extractions = params.iter().map(Param::extraction);
    let call_args = params.iter().map(Param::call_arg);
    let declarations = params.iter().map(|param| param.declaration(&krate));

    let convert = if returns_result(&sig.output) {
        quote!(#krate::macros::fallible_output)
    } else {
        quote!(#krate::macros::output)
    };

    let body = if sig.asyncness.is_some() {
        quote! {
            #krate::ToolBody::cooperative(
                |__toolbelt_args: #krate::ToolArgs| async move {
                    #(#extractions)*
                    #convert(#ident(#(#call_args),*).await)
                },
            )
        }
    } else {
        quote! {
            #krate::ToolBody::blocking(
                |__toolbelt_args: #krate::ToolArgs|
                    -> #krate::ToolResult<#krate::serde_json::Value> {
                    #(#extractions)*
                    #convert(#ident(#(#call_args),*))
                },
            )
        }
    };

    let group = options.group.as_ref().map(|group| quote!(.with_group(#group)));

    Ok(quote! {
        #function

        #[doc = #constructor_doc]
        #vis fn #constructor() -> #krate::ToolDeclaration {
            #krate::ToolDeclaration::new(#tool_name, #body)
                #group
                .with_description(#description)
                #(#declarations)*
                .with_source(#krate::SourceLocation::new(
                    ::core::file!(),
                    ::core::line!(),
                ))
        }

        #krate::inventory::submit! {
            #krate::ToolRegistration::new(#constructor)
        }
    })
}

/// Joins `///` lines, dropping the single space rustdoc inserts after `///`.
fn doc_comment(attrs: &[Attribute]) -> String {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(pair) => match &pair.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(text),
                    ..
                }) => Some(text.value()),
                _ => None,
            },
            _ => None,
        })
        .map(|line| line.strip_prefix(' ').map(str::to_owned).unwrap_or(line))
        .collect();
    lines.join("\n").trim().to_owned()
}

/// Name fed to `ParamType::from_type_name`: the last path segment, with
/// references and parentheses stripped.
fn type_descriptor(ty: &Type) -> String {
    match ty {
        Type::Reference(reference) => type_descriptor(&reference.elem),
        Type::Paren(inner) => type_descriptor(&inner.elem),
        Type::Group(inner) => type_descriptor(&inner.elem),
        Type::Slice(_) | Type::Array(_) => "array".to_owned(),
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = ty.as_ref() else {
        return false;
    };
    path.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "Result")
}
