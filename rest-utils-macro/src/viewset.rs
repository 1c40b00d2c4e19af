use darling::{ast::NestedMeta, FromMeta};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, parse_quote, Attribute, FnArg, ImplItem, ItemImpl, Meta};

#[derive(Debug, Default, FromMeta)]
struct ViewSetArgs {
    #[darling(default)]
    state: Option<syn::Path>,
}

#[derive(Debug, Default, FromMeta)]
struct ActionArgs {
    #[darling(default)]
    name: Option<String>,
}

struct ActionInfo {
    endpoint_name: String,
    fn_name: syn::Ident,
    params: Vec<syn::Type>,
}

pub fn viewset_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr_args = match NestedMeta::parse_meta_list(attr.into()) {
        Ok(args) => args,
        Err(e) => return TokenStream::from(darling::Error::from(e).write_errors()),
    };
    let args = match ViewSetArgs::from_list(&attr_args) {
        Ok(args) => args,
        Err(e) => return TokenStream::from(e.write_errors()),
    };
    let input = parse_macro_input!(item as ItemImpl);

    match generate_viewset_impl(&args, input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

fn generate_viewset_impl(args: &ViewSetArgs, input: ItemImpl) -> syn::Result<TokenStream2> {
    let mut actions: Vec<ActionInfo> = Vec::new();
    let mut clean_impl = input.clone();

    for item in clean_impl.items.iter_mut() {
        if let ImplItem::Fn(method) = item {
            if let Some(info) = extract_action_info(method)? {
                actions.push(info);
                method.attrs.retain(|attr| !is_action_attr(attr));
            }
        }
    }

    let mut generics = input.generics.clone();
    let state_ty: syn::Type = match &args.state {
        Some(path) => parse_quote!(#path),
        None => {
            generics.params.push(parse_quote!(__S));
            generics.make_where_clause().predicates.push(parse_quote!(
                __S: ::std::clone::Clone + ::std::marker::Send + ::std::marker::Sync + 'static
            ));
            parse_quote!(__S)
        }
    };
    let (impl_generics, _, where_clause) = generics.split_for_impl();
    let self_ty = &input.self_ty;

    let arms = actions.iter().map(|action| {
        let endpoint_name = &action.endpoint_name;
        let fn_name = &action.fn_name;
        let temps: Vec<_> = (0..action.params.len())
            .map(|i| format_ident!("__p_{}", i))
            .collect();
        let tys = &action.params;

        quote! {
            #endpoint_name => {
                let view = self;
                ::std::option::Option::Some(::rest_utils::viewset::Endpoint::new(
                    move |#(#temps: #tys),*| async move {
                        ::rest_utils::axum::response::IntoResponse::into_response(
                            view.#fn_name(#(#temps),*).await
                        )
                    }
                ))
            }
        }
    });

    Ok(quote! {
        #clean_impl

        impl #impl_generics ::rest_utils::viewset::Endpoints<#state_ty> for #self_ty #where_clause {
            fn endpoint(
                self: ::std::sync::Arc<Self>,
                name: &str,
            ) -> ::std::option::Option<::rest_utils::viewset::Endpoint<#state_ty>> {
                match name {
                    #(#arms)*
                    _ => ::std::option::Option::None,
                }
            }
        }
    })
}

fn extract_action_info(method: &syn::ImplItemFn) -> syn::Result<Option<ActionInfo>> {
    let Some(attr) = method.attrs.iter().find(|attr| is_action_attr(attr)) else {
        return Ok(None);
    };

    let args = match &attr.meta {
        Meta::Path(_) => ActionArgs::default(),
        meta => ActionArgs::from_meta(meta).map_err(|e| syn::Error::new_spanned(attr, e.to_string()))?,
    };

    if method.sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            &method.sig,
            "#[action] methods must be async",
        ));
    }

    let mut params = Vec::new();
    let mut has_receiver = false;
    for input in method.sig.inputs.iter() {
        match input {
            FnArg::Receiver(receiver) => {
                if receiver.reference.is_none() || receiver.mutability.is_some() {
                    return Err(syn::Error::new_spanned(
                        receiver,
                        "#[action] methods must take &self",
                    ));
                }
                has_receiver = true;
            }
            FnArg::Typed(pat_type) => params.push((*pat_type.ty).clone()),
        }
    }
    if !has_receiver {
        return Err(syn::Error::new_spanned(
            &method.sig,
            "#[action] methods must take &self",
        ));
    }

    let fn_name = method.sig.ident.clone();
    Ok(Some(ActionInfo {
        endpoint_name: args.name.unwrap_or_else(|| fn_name.to_string()),
        fn_name,
        params,
    }))
}

fn is_action_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("action")
}
