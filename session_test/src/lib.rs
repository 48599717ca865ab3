use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse::Parser, punctuated::Punctuated, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature,
    Token, Type,
};

/// Turn a function taking an [`ElectionSession`] into a test, enabling test logging
/// and injecting a fresh session.
///
/// Accepted arguments:
/// - `seeded`: populate the session with the demonstration register and candidates.
/// - `atomic`: configure the session to commit multi-level votes atomically.
#[proc_macro_attribute]
pub fn session_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = syn::parse_macro_input!(input as ItemFn);

    let options = match Punctuated::<Ident, Token![,]>::parse_terminated.parse(args) {
        Ok(options) => options,
        Err(err) => return err.into_compile_error().into(),
    };

    let mut seeded = false;
    let mut atomic = false;
    for option in &options {
        if option == "seeded" {
            seeded = true;
        } else if option == "atomic" {
            atomic = true;
        } else {
            return syn::Error::new(option.span(), "Expected `seeded` or `atomic`")
                .into_compile_error()
                .into();
        }
    }

    // Reject invalid function signatures.
    let test_args = match check_sig(&item_fn.sig) {
        Ok(args) => args,
        Err(err) => return err.into_compile_error().into(),
    };

    // Rename the inner function so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_inner", name);
    item_fn.sig.ident = new_name.clone();

    let maybe_atomic = atomic.then(|| {
        quote! {
            let config = config.with_vote_commit(crate::VoteCommit::Atomic);
        }
    });

    let maybe_seed = seeded.then(|| {
        quote! {
            crate::seed::gwugwuru(&mut session).unwrap();
            crate::seed::candidates(&mut session).unwrap();
        }
    });

    quote! {
        #[test]
        fn #name() {
            /// The test itself.
            #item_fn

            log4rs_test_utils::test_logging::init_logging_once_for(
                ["electoral_register"],
                None,
                None,
            );

            let config = crate::Config::default();
            #maybe_atomic
            #[allow(unused_mut)]
            let mut session = crate::model::ElectionSession::new(config);
            #maybe_seed

            #new_name(#(#test_args),*);
        }
    }
    .into()
}

/// Ensure the wrapped test is synchronous and takes at most one `ElectionSession`.
fn check_sig(sig: &Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if let Some(asyncness) = sig.asyncness {
        return Err(syn::Error::new(asyncness.span(), "Test must not be `async`"));
    }

    let mut args = vec![];
    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let (Pat::Ident(_), Type::Path(type_path)) = (&*pat_type.pat, &*pat_type.ty) {
                let is_session = type_path
                    .path
                    .segments
                    .last()
                    .map_or(false, |segment| segment.ident == "ElectionSession");
                if is_session && args.is_empty() {
                    args.push(quote! { session });
                    continue;
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected a single `session: ElectionSession` parameter",
        ));
    }

    Ok(args)
}
