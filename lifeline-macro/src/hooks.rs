use darling::util::Flag;
use darling::FromDeriveInput;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

#[derive(FromDeriveInput)]
#[darling(attributes(lifecycle), supports(struct_any, enum_any))]
struct HooksArgs {
    ident: syn::Ident,
    generics: syn::Generics,
    #[darling(default)]
    init: Flag,
    #[darling(default)]
    bootstrap: Flag,
    #[darling(default)]
    destroy: Flag,
    #[darling(default)]
    before_shutdown: Flag,
    #[darling(default)]
    shutdown: Flag,
}

pub fn derive_lifecycle_hooks(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let args = match HooksArgs::from_derive_input(&input) {
        Ok(args) => args,
        Err(err) => return err.write_errors().into(),
    };

    TokenStream::from(generate_hooks_impl(&args))
}

fn generate_hooks_impl(args: &HooksArgs) -> TokenStream2 {
    let name = &args.ident;
    let (impl_generics, ty_generics, where_clause) = args.generics.split_for_impl();

    let accessors = [
        (&args.init, quote!(as_module_init), quote!(OnModuleInit)),
        (
            &args.bootstrap,
            quote!(as_application_bootstrap),
            quote!(OnApplicationBootstrap),
        ),
        (&args.destroy, quote!(as_module_destroy), quote!(OnModuleDestroy)),
        (
            &args.before_shutdown,
            quote!(as_before_application_shutdown),
            quote!(BeforeApplicationShutdown),
        ),
        (
            &args.shutdown,
            quote!(as_application_shutdown),
            quote!(OnApplicationShutdown),
        ),
    ];

    // Only supported hooks are overridden; the trait defaults return None.
    let methods = accessors
        .iter()
        .filter(|(flag, _, _)| flag.is_present())
        .map(|(_, method, hook_trait)| {
            quote! {
                fn #method(
                    &mut self,
                ) -> ::core::option::Option<&mut dyn ::lifeline::lifecycle::#hook_trait> {
                    ::core::option::Option::Some(self)
                }
            }
        });

    quote! {
        impl #impl_generics ::lifeline::lifecycle::LifecycleHooks for #name #ty_generics #where_clause {
            #(#methods)*
        }
    }
}
