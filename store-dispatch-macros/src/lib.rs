//! Procedural macros for store-dispatch

use std::collections::BTreeMap;

use darling::{FromDeriveInput, FromVariant};
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, DeriveInput};

/// Container-level attributes for #[derive(Action)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct ActionOpts {
    ident: syn::Ident,
    data: darling::ast::Data<ActionVariant, ()>,

    /// Infer categories from variant name prefixes
    #[darling(default)]
    infer_categories: bool,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(action))]
struct ActionVariant {
    ident: syn::Ident,
    fields: darling::ast::Fields<()>,

    /// Explicit category override
    #[darling(default)]
    category: Option<String>,

    /// Leave this variant uncategorized
    #[darling(default)]
    skip_category: bool,
}

// Words that end the subject part of a variant name. A variant that starts
// with one of them ("ClearAll") has no subject and stays uncategorized.
const ACTION_VERBS: &[&str] = &[
    // Requests
    "Fetch", "Refresh", "Load", "Reload", "Retry", "Submit", "Cancel",
    // Sessions
    "Login", "Logout", "Register", "Start", "End", "Open", "Close",
    // Mutations
    "Add", "Remove", "Clear", "Update", "Set", "Apply", "Install", "Reset", "Save", "Delete",
    "Create", "Toggle", "Select",
];

/// Marks a result action: `FeedDidLoad` belongs to `feed`.
const RESULT_MARKER: &str = "Did";

/// Split a PascalCase identifier into its words.
fn split_pascal_case(s: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for ch in s.chars() {
        match parts.last_mut() {
            Some(last) if !ch.is_uppercase() => last.push(ch),
            _ => parts.push(ch.to_string()),
        }
    }
    parts
}

fn to_snake_case(parts: &[String]) -> String {
    parts
        .iter()
        .map(|p| p.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

fn to_pascal_case(snake: &str) -> String {
    snake
        .split('_')
        .flat_map(|word| {
            let mut chars = word.chars();
            chars
                .next()
                .into_iter()
                .flat_map(char::to_uppercase)
                .chain(chars)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Category of a variant name: the words before the first verb or `Did`.
///
/// - `FeedFetch` -> `feed`
/// - `FeedDidLoad` -> `feed`
/// - `DemoUserInstall` -> `demo_user`
/// - `Tick`, `ClearAll`, `FeedState` -> none
fn infer_category(name: &str) -> Option<String> {
    let parts = split_pascal_case(name);
    let first = parts.first()?;
    if first == RESULT_MARKER || ACTION_VERBS.contains(&first.as_str()) {
        return None;
    }

    let subject_end = parts
        .iter()
        .skip(1)
        .position(|p| p == RESULT_MARKER || ACTION_VERBS.contains(&p.as_str()))?
        + 1;

    Some(to_snake_case(&parts[..subject_end]))
}

/// Derive macro for the Action trait
///
/// Generates `name()` returning the variant name.
///
/// With `#[action(infer_categories)]` it also generates:
/// - a `{Name}Category` enum listing every category found, plus `Uncategorized`
/// - `category()` and `category_enum()` on the action
/// - an `is_{category}()` predicate per category
/// - an `ActionCategory` impl
///
/// Use `#[action(category = "...")]` on a variant to override the inferred
/// category, or `#[action(skip_category)]` to leave it out.
///
/// # Example
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// #[action(infer_categories)]
/// enum NewsAction {
///     FeedFetch { category: String },
///     FeedDidLoad { payload: NewsPayload },
///     ErrorClear,
/// }
///
/// let action = NewsAction::ErrorClear;
/// assert_eq!(action.name(), "ErrorClear");
/// assert_eq!(action.category(), Some("error"));
/// assert!(action.is_error());
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ActionOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;
    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let name_arms = variants.iter().map(|v| {
        let variant = &v.ident;
        let label = variant.to_string();
        match v.fields.style {
            darling::ast::Style::Unit => quote! { #name::#variant => #label },
            darling::ast::Style::Tuple => quote! { #name::#variant(..) => #label },
            darling::ast::Style::Struct => quote! { #name::#variant { .. } => #label },
        }
    });

    let mut expanded = quote! {
        impl ::store_dispatch::Action for #name {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms,)*
                }
            }
        }
    };

    if !opts.infer_categories {
        return expanded.into();
    }

    let assigned: Vec<(&syn::Ident, Option<String>)> = variants
        .iter()
        .map(|v| {
            let category = if v.skip_category {
                None
            } else {
                v.category
                    .clone()
                    .or_else(|| infer_category(&v.ident.to_string()))
            };
            (&v.ident, category)
        })
        .collect();

    // Ordered so the generated enum is deterministic
    let mut members: BTreeMap<&str, Vec<&syn::Ident>> = BTreeMap::new();
    for (variant, category) in &assigned {
        if let Some(category) = category {
            members.entry(category.as_str()).or_default().push(variant);
        }
    }

    let category_enum = format_ident!("{}Category", name);
    let category_names: Vec<&str> = members.keys().copied().collect();
    let category_variants: Vec<_> = category_names
        .iter()
        .map(|c| format_ident!("{}", to_pascal_case(c)))
        .collect();

    let category_arms = assigned.iter().map(|(variant, category)| match category {
        Some(c) => quote! { #name::#variant { .. } => ::core::option::Option::Some(#c) },
        None => quote! { #name::#variant { .. } => ::core::option::Option::None },
    });

    let category_enum_arms = assigned.iter().map(|(variant, category)| {
        let target = match category {
            Some(c) => format_ident!("{}", to_pascal_case(c)),
            None => format_ident!("Uncategorized"),
        };
        quote! { #name::#variant { .. } => #category_enum::#target }
    });

    let predicates = members.iter().map(|(category, variants)| {
        let predicate = format_ident!("is_{}", category);
        let doc = format!("Whether this action belongs to the `{category}` category.");
        quote! {
            #[doc = #doc]
            pub fn #predicate(&self) -> bool {
                matches!(self, #(#name::#variants { .. })|*)
            }
        }
    });

    let enum_doc = format!("Categories of [`{name}`], inferred from variant names.");

    expanded = quote! {
        #expanded

        #[doc = #enum_doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum #category_enum {
            #(#category_variants,)*
            /// Actions without a category.
            Uncategorized,
        }

        impl #category_enum {
            /// Every category, `Uncategorized` last.
            pub fn all() -> &'static [Self] {
                &[#(Self::#category_variants,)* Self::Uncategorized]
            }

            /// Category name in snake_case.
            pub fn name(&self) -> &'static str {
                match self {
                    #(Self::#category_variants => #category_names,)*
                    Self::Uncategorized => "uncategorized",
                }
            }
        }

        impl #name {
            /// Category of this action, if any.
            pub fn category(&self) -> ::core::option::Option<&'static str> {
                match self {
                    #(#category_arms,)*
                }
            }

            /// Category of this action as an enum.
            pub fn category_enum(&self) -> #category_enum {
                match self {
                    #(#category_enum_arms,)*
                }
            }

            #(#predicates)*
        }

        impl ::store_dispatch::ActionCategory for #name {
            type Category = #category_enum;

            fn category(&self) -> ::core::option::Option<&'static str> {
                #name::category(self)
            }

            fn category_enum(&self) -> Self::Category {
                #name::category_enum(self)
            }
        }
    };

    expanded.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pascal_case() {
        assert_eq!(split_pascal_case("FeedDidLoad"), ["Feed", "Did", "Load"]);
        assert_eq!(split_pascal_case("Tick"), ["Tick"]);
        assert!(split_pascal_case("").is_empty());
    }

    #[test]
    fn test_infer_category() {
        assert_eq!(infer_category("FeedFetch").as_deref(), Some("feed"));
        assert_eq!(infer_category("FeedDidFail").as_deref(), Some("feed"));
        assert_eq!(infer_category("SessionDidStart").as_deref(), Some("session"));
        assert_eq!(infer_category("DemoUserInstall").as_deref(), Some("demo_user"));
        assert_eq!(infer_category("CategorySet").as_deref(), Some("category"));
        assert_eq!(infer_category("ErrorClear").as_deref(), Some("error"));
    }

    #[test]
    fn test_uncategorized_names() {
        assert_eq!(infer_category("Tick"), None);
        assert_eq!(infer_category("ClearAll"), None);
        assert_eq!(infer_category("DidConnect"), None);
        assert_eq!(infer_category("FeedState"), None);
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(to_pascal_case("demo_user"), "DemoUser");
        assert_eq!(to_pascal_case("feed"), "Feed");
    }
}
