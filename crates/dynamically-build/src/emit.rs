use crate::alias::CompanionPath;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::BTreeMap;

///
/// UnitKind
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UnitKind {
    /// The generic entry point module and trait.
    Declaration,
    /// `impl Create for T` per dispatch target.
    Dispatcher,
    /// Inherent `impl` on an extendable record.
    Augmentation,
    /// Companion factory, nested at the given path.
    Companion(CompanionPath),
}

///
/// SourceUnit
///

#[derive(Clone, Debug)]
pub struct SourceUnit {
    pub name: String,
    pub kind: UnitKind,
    pub tokens: TokenStream,
}

///
/// Emit
/// Receives every unit of a generation pass, in order.
///

pub trait Emit {
    fn emit(&mut self, unit: &SourceUnit);
}

impl Emit for Vec<SourceUnit> {
    fn emit(&mut self, unit: &SourceUnit) {
        self.push(unit.clone());
    }
}

///
/// Bundle
///
/// Folds units into a single includable file. Top-level units keep emission
/// order; companions are nested into a `pub(crate) mod` per path segment.
///

#[derive(Debug, Default)]
pub struct Bundle {
    top: Vec<(String, TokenStream)>,
    companions: ModuleTree,
}

#[derive(Debug, Default)]
struct ModuleTree {
    items: Vec<TokenStream>,
    children: BTreeMap<String, Self>,
}

impl ModuleTree {
    fn insert(&mut self, path: &[String], tokens: TokenStream) {
        match path.split_first() {
            Some((head, rest)) => self.children.entry(head.clone()).or_default().insert(rest, tokens),
            None => self.items.push(tokens),
        }
    }

    fn to_tokens(&self) -> TokenStream {
        let items = &self.items;
        let children = self.children.iter().map(|(name, child)| {
            let ident = format_ident!("{name}");
            let inner = child.to_tokens();

            quote! {
                pub(crate) mod #ident {
                    #inner
                }
            }
        });

        quote! {
            #(#items)*
            #(#children)*
        }
    }
}

impl Bundle {
    pub const HEADER: &'static str = "// @generated by dynamically-build. Do not edit.\n";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render to source text. Companion modules are hidden and tolerate
    /// unused factories.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from(Self::HEADER);

        for (name, tokens) in &self.top {
            out.push_str(&format!("\n// {name}\n{tokens}\n"));
        }

        for (root, tree) in &self.companions.children {
            let ident = format_ident!("{root}");
            let inner = tree.to_tokens();
            let module = quote! {
                #[doc(hidden)]
                #[allow(dead_code, clippy::all)]
                pub(crate) mod #ident {
                    #inner
                }
            };
            out.push_str(&format!("\n// companions\n{module}\n"));
        }

        out
    }
}

impl Emit for Bundle {
    fn emit(&mut self, unit: &SourceUnit) {
        match &unit.kind {
            UnitKind::Companion(path) => {
                self.companions.insert(&path.namespace, unit.tokens.clone());
            }
            _ => self.top.push((unit.name.clone(), unit.tokens.clone())),
        }
    }
}
