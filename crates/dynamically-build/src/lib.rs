//! Build-time factory synthesis.
//!
//! A generation pass reads one `TypeCatalog` snapshot and produces:
//! - a factory plan per candidate record
//! - source units (augmentations, companions, the generic entry point and
//!   its dispatcher)
//! - `DYN001` diagnostics for hand-written factories it cannot call
//!
//! The engine does no I/O; `build_to_out_dir` and the `build!` macro are the
//! build-script integration.

mod alias;
mod cancel;
mod config;
mod diagnostics;
mod dispatch;
mod emit;
mod macros;
mod out_dir;
mod path;
mod resolve;
mod synth;
mod visit;

pub use alias::{AliasResolver, CompanionPath};
pub use cancel::{Cancellation, Cancelled};
pub use config::Config;
pub use diagnostics::{Diagnostic, DiagnosticSink, Severity};
pub use dispatch::{DispatchTable, collect_dispatch_targets};
pub use emit::{Bundle, Emit, SourceUnit, UnitKind};
pub use out_dir::{BuildError, build_to_out_dir};
pub use path::RustPath;
pub use resolve::{
    FactoryOrigin, FactoryPlan, FactoryRef, FieldMapping, MappingKind, Resolver, Variant,
    select_constructor,
};
pub use synth::Synthesizer;
pub use visit::{TypeVisitor, collect_candidates, visit};

use dynamically_schema::{prelude::*, validate::validate_catalog};
use thiserror::Error as ThisError;

///
/// GenerateError
///

#[derive(Debug, ThisError)]
pub enum GenerateError {
    #[error("generation cancelled")]
    Cancelled,

    #[error("invalid generator config: {0}")]
    Config(ErrorTree),

    #[error("invalid type catalog: {0}")]
    Validation(ErrorTree),
}

impl From<Cancelled> for GenerateError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

///
/// Generation
/// Everything one pass produced, in deterministic order.
///

#[derive(Debug)]
pub struct Generation {
    pub plans: Vec<FactoryPlan>,
    pub units: Vec<SourceUnit>,
    pub diagnostics: Vec<Diagnostic>,
    pub dispatch: DispatchTable,
}

impl Generation {
    pub fn emit(&self, sink: &mut impl Emit) {
        for unit in &self.units {
            sink.emit(unit);
        }
    }

    pub fn report(&self, sink: &mut impl DiagnosticSink) {
        for diagnostic in &self.diagnostics {
            sink.report(diagnostic.clone());
        }
    }

    /// The bundled, includable source text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut bundle = Bundle::new();
        self.emit(&mut bundle);

        bundle.render()
    }
}

///
/// Generator
///

pub struct Generator<'a, C: ?Sized> {
    catalog: &'a C,
    config: &'a Config,
    cancel: Cancellation,
}

impl<'a, C: TypeCatalog + ?Sized> Generator<'a, C> {
    #[must_use]
    pub fn new(catalog: &'a C, config: &'a Config) -> Self {
        Self {
            catalog,
            config,
            cancel: Cancellation::new(),
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run one full pass. Cancellation at any checkpoint discards all work.
    pub fn generate(&self) -> Result<Generation, GenerateError> {
        self.config.validate().map_err(GenerateError::Config)?;
        validate_catalog(self.catalog).map_err(GenerateError::Validation)?;

        tracing::debug!(module = %self.catalog.current_module(), "generation started");

        let resolver = Resolver::new(self.catalog, self.config, &self.cancel)?;
        let synth = Synthesizer::new(self.config);

        let mut plans = Vec::new();
        for id in resolver.candidates() {
            self.cancel.check()?;

            if let Some(plan) = resolver.resolve(id) {
                plans.push(plan);
            } else {
                tracing::trace!(ty = %id, "skipped: no eligible constructor");
            }
        }

        let targets = collect_dispatch_targets(self.catalog.call_sites());
        let dispatch = DispatchTable::build(targets, &resolver);

        let mut units = vec![
            dispatch::declaration(self.config),
            dispatch::dispatcher(&dispatch, resolver.aliases(), self.config),
        ];
        for plan in &plans {
            units.extend(synth.render(plan));
        }

        let diagnostics = resolver.diagnostics();
        for diagnostic in &diagnostics {
            tracing::warn!(code = diagnostic.id, "{diagnostic}");
        }

        self.cancel.check()?;

        tracing::debug!(
            plans = plans.len(),
            units = units.len(),
            dispatch = dispatch.len(),
            diagnostics = diagnostics.len(),
            "generation finished"
        );

        Ok(Generation {
            plans,
            units,
            diagnostics,
            dispatch,
        })
    }
}

/// Generate with a fresh, never-cancelled token.
pub fn generate<C>(catalog: &C, config: &Config) -> Result<Generation, GenerateError>
where
    C: TypeCatalog + ?Sized,
{
    Generator::new(catalog, config).generate()
}
