use derive_more::Display;
use dynamically_schema::prelude::*;
use std::fmt;

///
/// Severity
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Severity {
    #[display("warning")]
    Warning,
}

///
/// Diagnostic
///
/// A non-fatal finding from a generation pass. The only kind today is
/// `FactoryNotAccessible` (`DYN001`): a record declares a factory method the
/// generating module cannot call, so a companion is used instead.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub id: &'static str,
    pub severity: Severity,
    pub type_name: String,
    pub method: String,
    pub module: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub const FACTORY_NOT_ACCESSIBLE: &'static str = "DYN001";

    #[must_use]
    pub fn factory_not_accessible(ty: &TypeDef, method: &Method, module: &str) -> Self {
        Self {
            id: Self::FACTORY_NOT_ACCESSIBLE,
            severity: Severity::Warning,
            type_name: ty.id.to_string(),
            method: method.name.clone(),
            module: module.to_string(),
            location: method.location.clone().or_else(|| ty.location.clone()),
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "factory method '{}::{}' is not accessible from module '{}' and cannot support hierarchical dynamic conversion",
            self.type_name, self.method, self.module
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }

        write!(f, "{}[{}]: {}", self.severity, self.id, self.message())
    }
}

///
/// DiagnosticSink
///

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_location_and_code() {
        let mut ty = TypeDef::new("records::shapes::Tag".parse().unwrap());
        ty.location = Some(Location::new("src/lib.rs", 1, 1));
        let method = Method::factory("create", Accessibility::Private)
            .with_location(Location::new("src/lib.rs", 40, 5));

        let diagnostic = Diagnostic::factory_not_accessible(&ty, &method, "records");

        assert_eq!(
            diagnostic.to_string(),
            "src/lib.rs:40:5: warning[DYN001]: factory method 'records::shapes::Tag::create' \
             is not accessible from module 'records' and cannot support hierarchical dynamic conversion"
        );
    }

    #[test]
    fn falls_back_to_type_location() {
        let mut ty = TypeDef::new("lib::Point".parse().unwrap());
        ty.location = Some(Location::new("lib.rs", 3, 1));
        let method = Method::factory("create_many", Accessibility::Crate);

        let diagnostic = Diagnostic::factory_not_accessible(&ty, &method, "app");

        assert_eq!(diagnostic.location, ty.location);
    }
}
