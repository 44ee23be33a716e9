use std::{collections::BTreeMap, fmt};

///
/// ErrorTree
///
/// Route-keyed aggregate of validation messages. Messages added without a
/// route sit at the root; `add_for` files them under a child route so the
/// rendered output reads `route: message`.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorTree {
    messages: Vec<String>,
    children: BTreeMap<String, Self>,
}

impl ErrorTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, err: impl fmt::Display) {
        self.messages.push(err.to_string());
    }

    pub fn add_for(&mut self, route: impl Into<String>, err: impl fmt::Display) {
        self.children.entry(route.into()).or_default().add(err);
    }

    /// Attach every message of `other` under `route`.
    pub fn merge_for(&mut self, route: impl Into<String>, other: Self) {
        if other.is_empty() {
            return;
        }

        let child = self.children.entry(route.into()).or_default();
        child.messages.extend(other.messages);
        for (key, tree) in other.children {
            child.merge_for(key, tree);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.children.values().all(Self::is_empty)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len() + self.children.values().map(Self::len).sum::<usize>()
    }

    /// Flatten into `(route, message)` pairs in route order.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);

        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        for message in &self.messages {
            out.push((prefix.to_string(), message.clone()));
        }

        for (key, child) in &self.children {
            let route = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            child.flatten_into(&route, out);
        }
    }

    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (route, message)) in self.flatten().into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if route.is_empty() {
                write!(f, "{message}")?;
            } else {
                write!(f, "{route}: {message}")?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for ErrorTree {}

/// Push a formatted message onto an `ErrorTree`.
#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {{
        $errs.add(format!($($arg)*));
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_is_ok() {
        assert!(ErrorTree::new().result().is_ok());
    }

    #[test]
    fn routes_render_in_order() {
        let mut errs = ErrorTree::new();
        errs.add_for("b", "second");
        errs.add_for("a", "first");
        err!(errs, "root {}", 1);

        assert_eq!(errs.len(), 3);
        assert_eq!(errs.to_string(), "root 1\na: first\nb: second");
    }

    #[test]
    fn merge_nests_child_routes() {
        let mut inner = ErrorTree::new();
        inner.add_for("field", "bad ident");

        let mut outer = ErrorTree::new();
        outer.merge_for("app::Point", inner);
        outer.merge_for("ignored", ErrorTree::new());

        assert_eq!(
            outer.flatten(),
            vec![("app::Point.field".to_string(), "bad ident".to_string())]
        );
    }
}
