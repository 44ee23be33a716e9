use crate::resolve::Variant;
use dynamically_schema::{prelude::*, validate::validate_ident};

///
/// Config
///
/// Naming and shape knobs for one generation pass. Every field has a
/// default, so an absent or partial `dynamically.toml` is fine.
///
/// - `mount` is the path the generated file is included at
/// - `private_root` is the module companions live under
/// - `single`/`many` name the two factory methods
/// - `entry_*` name the generic entry point module, function, and trait
/// - `sequence_types` are the single-parameter containers treated as
///   sequences (matched on the last path segment)
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub mount: String,
    pub private_root: String,
    pub single: String,
    pub many: String,
    pub entry_module: String,
    pub entry_fn: String,
    pub entry_trait: String,
    pub sequence_types: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mount: "crate".to_string(),
            private_root: "__dynamically".to_string(),
            single: "create".to_string(),
            many: "create_many".to_string(),
            entry_module: "dynamically".to_string(),
            entry_fn: "create".to_string(),
            entry_trait: "Create".to_string(),
            sequence_types: ["Vec", "VecDeque", "LinkedList"]
                .into_iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    #[must_use]
    pub fn method(&self, variant: Variant) -> &str {
        match variant {
            Variant::Single => &self.single,
            Variant::Many => &self.many,
        }
    }

    /// Whether a generic with this path is a recognised sequence shape.
    #[must_use]
    pub fn is_sequence(&self, path: &str) -> bool {
        let last = path.rsplit("::").next().unwrap_or(path);

        self.sequence_types.iter().any(|s| s == last)
    }

    pub fn validate(&self) -> Result<(), ErrorTree> {
        let mut errs = ErrorTree::new();

        let mut segments = self.mount.split("::");
        match segments.next() {
            Some("crate" | "self" | "super") => {}
            Some(first) => check(&mut errs, "mount", first),
            None => {}
        }
        for segment in segments {
            check(&mut errs, "mount", segment);
        }

        for (route, ident) in [
            ("private_root", &self.private_root),
            ("single", &self.single),
            ("many", &self.many),
            ("entry_module", &self.entry_module),
            ("entry_fn", &self.entry_fn),
            ("entry_trait", &self.entry_trait),
        ] {
            check(&mut errs, route, ident);
        }

        if self.single == self.many {
            errs.add_for("many", "single and many factory names must differ");
        }

        errs.result()
    }
}

fn check(errs: &mut ErrorTree, route: &str, ident: &str) {
    if let Err(e) = validate_ident(ident) {
        errs.add_for(route, e);
    }
}
