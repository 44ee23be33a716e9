use crate::{Config, GenerateError, generate};
use dynamically_schema::{catalog::Catalog, scan::scan_call_sites};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Name of the optional generator config next to the crate manifest.
pub const CONFIG_FILE: &str = "dynamically.toml";

/// Name of the generated file inside `OUT_DIR`.
pub const OUTPUT_FILE: &str = "dynamically.rs";

///
/// BuildError
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("environment variable {0} is not set")]
    Env(&'static str),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Schema(#[from] dynamically_schema::Error),

    #[error("dynamically.toml: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Build-script entry point: load the catalog and config relative to the
/// crate manifest, merge call sites scanned from `sources`, generate, and
/// write `OUT_DIR/dynamically.rs`. Diagnostics become cargo warnings.
pub fn build_to_out_dir(catalog_file: &str, sources: &[&str]) -> Result<(), BuildError> {
    let manifest_dir = PathBuf::from(var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(var("OUT_DIR")?);

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={catalog_file}");
    println!("cargo:rerun-if-changed={CONFIG_FILE}");
    for source in sources {
        println!("cargo:rerun-if-changed={source}");
    }

    let config_path = manifest_dir.join(CONFIG_FILE);
    let config = if config_path.exists() {
        Config::from_toml(&read(&config_path)?)?
    } else {
        Config::default()
    };

    let mut catalog = Catalog::from_json(&read(&manifest_dir.join(catalog_file))?)?;
    for source in sources {
        let text = read(&manifest_dir.join(source))?;
        let sites = scan_call_sites(
            &catalog,
            &text,
            source,
            &config.entry_module,
            &config.entry_fn,
        )?;
        catalog.extend_call_sites(sites);
    }

    let generation = generate(&catalog, &config)?;
    for diagnostic in &generation.diagnostics {
        println!("cargo:warning={diagnostic}");
    }

    let out_path = out_dir.join(OUTPUT_FILE);
    fs::write(&out_path, generation.render()).map_err(|source| BuildError::Io {
        path: out_path,
        source,
    })?;

    Ok(())
}

fn var(name: &'static str) -> Result<String, BuildError> {
    env::var(name).map_err(|_| BuildError::Env(name))
}

fn read(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}
