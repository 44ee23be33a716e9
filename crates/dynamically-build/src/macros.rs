//! Build-script helper that generates factories into `OUT_DIR`.
//!
//! Paths are relative to the crate manifest. The calling `main` must return
//! a `Result` whose error accepts `dynamically::build::BuildError`.
//!
//! ```ignore
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     dynamically::build!("catalog.json", ["src/lib.rs"]);
//!     Ok(())
//! }
//! ```
#[macro_export]
macro_rules! build {
    ($catalog:expr) => {
        $crate::build!($catalog, [])
    };
    ($catalog:expr, [$($source:expr),* $(,)?]) => {
        //
        // CARGO
        //
        // the generated file is included with
        // include!(concat!(env!("OUT_DIR"), "/dynamically.rs"))
        //

        $crate::build_to_out_dir($catalog, &[$($source),*])?;
    };
}
