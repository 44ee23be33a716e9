fn main() -> Result<(), Box<dyn std::error::Error>> {
    dynamically::build!("catalog.json", ["src/lib.rs", "src/tests.rs"]);

    Ok(())
}
