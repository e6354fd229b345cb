//! Build script for the dataset collector.
//!
//! Copies the `.env.example` template into the user's local data directory
//! (`<data dir>/tunecensus/.env.example`) so a ready-to-edit configuration
//! sits next to where the application looks for `.env`.
//!
//! A missing template only produces a cargo warning; directory or write
//! failures fail the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = std::path::PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    out_dir.push("tunecensus");
    std::fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
        let contents = std::fs::read_to_string(&env_example_path)?;
        std::fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
