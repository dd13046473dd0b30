use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use roundtrip::config::example_config;

/// Write an example configuration file, refusing to overwrite one
pub fn init_command(path: &Path, out: &mut impl Write) -> Result<()> {
    if path.exists() {
        return Err(anyhow!(
            "Configuration file already exists: {}",
            path.display()
        ));
    }

    std::fs::write(path, example_config())
        .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

    writeln!(out, "Created example configuration file: {}", path.display())?;
    writeln!(out, "Then run: roundtrip run --config {}", path.display())?;
    Ok(())
}
