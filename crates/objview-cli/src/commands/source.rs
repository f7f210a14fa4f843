use std::path::{Path, PathBuf};

use clap::Args;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, info};

use objview_core::{AppConfig, Error, Listing, Result};

/// Where the objdump listing comes from
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// `objdump -d -l` output to read (`-` for stdin)
    pub file: Option<PathBuf>,

    /// Disassemble this binary with objdump instead of reading a listing
    #[arg(short = 'b', long, conflicts_with = "file")]
    pub binary: Option<PathBuf>,
}

impl SourceArgs {
    /// Read and parse the listing
    pub async fn load(&self, config: &AppConfig) -> Result<Listing> {
        let text = match (&self.file, &self.binary) {
            (_, Some(binary)) => disassemble(&config.host.objdump_path, binary).await?,
            (Some(file), None) if file.as_os_str() == "-" => read_stdin().await?,
            (Some(file), None) => {
                debug!("Reading listing from {}", file.display());
                tokio::fs::read_to_string(file).await?
            }
            (None, None) => {
                return Err(Error::Other(
                    "no listing given; pass a file, `-` for stdin, or --binary".to_string(),
                ))
            }
        };

        let listing = Listing::parse(&text);
        if listing.is_empty() {
            return Err(Error::EmptyListing);
        }
        Ok(listing)
    }
}

async fn read_stdin() -> Result<String> {
    let mut text = String::new();
    tokio::io::stdin().read_to_string(&mut text).await?;
    debug!("Read {} bytes from stdin", text.len());
    Ok(text)
}

/// Run `objdump -d -l` on `binary` and return its output
async fn disassemble(objdump: &str, binary: &Path) -> Result<String> {
    info!("Running {} -d -l {}", objdump, binary.display());

    let output = Command::new(objdump)
        .arg("-d")
        .arg("-l")
        .arg(binary)
        .output()
        .await
        .map_err(|e| Error::Objdump(format!("failed to run {}: {}", objdump, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Objdump(format!(
            "{} exited with {}: {}",
            objdump,
            output.status,
            stderr.trim()
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| Error::Objdump(format!("output is not UTF-8: {}", e)))
}
