//! sockid-dump - capture a socket identity from a memory image.
//!
//! Loads a raw memory image at a base address, runs the socket or sockaddr
//! snapshot against a handle inside it, and prints the resulting record.

mod output;

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use sockid::layout::LayoutProfile;
use sockid::memory::MemoryImage;
use sockid::snapshot::{SockPtr, SockaddrPtr, SockaddrSnapshot, SocketSnapshot};

#[derive(Parser)]
#[command(
    name = "sockid-dump",
    version,
    about = "Capture socket network identities from a memory image"
)]
#[command(group(ArgGroup::new("handle").required(true).args(["sock", "sockaddr"])))]
struct Cli {
    /// Raw memory image file.
    #[arg(short = 'i', long)]
    image: PathBuf,

    /// Address the image is mapped at.
    #[arg(short = 'b', long, value_parser = parse_addr, default_value = "0")]
    base: u64,

    /// Kernel layout profile (JSON) for socket captures.
    #[arg(short = 'l', long)]
    layout: Option<PathBuf>,

    /// Capture the `struct sock` at this address.
    #[arg(long, value_parser = parse_addr, requires = "layout")]
    sock: Option<u64>,

    /// Capture the `struct sockaddr` at this address.
    #[arg(long, value_parser = parse_addr)]
    sockaddr: Option<u64>,

    /// Output in JSON format.
    #[arg(short = 'j', long, conflicts_with = "raw")]
    json: bool,

    /// Print the 64-byte wire record as hex.
    #[arg(short = 'r', long)]
    raw: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let data = std::fs::read(&cli.image)
        .with_context(|| format!("failed to read image {}", cli.image.display()))?;
    let image = MemoryImage::builder()
        .region(cli.base, bytes::Bytes::from(data))
        .build();
    tracing::debug!(
        base = cli.base,
        len = image.mapped_len(),
        "memory image loaded"
    );

    let record = match (cli.sock, cli.sockaddr) {
        (Some(sk), _) => {
            // clap enforces --layout alongside --sock
            let path = cli.layout.as_ref().context("--sock requires --layout")?;
            let profile = LayoutProfile::load(path)
                .with_context(|| format!("failed to load layout {}", path.display()))?;
            let snapshot = SocketSnapshot::resolve(&profile)
                .with_context(|| format!("invalid layout profile '{}'", profile.name))?;
            snapshot.capture(&image, SockPtr::new(sk))
        }
        (None, Some(sa)) => SockaddrSnapshot::linux().capture(&image, SockaddrPtr::new(sa)),
        (None, None) => anyhow::bail!("one of --sock or --sockaddr is required"),
    };

    if cli.raw {
        output::print_raw(&record)?;
    } else if cli.json {
        output::print_json(&record)?;
    } else {
        output::print_text(&record)?;
    }

    Ok(())
}

/// Parse an address given in hex (`0x` prefix) or decimal.
fn parse_addr(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid address '{}': {}", s, e))
}
