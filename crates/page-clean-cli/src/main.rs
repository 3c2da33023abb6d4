//! Command line interface for the page cleaning library.
//!
//! Reads a captured HTML file (or stdin), cleans it against the capture's
//! source URL, and writes the result to stdout or a file. Captured pages from
//! Japanese universities are frequently Shift_JIS or EUC-JP, so input bytes
//! are charset-sniffed before decoding.

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use page_clean::records::RecordOptions;
use page_clean::{CleanOptions, blocks, clean_html, clean_text, records};

#[derive(Parser)]
#[command(
    name = "page-clean",
    version,
    about = "Clean captured faculty-listing HTML into bounded, profile-preserving output"
)]
struct Cli {
    /// Input HTML file; `-` or absent reads stdin
    input: Option<PathBuf>,

    /// Absolute URL the capture was fetched from (used to resolve links)
    #[arg(long = "url")]
    source_url: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Write output to FILE instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Cleaned, size-bounded markup
    Html,
    /// Plain-text extraction
    Text,
    /// Grouped content blocks as JSON
    Blocks,
    /// Extracted (name, theme, link) records as JSON
    Records,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let bytes = read_input(cli.input.as_deref())?;
    let html = decode_capture(&bytes);

    let options = CleanOptions::default();
    let rendered = match cli.format {
        Format::Html => clean_html(&html, &cli.source_url, &options),
        Format::Text => clean_text(&html, &cli.source_url, &options),
        Format::Blocks => {
            let rows = blocks::blockify(&html, &cli.source_url, &blocks::BlockifyOptions::default());
            serde_json::to_string_pretty(&rows).context("serializing blocks")?
        }
        Format::Records => {
            let rows = records::extract_records(&html, &cli.source_url, &RecordOptions::default());
            serde_json::to_string_pretty(&rows).context("serializing records")?
        }
    };

    match cli.output {
        Some(path) => std::fs::write(&path, rendered.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&std::path::Path>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))
        }
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

/// Decode captured bytes: BOM first, then a `meta charset` sniff, else UTF-8
/// with replacement.
fn decode_capture(bytes: &[u8]) -> String {
    if let Some((encoding, _)) = encoding_rs::Encoding::for_bom(bytes) {
        let (text, _, _) = encoding.decode(bytes);
        return text.into_owned();
    }
    if let Some(label) = sniff_meta_charset(bytes) {
        if let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes()) {
            let (text, _, _) = encoding.decode(bytes);
            return text.into_owned();
        }
    }
    let (text, _, _) = encoding_rs::UTF_8.decode(bytes);
    text.into_owned()
}

/// Find a `charset=` declaration in the head of the document.
fn sniff_meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(2048)];
    let lower: Vec<u8> = head.iter().map(u8::to_ascii_lowercase).collect();
    let marker = b"charset=";
    let pos = lower
        .windows(marker.len())
        .position(|window| window == marker)?;
    let rest = &head[pos + marker.len()..];
    let rest = rest.strip_prefix(b"\"").or_else(|| rest.strip_prefix(b"'")).unwrap_or(rest);
    let end = rest
        .iter()
        .position(|&b| matches!(b, b'"' | b'\'' | b'>' | b' ' | b'/' | b';'))
        .unwrap_or(rest.len());
    let label = String::from_utf8_lossy(&rest[..end]).trim().to_string();
    (!label.is_empty()).then_some(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_quoted_and_bare_charsets() {
        assert_eq!(
            sniff_meta_charset(b"<meta charset=\"utf-8\">").as_deref(),
            Some("utf-8")
        );
        assert_eq!(
            sniff_meta_charset(
                b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=Shift_JIS\">"
            )
            .as_deref(),
            Some("Shift_JIS")
        );
        assert_eq!(sniff_meta_charset(b"<p>none</p>"), None);
    }

    #[test]
    fn decodes_shift_jis_captures() {
        // 氏名 in Shift_JIS
        let mut bytes = b"<meta charset=\"shift_jis\"><p>".to_vec();
        bytes.extend_from_slice(&[0x8E, 0x81, 0x96, 0xBC]);
        bytes.extend_from_slice(b"</p>");
        let decoded = decode_capture(&bytes);
        assert!(decoded.contains("氏名"));
    }
}
