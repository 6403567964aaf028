//! # webgrab CLI
//!
//! Command-line interface for the webgrab library. Provides a wget-like
//! interface for downloading single files, shallowly mirroring a page and
//! rewriting saved HTML for offline viewing.

use std::path::{Path, PathBuf};

use clap::Parser;
use log::debug;
use url::Url;
use webgrab::{DownloadOptions, Error, MirrorOptions, Result};

/// Command-line interface for webgrab
#[derive(Parser)]
#[command(name = "webgrab")]
#[command(about = "Wget-style HTTP downloader with mirroring and offline link rewriting")]
#[command(long_about = "Downloads single HTTP resources, mirrors a page shallowly, or rewrites
links in a saved HTML file:
  webgrab https://example.com/file.iso              # Direct download
  webgrab --limit 100 https://example.com/file.iso  # Cap at 100 KB/s
  webgrab -O out.iso -P ~/downloads <url>           # Pick name and directory
  webgrab --mirror --reject exe,zip <url>           # Page + assets
  webgrab --convert-links page.html                 # Rewrite links in place")]
#[command(version = env!("WEBGRAB_VERSION"))]
struct Cli {
    /// URL to download, or the HTML file to rewrite with --convert-links
    url: String,

    /// Reserved output argument kept for wget compatibility
    #[arg(value_name = "OUTPUT")]
    output: Option<String>,

    /// Mirror the page and its directly referenced assets
    #[arg(long, conflicts_with = "convert_links")]
    mirror: bool,

    /// Rewrite links in a local HTML file to relative paths
    #[arg(long)]
    convert_links: bool,

    /// Comma-separated list of file extensions to reject in mirror mode
    #[arg(long, value_name = "EXT,EXT")]
    reject: Option<String>,

    /// Comma-separated list of file extensions to accept in mirror mode
    #[arg(long, value_name = "EXT,EXT")]
    accept: Option<String>,

    /// Accepted for wget compatibility; recursion is not performed
    #[arg(long)]
    recursive: bool,

    /// Download speed limit in KB/s (0 = unlimited)
    #[arg(long, default_value_t = 0.0, value_name = "KB_PER_SEC")]
    limit: f64,

    /// Save the download under this file name
    #[arg(short = 'O', value_name = "FILE")]
    output_file: Option<String>,

    /// Save the download into this directory; a leading ~ expands to $HOME
    #[arg(short = 'P', value_name = "DIR")]
    output_dir: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        println!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("webgrab v{} starting...", env!("WEBGRAB_VERSION"));
    }

    if cli.output.is_some() {
        debug!("positional OUTPUT is reserved and ignored; use -O/-P to steer the destination");
    }

    // Exactly one of {mirror, convert-links, direct download} runs.
    if cli.mirror {
        let options = MirrorOptions {
            reject: cli.reject.clone(),
            accept: cli.accept.clone(),
            recursive: cli.recursive,
        };
        webgrab::mirror(&cli.url, &options).await
    } else if cli.convert_links {
        webgrab::rewrite_links(Path::new(&cli.url))?;
        println!("Links converted successfully.");
        Ok(())
    } else {
        let save_path = resolve_save_path(&cli)?;
        let options = DownloadOptions {
            rate_limit: cli.limit * 1024.0,
            ..Default::default()
        };
        webgrab::download_with_options(&cli.url, &save_path, &options).await
    }
}

/// Resolve where a direct download lands from `-O`, `-P` and the URL.
fn resolve_save_path(cli: &Cli) -> Result<PathBuf> {
    let file_name = match &cli.output_file {
        Some(name) => name.clone(),
        None => default_file_name(&cli.url),
    };

    match &cli.output_dir {
        Some(dir) => {
            let dir = expand_home(dir);
            std::fs::create_dir_all(&dir).map_err(Error::IoError)?;
            Ok(dir.join(file_name))
        }
        None => Ok(PathBuf::from(file_name)),
    }
}

/// Last non-empty path segment of the URL, or `index.html` for bare hosts.
fn default_file_name(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments().and_then(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .next_back()
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| "index.html".to_string())
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(dir: &str) -> PathBuf {
    if let Some(rest) = dir.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_name_from_url_path() {
        assert_eq!(
            default_file_name("http://example.com/dir/file.tar.gz"),
            "file.tar.gz"
        );
        assert_eq!(default_file_name("http://example.com/file.bin?v=2"), "file.bin");
    }

    #[test]
    fn test_default_file_name_for_bare_host() {
        assert_eq!(default_file_name("http://example.com"), "index.html");
        assert_eq!(default_file_name("http://example.com/"), "index.html");
        assert_eq!(default_file_name("not a url"), "index.html");
    }

    #[test]
    fn test_expand_home_replaces_leading_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home("~/downloads"), home.join("downloads"));
        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home("/tmp/plain"), PathBuf::from("/tmp/plain"));
    }

    #[test]
    fn test_save_path_prefers_output_file_name() {
        let cli = Cli::parse_from([
            "webgrab",
            "-O",
            "renamed.bin",
            "http://example.com/original.bin",
        ]);
        assert_eq!(
            resolve_save_path(&cli).unwrap(),
            PathBuf::from("renamed.bin")
        );
    }

    #[test]
    fn test_mirror_and_convert_links_conflict() {
        let result = Cli::try_parse_from([
            "webgrab",
            "--mirror",
            "--convert-links",
            "http://example.com",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_url_is_required() {
        assert!(Cli::try_parse_from(["webgrab"]).is_err());
    }
}
