//! Shallow site mirroring
//!
//! Fetches a single page, downloads the assets it references directly and
//! stores everything flat in a host-named output directory alongside an
//! `index.html` holding the page markup verbatim. No recursion is performed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::warn;
use url::Url;

use crate::core::downloader::GLOBAL_CLIENT;
use crate::core::error::{Error, Result};
use crate::html::extract_links;

/// Wall-clock format used for the start/end lines
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Options accepted by mirror mode
#[derive(Debug, Default, Clone)]
pub struct MirrorOptions {
    /// Comma-separated file extensions to skip
    pub reject: Option<String>,

    /// Comma-separated file extensions to keep; everything is kept when empty
    pub accept: Option<String>,

    /// Accepted for wget compatibility; recursion is not performed
    pub recursive: bool,
}

/// An extracted asset reference and the file extension inferred from it
struct AssetLink {
    url: Url,
    extension: Option<String>,
}

impl AssetLink {
    fn new(url: Url) -> Self {
        let extension = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_string());
        Self { url, extension }
    }
}

/// Mirror `url` into a `<hostname>_mirror` directory in the working
/// directory.
///
/// Only the initial page fetch and the final `index.html` write are fatal;
/// individual asset failures are logged and skipped.
pub async fn mirror(url: &str, options: &MirrorOptions) -> Result<()> {
    println!("Starting website mirroring: {}", url);
    println!(
        "Started mirroring at: {}",
        Local::now().format(TIMESTAMP_FORMAT)
    );

    let host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());
    let output_dir = PathBuf::from(format!("{}_mirror", host));
    std::fs::create_dir_all(&output_dir).map_err(Error::IoError)?;

    let page = fetch_page(url).await?;

    // The fetch above only succeeds for a well-formed URL.
    let base = Url::parse(url)?;

    let reject = extension_set(options.reject.as_deref());
    let accept = extension_set(options.accept.as_deref());

    for link in extract_links(&page, &base) {
        let asset = AssetLink::new(link);
        if !is_wanted(&asset, &reject, &accept) {
            println!("Skipping: {}", asset.url);
            continue;
        }

        match download_asset(&asset.url, &output_dir).await {
            Ok(saved) => println!("Downloaded: {}", saved.display()),
            Err(e) => warn!("failed to download {}: {}", asset.url, e),
        }
    }

    std::fs::write(output_dir.join("index.html"), &page).map_err(Error::IoError)?;

    println!(
        "Website mirrored successfully! Saved in '{}'",
        output_dir.display()
    );
    println!("Completed at: {}", Local::now().format(TIMESTAMP_FORMAT));
    Ok(())
}

/// Fetch the target page as text
async fn fetch_page(url: &str) -> Result<String> {
    let response = GLOBAL_CLIENT.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus(status));
    }
    Ok(response.text().await?)
}

/// Bare GET-and-save for one asset, named by its final path segment
async fn download_asset(url: &Url, output_dir: &Path) -> Result<PathBuf> {
    let file_name = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .ok_or_else(|| Error::ParseError(format!("no usable file name in {}", url)))?;

    let response = GLOBAL_CLIENT.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus(status));
    }
    let body = response.bytes().await?;

    let file_path = output_dir.join(file_name);
    std::fs::write(&file_path, &body).map_err(Error::IoError)?;
    Ok(file_path)
}

/// Split a comma-separated extension list, trimming each entry
fn extension_set(list: Option<&str>) -> HashSet<String> {
    list.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|ext| !ext.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Rejection wins over acceptance; an empty accept set keeps everything.
fn is_wanted(asset: &AssetLink, reject: &HashSet<String>, accept: &HashSet<String>) -> bool {
    let extension = asset.extension.as_deref().unwrap_or("");
    if reject.contains(extension) {
        return false;
    }
    if accept.is_empty() {
        return true;
    }
    accept.contains(extension)
}
