use std::env;

fn main() {
    // Expose the package version to the binary and the HTTP User-Agent string.
    let version = env::var("CARGO_PKG_VERSION").expect("CARGO_PKG_VERSION is set by cargo");
    println!("cargo:rustc-env=WEBGRAB_VERSION={}", version);

    println!("cargo:rerun-if-changed=Cargo.toml");
}
