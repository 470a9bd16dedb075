use std::env;

fn main() {
    // Surfaced by `loyalty-lens version`
    println!(
        "cargo:rustc-env=LOYALTY_LENS_RUSTC_VERSION={}",
        env::var("RUSTC_VERSION").unwrap_or_else(|_| "unknown".to_string())
    );
    println!("cargo:rerun-if-env-changed=RUSTC_VERSION");
}
