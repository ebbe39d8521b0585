use std::env;
use std::process::Command;

fn main() {
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    let profile = env::var("PROFILE").unwrap_or_default();

    // Release builds report the bare package version
    let full_version = if profile == "debug" {
        let hash = git_output(&["rev-parse", "--short=8", "HEAD"]).unwrap_or_else(|| "unknown".into());
        let dirty = !git_succeeds(&["diff", "--quiet"]) || !git_succeeds(&["diff", "--cached", "--quiet"]);
        format!("{}-dev+{}{}", version, hash, if dirty { ".dirty" } else { "" })
    } else {
        version
    };

    println!("cargo:rustc-env=SLASH_REGISTRY_VERSION={}", full_version);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");
}

fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Missing git counts as success so builds outside a checkout are never marked dirty.
fn git_succeeds(args: &[&str]) -> bool {
    Command::new("git")
        .args(args)
        .status()
        .map(|status| status.success())
        .unwrap_or(true)
}
