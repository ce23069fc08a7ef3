use vergen::EmitBuilder;

#[allow(dead_code)]
#[path = "src/grammar.rs"]
mod grammar;

// Lets a packaging system stamp the build without relying on a git checkout.
const BUILD_METADATA_VAR: &str = "BIGQUERY_VERSION_BUILD_METADATA";

// vergen writes this in place of every value it could not determine.
const VERGEN_UNKNOWN: &str = "VERGEN_IDEMPOTENT_OUTPUT";

fn revision_from_vcs() -> String {
    // Also emits the rerun-if-changed triggers for the repository state.
    if let Err(e) = EmitBuilder::builder().git_sha(true).emit_and_set() {
        println!("cargo::warning=git revision unavailable: {e}");
        return String::new();
    }
    match std::env::var("VERGEN_GIT_SHA") {
        Ok(sha) if sha != VERGEN_UNKNOWN => sha,
        _ => String::new(),
    }
}

fn main() {
    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-changed=src/grammar.rs");
    println!("cargo::rerun-if-env-changed={BUILD_METADATA_VAR}");

    let raw = std::env::var(BUILD_METADATA_VAR).unwrap_or_else(|_| revision_from_vcs());

    let rev = grammar::sanitize_build_metadata(&raw);
    if rev != raw.trim() {
        println!("cargo::warning=build metadata {raw:?} was reduced to {rev:?}");
    }
    println!("cargo::rustc-env=GIT_REVISION={rev}");
}
