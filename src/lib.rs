//! Game-playing agents for Connect Four: a 6x7 board where two players take
//! turns dropping tokens into columns and the first to align four tokens
//! wins.
//!
//! The crate provides the [board model](game), a [static
//! evaluation](evaluation), depth-limited [tree searches](search)
//! (alpha-beta and expectimax), [Monte Carlo Tree Search](mcts) and the
//! [`agent`] layer that puts them behind a single interface. The [`Engine`]
//! exposes the agents over a line-based text protocol.

#![warn(missing_docs, variant_size_differences)]
// Rustc lints.
#![warn(
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]
// Rustdoc lints.
#![warn(
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
// Search speed matters.
#![deny(clippy::perf)]

pub mod agent;
pub mod evaluation;
pub mod game;
pub mod mcts;
pub mod search;

mod engine;
pub use engine::Engine;
use shadow_rs::shadow;

shadow!(build);

/// Build profile, optimization level and debug assertions. Produced by
/// `build.rs`.
const BUILD_SETTINGS: &str = include_str!(concat!(env!("OUT_DIR"), "/settings"));

/// Returns the full engine version that can be used to identify how it was
/// built in the first place.
fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Logs the engine version and build details on startup.
pub fn log_build_info() {
    log::info!("dropfour {}", engine_version());
    log::info!("release build: {}", !shadow_rs::is_debug());
    log::info!("build settings: {BUILD_SETTINGS}");
    if !shadow_rs::git_clean() {
        log::warn!("built with uncommitted changes");
    }
}
