//! Rules engine for Chessworth, a chess variant where a piece capturing a
//! piece of higher value is destroyed together with it. For more information,
//! see [README].
//!
//! [`chess`] implements the standard rules, [`variant`] layers the mutual
//! destruction on top of them and [`session`] runs an interactive game.
//!
//! [README]: https://github.com/Tanmaya-Mohanty/chessworth/blob/main/README.md

pub mod chess;
pub mod session;
pub mod variant;

use shadow_rs::shadow;

shadow!(build);

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
fn version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints the version and the repository on startup.
pub fn print_engine_info() {
    println!("Chessworth {}", version());
    println!("<https://github.com/Tanmaya-Mohanty/chessworth>");
}

/// Prints the build type and whether the build is clean on startup.
pub fn print_binary_info() {
    println!("Release build: {}", !shadow_rs::is_debug());
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
