//! The `hauler` binary.

fn main() {
    std::process::exit(hauler::cli::run());
}
