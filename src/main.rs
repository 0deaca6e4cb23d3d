//! ailloy CLI binary
//!
//! All logic lives in the library; main.rs only invokes cli::run().

fn main() {
    // cli::run() handles all output, including errors.
    if let Err(code) = ailloy::cli::run() {
        std::process::exit(code);
    }
}
