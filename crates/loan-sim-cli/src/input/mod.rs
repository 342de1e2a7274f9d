pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Structured input from `--input <file>` if given, otherwise from piped
/// stdin. `None` means the caller should fall back to individual flags.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(p) => file::read_input(p).map(Some),
        None => stdin::read_stdin(),
    }
}
