// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive menu.
//
// Module responsibilities:
// - `book`: The book record plus the parsing and rendering helpers the
//   prompts rely on.
// - `store`: Reads and writes the catalog file.
// - `catalog`: Add/remove/search/list/stats over an owned catalog value.
// - `ui`: Implements the terminal menu and delegates to `catalog`.
//
// Keeping the UI out of `catalog` means every operation can be tested
// against a temp file without a terminal.
pub mod book;
pub mod catalog;
pub mod error;
pub mod store;
pub mod ui;

pub use error::{LibraryError, Result};
