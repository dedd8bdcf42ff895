//! `bcdl fingerprint` – print the history line for an album.

use bcdl_core::format::FileType;
use bcdl_core::history::fingerprint;

pub fn run_fingerprint(title: &str, format: FileType) {
    println!("{}", fingerprint(title, format));
}
