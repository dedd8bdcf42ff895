//! `bcdl formats` – list supported file types.

use bcdl_core::format::FileType;

pub fn run_formats() {
    for ft in FileType::ALL {
        let kind = if ft.is_lossless() { "lossless" } else { "lossy" };
        println!("{:<14} {}", ft.as_str(), kind);
    }
}
