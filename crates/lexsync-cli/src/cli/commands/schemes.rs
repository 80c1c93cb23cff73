//! `lexsync schemes` – list the supported source schemes.

use lexsync_core::source::supported_schemes;

pub fn run_schemes() {
    println!("{}", supported_schemes());
}
