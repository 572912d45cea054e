//! `lit` - issue tracker in a single plain-text outline file.

use lit::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("lit: {e:#}");
        std::process::exit(1);
    }
}
