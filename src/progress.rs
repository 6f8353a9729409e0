//! Progress indicators for batched API writes.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for a batch of `len` requests.
///
/// Hidden when `quiet` is set.
pub fn bar(len: u64, prefix: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("  {spinner:.green} {prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb.set_prefix(prefix.to_string());
    pb
}
