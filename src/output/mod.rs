mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::Spinner;
pub use summary::{print_builds, print_dashboard, print_projects, print_release};

use styling::{dim, magenta_bold};

// Banner

pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🔭 AdoLens"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Azure DevOps Dashboard")
    );
}
