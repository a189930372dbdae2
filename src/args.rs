use clap::Parser;
pub use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "wavegrid",
    version = "0.1.0",
    about = "Render diagnostic figures from 4D stacking/migration source-location grids."
)]
pub struct Args {
    /// Path to a test-info JSON file describing the grid (shape, spacing,
    /// true indexes, stack shift time, data file).
    #[arg(long, aliases = ["in", "inp", "inpu"])]
    pub input: Option<PathBuf>,

    /// Output directory for figures. Defaults to a `figures` directory next
    /// to the input file, or `$WAVEGRID_PATH/test_figures` for --selftest.
    #[arg(long, aliases = ["fig", "fig-d", "fig-di"])]
    pub fig_dir: Option<PathBuf>,

    /// Also render the normalized max-projection curves of the grid.
    #[arg(long, aliases = ["cu", "cur", "curv", "curve"])]
    pub curves: bool,

    /// Render the synthetic smoke-test marginal figures and exit.
    #[arg(long)]
    pub selftest: bool,

    /// Enable debug logging.
    #[arg(long, short)]
    pub verbose: bool,
}
