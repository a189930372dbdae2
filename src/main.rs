use std::env;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser};

use wavegrid::args::Args;
use wavegrid::config::TestInfo;
use wavegrid::plot;
use wavegrid::read::read_stack_grid;
use wavegrid::reduce;
use wavegrid::selftest::synthetic_marginals;

fn main() -> Result<(), Box<dyn Error>> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // If no arguments are provided, print help and exit
            if env::args().len() <= 1 {
                let mut cmd = Args::command();
                cmd.print_help()?;
                return Ok(());
            } else {
                e.exit();
            }
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    if args.selftest {
        return run_selftest(&args);
    }

    let Some(input) = &args.input else {
        let mut cmd = Args::command();
        cmd.print_help()?;
        return Ok(());
    };

    let info = TestInfo::from_json(input)?;
    let fig_dir = match &args.fig_dir {
        Some(dir) => dir.clone(),
        None => input
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join("figures"),
    };
    fs::create_dir_all(&fig_dir)?;

    let grid = read_stack_grid(&info.dat_file, info.grid_shape)?;
    let out = plot::dirac_summary(&info, grid.view(), &fig_dir)?;
    log::info!("wrote {}", out.display());

    if args.curves {
        let (x, y, z, t) = info.axes();
        let stack_x = reduce::max_projection(grid.view(), 0)?;
        let stack_y = reduce::max_projection(grid.view(), 1)?;
        let stack_z = reduce::max_projection(grid.view(), 2)?;
        let stack_t = reduce::max_projection(grid.view(), 3)?;
        let base = fig_dir.join(
            info.dat_file
                .file_stem()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "stack_grid".to_string()),
        );
        let base = base
            .to_str()
            .ok_or("figure path is not valid UTF-8")?
            .to_string();
        plot::stack_curves(
            (&stack_x, &stack_y, &stack_z, &stack_t),
            (&x, &y, &z, &t),
            &base,
        )?;
        log::info!("wrote projection curves under {}", fig_dir.display());
    }

    Ok(())
}

fn run_selftest(args: &Args) -> Result<(), Box<dyn Error>> {
    let base_dir = match &args.fig_dir {
        Some(dir) => dir.clone(),
        None => PathBuf::from(env::var("WAVEGRID_PATH").map_err(|_| {
            "WAVEGRID_PATH is not set and --fig-dir was not given"
        })?),
    };
    let fig_dir = base_dir.join("test_figures");
    fs::create_dir_all(&fig_dir)?;

    let base_filename = fig_dir.join("testplot_st");
    let base_filename = base_filename
        .to_str()
        .ok_or("figure path is not valid UTF-8")?;

    let (marginals, x0, x1, x2, x3) = synthetic_marginals()?;
    plot::marginals_4d(&marginals, &x0, &x1, &x2, &x3, base_filename)?;
    log::info!("wrote marginal figures under {}", fig_dir.display());
    Ok(())
}
