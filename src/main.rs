use fd_stencil::convergence::{self, ConvergenceParameters};
use fd_stencil::utilities::dump_default_to_json_file;
use fd_stencil::{Axis, DerivativeKind, StaggerType, StencilDescriptor};

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(StructOpt, Debug)]
#[structopt(name = "fd_stencil", about = "Finite difference stencil tables and accuracy checks")]
struct Opt {
    /// Log at debug level
    #[structopt(short, long)]
    verbose: bool,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
#[structopt(rename_all = "kebab-case")]
enum Command {
    /// Print every supported stencil
    List,

    /// Print a single stencil
    Describe {
        /// first or second
        #[structopt(long, default_value = "first")]
        derivative: DerivativeKind,

        /// Accuracy order
        #[structopt(long, default_value = "2")]
        order: usize,

        /// central, left or right
        #[structopt(long, default_value = "central")]
        stagger: StaggerType,
    },

    /// Measure the observed order of accuracy of a stencil
    Convergence {
        /// JSON parameter file; command line values override it
        #[structopt(long = "config")]
        config_path: Option<PathBuf>,

        #[structopt(long)]
        derivative: Option<DerivativeKind>,

        #[structopt(long)]
        order: Option<usize>,

        #[structopt(long)]
        stagger: Option<StaggerType>,

        /// x or y
        #[structopt(long)]
        axis: Option<Axis>,

        #[structopt(long)]
        wavenumber: Option<f64>,

        /// Write records here instead of stdout
        #[structopt(long)]
        output: Option<PathBuf>,
    },

    /// Write the default convergence parameters as JSON
    DumpConfig {
        #[structopt(long)]
        output: String,
    },
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            let writer = BufWriter::new(fs::File::create(path)?);
            serde_json::to_writer_pretty(writer, value)?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, value)?;
            writeln!(handle)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let opt = Opt::from_args();

    let level = if opt.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match opt.command {
        Command::List => {
            let all: Vec<StencilDescriptor> = StencilDescriptor::supported().collect();
            write_json(&all, None)?;
        }
        Command::Describe { derivative, order, stagger } => {
            let descriptor = StencilDescriptor::lookup(derivative, order, stagger)?;
            write_json(&descriptor, None)?;
        }
        Command::Convergence {
            config_path,
            derivative,
            order,
            stagger,
            axis,
            wavenumber,
            output,
        } => {
            let mut p: ConvergenceParameters = match &config_path {
                Some(path) => {
                    let reader = BufReader::new(fs::File::open(path)?);
                    serde_json::from_reader(reader)?
                }
                None => ConvergenceParameters::default(),
            };

            // Update using values from cmdline
            if let Some(derivative) = derivative {
                p.derivative = derivative;
            }
            if let Some(order) = order {
                p.order = order;
            }
            if let Some(stagger) = stagger {
                p.stagger = stagger;
            }
            if let Some(axis) = axis {
                p.axis = axis;
            }
            if let Some(wavenumber) = wavenumber {
                p.wavenumber = wavenumber;
            }

            let records = convergence::run(&p)?;
            for record in records.iter() {
                match record.observed_order {
                    Some(observed) => info!(
                        n = record.n,
                        max_error = record.max_error,
                        observed_order = observed,
                        "level"
                    ),
                    None => info!(n = record.n, max_error = record.max_error, "level"),
                }
            }
            write_json(&records, output.as_ref())?;
        }
        Command::DumpConfig { output } => {
            dump_default_to_json_file::<ConvergenceParameters>(&output)?;
            info!(path = %output, "wrote default parameters");
        }
    }

    Ok(())
}
