use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use synacor_runtime::{IOHandler, VMConfig, VM};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const EXIT_LOAD_FAILURE: u8 = 1;
const EXIT_FAULT: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "synacor",
    about = "Synacor challenge binary data file virtual machine."
)]
struct Args {
    /// Binary image to run.
    #[arg(long, value_name = "PATH", default_value = "data/challenge.bin")]
    path: PathBuf,

    /// Run the built-in self-test program instead of --path.
    #[arg(long, default_value_t = false)]
    test: bool,

    /// Log every executed instruction (needs RUST_LOG=trace).
    #[arg(long, default_value_t = false)]
    trace: bool,

    /// File written by the !history console command.
    #[arg(long, value_name = "PATH", default_value = "history.txt")]
    history_file: PathBuf,

    /// File written by the !dump console command.
    #[arg(long, value_name = "PATH", default_value = "dump.bin")]
    dump_file: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = VMConfig {
        trace: args.trace,
        history_path: args.history_file.clone(),
        dump_path: args.dump_file.clone(),
    };

    let mut vm = if args.test {
        VM::load_test(config, IOHandler::stdio())
    } else {
        match VM::load(&args.path, config, IOHandler::stdio()) {
            Ok(vm) => vm,
            Err(err) => {
                error!("{:#}", anyhow::Error::new(err).context("failed to load image"));
                return ExitCode::from(EXIT_LOAD_FAILURE);
            }
        }
    };

    match execute(&mut vm) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(EXIT_FAULT)
        }
    }
}

fn execute(vm: &mut VM) -> anyhow::Result<()> {
    let outcome = vm.run();
    vm.io_mut()
        .flush_output()
        .context("failed to flush program output")?;
    let result = outcome
        .with_context(|| format!("virtual machine faulted at PC {:#06x}", vm.state().pc))?;
    info!(steps = result.steps, halt_reason = ?result.halt_reason, "run finished");
    Ok(())
}
