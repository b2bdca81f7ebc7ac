use clap::Parser;
use facetgen::config::usage_exit_code;
use facetgen::{CliArgs, GeneratorConfig, LoggingConfig, exit_code_for, generate, init_logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match CliArgs::try_parse() {
        Ok(cli) => cli,
        Err(e) => match usage_exit_code(&e) {
            None => e.exit(),
            Some(code) => {
                let _ = e.print();
                return ExitCode::from(code.code() as u8);
            }
        },
    };

    let _guard = match init_logging(LoggingConfig::from_env()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {e:#}");
            None
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            tracing::error!(category = code.category(), error = %format!("{e:#}"), "generation failed");
            eprintln!("error: {e:#}");
            ExitCode::from(code.code() as u8)
        }
    }
}

fn run(cli: CliArgs) -> anyhow::Result<()> {
    let config = GeneratorConfig::from_args(cli)?;
    let report = generate(&config)?;

    let verb = if report.emit.dry_run { "would write" } else { "wrote" };
    for path in report.emit.paths() {
        eprintln!("{verb} {}", path.display());
    }
    if let Some(manifest) = report.manifest.as_ref() {
        eprintln!("wrote manifest {}", manifest.display());
    }
    Ok(())
}
