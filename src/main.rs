use anyhow::Context as _;
use clap::Parser;
use rekon::commands::reconcile::{self, format_summary, humanize_error};
use rekon::config::Cli;
use rekon::ui::{ConsoleOperator, Messages};
use rekon::{Config, RekonError, RunStats, EXIT_FAILURE};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = rekon::logging::init(cli.verbose) {
        eprintln!("warning: logging disabled: {}", e);
    }

    let mut config = match Config::try_from(cli) {
        Ok(config) => config,
        Err(e) => {
            report(&anyhow::Error::new(e));
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let messages = Messages::new(config.lang);
    let mut operator = ConsoleOperator::new(
        io::stdin().lock(),
        io::stdout().lock(),
        messages,
        config.dry_run,
    )
    .styled(console::colors_enabled())
    .time_mode(config.time_mode);

    let outcome = session(&mut config, &mut operator);
    let code = match &outcome {
        Ok(stats) => {
            if let Err(e) = operator.say(&format_summary(stats)) {
                report(&anyhow::Error::new(e));
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            let cause = error.downcast_ref::<RekonError>();
            if !cause.is_some_and(RekonError::is_quit) {
                report(error);
            }
            ExitCode::from(cause.map_or(EXIT_FAILURE, RekonError::exit_code))
        }
    };

    if config.pause_on_exit {
        let message = if outcome.is_ok() {
            messages.completed()
        } else {
            messages.aborted()
        };
        // Nothing left to report if the terminal is gone
        let _ = operator.pause(message);
    }
    code
}

/// Resolve any missing root interactively, then reconcile
fn session<R: BufRead, W: Write>(
    config: &mut Config,
    operator: &mut ConsoleOperator<R, W>,
) -> anyhow::Result<RunStats> {
    let messages = operator.messages();
    if config.missing_roots() {
        if config.source.as_os_str().is_empty() {
            config.source = operator.prompt_root(messages.ask_source())?;
        }
        if config.destination.as_os_str().is_empty() {
            config.destination = operator.prompt_root(messages.ask_destination())?;
        }
    }

    if config.dry_run {
        operator.banner()?;
    }

    let stats = reconcile::run(config, operator).with_context(|| {
        format!(
            "reconciling {} with {}",
            config.source.display(),
            config.destination.display()
        )
    })?;
    Ok(stats)
}

fn report(error: &anyhow::Error) {
    match error.downcast_ref::<RekonError>() {
        Some(rekon_error) => {
            let (message, suggestion) = humanize_error(rekon_error);
            eprintln!("Error: {}", message);
            if let Some(suggestion) = suggestion {
                eprintln!("  Try: {}", suggestion);
            }
            for cause in error.chain().skip(1) {
                tracing::debug!(%cause, "error chain");
            }
        }
        None => eprintln!("Error: {:#}", error),
    }
}
