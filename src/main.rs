use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use memgen::backend::MemoryWriter;
use memgen::config::Config;
use memgen::fpcore::{self, ast::Span, FPCoreParser};
use memgen::generator;
use memgen::memory::BankDistributor;
use memgen::opts::Opts;
use memgen::utils::{Diagnostic, Reporter};

/// Asks whether to go ahead. Only an explicit `n` declines.
fn confirm() -> io::Result<bool> {
    print!("Continue (y/n)? ");
    io::stdout().flush()?;

    let mut answer = String::new();

    io::stdin().lock().read_line(&mut answer)?;

    Ok(!answer.trim().eq_ignore_ascii_case("n"))
}

fn fail<M: Into<String>>(message: M) -> ExitCode {
    Reporter::new("", "").emit(&Diagnostic::error().with_message(message));

    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    env_logger::Builder::new()
        .filter_level(opts.log_level)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let config = match Config::from_file(&opts.config_file) {
        Ok(config) => config,
        Err(err) => return fail(err.to_string()),
    };

    let spec = &config.function;
    let filename = opts.function_file.to_string_lossy();

    let src = match fs::read_to_string(&opts.function_file) {
        Ok(src) => src,
        Err(err) => return fail(format!("cannot read `{filename}`: {err}")),
    };

    let mut reporter = Reporter::new(&filename, &src);

    let defs = match FPCoreParser::parse_file(&src) {
        Ok(defs) => defs,
        Err(err) => {
            reporter.emit(
                &Diagnostic::error()
                    .with_message("syntax error")
                    .with_primary(
                        Span::from(err.location.clone()),
                        err.variant.message(),
                    ),
            );

            return ExitCode::FAILURE;
        }
    };

    let function = match fpcore::bind(&defs, spec) {
        Ok(function) => function,
        Err(errors) => {
            reporter.emit_all(&errors);

            return ExitCode::FAILURE;
        }
    };

    let distributor =
        match BankDistributor::new(spec, function, opts.bank_capacity) {
            Ok(distributor) => distributor,
            Err(err) => return fail(err.to_string()),
        };

    let geometry = *distributor.geometry();

    if opts.suppress_confirmation {
        log::info!("{geometry}");
    } else {
        println!("{geometry}");

        match confirm() {
            Ok(true) => {}
            Ok(false) => return ExitCode::SUCCESS,
            Err(err) => return fail(err.to_string()),
        }
    }

    let memory_name = spec.memory_name();

    let writer = match MemoryWriter::create(
        &opts.working_dir,
        &memory_name,
        geometry,
        &src,
    ) {
        Ok(writer) => writer,
        Err(err) => return fail(err.to_string()),
    };

    log::info!("Creating block RAM memory in {}...", writer.dir().display());

    let summary = match generator::generate(
        distributor,
        &writer,
        &config.project_dir,
        opts.max_concurrent_runs,
    ) {
        Ok(summary) => summary,
        Err(err) => return fail(err.to_string()),
    };

    if summary.overflows > 0 {
        log::warn!("{} results overflowed the output width", summary.overflows);
    }

    log::info!("Generation process complete ({} banks)", summary.banks);

    ExitCode::SUCCESS
}
