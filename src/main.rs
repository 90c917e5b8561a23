/*!
 * Command-line interface for onefile
 */

use std::io::{self, Write};
use std::time::Instant;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use onefile::config::{Args, Command, PackArgs, PackConfig, UnpackArgs, UnpackConfig};
use onefile::report::{PackReport, ReportFormat, Reporter};
use onefile::unpack;
use onefile::Packer;

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    match args.command {
        Some(Command::Pack(pack_args)) => run_pack(pack_args),
        Some(Command::Unpack(unpack_args)) => run_unpack(unpack_args),
        None => {
            Args::command().print_help()?;
            Ok(())
        }
    }
}

fn run_pack(args: PackArgs) -> io::Result<()> {
    let config = PackConfig::from_args(args)?;
    config.validate()?;

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.set_prefix("📊 Packing");
    if config.stdout {
        progress.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let start_time = Instant::now();

    let packer = Packer::new(config.filter.clone())
        .with_locale(config.locale)
        .with_progress(progress);
    let document = packer.pack(&config.target_dir)?;
    let writer = packer.writer();

    if config.stdout {
        let text = writer.assemble(&document);
        io::stdout().write_all(text.as_bytes())?;
        return Ok(());
    }

    writer.write(&document, &config.output_file)?;
    let document_size = std::fs::metadata(&config.output_file)?.len();

    let report = PackReport::from_document(
        &document,
        config.output_file.display().to_string(),
        start_time.elapsed(),
        document_size,
    );
    Reporter::new(ReportFormat::ConsoleTable).print_pack_report(&report);

    Ok(())
}

fn run_unpack(args: UnpackArgs) -> io::Result<()> {
    let config = UnpackConfig::from_args(args);

    let result = unpack(&config.document, &config.target_dir)?;

    Reporter::new(ReportFormat::ConsoleTable)
        .print_unpack_report(&result, &config.target_dir.display().to_string());

    Ok(())
}
