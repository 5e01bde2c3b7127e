use clap::error::ErrorKind;
use clap::Parser;
use kiln_cli::Options;
use std::process::ExitCode;

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;

    let options = match Options::try_parse() {
        Ok(options) => options,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            e.print()?;
            return Ok(ExitCode::FAILURE);
        }
    };

    Ok(kiln_cli::run(&options))
}
