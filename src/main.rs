mod args;
mod survey;

use clap::Parser;
use log::{error, info, LevelFilter};

use crate::args::{Args, Command};
use crate::survey::config_reader::{read_config, SurveyConfig};
use crate::survey::{OutputOptions, SurveyResult};

fn load_config(path: &Option<String>) -> SurveyResult<SurveyConfig> {
    match path {
        Some(p) => read_config(p),
        None => Ok(SurveyConfig::default()),
    }
}

fn run(args: Args) -> SurveyResult<()> {
    let config = load_config(&args.config)?;
    match args.command {
        Command::Questions => {
            survey::run_questions();
            Ok(())
        }
        Command::Submit {
            respondent,
            answers,
            output,
        } => {
            let config = config.with_dataset(output.dataset);
            let output = OutputOptions {
                out: output.out,
                reference: output.reference,
            };
            survey::run_submit(
                &config,
                &respondent.name,
                &respondent.team,
                &respondent.place,
                answers,
                &output,
            )
        }
        Command::Report { name, output } => {
            let config = config.with_dataset(output.dataset);
            let output = OutputOptions {
                out: output.out,
                reference: output.reference,
            };
            survey::run_report(&config, &name, &output)
        }
        Command::Import {
            input,
            excel_worksheet_name,
            dataset,
        } => {
            let config = config.with_dataset(dataset);
            survey::run_import(&config, &input, excel_worksheet_name.as_deref())
        }
        Command::Allocate => survey::run_allocate(&config),
    }
}

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
    info!("args: {:?}", args);

    if let Err(e) = run(args) {
        error!("{:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
