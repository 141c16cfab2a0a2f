use clap::{Parser, Subcommand};

/// This is the VCLARIFI leadership survey program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. See the manual for the options. All the
    /// options have defaults.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Prints the survey questions and the answer scale.
    Questions,
    /// Records a survey submission and reports on the dataset.
    Submit {
        #[clap(flatten)]
        respondent: RespondentArgs,
        /// (list of comma-separated values 1-7) The answers to all the questions, in the order
        /// printed by the `questions` command. If not provided, the questions are asked
        /// interactively.
        #[clap(short, long, value_parser, value_delimiter = ',')]
        answers: Option<Vec<String>>,
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Reports on the dataset for one respondent, without submitting.
    Report {
        /// The name of the respondent.
        #[clap(short, long, value_parser)]
        name: String,
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Merges a workbook of previous survey results (xlsx) into the dataset.
    Import {
        /// (file path) The Excel workbook to read.
        #[clap(short, long, value_parser)]
        input: String,
        /// Indicates the name of the worksheet to use. Defaults to the first one.
        #[clap(long, value_parser)]
        excel_worksheet_name: Option<String>,
        /// (file path) Overrides the dataset location of the configuration.
        #[clap(short, long, value_parser)]
        dataset: Option<String>,
    },
    /// Solves the resource allocation program.
    Allocate,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RespondentArgs {
    /// The name of the respondent.
    #[clap(short, long, value_parser)]
    pub name: String,
    /// One of: "IT Department", "Management", "Finance".
    #[clap(short, long, value_parser)]
    pub team: String,
    /// One of: "Bengaluru", "Canberra".
    #[clap(short, long, value_parser)]
    pub place: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct OutputArgs {
    /// (file path) Overrides the dataset location of the configuration.
    #[clap(short, long, value_parser)]
    pub dataset: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the report will be written
    /// in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a report summary in JSON format. If provided,
    /// vclarifi will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,
}
