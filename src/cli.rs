use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version)]
#[command(about = "Print the identifier and sequence length of every record in a Fasta file")]
pub struct Cli {
    // Input fasta file
    #[arg(help = "Input Fasta file")]
    pub input_file: PathBuf,

    // Verbosity
    #[arg(short = 'v', long = "verbose", default_value_t = false)]
    pub verbose: bool,
}
