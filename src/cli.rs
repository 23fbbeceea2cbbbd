pub use clap::Parser;

#[derive(Parser, Debug)]
pub struct Args {
	// comma separated list of passes to run, in order
	#[arg(long, default_value = "indvar-elim,dead-code")]
	pub passes: String,

	#[arg(short)]
	pub output: Option<String>,

	#[arg(value_parser)]
	pub input: Option<String>,
}
