mod cli;
mod logging;

use std::{
	fs::{self, File},
	io,
	io::Write,
};

use anyhow::Result;
use clap::Parser;
use cli::Args;
use flow::{parser::parse, program::Program};
use log::trace;
use optimizer::Pipeline;
use utils::{fatal_error, map_sys_err};

fn step_parse(file_name: &str) -> Result<Program> {
	let code = fs::read_to_string(file_name)
		.map_err(|_| fatal_error("no input files"))
		.unwrap();
	Ok(parse(&code)?)
}

fn main() -> Result<()> {
	logging::init();
	trace!("start");
	let args = Args::parse();

	let mut writer: Box<dyn Write> = if let Some(o) = args.output {
		Box::new(File::create(o).map_err(map_sys_err)?)
	} else {
		Box::new(io::stdout())
	};

	let file_name = args.input.unwrap_or_else(|| {
		fatal_error("no input files");
		unreachable!()
	});

	let mut program = step_parse(&file_name)?;
	let pipeline = Pipeline::parse(&args.passes)?;
	pipeline.apply(&mut program)?;
	write!(writer, "{}", program)?;

	Ok(())
}
