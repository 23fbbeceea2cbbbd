pub mod errors;
pub mod label;

pub use errors::*;
pub use label::*;

pub fn fatal_error(str: &str) {
	eprintln!("{}: {}", console::style("fatal error").bold().red(), str);
	std::process::exit(1);
}
