use thiserror::Error;

#[derive(Error, Debug)]
pub enum IvoError {
	#[error("syntax error: {0}")]
	SyntaxError(String),
	#[error("system error: {0}")]
	SystemError(String),
	#[error("unknown pass: {0}")]
	UnknownPass(String),
}

pub type Result<T, E = IvoError> = std::result::Result<T, E>;

pub fn map_sys_err(e: std::io::Error) -> IvoError {
	IvoError::SystemError(e.to_string())
}
