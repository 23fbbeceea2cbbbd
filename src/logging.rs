use env_logger::{Builder, Env};

pub fn init() {
	Builder::from_env(Env::default().default_filter_or("warn")).init();
}
