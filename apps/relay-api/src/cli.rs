use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.literal(AnsiColor::Yellow.on_default())
		.placeholder(AnsiColor::Green.on_default())
}
