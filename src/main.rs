use lash::core::ShellConfig;
use lash::flags::Flags;
use lash::logger;
use lash::shell::Shell;
use std::env;

fn main() -> Result<(), lash::error::ShellError> {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    flags.parse(&args)?;

    if flags.is_set("help") {
        flags.print_help();
        return Ok(());
    }

    if flags.is_set("version") {
        println!("lash {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    logger::init(logger::level_for(flags.is_set("debug")))?;

    let config = ShellConfig::from_env(&flags);
    let mut shell = Shell::new(config)?;
    let status = shell.run()?;
    std::process::exit(status)
}
