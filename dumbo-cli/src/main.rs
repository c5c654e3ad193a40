mod cmd;
mod config;

use anyhow::Result;

fn main() -> Result<()> {
    let args = cmd::build::make_command().get_matches();

    env_logger::Builder::new()
        .filter_level(cmd::build::log_level(
            args.get_count("verbose"),
            args.get_flag("quiet"),
        ))
        .format_target(false)
        .init();

    cmd::build::execute(&args)
}
