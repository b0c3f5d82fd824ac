//! Config command implementation.

use anyhow::Result;
use clap::Args;

use crate::config::Config;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Print the configuration as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ConfigArgs, config: &Config) -> Result<()> {
    if args.json {
        return output::json_pretty(config);
    }

    output::field("API", config.api_url.as_str());
    output::field("Page size", &config.page_size.to_string());
    let file = config
        .config_file
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    output::field("Config file", &file);
    output::field("Data dir", &session::data_dir()?.display().to_string());

    Ok(())
}
