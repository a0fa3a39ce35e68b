use crate::config::Config;

pub fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Wrote default config.toml");
    } else {
        println!("config.toml already exists, leaving it untouched");
    }
    Ok(())
}
