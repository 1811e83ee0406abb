use anyhow::Result;
use wpl_core::config::WplConfig;

pub fn path() -> Result<()> {
    let path = WplConfig::config_path()?;
    if !path.exists() {
        WplConfig::create_default_config(&path)?;
    }
    println!("{}", path.display());
    Ok(())
}
