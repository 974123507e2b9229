use anyhow::Result;

use crate::config::Config;

pub fn init_command(force: bool) -> Result<()> {
    let path = Config::create_sample(force)?;
    println!("Created config file at: {}", path.display());
    println!("Edit this file to set your preferred format and pattern store location.");
    Ok(())
}
