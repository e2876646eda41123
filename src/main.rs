use anyhow::Context;

use diorama::{SandboxApp, WindowConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = WindowConfig::new(1650, 1050, 4, "PlayGround ;)")?;
    let app = SandboxApp::new(config)?;
    app.run().context("sandbox terminated with an error")?;
    Ok(())
}
