use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;

use grouplist::GroupListApp;
use grouplist::config::Config;
use grouplist::state::LoadState;
use grouplist::ui::{self, ViewOptions};

fn main() -> Result<ExitCode> {
    env_logger::init();

    let config = Config::parse();
    log::debug!("{config:?}");

    let (app, handle) = GroupListApp::launch(config.asset_dir.clone(), &config.source);

    let options = ViewOptions {
        collapsed: config.collapsed,
    };
    // Re-render on every notification, as a screen would.
    let _view = (!config.json).then(|| {
        app.subscribe(move |state| {
            print!("{}", ui::render(state, options));
            let _ = std::io::stdout().flush();
        })
    });

    handle.wait();

    match app.state() {
        LoadState::Ready(result) => {
            if config.json {
                let text = serde_json::to_string_pretty(&*result).context("encoding result")?;
                println!("{text}");
            }
            Ok(ExitCode::SUCCESS)
        }
        LoadState::Failed(message) if config.json => bail!(message),
        LoadState::Failed(_) => Ok(ExitCode::FAILURE),
        LoadState::Loading => bail!("load finished without a result"),
    }
}
