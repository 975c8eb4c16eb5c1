use anyhow::Context;
use clap::Parser;
use dialkit::CountdownController;
use dialtimer::cli::Cli;
use dialtimer::config;
use dialtimer::gui::app::{AppInit, AppModel};
use dialtimer::sys::runtime;
use dialtimer::sys::scheduler::GlibScheduler;
use relm4::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.init_config {
        let path = config::write_default_config()?;
        println!("{}", path.display());
        return Ok(());
    }

    let mut config = config::load_or_default();
    cli.apply(&mut config);

    let (task_tx, task_rx) = async_channel::unbounded();
    let mut controller =
        CountdownController::new(config.controller_config(), GlibScheduler::new(task_tx))
            .context("invalid dial configuration")?;
    if let Some(duration) = cli.duration {
        controller
            .set_duration(duration)
            .with_context(|| format!("cannot start with a duration of {}", duration))?;
    }

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.dialtimer.DialTimer");

    app.run::<AppModel>(AppInit {
        config,
        cli,
        controller,
        tasks: task_rx,
        events: rx,
    });
    Ok(())
}
