use faqdial::config;
use faqdial::gui::app::AppModel;
use faqdial::sys::runtime;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    let config = config::load_or_setup();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx.clone());

    let app = RelmApp::new("org.troia.faqdial");

    app.run::<AppModel>((config, rx));
}
