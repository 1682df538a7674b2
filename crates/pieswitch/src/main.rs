use gtk::gio;
use gtk4 as gtk;
use piekit::instance::InstanceIdentity;
use pieswitch::cli::Args;
use pieswitch::config::ConfigResolver;
use pieswitch::controller::{MenuController, SystemLauncher};
use pieswitch::events::AppEvent;
use pieswitch::gui::app::AppModel;
use pieswitch::logging;
use pieswitch::sys::instance::InstanceCoordinator;
use pieswitch::sys::runtime;
use relm4::prelude::*;

const APP_ID: &str = "org.pieswitch.pieswitch";

fn main() {
    let args = Args::parse_lenient(std::env::args_os());
    let identity = InstanceIdentity::from_env(args.instance_name());
    logging::init(&identity);
    log::info!(
        "starting pid {} with home {}",
        std::process::id(),
        identity.home.display()
    );

    let mut coordinator = InstanceCoordinator::new(identity.clone());
    coordinator.claim_instance();
    coordinator.write_ownership();

    let (tx, rx) = async_channel::bounded(32);

    {
        let tx = tx.clone();
        coordinator.watch_trigger(move || {
            log::info!("trigger fired");
            if tx.send_blocking(AppEvent::Show).is_err() {
                log::warn!("UI loop gone, dropping trigger");
            }
        });
    }

    // Start Background Services
    runtime::start_background_services(tx);

    let controller = MenuController::new(
        ConfigResolver::for_instance(&identity),
        SystemLauncher::new(&identity.home),
    );

    // Instances are told apart by marker files, not by the application id.
    let app = gtk::Application::builder()
        .application_id(APP_ID)
        .flags(gio::ApplicationFlags::NON_UNIQUE)
        .build();

    RelmApp::from_app(app)
        .with_args(Vec::new())
        .run::<AppModel>((controller, coordinator, rx));
}
