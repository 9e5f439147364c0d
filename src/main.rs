use materialize_lib::commands::{self, RunStatus};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().collect();

    let result = match args.get(1).map(String::as_str) {
        Some("icons") => commands::icons::run(),
        Some("fetch") => commands::fetch::run(),
        _ => {
            println!("Usage: materialize [icons|fetch]");
            println!();
            println!("  icons   Render icon.svg into PNG sizes, icon.png and icon.ico");
            println!("  fetch   Download missing model assets into the models directory");
            Ok(RunStatus::Success)
        }
    };

    let status = match result {
        Ok(status) => status,
        Err(e) => {
            log::error!("{:#}", e);
            println!("Error: {:#}", e);
            RunStatus::Failed
        }
    };

    std::process::exit(status.exit_code());
}
