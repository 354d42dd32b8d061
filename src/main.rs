use azure_route_server::azure::AzCliGateway;
use azure_route_server::naming::ConventionNamingResolver;
use azure_route_server::{config, deploy, output, plan, read_configuration, Mode};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use std::error::Error;

fn init_logging() -> Result<(), Box<dyn Error>> {
    if log4rs::init_file("log4rs.yml", Default::default()).is_ok() {
        return Ok(());
    }
    let stderr = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .build();
    let log_config = log4rs::config::Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(log::LevelFilter::Info))?;
    log4rs::init_config(log_config)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    init_logging()?;
    dotenv::dotenv().ok();
    log::info!("#Start main()");

    let path = std::env::var(config::ENV_CONFIG_PATH)
        .unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
    let mode: Mode = match std::env::var(config::ENV_MODE) {
        Ok(value) => value.parse()?,
        Err(_) => Mode::default(),
    };

    let configuration = read_configuration(&path)?;
    let resolver = ConventionNamingResolver;

    match mode {
        Mode::Plan => {
            let requests = plan(&configuration, &resolver)?;
            output::print_plan(&requests);
            println!("{}", serde_json::to_string_pretty(&requests)?);
        }
        Mode::Apply => {
            let program = std::env::var(config::ENV_AZ_CLI)
                .unwrap_or_else(|_| config::DEFAULT_AZ_CLI.to_string());
            let gateway = AzCliGateway::new(program);
            match deploy(&configuration, &resolver, &gateway).await {
                Ok(result) => {
                    output::print_result(&result);
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                Err(azure_route_server::Error::Partial(partial)) => {
                    // Still emit what exists so it can be imported or cleaned up.
                    output::print_result(&partial.result);
                    println!("{}", serde_json::to_string_pretty(&partial.result)?);
                    return Err(azure_route_server::Error::Partial(partial).into());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    log::info!("#End main()");
    Ok(())
}
