mod iptv_probe_error;
mod model;
mod processing;
mod utils;

use clap::Parser;
use log::{info, warn};

use crate::model::config::Config;
use crate::processing::pipeline;
use crate::utils::file::config_reader::read_config;
use crate::utils::network::request::create_client;

#[derive(Parser)]
#[command(name = "iptv-probe")]
#[command(version, about = "Probes iptv playlist domains and writes the fast ones into a txt playlist", long_about = None)]
struct Args {
    /// The config file
    #[arg(short = 'c', long = "config")]
    config_file: Option<String>,

    /// Input playlist, overrides config input
    #[arg(short = 'i', long = "input")]
    input: Option<String>,

    /// Output playlist, overrides config output
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Number of domains probed at the same time
    #[arg(short = 'w', long = "workers")]
    workers: Option<usize>,

    /// Channel name token selecting the channels to probe
    #[arg(short = 'm', long = "marker")]
    marker: Option<String>,

    /// log level, e.g. debug or iptv_probe=trace
    #[arg(short = 'l', long = "log-level")]
    log_level: Option<String>,
}

fn init_logger(log_level: Option<&str>) {
    let filters = log_level.map_or_else(
        || std::env::var("RUST_LOG").unwrap_or_else(|_| String::from("info")),
        ToString::to_string);
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&filters);
    builder.init();
}

fn apply_args(cfg: &mut Config, args: &Args) {
    if let Some(input) = &args.input {
        cfg.input.clone_from(input);
    }
    if let Some(output) = &args.output {
        cfg.output.clone_from(output);
    }
    if let Some(workers) = args.workers {
        cfg.workers = workers;
    }
    if let Some(marker) = &args.marker {
        cfg.marker.clone_from(marker);
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let cfg_result = read_config(args.config_file.as_deref());
    let config_log_level = cfg_result.as_ref().ok().and_then(Config::log_level).map(ToString::to_string);
    init_logger(args.log_level.as_deref().or(config_log_level.as_deref()));

    let mut cfg = match cfg_result {
        Ok(cfg) => cfg,
        Err(err) => exit!("{}", err),
    };
    apply_args(&mut cfg, &args);
    if let Err(err) = cfg.prepare() {
        exit!("{}", err);
    }

    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    if let Some(build_time) = option_env!("VERGEN_BUILD_TIMESTAMP") {
        info!("Build time: {build_time}");
    }
    info!("Working dir: {}", cfg.working_dir);

    let client = match create_client() {
        Ok(client) => client,
        Err(err) => exit!("{}", err),
    };

    match pipeline::run(&cfg, client).await {
        Ok(_) => println!("Probing finished, results written to {}", cfg.t_output_path.display()),
        Err(err) if err.is_fatal() => exit!("{}", err),
        Err(err) => warn!("{}", err),
    }
}
