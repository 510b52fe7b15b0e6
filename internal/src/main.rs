use model::config::Config;
use model::json_serialisation::load_config_from_file;
use solver::master::highs::HighsMaster;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn main() {
    enable_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        println!("Usage: {} <instance.json> [params.json]", args[0]);
        std::process::exit(1)
    }

    let path = &args[1];
    let config = match args.get(2) {
        Some(params) => match load_config_from_file(params) {
            Ok(config) => config,
            Err(e) => {
                error!("cannot read parameters '{}': {}", params, e);
                std::process::exit(1)
            }
        },
        None => Config::default(),
    };

    let input_data = match read_json(path) {
        Ok(input_data) => input_data,
        Err(e) => {
            error!("cannot read instance '{}': {}", path, e);
            std::process::exit(1)
        }
    };
    println!("\n---------- RUN: {} ----------", path);

    let output = match internal::run(input_data, &config, &HighsMaster::new()) {
        Ok(output) => output,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1)
        }
    };

    // output path with sub-directory creation
    let output_dir_name = "output";
    if let Err(e) = write_output(path, output_dir_name, &output) {
        error!("cannot write output: {}", e);
        std::process::exit(1)
    }

    std::process::exit(0)
}

fn read_json(path: &str) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let mut file = File::open(path)?;
    let mut input_data = String::new();
    file.read_to_string(&mut input_data)?;
    Ok(serde_json::from_str(&input_data)?)
}

fn write_output(
    input_path: &str,
    output_dir_name: &str,
    output: &serde_json::Value,
) -> Result<(), Box<dyn std::error::Error>> {
    let file_name = Path::new(input_path)
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or("input path has no file name")?;
    let output_path = format!("{}/output_{}", output_dir_name, file_name);
    if let Some(parent_dir) = Path::new(&output_path).parent() {
        fs::create_dir_all(parent_dir)?;
    }
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, output)?;
    Ok(())
}
