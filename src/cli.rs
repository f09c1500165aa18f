use crate::config::load_config;
use crate::ir::{EmployeeNode, LayoutModes};
use crate::layout_dump::{to_json_string, write_layout_dump};
use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "orgchart", version, about = "Org chart layout engine")]
pub struct Args {
    /// Employees JSON file (flat records with managerId) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Layout mode map JSON file ({"employeeId": "vertical", ...})
    #[arg(short = 'm', long = "modes")]
    pub modes: Option<PathBuf>,

    /// Config file (JSON5)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Output file for the layout dump. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Print only the content cache key
    #[arg(long = "cache-key")]
    pub cache_key: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long = "log-level", default_value = "warn")]
    pub log_level: String,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level);
    debug!(args:?; "Parsed arguments");

    let config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let records = parse_employees(&input)?;
    let modes = match args.modes.as_deref() {
        Some(path) => parse_modes(
            &std::fs::read_to_string(path)
                .with_context(|| format!("failed to read layout modes from {}", path.display()))?,
        )?,
        None => LayoutModes::new(),
    };

    info!(records = records.len(), modes = modes.len(); "Laying out org chart");
    let graph = crate::layout_org_chart(records, &modes, &config)?;

    if args.cache_key {
        write_text(&graph.cache_key, args.output.as_deref())?;
        return Ok(());
    }

    match args.output.as_deref() {
        Some(path) => {
            write_layout_dump(path, &graph)?;
            info!(output:? = path, nodes = graph.nodes.len(); "Layout written");
        }
        None => write_text(&to_json_string(&graph)?, None)?,
    }
    Ok(())
}

fn init_logger(level: &str) {
    let level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });
    let _ = env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read employees from {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Accepts either a bare array of records or `{"employees": [...]}`.
fn parse_employees(input: &str) -> Result<Vec<EmployeeNode>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum EmployeesFile {
        List(Vec<EmployeeNode>),
        Wrapped { employees: Vec<EmployeeNode> },
    }

    let parsed: EmployeesFile =
        serde_json::from_str(input).context("employees input is not a valid record list")?;
    Ok(match parsed {
        EmployeesFile::List(records) => records,
        EmployeesFile::Wrapped { employees } => employees,
    })
}

fn parse_modes(input: &str) -> Result<LayoutModes> {
    serde_json::from_str(input).context("layout mode map must be a JSON object of id -> mode")
}

fn write_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => println!("{text}"),
    }
    Ok(())
}
