//! CLI front-end: inventory loading, target entry, report rendering.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use macseek::search::AttemptOutcome;
use macseek::{MacAddress, NetworkConnector, load_inventory, search};

const BANNER: &str = "-------------------------------------------------------------------------------------------";
const TARGET_ENTRY_ATTEMPTS: u32 = 5;

/// Find which switch and interface a host MAC address is connected to.
#[derive(Parser)]
#[command(name = "macseek")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Target MAC address (format xx:xx:xx:xx:xx:xx). Prompted for if omitted.
    mac: Option<String>,

    /// Path to the device inventory file
    #[arg(short = 'i', long = "inventory", default_value = "devices.json")]
    inventory_path: PathBuf,

    /// Connect and per-command timeout in seconds
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Enable debug logging (shows session negotiation detail)
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    let inventory = match load_inventory(&cli.inventory_path) {
        Ok(inventory) => inventory,
        Err(e) => {
            eprintln!("Something went wrong when opening the device list: {e}");
            return ExitCode::FAILURE;
        }
    };

    let target = match resolve_target(cli.mac.as_deref()) {
        Some(target) => target,
        None => return ExitCode::FAILURE,
    };

    println!("{BANNER}");
    println!("Now start to look for {}", target.dotted());
    println!("{BANNER}");

    let connector = NetworkConnector {
        timeout: Duration::from_secs(cli.timeout),
        ..NetworkConnector::default()
    };
    let result = search(&connector, &inventory, &target).await;

    for attempt in &result.attempts {
        match &attempt.outcome {
            AttemptOutcome::Found(entry) => {
                println!("{BANNER}");
                println!(
                    "Host is found in Vlan {} from {}'s interface {} !",
                    entry.vlan, attempt.device, entry.port
                );
            }
            AttemptOutcome::NoMatch => {
                println!("{}: host is not found.", attempt.device);
            }
            AttemptOutcome::Skipped { reason } => {
                println!(
                    "{}: skipped ({}). Please check on it manually.",
                    attempt.device, reason
                );
            }
            AttemptOutcome::Failed { error } => {
                println!(
                    "Failed to connect and run command on device {}: {}",
                    attempt.device, error
                );
            }
        }
    }

    match result.hit {
        Some(hit) => {
            println!();
            println!("Output is displayed here:");
            println!("{}", macseek::lookup_command(&target));
            println!("{}", hit.raw_output);
            println!("{BANNER}");
            ExitCode::SUCCESS
        }
        None => {
            println!("{BANNER}");
            println!("Host is not found in your network!");
            println!("{BANNER}");
            ExitCode::SUCCESS
        }
    }
}

/// Validate the command-line target, or prompt for one with a bounded
/// retry budget.
fn resolve_target(arg: Option<&str>) -> Option<MacAddress> {
    if let Some(raw) = arg {
        return match MacAddress::parse(raw) {
            Ok(target) => Some(target),
            Err(e) => {
                eprintln!("{e}");
                None
            }
        };
    }

    let stdin = std::io::stdin();
    for _ in 0..TARGET_ENTRY_ATTEMPTS {
        print!("Please enter the MAC address of the host (format xx:xx:xx:xx:xx:xx): ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() {
            break;
        }
        match MacAddress::parse(&line) {
            Ok(target) => return Some(target),
            Err(e) => eprintln!("{e}"),
        }
    }

    eprintln!("Error: too many attempts!");
    None
}
