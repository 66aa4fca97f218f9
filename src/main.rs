use clap::Parser;
use pvsyst_parser::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => Err(anyhow::anyhow!("Interrupted by user")),
                Err(e) => Err(anyhow::anyhow!("Failed to listen for CTRL+C: {}", e)),
            },
        }
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("PVsyst Parser - Component Specification Consolidator");
    println!("====================================================");
    println!();
    println!("Extract inverter and PV module specifications from PVsyst component");
    println!("export lines into consolidated CSV and Parquet tables.");
    println!();
    println!("USAGE:");
    println!("    pvsyst-parser <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    export      Parse raw export lines and write consolidated tables");
    println!("    schema      Show the positional field mapping for each device kind");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Consolidate both device kinds into ./output:");
    println!("    pvsyst-parser export --inverters inverters.txt --panels panels.txt");
    println!();
    println!("    # Parquet only, parsing records concurrently:");
    println!("    pvsyst-parser export --panels panels.txt --format parquet --concurrent -j 8");
    println!();
    println!("    # Show which positions are read for inverters:");
    println!("    pvsyst-parser schema --kind inverter");
    println!();
    println!("For detailed help on any command, use:");
    println!("    pvsyst-parser <COMMAND> --help");
}
