//! Audit report tool entry point — CLI wiring for validation, averaging,
//! export, and the optional API server.

use std::path::Path;
use std::process;

use energy_audit::catalog::LocationCatalog;
use energy_audit::form::averages::GridAverages;
use energy_audit::form::types::Carrier;
use energy_audit::io::export::export_grid_csv;
use energy_audit::report::AuditReport;

/// Parsed CLI arguments.
struct CliArgs {
    report_path: Option<String>,
    catalog_path: Option<String>,
    export_path: Option<String>,
    carrier: Carrier,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("energy-audit — five-section energy audit report tool");
    eprintln!();
    eprintln!("Usage: energy-audit [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --report <path>              Load an audit report from a JSON file");
    eprintln!("  --catalog <path>             Load the location catalog from a TOML file");
    eprintln!("  --export-consumption <path>  Export one carrier's consumption grid to CSV");
    eprintln!("  --carrier <key>              Carrier to export (default: electricity)");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                      Start the REST API server");
        eprintln!("  --port <u16>                 API server port (default: 3000)");
    }
    eprintln!("  --help                       Show this help message");
    eprintln!();
    eprintln!("Without --report the built-in sample report is used; without");
    eprintln!("--catalog the built-in demo catalog is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        report_path: None,
        catalog_path: None,
        export_path: None,
        carrier: Carrier::Electricity,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--report" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --report requires a path argument");
                    process::exit(1);
                }
                cli.report_path = Some(args[i].clone());
            }
            "--catalog" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --catalog requires a path argument");
                    process::exit(1);
                }
                cli.catalog_path = Some(args[i].clone());
            }
            "--export-consumption" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --export-consumption requires a path argument");
                    process::exit(1);
                }
                cli.export_path = Some(args[i].clone());
            }
            "--carrier" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --carrier requires a key argument");
                    process::exit(1);
                }
                match Carrier::from_key(&args[i]) {
                    Some(carrier) => cli.carrier = carrier,
                    None => {
                        eprintln!(
                            "error: unknown carrier \"{}\", available: {}",
                            args[i],
                            Carrier::ALL.map(Carrier::key).join(", ")
                        );
                        process::exit(1);
                    }
                }
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    // Load catalog: --catalog takes priority, demo otherwise
    let catalog = if let Some(ref path) = cli.catalog_path {
        match LocationCatalog::from_toml_file(Path::new(path)) {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        LocationCatalog::demo()
    };
    let catalog_errors = catalog.validate();
    if !catalog_errors.is_empty() {
        for e in &catalog_errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Load report: --report takes priority, built-in sample otherwise
    let report = if let Some(ref path) = cli.report_path {
        match AuditReport::from_json_file(Path::new(path)) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        AuditReport::sample()
    };

    // Validate all present sections
    let errors = report.validate_all();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    if let Some(profile) = &report.building_profile {
        println!(
            "{} — {}, {} ({})",
            profile.entity_name, profile.city, profile.department, profile.subsector
        );
    }

    // Per-carrier consumption averages
    if let Some(sources) = &report.energy_sources {
        for carrier in sources.carriers.selected() {
            let grid = sources.consumption(carrier);
            let unit = grid.unit.as_deref().unwrap_or("no unit");
            println!("\n{carrier} ({unit})");
            println!("{}", GridAverages::from_grid(grid));
        }
    }

    // Export CSV if requested
    if let Some(ref path) = cli.export_path {
        let Some(sources) = &report.energy_sources else {
            eprintln!("error: report has no energy sources section to export");
            process::exit(1);
        };
        let grid = sources.consumption(cli.carrier);
        if let Err(e) = export_grid_csv(grid, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Consumption grid written to {path}");
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(energy_audit::api::AppState::new(catalog));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(energy_audit::api::serve(state, addr));
    }
}
