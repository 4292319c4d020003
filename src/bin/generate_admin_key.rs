//! CLI tool to generate an admin key.
//!
//! Usage:
//!   cargo run --bin generate-admin-key -- [--env]

use std::env;

use shiptrack_lib::auth::generate_admin_key;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut env_line = false;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--env" | "-e" => env_line = true,
            "--quiet" | "-q" => quiet = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let key = generate_admin_key();

    if quiet {
        println!("{}", key);
        return;
    }
    if env_line {
        println!("SHIPTRACK_ADMIN_KEY={}", key);
        return;
    }

    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!("  Admin Key Generated");
    println!("════════════════════════════════════════════════════════════════");
    println!();
    println!("  Key:     {}", key);
    println!();
    println!("  Set it as SHIPTRACK_ADMIN_KEY and send it in the X-Admin-Key header.");
    println!("════════════════════════════════════════════════════════════════");
    println!();
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: generate-admin-key [--env] [--quiet]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --env, -e    Print as a SHIPTRACK_ADMIN_KEY=... line");
    eprintln!("  --quiet, -q  Print the key only");
    eprintln!("  --help, -h   Show this help");
    eprintln!();
}
