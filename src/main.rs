use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Arg, ArgMatches, Command};
use std::env;
use std::path::PathBuf;

use autopen::{Passphrase, SigningConfig, SigningOptions};

fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("autopen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("PDF document signing with PKCS#12 credentials")
        .subcommand_required(true)
        .subcommand(
            Command::new("sign")
                .about("Sign a PDF document")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("FILE")
                        .help("Input PDF to sign")
                        .required(true),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Output signed PDF (defaults to <input>.signed.pdf)"),
                )
                .arg(
                    Arg::new("container")
                        .short('c')
                        .long("container")
                        .value_name("FILE")
                        .help("PKCS#12 container (.p12/.pfx) with key and certificate")
                        .required(true),
                )
                .arg(
                    Arg::new("passphrase")
                        .short('p')
                        .long("passphrase")
                        .value_name("PASSPHRASE")
                        .help("Container passphrase (can also use AUTOPEN_P12_PASSPHRASE env var)"),
                )
                .arg(
                    Arg::new("reason")
                        .long("reason")
                        .value_name("TEXT")
                        .help("Reason written into the signature dictionary"),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .value_name("TEXT")
                        .help("Signer name written into the signature dictionary"),
                )
                .arg(
                    Arg::new("location")
                        .long("location")
                        .value_name("TEXT")
                        .help("Location written into the signature dictionary"),
                )
                .arg(
                    Arg::new("contact")
                        .long("contact")
                        .value_name("TEXT")
                        .help("Contact info written into the signature dictionary"),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Inspect a PDF for an embedded signature")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("FILE")
                        .help("Signed PDF to inspect")
                        .required(true),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("sign", sub)) => run_sign(sub),
        Some(("verify", sub)) => run_verify(sub),
        _ => unreachable!("subcommand required"),
    }
}

#[tokio::main]
async fn run_sign(matches: &ArgMatches) -> Result<()> {
    let input_path = PathBuf::from(matches.get_one::<String>("input").unwrap());
    let output_path = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or_else(|| input_path.with_extension("signed.pdf"));
    let container_path = PathBuf::from(matches.get_one::<String>("container").unwrap());

    let passphrase = matches
        .get_one::<String>("passphrase")
        .map(String::from)
        .or_else(|| env::var("AUTOPEN_P12_PASSPHRASE").ok())
        .unwrap_or_default();

    let defaults = SigningOptions::default();
    let options = SigningOptions {
        reason: matches
            .get_one::<String>("reason")
            .cloned()
            .unwrap_or(defaults.reason),
        name: matches
            .get_one::<String>("name")
            .cloned()
            .unwrap_or(defaults.name),
        location: matches
            .get_one::<String>("location")
            .cloned()
            .unwrap_or(defaults.location),
        contact_info: matches
            .get_one::<String>("contact")
            .cloned()
            .unwrap_or(defaults.contact_info),
        signing_time: Utc::now(),
    };

    let config = SigningConfig::new(Passphrase::new(passphrase), options);

    println!("Signing {:?} with {:?}...", input_path, container_path);
    autopen::sign_pdf_file(&input_path, &container_path, &output_path, config)
        .await
        .context("Failed to sign PDF")?;
    println!("Signed document written to {output_path:?}");

    Ok(())
}

#[tokio::main]
async fn run_verify(matches: &ArgMatches) -> Result<()> {
    let input_path = PathBuf::from(matches.get_one::<String>("input").unwrap());

    let report = autopen::verify_pdf_file(&input_path)
        .await
        .context("Failed to inspect PDF")?;

    match report {
        Some(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        None => {
            println!("No signature found in {input_path:?}");
            std::process::exit(1);
        }
    }
}
