use std::collections::HashSet;
use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use console::style;

use kosinter::check::{BROWSER_USER_AGENT, Client, ClientConfig};
use kosinter::platform::{PLATFORMS, Platform};
use kosinter::report::{OutputFormat, Reporter};
use kosinter::scan::Scanner;
use kosinter::{logging, session};

#[derive(Parser)]
#[command(
    name = "kosinter",
    version,
    about = "Check whether a username and its spelling variants exist on social and code-hosting platforms",
    after_help = "Each username is expanded into dotted, dashed, underscored and merged \
                  variants, and every variant is probed once per platform. Without \
                  usernames, prompts for them interactively.\n\n\
                  Verdicts come from status codes and page markers as the platforms \
                  serve them today; they can drift when a platform changes its pages."
)]
struct Cli {
    /// Base usernames to scan once each (prompts interactively when omitted)
    usernames: Vec<String>,

    /// Only probe these platforms (comma-separated, see --list-platforms)
    #[arg(short, long = "platform", value_name = "NAME", value_delimiter = ',')]
    platforms: Vec<String>,

    /// List the supported platforms and exit
    #[arg(long)]
    list_platforms: bool,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECS", default_value_t = 8,
          value_parser = clap::value_parser!(u64).range(1..=300))]
    timeout: u64,

    /// User-Agent header to send instead of the built-in browser one
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Probe all platforms of a variant at once (output order is kept)
    #[arg(long)]
    parallel: bool,

    /// Print one JSON object per result instead of text
    #[arg(long)]
    json: bool,

    /// Only print profiles that were found
    #[arg(long)]
    found_only: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log every probe to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logging::init(cli.verbose);
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    if cli.list_platforms {
        for p in &PLATFORMS {
            println!("{}\t{}\t{}", p.name, p.display_name, p.profile_url);
        }
        return ExitCode::SUCCESS;
    }

    let platforms = match select_platforms(&cli.platforms) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            let names: Vec<_> = PLATFORMS.iter().map(|p| p.name).collect();
            eprintln!("available platforms: {}", names.join(", "));
            return ExitCode::from(2);
        }
    };

    let client = Client::with_config(&ClientConfig {
        timeout: Duration::from_secs(cli.timeout),
        user_agent: cli
            .user_agent
            .unwrap_or_else(|| BROWSER_USER_AGENT.to_string()),
    });
    let scanner = Scanner::with_platforms(client, platforms).parallel(cli.parallel);
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let mut names: Vec<String> = cli
        .usernames
        .iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();

    // Deduplicate while preserving order
    let mut seen = HashSet::new();
    names.retain(|n| seen.insert(n.clone()));

    if cli.usernames.is_empty() {
        if format == OutputFormat::Text {
            println!(
                "{}",
                style("KOSINTER - OSINT username enumeration").yellow().bold()
            );
            println!();
        }
        let result = session::run(
            &scanner,
            format,
            cli.found_only,
            io::stdin().lock(),
            io::stdout().lock(),
        );
        return match result {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => output_failure(&e),
        };
    }

    if names.is_empty() {
        eprintln!("error: no usernames provided");
        eprintln!("usage: kosinter [OPTIONS] [USERNAMES...]");
        return ExitCode::from(2);
    }

    let stdout = io::stdout();
    let mut reporter = Reporter::new(stdout.lock(), format, cli.found_only);
    let mut any_errors = false;
    for name in &names {
        match scanner.scan(name, &mut reporter) {
            Ok(summary) => any_errors |= summary.errors > 0,
            Err(e) => return output_failure(&e),
        }
    }

    if any_errors {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Resolve `--platform` names against the registry, keeping registry order.
fn select_platforms(names: &[String]) -> Result<Vec<Platform>, kosinter::platform::UnknownPlatform> {
    if names.is_empty() {
        return Ok(PLATFORMS.to_vec());
    }

    let mut wanted = HashSet::new();
    for name in names {
        let platform: &'static Platform = name.parse()?;
        wanted.insert(platform.name);
    }
    Ok(PLATFORMS
        .iter()
        .filter(|p| wanted.contains(p.name))
        .cloned()
        .collect())
}

fn output_failure(e: &io::Error) -> ExitCode {
    // A closed pipe (e.g. `| head`) is a normal way to stop reading.
    if e.kind() == io::ErrorKind::BrokenPipe {
        return ExitCode::SUCCESS;
    }
    eprintln!("error: {e}");
    ExitCode::from(2)
}
