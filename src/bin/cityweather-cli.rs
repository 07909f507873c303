//! Terminal front end for the `cityweather` proxy.
//!
//! Drives a [`WeatherView`] through the [`WeatherFetcher`] and prints the
//! view after every query: the report card on success, the inline message
//! on error. With a city argument it runs one query; without one it reads
//! cities from stdin, one per line (Enter is the trigger).

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use cityweather::{Phase, SubmitError, Trigger, WeatherFetcher, WeatherView};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather-cli", version, about = "Current weather by city")]
struct Cli {
    /// City to look up; omit for interactive mode.
    city: Option<String>,

    /// Base URL of the cityweather proxy.
    #[arg(long, env = "CITYWEATHER_PROXY_URL", default_value = "http://localhost:8080")]
    proxy_url: String,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // ---
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let fetcher = WeatherFetcher::new(&cli.proxy_url, Duration::from_secs(cli.timeout_secs))?;
    let mut view = WeatherView::new();

    if let Some(city) = cli.city {
        view.set_input(city);
        run_query(&mut view, &fetcher, Trigger::Button).await;
        print!("{}", render(&view));
        return Ok(exit_code(&view));
    }

    let stdin = io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        view.set_input(line);
        run_query(&mut view, &fetcher, Trigger::Enter).await;
        print!("{}", render(&view));
        prompt()?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Non-zero for scripts when the lookup failed.
fn exit_code(view: &WeatherView) -> ExitCode {
    if lookup_failed(view) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn lookup_failed(view: &WeatherView) -> bool {
    view.phase() == Phase::Error
}

async fn run_query(view: &mut WeatherView, fetcher: &WeatherFetcher, trigger: Trigger) {
    // ---
    match view.search(trigger, fetcher).await {
        Ok(()) | Err(SubmitError::EmptyQuery) => {}
        Err(SubmitError::Busy) => tracing::warn!("query already running"),
    }
}

fn prompt() -> io::Result<()> {
    print!("city> ");
    io::stdout().flush()
}

/// Text rendering of the view.
fn render(view: &WeatherView) -> String {
    // ---
    match view.phase() {
        Phase::Idle => String::new(),
        Phase::Loading => "Looking up...\n".to_string(),
        Phase::Error => format!("error: {}\n", view.error().unwrap_or_default()),
        Phase::Success => match view.report() {
            Some(r) => format!(
                "{}\n  Temperature : {}°C\n  Humidity    : {}%\n  Conditions  : {}\n",
                r.city, r.temperature_celsius, r.humidity_percent, r.description
            ),
            None => String::new(),
        },
    }
}
