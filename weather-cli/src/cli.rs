use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Text};
use std::io::BufRead;
use weather_core::{Config, WeatherService, present};

const CITY_PROMPT: &str = "Enter a city name:";

/// Top-level CLI struct.
///
/// Without a subcommand, asks for a city and prints its current weather.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an OpenWeatherMap API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            None => show().await,
            Some(Command::Configure) => configure(),
        }
    }
}

async fn show() -> Result<()> {
    // Build the service before prompting so a missing key fails immediately.
    let config = Config::load()?;
    let service = WeatherService::from_config(&config)?;

    let city = prompt_city()?;
    let outcome = service.lookup(&city).await;

    print!("{}", present::render_text(&outcome));
    Ok(())
}

fn prompt_city() -> Result<String> {
    match Text::new(CITY_PROMPT).prompt() {
        Ok(city) => Ok(city),
        // Esc / Ctrl-C at the prompt: nothing to look up.
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Ok(String::new())
        }
        Err(InquireError::NotTTY) => {
            tracing::debug!("stdin is not a terminal, reading city from it directly");
            println!("{CITY_PROMPT}");
            read_city(std::io::stdin().lock())
        }
        Err(err) => Err(err).context("Failed to read city name"),
    }
}

fn read_city(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line).context("Failed to read city name from stdin")?;
    Ok(line)
}

fn configure() -> Result<()> {
    let mut config = Config::load_file()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.to_string());
    let path = config.save()?;

    tracing::info!(path = %path.display(), "saved configuration");
    println!("Saved API key to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_prompt() {
        let cli = Cli::try_parse_from(["weather"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn configure_subcommand_parses() {
        let cli = Cli::try_parse_from(["weather", "configure"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Configure)));
    }

    #[test]
    fn city_argument_is_rejected() {
        assert!(Cli::try_parse_from(["weather", "London"]).is_err());
    }

    #[test]
    fn reads_single_line_from_piped_input() {
        let city = read_city("London\nParis\n".as_bytes()).unwrap();
        assert_eq!(city, "London\n");
    }

    #[test]
    fn empty_piped_input_is_empty_city() {
        let city = read_city("".as_bytes()).unwrap();
        assert!(city.trim().is_empty());
    }
}
