use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::models::Model;
use crate::prompts::SYSTEM_INSTRUCTIONS;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    /// Hosted model through genai
    Genai,
    /// Fixed placeholder replies, no network
    Canned,
}

#[derive(Parser, Clone, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Model to start with
    #[arg(short, long, value_enum, default_value_t = Model::default())]
    pub model: Model,
    /// System prompt
    #[arg(short, long, default_value = SYSTEM_INSTRUCTIONS, hide_default_value = true)]
    pub system_prompt: String,
    /// Temperature
    #[arg(short, long, value_parser = validate_temperature, default_value = "0.5")]
    pub temperature: f64,
    /// Words revealed per streaming step
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..), default_value = "2")]
    pub chunk_size: u16,
    /// Milliseconds between streaming steps
    #[arg(long, default_value = "40")]
    pub word_delay: u64,
    /// Where replies come from
    #[arg(long, value_enum, default_value_t = ProviderKind::Genai)]
    pub provider: ProviderKind,
    /// Log filter, overridden by HOVA_LOG
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn word_delay(&self) -> Duration {
        Duration::from_millis(self.word_delay)
    }
}

fn validate_temperature(val: &str) -> Result<f64, String> {
    val.parse::<f64>()
        .map_err(|_| String::from("Value must be a number between 0.0 and 2.0"))
        .and_then(|v| {
            if (0.0..=2.0).contains(&v) {
                Ok(v)
            } else {
                Err(String::from("Value must be a number between 0.0 and 2.0"))
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_streaming_presenter() {
        let cli = Cli::parse_from(["hova"]);
        assert_eq!(cli.chunk_size, 2);
        assert_eq!(cli.word_delay(), Duration::from_millis(40));
        assert_eq!(cli.model, Model::Flash);
        assert_eq!(cli.provider, ProviderKind::Genai);
        assert_eq!(cli.system_prompt, SYSTEM_INSTRUCTIONS);
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::parse_from([
            "hova",
            "--model",
            "gemini-2.0-flash-thinking-exp-1219",
            "--provider",
            "canned",
            "--chunk-size",
            "3",
            "-t",
            "1.2",
        ]);
        assert_eq!(cli.model, Model::FlashThinking);
        assert_eq!(cli.provider, ProviderKind::Canned);
        assert_eq!(cli.chunk_size, 3);
        assert_eq!(cli.temperature, 1.2);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(validate_temperature("2.5").is_err());
        assert!(validate_temperature("warm").is_err());
        assert!(Cli::try_parse_from(["hova", "--chunk-size", "0"]).is_err());
    }
}
