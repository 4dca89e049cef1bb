use crate::config::toml_config::DEFAULT_CONFIG_FILE;
use crate::core::table::OutputFormat;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "luxmed-hunter")]
#[command(about = "Look up Luxmed cities, services, clinics, doctors and free appointment terms")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Table format: csv, tsv or json
    #[arg(short, long, default_value = "tsv", global = true)]
    pub format: OutputFormat,

    /// Write the table to a file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List cached cities
    Cities,
    /// List cached services
    Services,
    /// List clinics offering a service in a city
    Clinics {
        #[arg(long)]
        city: String,
        #[arg(long)]
        service: String,
    },
    /// List doctors offering a service in a city
    Doctors {
        #[arg(long)]
        city: String,
        #[arg(long)]
        service: String,
        /// Only doctors working at this clinic
        #[arg(long)]
        clinic: Option<String>,
    },
    /// Search free appointment terms
    Terms {
        #[arg(long)]
        city: String,
        #[arg(long)]
        service: String,
        /// Days ahead of today to search
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[arg(long)]
        doctor: Option<String>,
        #[arg(long)]
        clinic: Option<String>,
    },
    /// Refetch cities and services even if the cache is current
    Refresh,
}

impl Validate for Cli {
    fn validate(&self) -> Result<()> {
        validate_path("config", &self.config)?;
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }

        match &self.command {
            Command::Cities | Command::Services | Command::Refresh => {}
            Command::Clinics { city, service } => {
                validate_non_empty_string("city", city)?;
                validate_non_empty_string("service", service)?;
            }
            Command::Doctors {
                city,
                service,
                clinic,
            } => {
                validate_non_empty_string("city", city)?;
                validate_non_empty_string("service", service)?;
                if let Some(clinic) = clinic {
                    validate_non_empty_string("clinic", clinic)?;
                }
            }
            Command::Terms {
                city,
                service,
                doctor,
                clinic,
                ..
            } => {
                validate_non_empty_string("city", city)?;
                validate_non_empty_string("service", service)?;
                for (field, value) in [("doctor", doctor), ("clinic", clinic)] {
                    if let Some(value) = value {
                        validate_non_empty_string(field, value)?;
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_terms_command() {
        let cli = Cli::try_parse_from([
            "luxmed-hunter",
            "--format",
            "csv",
            "terms",
            "--city",
            "Warszawa",
            "--service",
            "Dermatolog",
            "--doctor",
            "Anna Nowak",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Csv);
        assert!(matches!(
            &cli.command,
            Command::Terms { days: 7, doctor: Some(doctor), clinic: None, .. } if doctor == "Anna Nowak"
        ));
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_blank_names_fail_validation() {
        let cli = Cli::try_parse_from([
            "luxmed-hunter",
            "clinics",
            "--city",
            " ",
            "--service",
            "Dermatolog",
        ])
        .unwrap();

        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result = Cli::try_parse_from(["luxmed-hunter", "--format", "xlsx", "cities"]);
        assert!(result.is_err());
    }
}
