use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "csv-geocode")]
#[command(about = "Add latitude and longitude columns to a ';'-separated address file")]
pub struct CliConfig {
    /// File to enrich, rewritten in place
    pub input_path: String,

    /// 1-based index of the street address column
    #[arg(long)]
    pub address: Option<String>,

    /// 1-based index of the address complement column
    #[arg(long)]
    pub addition: Option<String>,

    /// 1-based index of the postal code column
    #[arg(long)]
    pub zipcode: Option<String>,

    /// 1-based index of the city column
    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub api_endpoint: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Show the resolved columns without calling the service or writing the file
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let config = CliConfig::parse_from([
            "csv-geocode",
            "addresses.csv",
            "--address",
            "2",
            "--city",
            "4",
            "--timeout-seconds",
            "10",
            "--dry-run",
        ]);

        assert_eq!(config.input_path, "addresses.csv");
        assert_eq!(config.address.as_deref(), Some("2"));
        assert_eq!(config.city.as_deref(), Some("4"));
        assert!(config.zipcode.is_none());
        assert_eq!(config.timeout_seconds, Some(10));
        assert!(config.dry_run);
        assert!(!config.verbose);
    }
}
