use crate::config::toml_config::TomlConfig;
use crate::core::export::ExportFormat;
use crate::utils::error::Result;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "meal-planner")]
#[command(about = "Plan a week of meals and build the shopping list")]
pub struct CliConfig {
    /// Path to a TOML configuration file (defaults to ./meal-planner.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the recipe directory endpoint
    #[arg(long, global = true)]
    pub api_endpoint: Option<String>,

    /// Override the directory holding the saved plan
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Keep the plan in memory only
    #[arg(long, global = true)]
    pub no_storage: bool,

    #[arg(long, global = true)]
    pub concurrent_requests: Option<usize>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the weekly grid
    Plan,

    /// Put a recipe into a slot, e.g. `add Monday-dinner 52772`
    Add { slot: String, recipe_id: String },

    /// Empty a slot
    Remove { slot: String },

    /// Reset the whole week
    Clear,

    /// Search the recipe directory
    #[command(group(
        ArgGroup::new("by")
            .required(true)
            .args(["name", "ingredient", "category"])
    ))]
    Search {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        ingredient: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },

    /// Suggest random recipes
    Random {
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Show one recipe with its ingredients
    Recipe { id: String },

    /// Build the shopping list for the saved plan
    ShoppingList {
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Ingredients to mark as already bought
        #[arg(long, value_delimiter = ',')]
        check: Vec<String>,
    },

    /// Show daily and weekly calorie totals
    Calories,
}

impl CliConfig {
    /// Loads the TOML configuration and applies command-line overrides on top.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = TomlConfig::load(self.config.as_deref())?;

        if let Some(endpoint) = &self.api_endpoint {
            config.directory.endpoint = endpoint.clone();
        }
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        if let Some(concurrent) = self.concurrent_requests {
            config.directory.concurrent_requests = concurrent;
        }
        if self.no_storage {
            config.storage.enabled = false;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let cli = CliConfig::parse_from([
            "meal-planner",
            "--api-endpoint",
            "http://localhost:9000",
            "--no-storage",
            "--concurrent-requests",
            "2",
            "plan",
        ]);

        let config = cli.resolve().unwrap();

        assert_eq!(config.api_endpoint(), "http://localhost:9000");
        assert_eq!(config.concurrent_requests(), 2);
        assert!(!config.storage_enabled());
    }

    #[test]
    fn test_search_requires_one_criterion() {
        assert!(CliConfig::try_parse_from(["meal-planner", "search"]).is_err());
        assert!(CliConfig::try_parse_from(["meal-planner", "search", "--name", "a", "--category", "b"]).is_err());

        let cli = CliConfig::try_parse_from(["meal-planner", "search", "--ingredient", "chicken"]).unwrap();
        assert!(matches!(cli.command, Command::Search { ingredient: Some(_), .. }));
    }

    #[test]
    fn test_shopping_list_arguments() {
        let cli = CliConfig::parse_from([
            "meal-planner",
            "shopping-list",
            "--format",
            "csv",
            "--check",
            "salt,eggs",
        ]);

        match cli.command {
            Command::ShoppingList { format, output, check } => {
                assert_eq!(format, ExportFormat::Csv);
                assert!(output.is_none());
                assert_eq!(check, vec!["salt".to_string(), "eggs".to_string()]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
