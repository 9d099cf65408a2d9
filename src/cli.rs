use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use reconcile::{AttributeValue, TargetState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "semactl")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declaratively manage Semaphore components", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Semaphore API base URL
    #[arg(long, env = "SEMAPHORE_URL", global = true)]
    pub url: Option<String>,

    /// API bearer token
    #[arg(long, env = "SEMAPHORE_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Config file (default: ~/.config/semactl/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create, update or remove an inventory of a project
    Inventory(InventoryArgs),

    /// Create, update or remove any component with the standard CRUD shape
    Component(ComponentArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved connection settings
    Show,

    /// Print the config file path
    Path,
}

/// Desired state of the component
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum State {
    Present,
    Absent,
}

impl From<State> for TargetState {
    fn from(state: State) -> Self {
        match state {
            State::Present => Self::Present,
            State::Absent => Self::Absent,
        }
    }
}

/// Kind of inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InventoryType {
    /// Inventory content given inline
    Static,
    /// Path to an inventory file
    File,
}

impl InventoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::File => "file",
        }
    }
}

#[derive(Args)]
pub struct InventoryArgs {
    /// Inventory name (identity key)
    #[arg(long)]
    pub name: String,

    /// Project owning the inventory (default: project_id from config)
    #[arg(long)]
    pub project_id: Option<i64>,

    /// Type of inventory (required when present)
    #[arg(long = "type", value_enum)]
    pub kind: Option<InventoryType>,

    /// Content of the inventory or path to the inventory file (required when present)
    #[arg(long)]
    pub inventory: Option<String>,

    /// Desired state
    #[arg(long, value_enum, default_value_t = State::Present)]
    pub state: State,
}

#[derive(Args)]
pub struct ComponentArgs {
    /// Collection path below the project (or the API root), e.g. /keys
    #[arg(long)]
    pub path: String,

    /// Component name (identity key)
    #[arg(long)]
    pub name: String,

    /// Scope the collection under /project/<id>
    #[arg(long)]
    pub project_id: Option<i64>,

    /// Do not scope under a project, even if the config sets project_id
    #[arg(long, conflicts_with = "project_id")]
    pub unscoped: bool,

    /// Body attribute; true/false become booleans, integers become numbers
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub set: Vec<(String, AttributeValue)>,

    /// Desired state
    #[arg(long, value_enum, default_value_t = State::Present)]
    pub state: State,
}

/// Parse a `KEY=VALUE` pair, coercing the value
pub fn parse_key_val(raw: &str) -> Result<(String, AttributeValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in {raw:?}"));
    }
    Ok((key.to_string(), AttributeValue::coerce(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("login=deploy").unwrap(),
            ("login".to_string(), AttributeValue::String("deploy".to_string()))
        );
        assert_eq!(
            parse_key_val("ssh_key_id=3").unwrap(),
            ("ssh_key_id".to_string(), AttributeValue::Integer(3))
        );
        assert_eq!(
            parse_key_val("alert=true").unwrap(),
            ("alert".to_string(), AttributeValue::Boolean(true))
        );
        assert_eq!(
            parse_key_val("json={\"a\":1}").unwrap().1,
            AttributeValue::String("{\"a\":1}".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn test_parse_inventory() {
        let cli = Cli::try_parse_from([
            "semactl",
            "--url",
            "http://localhost:3000/api",
            "inventory",
            "--name",
            "Test inventory",
            "--project-id",
            "1",
            "--type",
            "file",
            "--inventory",
            "/tmp/inventory.yml",
        ])
        .unwrap();

        match cli.command {
            Command::Inventory(args) => {
                assert_eq!(args.name, "Test inventory");
                assert_eq!(args.project_id, Some(1));
                assert_eq!(args.kind, Some(InventoryType::File));
                assert_eq!(args.state, State::Present);
            }
            _ => panic!("Expected inventory command"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_state() {
        let result = Cli::try_parse_from([
            "semactl", "inventory", "--name", "x", "--state", "latest",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_component_sets() {
        let cli = Cli::try_parse_from([
            "semactl",
            "component",
            "--path",
            "/keys",
            "--name",
            "deploy",
            "--set",
            "type=ssh",
            "--set",
            "project_id=2",
            "--state",
            "absent",
        ])
        .unwrap();

        match cli.command {
            Command::Component(args) => {
                assert_eq!(args.set.len(), 2);
                assert_eq!(TargetState::from(args.state), TargetState::Absent);
            }
            _ => panic!("Expected component command"),
        }
    }
}
