//! Command-line argument definitions and parsing

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI application
#[derive(Parser)]
#[command(
    name = "cfgtree",
    version,
    about = "Query hierarchical configuration documents with dot paths",
    long_about = "cfgtree loads YAML configuration files (or markdown front matter) as a \
                  tree of named groups and resolves dot-path addresses such as \
                  'server[1].tls.cert' or metadata filters such as '[role:primary]'."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve an address path in each file
    Get(GetArgs),
    /// List top-level groups matching a metadata filter
    Nodes(NodesArgs),
    /// List top-level groups with their sibling offsets
    Groups(GroupsArgs),
}

/// Common options for locating and loading files
#[derive(Args, Debug, Clone)]
pub struct CommonFileOptions {
    /// Files or directories to process
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Follow symbolic links when processing directories
    #[arg(long)]
    pub follow_links: bool,

    /// Maximum depth for directory recursion
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Include hidden files (starting with .)
    #[arg(long)]
    pub include_hidden: bool,

    /// Only pick up files with these extensions when walking directories
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Mapping key holding group metadata
    #[arg(long, value_name = "KEY", default_value = "_meta")]
    pub meta_key: String,
}

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    #[command(flatten)]
    pub files: CommonFileOptions,

    /// Address path, e.g. `server[1].port`
    #[arg(long, short = 'p', value_name = "PATH", aliases = ["query", "key"])]
    pub path: String,

    /// Coerce the resolved scalar to this type
    #[arg(short, long = "type", value_enum)]
    pub type_: Option<ValueType>,

    /// Assign `PATH=VALUE` before resolving (repeatable)
    #[arg(long = "set", value_name = "PATH=VALUE")]
    pub overrides: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the nodes command
#[derive(Args, Debug)]
pub struct NodesArgs {
    #[command(flatten)]
    pub files: CommonFileOptions,

    /// Metadata filter, e.g. `[role:primary,region:eu]`
    #[arg(long, short = 'f', value_name = "FILTER")]
    pub filter: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the groups command
#[derive(Args, Debug)]
pub struct GroupsArgs {
    #[command(flatten)]
    pub files: CommonFileOptions,

    /// Only list groups whose identifier matches this regex
    #[arg(long, value_name = "REGEX")]
    pub name_regex: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text, one value per line
    Text,
    /// JSON
    Json,
}

/// Scalar coercions
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Int,
    Float,
    Bool,
}

impl From<ValueType> for cfgtree::ValueType {
    fn from(vt: ValueType) -> Self {
        match vt {
            ValueType::String => Self::String,
            ValueType::Int => Self::Int,
            ValueType::Float => Self::Float,
            ValueType::Bool => Self::Bool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parsing() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_get_command() {
        let args = vec![
            "cfgtree",
            "get",
            "--path",
            "server[1].port",
            "--type",
            "int",
            "--set",
            "server.port=9090",
            "app.yaml",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        if let Commands::Get(get_args) = cli.command {
            assert_eq!(get_args.path, "server[1].port");
            assert_eq!(get_args.type_, Some(ValueType::Int));
            assert_eq!(get_args.overrides, vec!["server.port=9090".to_string()]);
            assert_eq!(get_args.files.files, vec![PathBuf::from("app.yaml")]);
            assert_eq!(get_args.files.meta_key, "_meta");
            assert_eq!(get_args.format, OutputFormat::Text);
        } else {
            panic!("Expected Get command");
        }
    }

    #[test]
    fn test_nodes_command() {
        let args = vec![
            "cfgtree",
            "nodes",
            "-f",
            "[role:primary]",
            "--format",
            "json",
            "--max-depth",
            "2",
            "conf/",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        if let Commands::Nodes(nodes_args) = cli.command {
            assert_eq!(nodes_args.filter, "[role:primary]");
            assert_eq!(nodes_args.format, OutputFormat::Json);
            assert_eq!(nodes_args.files.max_depth, Some(2));
        } else {
            panic!("Expected Nodes command");
        }
    }

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["cfgtree", "groups"]).is_err());
        assert!(Cli::try_parse_from(["cfgtree", "-v", "-q", "groups", "a.yaml"]).is_err());
    }
}
