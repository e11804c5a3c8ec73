//! CLI command definitions using clap.
//!
//! - tools: browse and search the registry
//! - progress / wizard: the setup checklist
//! - export / prompt: material for the ElevenLabs agent
//! - agent / branding / stripe: settings and payments

use clap::{Parser, Subcommand};
use elecmate::connect::LinkMode;
use elecmate::export::ExportFormat;
use elecmate::settings::LogoSize;
use elecmate::tools::CopyField;
use std::path::PathBuf;

/// ELEC-MATE voice tool setup
#[derive(Parser, Debug)]
#[command(name = "elecmate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings profile (overrides the config file)
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Subcommand to execute; the TUI when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the voice tool registry
    Tools {
        #[command(subcommand)]
        command: ToolsCommands,
    },

    /// Configured-tool progress
    Progress {
        #[command(subcommand)]
        command: ProgressCommands,
    },

    /// Step through tools one at a time
    Wizard {
        #[command(subcommand)]
        command: WizardCommands,
    },

    /// Export tools for the ElevenLabs agent
    Export {
        /// Output format (defaults to the config's export.format)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// Only tools in this category
        #[arg(long)]
        category: Option<String>,

        /// Only tools matching this search
        #[arg(short, long)]
        search: Option<String>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the agent system prompt
    Prompt {
        /// Copy to the clipboard instead of printing
        #[arg(long)]
        copy: bool,
    },

    /// ElevenLabs agent credentials
    Agent {
        #[command(subcommand)]
        command: AgentCommands,
    },

    /// Company branding
    Branding {
        #[command(subcommand)]
        command: BrandingCommands,
    },

    /// Stripe Connect for card payments
    Stripe {
        #[command(subcommand)]
        command: StripeCommands,
    },

    /// Launch the terminal UI
    Tui,
}

#[derive(Subcommand, Debug)]
pub enum ToolsCommands {
    /// List tools as cards
    List {
        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Case-insensitive search over names, descriptions and enum values
        #[arg(short, long)]
        search: Option<String>,

        /// Show descriptions and parameters
        #[arg(short, long)]
        expanded: bool,
    },

    /// List categories in registry order
    Categories,

    /// Show one tool
    Show {
        name: String,
    },

    /// Copy part of a tool to the clipboard
    Copy {
        name: String,

        #[arg(short, long, value_enum, default_value = "full")]
        field: CopyField,
    },

    /// Number of tools in the registry
    Count,
}

#[derive(Subcommand, Debug)]
pub enum ProgressCommands {
    /// Configured count and percentage
    Show,

    /// Mark a tool configured
    Mark {
        name: String,
    },

    /// Flip a tool's configured flag
    Toggle {
        name: String,
    },

    /// Remove configured entries for tools no longer in the registry
    Prune,

    /// Clear all progress
    Reset {
        /// Required to actually reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum WizardCommands {
    /// Show the current tool
    Show,
    /// Go to the next tool
    Next,
    /// Go to the previous tool
    Prev,
    /// Mark the current tool configured and go to the next one
    MarkNext,
    /// Go to the next unconfigured tool
    Skip,
    /// Jump to a tool by name or 1-based position
    Goto {
        target: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// Show the saved agent id and masked API key
    Show,
    /// Save the agent id and API key
    Set {
        #[arg(long)]
        agent_id: String,

        #[arg(long)]
        api_key: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BrandingCommands {
    /// Validate and save the company logo
    Logo {
        path: PathBuf,

        #[arg(short, long, value_enum, default_value = "medium")]
        size: LogoSize,
    },
}

#[derive(Subcommand, Debug)]
pub enum StripeCommands {
    /// Show the connected account status
    Status,
    /// Create a connected account and print the onboarding URL
    Connect {
        #[arg(long)]
        business_name: String,

        #[arg(long)]
        email: String,
    },
    /// Get a fresh onboarding or dashboard link
    Link {
        #[arg(value_enum, default_value = "onboarding")]
        mode: LinkMode,
    },
    /// Disconnect the account
    Disconnect,
    /// Handle the URL Stripe redirected back to
    Redirect {
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["elecmate"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        assert!(cli.profile.is_none());
    }

    #[test]
    fn test_cli_parse_global_flags() {
        let cli = Cli::try_parse_from(["elecmate", "-v", "--profile", "sparky", "-c", "/tmp/e.yml", "tui"]).unwrap();
        assert!(cli.is_verbose());
        assert_eq!(cli.profile.as_deref(), Some("sparky"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/e.yml")));
        assert!(matches!(cli.command, Some(Commands::Tui)));
    }

    #[test]
    fn test_cli_parse_tools_list() {
        let cli = Cli::try_parse_from(["elecmate", "tools", "list", "--category", "Creation", "-e"]).unwrap();
        match cli.command {
            Some(Commands::Tools {
                command: ToolsCommands::List { category, search, expanded },
            }) => {
                assert_eq!(category.as_deref(), Some("Creation"));
                assert!(search.is_none());
                assert!(expanded);
            }
            _ => panic!("Expected tools list"),
        }
    }

    #[test]
    fn test_cli_parse_tools_copy_default_field() {
        let cli = Cli::try_parse_from(["elecmate", "tools", "copy", "navigate_to"]).unwrap();
        match cli.command {
            Some(Commands::Tools {
                command: ToolsCommands::Copy { name, field },
            }) => {
                assert_eq!(name, "navigate_to");
                assert_eq!(field, CopyField::Full);
            }
            _ => panic!("Expected tools copy"),
        }
    }

    #[test]
    fn test_cli_parse_wizard() {
        let cli = Cli::try_parse_from(["elecmate", "wizard", "mark-next"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Wizard {
                command: WizardCommands::MarkNext
            })
        ));

        let cli = Cli::try_parse_from(["elecmate", "wizard", "goto", "12"]).unwrap();
        match cli.command {
            Some(Commands::Wizard {
                command: WizardCommands::Goto { target },
            }) => assert_eq!(target, "12"),
            _ => panic!("Expected wizard goto"),
        }
    }

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::try_parse_from(["elecmate", "export", "-f", "text", "-o", "tools.txt"]).unwrap();
        match cli.command {
            Some(Commands::Export { format, output, .. }) => {
                assert_eq!(format, Some(ExportFormat::Text));
                assert_eq!(output, Some(PathBuf::from("tools.txt")));
            }
            _ => panic!("Expected export"),
        }
    }

    #[test]
    fn test_cli_parse_progress_reset_requires_flag_value() {
        let cli = Cli::try_parse_from(["elecmate", "progress", "reset"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Progress {
                command: ProgressCommands::Reset { yes: false }
            })
        ));
    }

    #[test]
    fn test_cli_parse_stripe_link_mode() {
        let cli = Cli::try_parse_from(["elecmate", "stripe", "link", "dashboard"]).unwrap();
        match cli.command {
            Some(Commands::Stripe {
                command: StripeCommands::Link { mode },
            }) => assert_eq!(mode, LinkMode::Dashboard),
            _ => panic!("Expected stripe link"),
        }
    }

    #[test]
    fn test_cli_parse_branding_logo() {
        let cli = Cli::try_parse_from(["elecmate", "branding", "logo", "logo.png", "-s", "large"]).unwrap();
        match cli.command {
            Some(Commands::Branding {
                command: BrandingCommands::Logo { path, size },
            }) => {
                assert_eq!(path, PathBuf::from("logo.png"));
                assert_eq!(size, LogoSize::Large);
            }
            _ => panic!("Expected branding logo"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["elecmate", "daemon"]).is_err());
    }
}
