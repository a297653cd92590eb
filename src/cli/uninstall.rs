use clap::Parser;

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Uninstall an application:\n    appstow uninstall Snake_1a2b3c4d5e6f7a8b\n\n\
                  Uninstall without confirmation:\n    appstow uninstall Snake_1a2b3c4d5e6f7a8b -y")]
pub struct UninstallArgs {
    /// Store key of the application (see 'appstow list')
    pub key: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_uninstall() {
        let cli =
            super::super::Cli::try_parse_from(["appstow", "uninstall", "Snake_00", "-y"]).unwrap();
        match cli.command {
            super::super::Commands::Uninstall(args) => {
                assert_eq!(args.key, "Snake_00");
                assert!(args.yes);
            }
            _ => panic!("Expected Uninstall command"),
        }
    }

    #[test]
    fn test_cli_parsing_uninstall_requires_key() {
        assert!(super::super::Cli::try_parse_from(["appstow", "uninstall"]).is_err());
    }
}
