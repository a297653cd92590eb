use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    appstow completions bash > ~/.bash_completion.d/appstow\n\n\
                  Generate zsh completions:\n    appstow completions zsh > ~/.zfunc/_appstow\n\n\
                  Generate fish completions:\n    appstow completions fish > ~/.config/fish/completions/appstow.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
