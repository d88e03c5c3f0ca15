use clap::{CommandFactory, Parser};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(version, about)]
pub(crate) struct WebpifyCli {
    #[clap(
        default_value = webpify::DEFAULT_IMAGES_DIRECTORY,
        help = "The directory that is searched recursively for .png, .jpg and .jpeg files. Each one is converted to a .webp file next to it."
    )]
    pub(crate) directory: String,

    #[clap(long, value_name = "SHELL", help = "Print the completion script for the given shell and exit.")]
    pub(crate) completions: Option<Shell>,
}

impl WebpifyCli {
    pub(crate) fn print_completions(shell: Shell) {
        let mut command = Self::command();
        let binary_name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, binary_name, &mut std::io::stdout());
    }
}
