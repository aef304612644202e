use clap::{crate_version, Arg, ArgAction, Command};

pub fn command() -> Command {
    Command::new("gitsum")
        .about("View a summary of statuses for multiple Git repositories.")
        .version(crate_version!())
        .arg(
            Arg::new("fetch")
                .short('f')
                .long("fetch")
                .help("fetch before getting status")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("outside-files")
                .short('o')
                .long("outside-files")
                .help("list files and directories that are not inside a Git repository")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("only-outside-files")
                .short('O')
                .long("only-outside-files")
                .help("list files and directories that are not inside a Git repository and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("print debug diagnostics to stderr")
                .action(ArgAction::SetTrue),
        )
}
