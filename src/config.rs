use clap::ArgMatches;

/// Options for a single run, taken from the command line. Nothing is read from
/// disk or from the environment.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Config {
    /// Fetch each branch's upstream before counting ahead/behind.
    pub fetch: bool,
    /// Print entries that are not inside any repository, then the summary.
    pub outside_files: bool,
    /// Print entries that are not inside any repository and stop there.
    pub only_outside_files: bool,
    pub verbose: bool,
}

impl Config {
    pub fn new() -> Self {
        Self {
            fetch: false,
            outside_files: false,
            only_outside_files: false,
            verbose: false,
        }
    }

    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            fetch: matches.get_flag("fetch"),
            outside_files: matches.get_flag("outside-files"),
            only_outside_files: matches.get_flag("only-outside-files"),
            verbose: matches.get_flag("verbose"),
        }
    }

    pub fn lists_outside_files(&self) -> bool {
        self.outside_files || self.only_outside_files
    }
}
