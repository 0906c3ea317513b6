use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use clap::Parser;

use crate::repl::typewriter::{CursorPlacement, TypewriterOptions};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Document file
    /// Required. The proof or script file commands are appended to.
    /// It is created on the first command if it does not exist.
    #[clap(value_name = "FILE", help = "document file to type into")]
    file: PathBuf,

    /// Disabled mode
    /// Optional. Show the command line but refuse every edit and command.
    #[clap(long, help = "start with the command line disabled")]
    disabled: bool,

    /// Cursor placement
    /// Optional. Leave the document cursor after the inserted command
    /// instead of in front of it.
    #[clap(long, help = "move the document cursor past each inserted command")]
    cursor_after_insert: bool,

    /// Verbose mode
    /// Optional. Log at debug level unless TYPEWRITER_LOG_LEVEL says otherwise.
    #[clap(
        short = 'v',
        long,
        help = "Print verbose message",
        default_value = "false"
    )]
    verbose: bool,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    file: PathBuf,
    disabled: bool,
    cursor_after_insert: bool,
    verbose: bool,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        ClapArgs::parse().into()
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::parse_from(itr).into()
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn cursor_after_insert(&self) -> bool {
        self.cursor_after_insert
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Typewriter configuration selected on the command line
    pub fn typewriter_options(&self) -> TypewriterOptions {
        let cursor_placement = if self.cursor_after_insert {
            CursorPlacement::AfterInsertedText
        } else {
            CursorPlacement::InsertionPoint
        };
        TypewriterOptions {
            cursor_placement,
            disabled: self.disabled,
            ..TypewriterOptions::default()
        }
    }
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            file: args.file,
            disabled: args.disabled,
            cursor_after_insert: args.cursor_after_insert,
            verbose: args.verbose,
        }
    }
}
