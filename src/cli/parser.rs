use crate::export::ExportFormat;
use crate::models::category::Category;
use clap::{Args, Parser, Subcommand};

fn parse_category(raw: &str) -> Result<Category, String> {
    Category::parse(raw).map_err(|e| e.to_string())
}

/// Command-line interface definition for twledger
/// Telework event ledger backed by SQLite
#[derive(Parser)]
#[command(
    name = "twledger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Telework event ledger: record start / step-away / return / end and holidays per member",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Print results as JSON instead of text
    #[arg(global = true, long = "json")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// The verified `(company, member)` pair a command acts for.
#[derive(Args, Clone, Debug)]
pub struct MemberArgs {
    #[arg(long = "company", short = 'c', help = "Company id")]
    pub company: String,

    #[arg(long = "member", short = 'm', help = "Member id")]
    pub member: String,
}

/// Fields of a reported event.
#[derive(Args, Clone, Debug)]
pub struct EventArgs {
    /// start | step-away | return | end, or the numeric code 1-4
    #[arg(value_parser = parse_category)]
    pub category: Category,

    /// Event date (YYYY-MM-DD)
    pub date: String,

    /// Event time (HH:MM)
    pub time: String,

    #[arg(long = "linked", help = "Linked business day (YYYYMMDD)")]
    pub linked: Option<String>,

    #[arg(long = "lat", allow_hyphen_values = true)]
    pub latitude: Option<String>,

    #[arg(long = "lon", allow_hyphen_values = true)]
    pub longitude: Option<String>,

    #[arg(long = "comment")]
    pub comment: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check, migrate or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "record", help = "Only rows about this record id")]
        record: Option<String>,
    },

    /// Report a work-status event (validated against the latest event)
    Report {
        #[command(flatten)]
        who: MemberArgs,

        #[command(flatten)]
        event: EventArgs,

        #[arg(long = "updated", help = "Mark the event as edited")]
        updated: bool,
    },

    /// Report through the compatibility path (linked day derived, no validation)
    ReportLegacy {
        #[command(flatten)]
        who: MemberArgs,

        #[command(flatten)]
        event: EventArgs,
    },

    /// Correct an event (--record) or insert one without validation
    Edit {
        #[arg(long = "record", help = "Record id to overwrite")]
        record: Option<String>,

        #[arg(long = "company", short = 'c', required_unless_present = "record")]
        company: Option<String>,

        #[arg(long = "member", short = 'm', required_unless_present = "record")]
        member: Option<String>,

        #[command(flatten)]
        event: EventArgs,
    },

    /// Delete an event by record id
    Del {
        /// Record id (14 digits)
        record: String,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Register a holiday, or change one with --record
    Holiday {
        #[arg(long = "record", help = "Holiday record id to update")]
        record: Option<String>,

        #[arg(long = "company", short = 'c', required_unless_present = "record")]
        company: Option<String>,

        #[arg(long = "member", short = 'm', required_unless_present = "record")]
        member: Option<String>,

        #[arg(
            long = "linked",
            required_unless_present = "record",
            help = "Holiday day (YYYYMMDD)"
        )]
        linked: Option<String>,

        /// Holiday type code (>= 90)
        #[arg(value_parser = parse_category)]
        category: Category,

        #[arg(long = "comment")]
        comment: Option<String>,
    },

    /// Delete a holiday by record id
    HolidayDel {
        /// Record id (14 digits)
        record: String,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Show the latest status of a member
    Latest {
        #[command(flatten)]
        who: MemberArgs,

        #[arg(long = "list", help = "Show up to the four most recent events")]
        list: bool,
    },

    /// List a month of events, with the neighbouring events
    List {
        #[command(flatten)]
        who: MemberArgs,

        #[arg(long, value_name = "YYYYMM", help = "Month to show (default: current)")]
        month: Option<String>,
    },

    /// Export a month view
    Export {
        #[command(flatten)]
        who: MemberArgs,

        #[arg(long, value_name = "YYYYMM")]
        month: Option<String>,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(
            long,
            value_name = "FILE",
            help = "Absolute output path (default: <company>_<member>_<month>.<ext> in the current directory)"
        )]
        file: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
