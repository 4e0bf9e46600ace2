use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use plumb::areas::repository::Repository;
use plumb::commands::plumbing::cat_file::CatFileMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "plumb",
    version = "0.1.0",
    about = "A content-addressable object store and staging index",
    long_about = "plumb stores file snapshots as hash-named, compressed objects \
    and keeps a checksummed binary index of the files staged for the next commit. \
    Its on-disk layout follows the one used by git.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        short = 'C',
        global = true,
        value_name = "PATH",
        help = "Run as if started in <PATH> instead of the current directory"
    )]
    directory: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log debug events to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "hash-object",
        about = "Hash an object and optionally write it to the object database",
        long_about = "This command hashes a file as an object of the given type and can write it to the object database."
    )]
    HashObject {
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(short = 't', long = "type", default_value = "blob", help = "The object type")]
        kind: String,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "cat-file",
        about = "Print the content, type or size of an object",
        long_about = "This command looks an object up by its ID or an unambiguous prefix \
        of at least 3 characters and prints information about it.",
        group(ArgGroup::new("mode").required(true).args(["pretty", "kind", "size"]))
    )]
    CatFile {
        #[arg(short = 'p', help = "Pretty-print the object content")]
        pretty: bool,
        #[arg(short = 't', help = "Print the object type")]
        kind: bool,
        #[arg(short = 's', help = "Print the object size")]
        size: bool,
        #[arg(index = 1, help = "The object ID or prefix")]
        object: String,
    },
    #[command(name = "add", about = "Add file contents to the index")]
    Add {
        #[arg(required = true, help = "Files or directories to stage")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "rm",
        about = "Remove deleted files from the index",
        long_about = "This command unstages files that no longer exist in the working tree. \
        It refuses to unstage files that are still present."
    )]
    Rm {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    #[command(name = "ls-files", about = "Show the files in the index")]
    LsFiles {
        #[arg(short, long, help = "Show mode, object ID and stage number")]
        stage: bool,
    },
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "This command lists tracked files that were modified or deleted since they \
        were staged, followed by the files that are not tracked by the index."
    )]
    Status,
    #[command(name = "write-tree", about = "Create tree objects from the index")]
    WriteTree,
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command creates a new commit in the repository with the specified commit message."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "branch",
        about = "List branches or create a new one",
        long_about = "Without arguments this command lists the branches, marking the current one. \
        With a name it creates a branch pointing at the current commit."
    )]
    Branch {
        #[arg(index = 1, help = "The name of the branch to create")]
        name: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let pwd = match &cli.directory {
        Some(directory) => directory.clone(),
        None => std::env::current_dir()?,
    };

    match &cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => pwd.join(path),
                None => pwd,
            };
            let mut repository = Repository::new(&path, Box::new(std::io::stdout()))?;

            repository.init()?
        }
        Commands::HashObject { write, kind, file } => {
            let mut repository = Repository::new(&pwd, Box::new(std::io::stdout()))?;

            repository.hash_object(file, kind, *write)?
        }
        Commands::CatFile {
            pretty: _,
            kind,
            size,
            object,
        } => {
            let mut repository = Repository::new(&pwd, Box::new(std::io::stdout()))?;
            let mode = match (kind, size) {
                (true, _) => CatFileMode::Type,
                (_, true) => CatFileMode::Size,
                _ => CatFileMode::Pretty,
            };

            repository.cat_file(object, mode)?
        }
        Commands::Add { paths } => {
            let mut repository = Repository::new(&pwd, Box::new(std::io::stdout()))?;

            repository.add(paths)?
        }
        Commands::Rm { paths } => {
            let mut repository = Repository::new(&pwd, Box::new(std::io::stdout()))?;

            repository.rm(paths)?
        }
        Commands::LsFiles { stage } => {
            let mut repository = Repository::new(&pwd, Box::new(std::io::stdout()))?;

            repository.ls_files(*stage)?
        }
        Commands::Status => {
            let mut repository = Repository::new(&pwd, Box::new(std::io::stdout()))?;

            repository.status()?
        }
        Commands::WriteTree => {
            let mut repository = Repository::new(&pwd, Box::new(std::io::stdout()))?;

            repository.write_tree()?
        }
        Commands::Commit { message } => {
            let mut repository = Repository::new(&pwd, Box::new(std::io::stdout()))?;

            repository.commit(message.as_str())?
        }
        Commands::Branch { name } => {
            let mut repository = Repository::new(&pwd, Box::new(std::io::stdout()))?;

            repository.branch(name.as_deref())?
        }
    }

    Ok(())
}
