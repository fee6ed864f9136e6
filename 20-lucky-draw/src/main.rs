use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use lucky_draw::{
    app::{App, SETUP_HINT},
    cli::{Cli, Command},
    console::{ConsoleCommand, HELP},
};

const RESET_PROMPT: &str =
    "reset deletes the roster, awards and results; type RESET YES to confirm";

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let app = App::open(cli.settings.config())?;

    let lines = run_command(&app, cli.command).await?;
    print_lines(&lines).await
}

async fn run_command(app: &App, command: Command) -> Result<Vec<String>> {
    match command {
        Command::Login { .. } => {}
        Command::Status | Command::Shell => require_login(app).await?,
        _ => {
            require_login(app).await?;
            if app.needs_setup().await {
                let mut stderr = tokio::io::stderr();
                stderr.write_all(format!("{SETUP_HINT}\n").as_bytes()).await?;
                stderr.flush().await?;
            }
        }
    }

    Ok(match command {
        Command::Login { username, password } => vec![app.login(&username, &password).await?],
        Command::Import { path } => vec![app.import(&path).await?],
        Command::Awards => app.awards().await,
        Command::AddAward { count, title } => {
            let title = (!title.is_empty()).then(|| title.join(" "));
            vec![app.add_award(count, title).await?]
        }
        Command::SetAward { id, count, title } => vec![app.set_award(&id, count, title).await?],
        Command::RemoveAward { id } => vec![app.remove_award(&id).await?],
        Command::Spin => vec![app.spin().await?],
        Command::Status => app.status().await,
        Command::Export { out_dir } => vec![app.export(&out_dir).await?],
        Command::Reset { yes } => {
            if !yes {
                bail!("reset deletes the roster, awards and results; pass --yes to confirm");
            }
            vec![app.reset().await?]
        }
        Command::Shell => {
            run_shell(app).await?;
            Vec::new()
        }
    })
}

async fn require_login(app: &App) -> Result<()> {
    if !app.is_authed().await? {
        bail!("not logged in; run `login <username> <password>` first");
    }
    Ok(())
}

async fn run_shell(app: &App) -> Result<()> {
    if app.needs_setup().await {
        print_lines(&[SETUP_HINT.to_string()]).await?;
    }

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut input = String::new();
    loop {
        input.clear();
        if stdin.read_line(&mut input).await? == 0 {
            break;
        }
        if input.trim().is_empty() {
            continue;
        }

        let command = match ConsoleCommand::parse(&input) {
            Ok(command) => command,
            Err(err) => {
                print_lines(&[format!("error: {err}")]).await?;
                continue;
            }
        };
        if command == ConsoleCommand::Exit {
            break;
        }
        let reset = matches!(command, ConsoleCommand::Reset { confirmed: true });

        match run_console_command(app, command).await {
            Ok(lines) => print_lines(&lines).await?,
            Err(err) => {
                warn!(error = ?err, "command failed");
                print_lines(&[format!("error: {err:#}")]).await?;
            }
        }

        // A reset logs the operator out; the shell goes with it.
        if reset {
            info!("shell closed after reset");
            break;
        }
    }
    Ok(())
}

async fn run_console_command(app: &App, command: ConsoleCommand) -> Result<Vec<String>> {
    Ok(match command {
        ConsoleCommand::Spin => vec![app.spin().await?],
        ConsoleCommand::Status => app.status().await,
        ConsoleCommand::Awards => app.awards().await,
        ConsoleCommand::Add { count, title } => vec![app.add_award(count, title).await?],
        ConsoleCommand::Set { id, count, title } => {
            vec![app.set_award(&id, Some(count), title).await?]
        }
        ConsoleCommand::Remove { id } => vec![app.remove_award(&id).await?],
        ConsoleCommand::Import { path } => vec![app.import(Path::new(&path)).await?],
        ConsoleCommand::Export { dir } => {
            let dir = dir.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
            vec![app.export(&dir).await?]
        }
        ConsoleCommand::Reset { confirmed: false } => vec![RESET_PROMPT.to_string()],
        ConsoleCommand::Reset { confirmed: true } => vec![app.reset().await?],
        ConsoleCommand::Help => HELP.iter().map(|line| line.to_string()).collect(),
        ConsoleCommand::Exit => Vec::new(),
    })
}

async fn print_lines(lines: &[String]) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    for line in lines {
        stdout.write_all(line.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await?;
    Ok(())
}
