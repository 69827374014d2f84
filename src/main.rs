use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use docchat::{Backend, Config, Conversation, Message, Sender, TextConfig, WebhookClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docchat")]
#[command(about = "Chat with a document assistant behind a webhook")]
struct Cli {
    /// Config file (defaults are used when it does not exist)
    #[arg(short, long, global = true, default_value = "docchat.toml")]
    config: PathBuf,

    /// Chat webhook URL, overriding the config file
    #[arg(long, global = true, env = "DOCCHAT_CHAT_URL")]
    chat_url: Option<String>,

    /// Upload webhook URL, overriding the config file
    #[arg(long, global = true, env = "DOCCHAT_UPLOAD_URL")]
    upload_url: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a markdown message file, or `-` for stdin
    Render {
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = Format::Html)]
        format: Format,
    },
    /// Send one message and print the reply
    Send { message: String },
    /// Upload a PDF document
    Upload { file: PathBuf },
    /// Chat interactively; `/upload <file>` sends a PDF, `/quit` exits
    Chat,
    /// Print the default configuration file
    DefaultConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(&cli.config)?;
    if let Some(url) = cli.chat_url {
        config.webhook.chat_url = url;
    }
    if let Some(url) = cli.upload_url {
        config.webhook.upload_url = url;
    }

    match cli.command {
        Command::Render {
            input,
            output,
            format,
        } => render(&input, output.as_deref(), format, &config),
        Command::Send { message } => {
            let mut chat = connect(&config)?;
            if let Some(reply) = chat.send(&message).await {
                print_message(reply, &config.text);
            }
            Ok(())
        }
        Command::Upload { file } => {
            let mut chat = connect(&config)?;
            let reply = chat.upload_pdf(&file).await?;
            print_message(reply, &config.text);
            Ok(())
        }
        Command::Chat => {
            let mut chat = connect(&config)?;
            chat_loop(&mut chat, &config.text).await
        }
        Command::DefaultConfig => {
            print!("{}", Config::default_toml());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn connect(config: &Config) -> Result<Conversation<WebhookClient>> {
    let client = WebhookClient::new(&config.webhook).context("building HTTP client")?;
    Ok(Conversation::new(client, config.messages.clone()))
}

fn render(input: &Path, output: Option<&Path>, format: Format, config: &Config) -> Result<()> {
    let markdown = if input == Path::new("-") {
        io::read_to_string(io::stdin()).context("reading stdin")?
    } else {
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?
    };

    let rendered = match format {
        Format::Html => docchat::message_to_html(&markdown, &config.html),
        Format::Text => docchat::message_to_text(&markdown, &config.text),
    };

    match output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Created {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

async fn chat_loop<B: Backend>(chat: &mut Conversation<B>, text: &TextConfig) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let mut typing = chat.typing();
    let indicator = tokio::spawn(async move {
        while typing.changed().await.is_ok() {
            if *typing.borrow_and_update() {
                eprintln!("Bot is typing...");
            }
        }
    });

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        if line == "/quit" {
            break;
        } else if let Some(path) = line.strip_prefix("/upload ") {
            let seen = chat.messages().len();
            let uploaded = chat.upload_pdf(Path::new(path.trim())).await.map(|_| ());
            match uploaded {
                Ok(()) => {
                    for message in &chat.messages()[seen..] {
                        print_message(message, text);
                    }
                }
                Err(e) => eprintln!("error: {e}"),
            }
        } else if let Some(reply) = chat.send(line).await {
            print_message(reply, text);
        }
    }

    indicator.abort();
    Ok(())
}

fn print_message(message: &Message, text: &TextConfig) {
    let who = match message.sender {
        Sender::User => "You",
        Sender::Bot => "Bot",
    };
    println!("[{}] {who}:", message.timestamp.format("%H:%M:%S"));
    print!("{}", docchat::blocks_to_text(&message.blocks(), text));
    println!();
}
