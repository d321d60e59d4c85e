use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Level;

use chat_client::{ChatClient, ClientConfig, Conversation, Sender};

#[derive(Parser)]
#[command(name = "chat-client")]
#[command(version, about = "Talk to the chat backend from the terminal", long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Overrides CHAT_API_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message and print the reply.
    Send {
        message: String,

        #[arg(short, long)]
        session: Option<String>,
    },

    /// Print the stored history of a session.
    History { session: String },

    /// Interactive chat on stdin. `/quit` or EOF ends it.
    Chat {
        #[arg(short, long)]
        session: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.base_url {
        Some(url) => ClientConfig::new(url)?,
        None => ClientConfig::from_env()?,
    };
    let client = ChatClient::new(config);

    match cli.command {
        Commands::Send { message, session } => {
            let response = client.send_message(&message, session.as_deref()).await?;
            println!("{}", response.reply);
            eprintln!("session: {}", response.session_id);
        }
        Commands::History { session } => {
            for msg in client.get_chat_history(&session).await? {
                println!("[{}] {}", sender_label(msg.sender), msg.text);
            }
        }
        Commands::Chat { session } => {
            let convo = match session {
                Some(id) => Conversation::resume(client, id),
                None => Conversation::new(client),
            };
            run_chat(convo).await?;
        }
    }

    Ok(())
}

async fn run_chat(mut convo: Conversation) -> Result<()> {
    eprintln!("connected to {} (type /quit to exit)", convo.client().config().base_url());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line == "/quit" {
            break;
        }
        if line.is_empty() {
            continue;
        }
        match convo.send(line).await {
            Ok(reply) => println!("{reply}"),
            // keep the session alive after a failed turn
            Err(e) => eprintln!("error: {e}"),
        }
    }

    if let Some(id) = convo.session_id() {
        eprintln!("session: {id}");
    }
    Ok(())
}

fn sender_label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "user",
        Sender::Ai => "ai",
    }
}
