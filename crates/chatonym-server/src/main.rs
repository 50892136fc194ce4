//! Chatonym relay command line.
//!
//! # Usage
//!
//! ```bash
//! # Create (or load) the secret bundle
//! chatonym --db-file chatonym.redb init
//!
//! # Issue an invitation for user 42, open it as user 7
//! chatonym invite 42
//! chatonym accept <start-token> 7
//!
//! # Relay a reply, then end the conversation
//! chatonym reply <chat-token>
//! chatonym terminate <chat-token>
//! ```

use std::{
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

use chatonym_core::{ChatTuple, TokenConfig, TokenSuite};
use chatonym_crypto::{CipherAlgorithm, HashAlgorithm};
use chatonym_server::{Accepted, Exchange, RedbStorage, Relay, SecretStore, SystemEnv};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Chatonym anonymous relay
#[derive(Parser, Debug)]
#[command(name = "chatonym")]
#[command(about = "Anonymous two-party relay driven by encrypted share links")]
#[command(version)]
struct Args {
    /// Database file
    #[arg(long, env = "DB_FILE", default_value = "chatonym.redb")]
    db_file: PathBuf,

    /// Bot username used in share links
    #[arg(long, env = "BOT_NAME", default_value = "chatonym_bot")]
    bot_name: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(flatten)]
    tokens: TokenArgs,

    #[command(subcommand)]
    command: Command,
}

/// Token protocol options
#[derive(ClapArgs, Debug)]
struct TokenArgs {
    /// Cipher for tokens (aes-128-cbc, aes-192-cbc, aes-256-cbc)
    #[arg(long, env = "CRYPTO_CIPHER_ALGORITHM", default_value = "aes-256-cbc")]
    cipher: CipherAlgorithm,

    /// Salt length in bytes (must equal the cipher block size)
    #[arg(long, env = "CRYPTO_IV_BYTES", default_value_t = 16)]
    salt_bytes: usize,

    /// Hash for fingerprints and pseudonyms (sha224, sha256, sha384, sha512)
    #[arg(long, env = "CRYPTO_HASH_ALGORITHM", default_value = "sha256")]
    hash: HashAlgorithm,

    /// Maximum entries per token cache
    #[arg(long, env = "CACHE_MAX", default_value_t = 10_000)]
    cache_max: usize,

    /// Token cache entry lifetime in seconds
    #[arg(long, env = "CACHE_TTL", default_value_t = 14_400)]
    cache_ttl: u64,

    /// Length of generated keys in bytes
    #[arg(long, env = "CRYPTO_SECRET_BYTES", default_value_t = 32)]
    secret_bytes: usize,

    /// Length of generated peppers in bytes
    #[arg(long, env = "CRYPTO_PEPPER_BYTES", default_value_t = 32)]
    pepper_bytes: usize,
}

impl From<&TokenArgs> for TokenConfig {
    fn from(args: &TokenArgs) -> Self {
        Self {
            cipher: args.cipher,
            salt_bytes: args.salt_bytes,
            hash: args.hash,
            cache_max_entries: args.cache_max,
            cache_ttl: Duration::from_secs(args.cache_ttl),
            secret_bytes: args.secret_bytes,
            pepper_bytes: args.pepper_bytes,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the secret bundle, generating and storing one if none exists
    Init,
    /// Issue an invitation link for a user
    Invite {
        /// Inviting user
        user_id: i64,
    },
    /// Open an invitation as another user
    Accept {
        /// Start token from the invitation link
        token: String,
        /// Opening user
        user_id: i64,
    },
    /// Relay a message written against a chat token or reply link
    Reply {
        /// Chat token, or a full reply link
        chat_token: String,
    },
    /// Terminate the conversation a chat token belongs to
    Terminate {
        /// Chat token
        chat_token: String,
    },
    /// Decrypt a start token
    InspectStart {
        /// Start token
        token: String,
    },
    /// Decrypt a chat token
    InspectChat {
        /// Chat token
        token: String,
    },
    /// Print the fingerprint of a conversation
    Fingerprint {
        /// Sending user
        sender: i64,
        /// Receiving user
        recipient: i64,
        /// Conversation seed
        seed: i64,
    },
    /// Print the pseudonym under which the recipient sees the sender
    Pseudonym {
        /// Sending user
        sender: i64,
        /// Receiving user
        recipient: i64,
        /// Conversation seed
        seed: i64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let config = TokenConfig::from(&args.tokens);
    config.validate()?;

    let env = SystemEnv::new();
    let storage = RedbStorage::open(&args.db_file)?;
    let store =
        SecretStore::new(storage.clone(), env.clone(), config.secret_bytes, config.pepper_bytes);
    let secrets = store.init()?;

    let suite = TokenSuite::new(secrets, &config, env)?;
    let exchange = Exchange::new(suite, storage, args.bot_name);

    let mut out = io::stdout().lock();
    run(&exchange, args.command, &mut out)
}

fn run(
    exchange: &Exchange<RedbStorage, SystemEnv>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Init => writeln!(out, "secrets ready")?,
        Command::Invite { user_id } => match exchange.invite(user_id)? {
            Some(invitation) => writeln!(out, "{}", invitation.link)?,
            None => return Err("could not issue invitation".into()),
        },
        Command::Accept { token, user_id } => match exchange.accept(&token, user_id)? {
            Accepted::Connected { reply_link, inviter_pseudonym, .. } => {
                writeln!(out, "connected to {inviter_pseudonym}")?;
                writeln!(out, "{reply_link}")?;
            },
            Accepted::Rejected => return Err("invitation rejected".into()),
            Accepted::Terminated => return Err("conversation terminated".into()),
            Accepted::Failed => return Err("could not issue reply token".into()),
        },
        Command::Reply { chat_token } => {
            let relay = if chat_token.starts_with("https://") {
                exchange.reply_to_link(&chat_token)?
            } else {
                exchange.reply(&chat_token)?
            };
            match relay {
                Relay::Deliver { recipient_id, reply_link, sender_pseudonym, .. } => {
                    writeln!(out, "deliver to {recipient_id} from {sender_pseudonym}")?;
                    writeln!(out, "{reply_link}")?;
                },
                Relay::Invalid => return Err("invalid chat token".into()),
                Relay::Terminated => return Err("conversation terminated".into()),
                Relay::Failed => return Err("could not issue reply token".into()),
            }
        },
        Command::Terminate { chat_token } => {
            if !exchange.terminate(&chat_token)? {
                return Err("invalid chat token".into());
            }
            writeln!(out, "terminated")?;
        },
        Command::InspectStart { token } => match exchange.suite().start().decrypt(&token)? {
            Some(start) => writeln!(
                out,
                "recipient_id={} seed={} salt={}",
                start.tuple.recipient_id, start.tuple.seed, start.salt
            )?,
            None => return Err("could not decrypt start token".into()),
        },
        Command::InspectChat { token } => match exchange.suite().chat().decrypt(&token)? {
            Some(chat) => writeln!(
                out,
                "sender_id={} recipient_id={} seed={} salt={}",
                chat.tuple.sender_id, chat.tuple.recipient_id, chat.tuple.seed, chat.salt
            )?,
            None => return Err("could not decrypt chat token".into()),
        },
        Command::Fingerprint { sender, recipient, seed } => {
            let chat = ChatTuple::try_new(sender, recipient, seed)?;
            writeln!(out, "{}", exchange.suite().fingerprinter().fingerprint(&chat))?;
        },
        Command::Pseudonym { sender, recipient, seed } => {
            let chat = ChatTuple::try_new(sender, recipient, seed)?;
            writeln!(out, "{}", exchange.suite().pseudonyms().pseudonym(&chat))?;
        },
    }

    Ok(())
}
