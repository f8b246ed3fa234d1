use anyhow::Result;
use clap::{Parser, Subcommand};
use folio_lib::domain::entities::Viewer;
use folio_lib::domain::value_objects::UserId;
use folio_lib::presentation::dto::interaction_dto::{
    AddCommentRequest, DeleteCommentRequest, PostRequest, RawPostId,
};
use folio_lib::presentation::dto::ApiResponse;
use folio_lib::{init_logging, AppConfig, AppState};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Likes, saves and comments for blog posts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Sign in as this user id
    #[arg(short, long, env = "FOLIO_USER")]
    user: Option<String>,

    /// Display name shown on comments
    #[arg(long)]
    name: Option<String>,

    /// Email (its local part is used when no name is given)
    #[arg(long)]
    email: Option<String>,

    /// Database url (overrides FOLIO_DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show likes, save state and comments of a post
    Show { post_id: String },
    /// Toggle like on a post
    Like { post_id: String },
    /// Toggle save on a post
    Save { post_id: String },
    /// Add a comment to a post
    Comment { post_id: String, text: String },
    /// Delete one of your comments
    DeleteComment { post_id: String, comment_id: String },
    /// List posts you liked
    Liked,
    /// List posts you saved
    Saved,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(url) = cli.database_url.clone() {
        config.database.url = url;
    }
    init_logging(&config.logging.filter);
    info!("Starting folio v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(config).await?;
    if let Some(viewer) = viewer_from_args(&cli)? {
        state.identity.sign_in(viewer);
    }

    let output = run(&state, cli.command).await;
    state.shutdown().await;

    println!("{}", output?);
    Ok(())
}

fn viewer_from_args(cli: &Cli) -> Result<Option<Viewer>> {
    let Some(user) = cli.user.clone() else {
        return Ok(None);
    };
    let mut viewer = Viewer::new(UserId::new(user).map_err(anyhow::Error::msg)?);
    if let Some(name) = &cli.name {
        viewer = viewer.with_display_name(name);
    }
    if let Some(email) = &cli.email {
        viewer = viewer.with_email(email);
    }
    Ok(Some(viewer))
}

fn post_id(raw: String) -> RawPostId {
    match raw.parse::<u64>() {
        Ok(number) => RawPostId::Number(number),
        Err(_) => RawPostId::Text(raw),
    }
}

fn render<T: Serialize>(result: folio_lib::shared::Result<T>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ApiResponse::from_result(result))?)
}

async fn run(state: &AppState, command: Commands) -> Result<String> {
    let handler = &state.interaction_handler;

    match command {
        Commands::Show { post_id: raw } => {
            let request = PostRequest {
                post_id: post_id(raw),
            };
            render(handler.get_interactions(request).await)
        }
        Commands::Like { post_id: raw } => {
            let request = PostRequest {
                post_id: post_id(raw),
            };
            render(handler.toggle_like(request).await)
        }
        Commands::Save { post_id: raw } => {
            let request = PostRequest {
                post_id: post_id(raw),
            };
            render(handler.toggle_save(request).await)
        }
        Commands::Comment { post_id: raw, text } => {
            let request = AddCommentRequest {
                post_id: post_id(raw),
                text,
            };
            render(handler.add_comment(request).await)
        }
        Commands::DeleteComment {
            post_id: raw,
            comment_id,
        } => {
            let request = DeleteCommentRequest {
                post_id: post_id(raw),
                comment_id,
            };
            render(handler.delete_comment(request).await)
        }
        Commands::Liked => render(handler.liked_posts().await),
        Commands::Saved => render(handler.saved_posts().await),
    }
}
